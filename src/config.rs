//! Model-level compiler configuration.
//!
//! `CompilerConfig` holds the model-wide defaults; per-entity overrides
//! (variable encoding choice/bits/tolerance/penalty, constraint penalty,
//! slack penalty) are passed alongside it as a separate
//! [`crate::translate::Overrides`] value, keyed by the entity they
//! override.

use crate::encoding::{BitBudget, EncodingKind};
use serde::{Deserialize, Serialize};

/// Which quadratization algorithm to run when `quadratize` is enabled and a
/// term of degree >= 3 is found. Only `PairwiseSubstitution` is implemented;
/// the enum exists so a second method can be added without touching call
/// sites (same tagged-variant-over-open-dispatch rationale as `Encoding`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuadratizationMethod {
    /// Repeatedly substitute the highest-degree term's first two variables
    /// with a fresh auxiliary via the standard `z ≈ x·y` penalty
    /// (`3z + xy - 2xz - 2yz`) until no term has degree >= 3.
    #[default]
    PairwiseSubstitution,
}

/// Model-wide compiler attributes. Per-entity overrides (see
/// [`crate::model::VirtualModel`]) take precedence over these defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Opaque architecture tag selecting architecture-specialized code
    /// paths. The core does not interpret it; it is forwarded to callers
    /// that do (the out-of-scope solver adapter).
    pub architecture: String,
    /// Enables degree reduction. When `false`, a degree >= 3 Hamiltonian is
    /// a hard compile failure (`QuadratizationIncomplete`) rather than
    /// being reduced.
    pub quadratize: bool,
    pub quadratization_method: QuadratizationMethod,
    /// Forces deterministic term-visitation and auxiliary-introduction
    /// order during quadratization.
    pub stable_quadratization: bool,
    pub default_encoding_method: EncodingKind,
    pub default_encoding_bits: Option<usize>,
    pub default_encoding_atol: Option<f64>,
}

impl CompilerConfig {
    /// The bit budget implied by the model-wide defaults: explicit bits if
    /// set, else tolerance, else `Exact`.
    pub fn default_bit_budget(&self) -> BitBudget {
        if let Some(n) = self.default_encoding_bits {
            BitBudget::Bits(n)
        } else if let Some(tau) = self.default_encoding_atol {
            BitBudget::Tolerance(tau)
        } else {
            BitBudget::Exact
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            architecture: "generic".to_string(),
            quadratize: true,
            quadratization_method: QuadratizationMethod::default(),
            stable_quadratization: true,
            default_encoding_method: EncodingKind::Binary,
            default_encoding_bits: None,
            default_encoding_atol: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bit_budget_prefers_explicit_bits_over_tolerance() {
        let mut cfg = CompilerConfig::default();
        cfg.default_encoding_bits = Some(4);
        cfg.default_encoding_atol = Some(0.1);
        assert_eq!(cfg.default_bit_budget(), BitBudget::Bits(4));
    }

    #[test]
    fn default_bit_budget_falls_back_to_exact() {
        let cfg = CompilerConfig::default();
        assert_eq!(cfg.default_bit_budget(), BitBudget::Exact);
    }
}
