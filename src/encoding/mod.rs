//! Variable-encoding layer: maps one bounded source variable to a set of
//! binary target variables, producing an expansion polynomial ξ and (for
//! One-Hot and Domain-Wall) a penalty polynomial h.
//!
//! Dispatch is a tagged variant over encoding kinds rather than open
//! trait-object dispatch, so adding an encoding never requires touching
//! call sites — only this enum and its match arms.

mod arithmetic;
mod binary;
mod domain_wall;
mod linear;
mod mirror;
mod one_hot;
mod unary;

use crate::error::Result;
use crate::model::virtual_variable::VirtualVariable;
use crate::types::{Bounds, VI};
use serde::{Deserialize, Serialize};

/// Allocates fresh binary target variables. Both the encoder layer and the
/// quadratizer's auxiliary-introduction step share this one seam: the
/// quadratizer never reaches into a `VirtualModel`'s internals, it only
/// calls an injected allocator.
pub trait VariableAllocator {
    fn allocate(&mut self, n: usize) -> Vec<VI>;
}

/// A simple monotone-counter allocator, used standalone in tests and as the
/// building block `VirtualModel` wraps with its own bookkeeping.
#[derive(Debug, Default)]
pub struct CounterAllocator {
    next: usize,
}

impl CounterAllocator {
    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }
}

impl VariableAllocator for CounterAllocator {
    fn allocate(&mut self, n: usize) -> Vec<VI> {
        let out: Vec<VI> = (self.next..self.next + n).map(VI).collect();
        self.next += n;
        out
    }
}

/// How many target bits an encoder should use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BitBudget {
    /// Use the domain's intrinsic exact bit count (e.g. `n = b - a` for
    /// Unary on integers). Not valid for encodings on real domains, which
    /// have no intrinsic exact representation.
    Exact,
    /// Use exactly this many target bits.
    Bits(usize),
    /// Derive the bit count from a desired tolerance via each encoding's
    /// own closed-form bit-count formula.
    Tolerance(f64),
}

/// The tagged encoding-kind variant. Parameters that do not depend on the
/// domain (e.g. explicit value lists for One-Hot/Domain-Wall, or the
/// coefficient list for Linear) are carried inline; domain-dependent
/// parameters (`a`, `b`) are supplied separately to `encode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodingKind {
    /// One-to-one binary passthrough, `y ≡ x`.
    Mirror,
    /// `ξ = a + Σ γ_i y_i` for caller-supplied coefficients `γ_i`.
    Linear { gammas: Vec<f64> },
    /// `ξ = a + Σ y_i` (integer) or `ξ = a + ((b-a)/n) Σ y_i` (real).
    Unary,
    /// Power-of-two weighted bits with a corrective top bit.
    Binary,
    /// Arithmetic-progression weighted bits with a corrective top bit.
    Arithmetic,
    /// One bit per value in the domain, with a one-hot penalty.
    OneHot,
    /// `n-1` bits encoding `n` levels via a monotone-prefix penalty.
    DomainWall,
}

/// Encode `domain` using `kind`, allocating target bits from `alloc` and
/// tagging the result with `source` (or `None` for an auxiliary).
pub fn encode(
    kind: EncodingKind,
    domain: Bounds,
    budget: BitBudget,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    match kind {
        EncodingKind::Mirror => mirror::encode(domain, source, alloc),
        EncodingKind::Linear { gammas } => linear::encode(domain, &gammas, source, alloc),
        EncodingKind::Unary => unary::encode(domain, budget, source, alloc),
        EncodingKind::Binary => binary::encode(domain, budget, source, alloc),
        EncodingKind::Arithmetic => arithmetic::encode(domain, budget, source, alloc),
        EncodingKind::OneHot => one_hot::encode(domain, source, alloc),
        EncodingKind::DomainWall => domain_wall::encode(domain, source, alloc),
    }
}

/// Allocate `n` fresh binary targets registered with no source and no
/// penalty — the Mirror auxiliaries the quadratizer asks for.
pub fn mirror_auxiliaries(n: usize, alloc: &mut dyn VariableAllocator) -> Vec<VirtualVariable> {
    alloc
        .allocate(n)
        .into_iter()
        .map(|v| mirror::mirror_of(v))
        .collect()
}

pub use domain_wall::domain_wall_values;
pub use one_hot::one_hot_values;

#[cfg(test)]
#[path = "../tests_unit/encoding.rs"]
mod tests;
