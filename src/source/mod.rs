//! Source model ingest: the mixed integer/real/binary model the compiler
//! consumes before translation.

use crate::types::{Bounds, Direction, VI};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An affine-or-quadratic scalar expression: the common currency both the
/// objective and every constraint side translate through.
///
/// `constant + Σ linear_i·x_i + Σ quadratic_k·x_i·x_j`. A quadratic term
/// with `i == j` is a legal (if unusual) way to write `c·x_i²`; the
/// translator halves its contribution per the `½xᵀQx` on-diagonal
/// convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expr {
    pub constant: f64,
    pub linear: Vec<(VI, f64)>,
    pub quadratic: Vec<(VI, VI, f64)>,
}

impl Expr {
    pub fn constant(c: f64) -> Self {
        Self {
            constant: c,
            ..Default::default()
        }
    }

    pub fn variable(v: VI) -> Self {
        Self {
            linear: vec![(v, 1.0)],
            ..Default::default()
        }
    }

    pub fn with_linear(mut self, v: VI, c: f64) -> Self {
        self.linear.push((v, c));
        self
    }

    pub fn with_quadratic(mut self, i: VI, j: VI, c: f64) -> Self {
        self.quadratic.push((i, j, c));
        self
    }

    pub fn variables(&self) -> impl Iterator<Item = VI> + '_ {
        self.linear
            .iter()
            .map(|&(v, _)| v)
            .chain(self.quadratic.iter().flat_map(|&(i, j, _)| [i, j]))
    }
}

/// The right-hand side of a linear constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LinearSet {
    Eq(f64),
    Le(f64),
    Ge(f64),
}

/// The two constraint shapes the translator accepts, plus the two
/// domain-trigger constraints that only force a variable's encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// `expr {==, <=, >=} k`.
    Linear { expr: Expr, set: LinearSet },
    /// At most one of `vars` may be nonzero.
    Sos1 { vars: Vec<VI> },
}

/// The function/set pair an external caller wants to probe for support
/// before building a [`ConstraintKind`] from untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Affine,
    Quadratic,
    Sos1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    Eq,
    Le,
    Ge,
    Sos1,
}

/// Whether the translator can handle this function/set pair. A closed,
/// total query: it never fails, even for a pair nothing supports.
pub fn supports(function_kind: FunctionKind, set_kind: SetKind) -> bool {
    matches!(
        (function_kind, set_kind),
        (FunctionKind::Affine | FunctionKind::Quadratic, SetKind::Eq | SetKind::Le | SetKind::Ge)
            | (FunctionKind::Sos1, SetKind::Sos1)
    )
}

/// The mixed integer/real/binary model the compiler consumes. Every
/// variable's domain must be fully determined before `compile!` runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceModel {
    pub variables: Vec<VI>,
    pub domains: HashMap<VI, Bounds>,
    pub objective_sense: Option<Direction>,
    pub objective: Expr,
    pub constraints: Vec<ConstraintKind>,
}

impl SourceModel {
    pub fn new() -> Self {
        Self {
            objective_sense: Some(Direction::Minimize),
            ..Default::default()
        }
    }

    pub fn add_variable(&mut self, v: VI, bounds: Bounds) {
        if !self.domains.contains_key(&v) {
            self.variables.push(v);
        }
        self.domains.insert(v, bounds);
    }

    pub fn set_objective(&mut self, sense: Direction, expr: Expr) {
        self.objective_sense = Some(sense);
        self.objective = expr;
    }

    pub fn add_constraint(&mut self, kind: ConstraintKind) {
        self.constraints.push(kind);
    }

    /// Fails with `DomainError` if `v` was never added — every variable the
    /// objective/constraints mention must have a registered domain.
    pub fn domain_of(&self, v: VI) -> crate::error::Result<Bounds> {
        self.domains.get(&v).copied().ok_or_else(|| {
            crate::error::QuboError::DomainError(format!(
                "variable {v} has no registered domain"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supports_rejects_sos1_paired_with_a_linear_set() {
        assert!(!supports(FunctionKind::Sos1, SetKind::Eq));
        assert!(supports(FunctionKind::Sos1, SetKind::Sos1));
        assert!(supports(FunctionKind::Affine, SetKind::Le));
    }

    #[test]
    fn domain_of_missing_variable_fails() {
        let m = SourceModel::new();
        assert!(m.domain_of(VI(0)).is_err());
    }

    #[test]
    fn add_variable_does_not_duplicate_in_variable_list() {
        let mut m = SourceModel::new();
        m.add_variable(VI(0), Bounds::Binary);
        m.add_variable(VI(0), Bounds::Binary);
        assert_eq!(m.variables.len(), 1);
    }
}
