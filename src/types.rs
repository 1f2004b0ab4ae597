//! Common types used across the qubo-compiler library.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An opaque variable index (`VI`). Identifies a source- or target-space
/// binary variable; equality and ordering are by identity (the wrapped
/// integer), never by any semantic property of the variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VI(pub usize);

impl VI {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A canonical term: the set of variables multiplied together in one
/// monomial of a [`crate::pbf::Pbf`]. Backed by a `BTreeSet` so that two
/// terms built from the same variables in any order compare equal and hash
/// identically (multilinearity: repeated variables collapse via set union),
/// and so that iterating a PBF's terms in key order is also a lexicographic
/// order over `VI`, which is exactly the ordering `StableQuadratization`
/// requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term(BTreeSet<VI>);

impl Term {
    /// The empty term (represents the constant / degree-0 monomial).
    pub fn constant() -> Self {
        Self(BTreeSet::new())
    }

    /// A single-variable term.
    pub fn single(v: VI) -> Self {
        let mut s = BTreeSet::new();
        s.insert(v);
        Self(s)
    }

    /// Build a term from an iterator of variables, deduplicating.
    pub fn from_vars<I: IntoIterator<Item = VI>>(vars: I) -> Self {
        Self(vars.into_iter().collect())
    }

    /// Degree of this term (number of distinct variables).
    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn is_constant(&self) -> bool {
        self.0.is_empty()
    }

    /// Multilinear product: union of the two variable sets.
    pub fn union(&self, other: &Term) -> Term {
        Term(self.0.union(&other.0).copied().collect())
    }

    pub fn contains(&self, v: VI) -> bool {
        self.0.contains(&v)
    }

    pub fn vars(&self) -> impl Iterator<Item = VI> + '_ {
        self.0.iter().copied()
    }

    /// Remove a variable (used when substituting an assigned-one variable).
    pub fn without(&self, v: VI) -> Term {
        Term(self.0.iter().copied().filter(|&w| w != v).collect())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Optimization direction for the source objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// The kind of domain a source variable ranges over, fixed once and read by
/// every encoder via the domain-conventioning rule in [`Bounds::conventioned`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bounds {
    /// A single binary variable: no encoding expansion needed, ξ = x.
    Binary,
    /// An integer interval `[lo, hi]` (inclusive). Conventioned to
    /// `α = ceil(min(lo,hi))`, `β = floor(max(lo,hi))`.
    Integer { lo: i64, hi: i64 },
    /// A real interval `[lo, hi]` used as-is (no rounding convention).
    Real { lo: f64, hi: f64 },
}

impl Bounds {
    /// `(a, b)` as f64, after applying the integer-conventioning rule when
    /// applicable. Fails with `DomainError` if an integer domain has
    /// `a > b` after conventioning.
    pub fn conventioned(&self) -> crate::error::Result<(f64, f64)> {
        use crate::error::QuboError;
        match *self {
            Bounds::Binary => Ok((0.0, 1.0)),
            Bounds::Integer { lo, hi } => {
                let (lo, hi) = (lo.min(hi), lo.max(hi));
                let alpha = lo;
                let beta = hi;
                if alpha > beta {
                    return Err(QuboError::DomainError(format!(
                        "integer domain has a={alpha} > b={beta} after conventioning"
                    )));
                }
                Ok((alpha as f64, beta as f64))
            }
            Bounds::Real { lo, hi } => {
                if lo > hi {
                    return Err(QuboError::DomainError(format!(
                        "real domain has a={lo} > b={hi}"
                    )));
                }
                Ok((lo, hi))
            }
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Bounds::Integer { .. } | Bounds::Binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_union_is_set_union() {
        let a = Term::from_vars([VI(0), VI(1)]);
        let b = Term::from_vars([VI(1), VI(2)]);
        let u = a.union(&b);
        assert_eq!(u.degree(), 3);
        assert!(u.contains(VI(0)) && u.contains(VI(1)) && u.contains(VI(2)));
    }

    #[test]
    fn term_equality_is_order_independent() {
        let a = Term::from_vars([VI(2), VI(0), VI(1)]);
        let b = Term::from_vars([VI(0), VI(1), VI(2)]);
        assert_eq!(a, b);
    }

    #[test]
    fn bounds_conventioning_rejects_inverted_integer_domain() {
        let b = Bounds::Integer { lo: 5, hi: 5 };
        assert_eq!(b.conventioned().unwrap(), (5.0, 5.0));
    }
}
