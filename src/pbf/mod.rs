//! Pseudo-Boolean Function (PBF) algebra.
//!
//! A [`Pbf`] is a multilinear polynomial over Boolean variables: a mapping
//! from finite variable sets ([`Term`]) to nonzero coefficients. Since
//! `x^2 = x` for `x in {0,1}`, products never re-introduce a repeated
//! variable — multiplying two terms is their set union, never a multiset
//! union. The empty term is the constant.

use crate::error::{QuboError, Result};
use crate::types::{Term, VI};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A multilinear pseudo-Boolean function: `Σ_ω c_ω · Π_{j∈ω} x_j`.
///
/// Backed by a `BTreeMap<Term, f64>` rather than a hash map: this gives
/// canonical, deterministic iteration order for free (terms sorted
/// lexicographically by the variable indices they contain), which is
/// exactly the ordering `StableQuadratization` needs when it walks
/// high-degree terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pbf {
    terms: BTreeMap<Term, f64>,
}

const ZERO_EPS: f64 = 0.0;

impl Pbf {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self {
            terms: BTreeMap::new(),
        }
    }

    /// A constant polynomial.
    pub fn constant(c: f64) -> Self {
        let mut p = Self::zero();
        p.insert(Term::constant(), c);
        p
    }

    /// A single variable, coefficient 1 (`f(x) = x`).
    pub fn variable(v: VI) -> Self {
        let mut p = Self::zero();
        p.insert(Term::single(v), 1.0);
        p
    }

    /// Build directly from (term, coefficient) pairs, applying the
    /// zero-coefficient invariant.
    pub fn from_terms<I: IntoIterator<Item = (Term, f64)>>(iter: I) -> Self {
        let mut p = Self::zero();
        for (t, c) in iter {
            p.add_term(t, c);
        }
        p
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn coefficient(&self, term: &Term) -> f64 {
        self.terms.get(term).copied().unwrap_or(0.0)
    }

    /// Terms in canonical (sorted) order, as required for stable
    /// quadratization.
    pub fn iter(&self) -> impl Iterator<Item = (&Term, &f64)> {
        self.terms.iter()
    }

    pub fn constant_term(&self) -> f64 {
        self.coefficient(&Term::constant())
    }

    /// `insert(ω, c)`: if `c == 0`, remove ω; else set `Ω[ω] = c`.
    pub fn insert(&mut self, term: Term, c: f64) {
        if c == ZERO_EPS {
            self.terms.remove(&term);
        } else {
            self.terms.insert(term, c);
        }
    }

    /// `add_term(ω, c)`: `Ω[ω] += c`; if the result is zero, remove.
    pub fn add_term(&mut self, term: Term, c: f64) {
        let entry = self.terms.entry(term.clone()).or_insert(0.0);
        *entry += c;
        if *entry == ZERO_EPS {
            self.terms.remove(&term);
        }
    }

    /// Degree: the size of the largest term. The zero polynomial has
    /// degree 0.
    pub fn degree(&self) -> usize {
        self.terms.keys().map(Term::degree).max().unwrap_or(0)
    }

    /// Loose lower bound: sum of negative coefficients plus the constant.
    pub fn lower_bound(&self) -> f64 {
        self.terms
            .iter()
            .map(|(t, &c)| if t.is_constant() { c } else { c.min(0.0) })
            .sum()
    }

    /// Loose upper bound: sum of positive coefficients plus the constant.
    pub fn upper_bound(&self) -> f64 {
        self.terms
            .iter()
            .map(|(t, &c)| if t.is_constant() { c } else { c.max(0.0) })
            .sum()
    }

    /// `upper_bound - lower_bound`.
    pub fn gap(&self) -> f64 {
        self.upper_bound() - self.lower_bound()
    }

    /// All variables appearing in any term.
    pub fn variables(&self) -> std::collections::BTreeSet<VI> {
        self.terms
            .keys()
            .flat_map(|t| t.vars())
            .collect()
    }

    /// Evaluate at a partial assignment. Terms containing a variable
    /// assigned 0 are dropped; variables assigned 1 are removed from the
    /// surviving terms' variable sets (and contribute their coefficient
    /// unchanged, since `x=1` multiplies by 1). Unassigned variables are
    /// left untouched. Returns the residual PBF.
    pub fn evaluate_partial(&self, x: &std::collections::HashMap<VI, bool>) -> Pbf {
        let mut out = Pbf::zero();
        'terms: for (term, &c) in &self.terms {
            let mut reduced = term.clone();
            for v in term.vars() {
                match x.get(&v) {
                    Some(false) => continue 'terms,
                    Some(true) => reduced = reduced.without(v),
                    None => {}
                }
            }
            out.add_term(reduced, c);
        }
        out
    }

    /// Evaluate at a full assignment: `Σ {c_ω : ω ⊆ {j : x_j = 1}}`.
    /// Fails with `ArithmeticFailure` if any variable appearing in the
    /// polynomial is missing from `x`.
    pub fn evaluate_full(&self, x: &std::collections::HashMap<VI, bool>) -> Result<f64> {
        let mut total = 0.0;
        for (term, &c) in &self.terms {
            let mut satisfied = true;
            for v in term.vars() {
                match x.get(&v) {
                    Some(true) => {}
                    Some(false) => {
                        satisfied = false;
                        break;
                    }
                    None => {
                        return Err(QuboError::ArithmeticFailure(format!(
                            "variable {v} missing from full assignment"
                        )))
                    }
                }
            }
            if satisfied {
                total += c;
            }
        }
        Ok(total)
    }

    /// Exact equality (same terms, identical coefficients).
    pub fn equals_exact(&self, other: &Pbf) -> bool {
        self == other
    }

    /// Approximate equality: every term present in either side has
    /// coefficients within `atol` of each other (missing terms treated as
    /// coefficient 0).
    pub fn approx_eq(&self, other: &Pbf, atol: f64) -> bool {
        let mut all_terms: std::collections::BTreeSet<&Term> = self.terms.keys().collect();
        all_terms.extend(other.terms.keys());
        all_terms
            .into_iter()
            .all(|t| (self.coefficient(t) - other.coefficient(t)).abs() <= atol)
    }

    /// Scale all coefficients by a common factor so each lands within `tol`
    /// of an integer, then round. Fails with `ArithmeticFailure` if `tol`
    /// is not positive, or if no finite scale achieves the tolerance for a
    /// nonzero polynomial (irrational ratios between coefficients).
    pub fn discretize(&self, tol: f64) -> Result<Pbf> {
        if tol <= 0.0 {
            return Err(QuboError::ArithmeticFailure(
                "discretize requires tol > 0".into(),
            ));
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        // Search increasing integer scales until every coefficient lands
        // within `tol` of an integer multiple.
        let mut scale = 1.0_f64;
        let max_scale = 1e9;
        loop {
            let ok = self
                .terms
                .values()
                .all(|&c| (c * scale - (c * scale).round()).abs() <= tol);
            if ok {
                break;
            }
            scale *= 2.0;
            if scale > max_scale {
                return Err(QuboError::ArithmeticFailure(
                    "discretize: no scale within tol found".into(),
                ));
            }
        }
        let mut out = Pbf::zero();
        for (t, &c) in &self.terms {
            out.insert(t.clone(), (c * scale).round() / scale);
        }
        Ok(out)
    }

    /// Raise to the `n`-th power via fast exponentiation using the
    /// multilinear product. `n == 0` gives the constant `1` for any `f`,
    /// including `f == 0`, matching the conventional empty product.
    pub fn pow(&self, n: i64) -> Result<Pbf> {
        if n < 0 {
            return Err(QuboError::ArithmeticFailure(
                "negative exponent on PBF".into(),
            ));
        }
        let mut result = Pbf::constant(1.0);
        let mut base = self.clone();
        let mut exp = n as u64;
        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            exp >>= 1;
            if exp > 0 {
                base = &base * &base;
            }
        }
        Ok(result)
    }

    /// As a scalar constant. Fails with `ArithmeticFailure` if the
    /// polynomial is not actually constant (has any non-empty term).
    pub fn as_scalar(&self) -> Result<f64> {
        if self.terms.keys().any(|t| !t.is_constant()) {
            return Err(QuboError::ArithmeticFailure(
                "cannot produce a scalar from a non-constant PBF".into(),
            ));
        }
        Ok(self.constant_term())
    }
}

impl fmt::Display for Pbf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (t, c) in &self.terms {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if t.is_constant() {
                write!(f, "{c}")?;
            } else {
                write!(f, "{c}*{t}")?;
            }
        }
        Ok(())
    }
}

impl Add for &Pbf {
    type Output = Pbf;
    fn add(self, rhs: &Pbf) -> Pbf {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl AddAssign<&Pbf> for Pbf {
    fn add_assign(&mut self, rhs: &Pbf) {
        for (t, &c) in &rhs.terms {
            self.add_term(t.clone(), c);
        }
    }
}

impl Add<&Pbf> for Pbf {
    type Output = Pbf;
    fn add(mut self, rhs: &Pbf) -> Pbf {
        self += rhs;
        self
    }
}

impl Sub for &Pbf {
    type Output = Pbf;
    fn sub(self, rhs: &Pbf) -> Pbf {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl SubAssign<&Pbf> for Pbf {
    fn sub_assign(&mut self, rhs: &Pbf) {
        for (t, &c) in &rhs.terms {
            self.add_term(t.clone(), -c);
        }
    }
}

impl Sub<&Pbf> for Pbf {
    type Output = Pbf;
    fn sub(mut self, rhs: &Pbf) -> Pbf {
        self -= rhs;
        self
    }
}

impl Neg for &Pbf {
    type Output = Pbf;
    fn neg(self) -> Pbf {
        Pbf::from_terms(self.terms.iter().map(|(t, &c)| (t.clone(), -c)))
    }
}

impl Mul for &Pbf {
    type Output = Pbf;
    fn mul(self, rhs: &Pbf) -> Pbf {
        let mut out = Pbf::zero();
        for (t1, &c1) in &self.terms {
            for (t2, &c2) in &rhs.terms {
                out.add_term(t1.union(t2), c1 * c2);
            }
        }
        out
    }
}

impl Mul<f64> for &Pbf {
    type Output = Pbf;
    fn mul(self, rhs: f64) -> Pbf {
        Pbf::from_terms(self.terms.iter().map(|(t, &c)| (t.clone(), c * rhs)))
    }
}

impl MulAssign<f64> for Pbf {
    fn mul_assign(&mut self, rhs: f64) {
        if rhs == 0.0 {
            self.terms.clear();
            return;
        }
        for c in self.terms.values_mut() {
            *c *= rhs;
        }
    }
}

impl Div<f64> for &Pbf {
    type Output = Result<Pbf>;
    fn div(self, rhs: f64) -> Result<Pbf> {
        if rhs == 0.0 {
            return Err(QuboError::ArithmeticFailure("division by zero".into()));
        }
        Ok(Pbf::from_terms(
            self.terms.iter().map(|(t, &c)| (t.clone(), c / rhs)),
        ))
    }
}

#[cfg(test)]
#[path = "../tests_unit/pbf.rs"]
mod tests;
