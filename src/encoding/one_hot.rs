//! One-Hot encoding: one target bit per value, `ξ = Σ γ_i y_i`, penalty
//! `h = (1 - Σ y_i)²` enforcing that exactly one bit is set.

use crate::error::Result;
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, Term, VI};

use super::VariableAllocator;

/// The explicit value list a one-hot (or domain-wall) encoding walks over:
/// every integer in `[ceil(a), floor(b)]` for an integer domain.
pub fn one_hot_values(domain: &Bounds) -> Result<Vec<f64>> {
    let (a, b) = domain.conventioned()?;
    let lo = a.round() as i64;
    let hi = b.round() as i64;
    Ok((lo..=hi).map(|v| v as f64).collect())
}

pub fn encode(
    domain: Bounds,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    let values = one_hot_values(&domain)?;

    if values.len() <= 1 {
        let c = values.first().copied().unwrap_or(0.0);
        return Ok(VirtualVariable::new(
            EncodingMethod::OneHot,
            source,
            vec![],
            Pbf::constant(c),
            None,
        ));
    }

    let targets = alloc.allocate(values.len());
    let mut expansion = Pbf::zero();
    let mut one_minus_sum = Pbf::constant(1.0);
    for (&t, &v) in targets.iter().zip(values.iter()) {
        expansion.add_term(Term::single(t), v);
        one_minus_sum.add_term(Term::single(t), -1.0);
    }
    let penalty = &one_minus_sum * &one_minus_sum;

    Ok(VirtualVariable::new(
        EncodingMethod::OneHot,
        source,
        targets,
        expansion,
        Some(penalty),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CounterAllocator;
    use std::collections::HashMap;

    #[test]
    fn one_hot_integer_0_to_2() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(Bounds::Integer { lo: 0, hi: 2 }, Some(VI(0)), &mut alloc).unwrap();
        assert_eq!(vv.targets.len(), 3);
        let h = vv.penalty.as_ref().unwrap();

        // Exactly-one-hot patterns: h == 0, ξ == matching value.
        for (k, &t) in vv.targets.iter().enumerate() {
            let x: HashMap<VI, bool> = vv.targets.iter().map(|&v| (v, v == t)).collect();
            assert_eq!(h.evaluate_full(&x).unwrap(), 0.0);
            assert_eq!(vv.expansion.evaluate_full(&x).unwrap(), k as f64);
        }

        // All-zero and two-hot patterns are invalid: h > 0.
        let all_zero: HashMap<VI, bool> = vv.targets.iter().map(|&v| (v, false)).collect();
        assert!(h.evaluate_full(&all_zero).unwrap() > 0.0);

        let mut two_hot = HashMap::new();
        for (i, &t) in vv.targets.iter().enumerate() {
            two_hot.insert(t, i < 2);
        }
        assert!(h.evaluate_full(&two_hot).unwrap() > 0.0);
    }

    #[test]
    fn single_value_domain_is_constant_with_no_targets() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(Bounds::Integer { lo: 5, hi: 5 }, None, &mut alloc).unwrap();
        assert!(vv.targets.is_empty());
        assert_eq!(vv.expansion.as_scalar().unwrap(), 5.0);
    }
}
