//! Domain-Wall (sequential) encoding: `n-1` target bits encode `n` levels.
//! `ξ = α + Σ (γ_i - γ_{i-1}) y_i`; penalty `h = 2·(Σ_{i=2..bits} y_i -
//! y_i·y_{i-1})` enforces that the bits form a monotone prefix of ones (no
//! `0` immediately followed by a `1` when read in target order), using the
//! index convention that makes `ξ` increase with the number of leading
//! ones.

use crate::error::Result;
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, Term, VI};

use super::{one_hot::one_hot_values, VariableAllocator};

/// The level values a domain-wall encoding interpolates between — the same
/// explicit integer list One-Hot uses, interpreted as `n` levels rather
/// than `n` one-hot slots.
pub fn domain_wall_values(domain: &Bounds) -> Result<Vec<f64>> {
    one_hot_values(domain)
}

pub fn encode(
    domain: Bounds,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    let values = domain_wall_values(&domain)?;

    if values.len() <= 1 {
        let c = values.first().copied().unwrap_or(0.0);
        return Ok(VirtualVariable::new(
            EncodingMethod::DomainWall,
            source,
            vec![],
            Pbf::constant(c),
            None,
        ));
    }

    let bits = values.len() - 1;
    let targets = alloc.allocate(bits);

    let mut expansion = Pbf::constant(values[0]);
    for (j, &t) in targets.iter().enumerate() {
        let gamma = values[j + 1] - values[j];
        expansion.add_term(Term::single(t), gamma);
    }

    // h = 2 * Σ_{i=2..=bits} (y_i - y_i * y_{i-1}), 1-indexed; in 0-indexed
    // target-array terms that's pairs (targets[i-1], targets[i]) for
    // i = 1..bits.
    let mut penalty = Pbf::zero();
    for i in 1..bits {
        let (prev, cur) = (targets[i - 1], targets[i]);
        penalty.add_term(Term::single(cur), 2.0);
        penalty.add_term(Term::from_vars([prev, cur]), -2.0);
    }

    Ok(VirtualVariable::new(
        EncodingMethod::DomainWall,
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

    fn prefix_pattern(bits: usize, k: usize) -> Vec<bool> {
        (0..bits).map(|i| i < k).collect()
    }

    #[test]
    fn domain_wall_0_to_3() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(Bounds::Integer { lo: 0, hi: 3 }, Some(VI(0)), &mut alloc).unwrap();
        assert_eq!(vv.targets.len(), 3);
        let h = vv.penalty.as_ref().unwrap();

        for k in 0..=3 {
            let pattern = prefix_pattern(3, k);
            let x: HashMap<VI, bool> = vv
                .targets
                .iter()
                .copied()
                .zip(pattern.iter().copied())
                .collect();
            assert_eq!(h.evaluate_full(&x).unwrap(), 0.0, "prefix k={k} should be valid");
            assert_eq!(vv.expansion.evaluate_full(&x).unwrap(), k as f64);
        }

        // y = (0,1,0): a "0 then 1" violation at position 2 -> h > 0.
        let mut invalid = HashMap::new();
        invalid.insert(vv.targets[0], false);
        invalid.insert(vv.targets[1], true);
        invalid.insert(vv.targets[2], false);
        assert!(h.evaluate_full(&invalid).unwrap() > 0.0);

        // y = (1,1,0): valid prefix of two ones.
        let mut valid = HashMap::new();
        valid.insert(vv.targets[0], true);
        valid.insert(vv.targets[1], true);
        valid.insert(vv.targets[2], false);
        assert_eq!(h.evaluate_full(&valid).unwrap(), 0.0);
    }

    #[test]
    fn single_value_domain_has_no_targets() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(Bounds::Integer { lo: 9, hi: 9 }, None, &mut alloc).unwrap();
        assert!(vv.targets.is_empty());
    }
}
