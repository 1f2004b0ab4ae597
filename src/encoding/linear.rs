//! Linear encoding: caller-supplied coefficients, `ξ = a + Σ γ_i y_i`, no
//! penalty. Unlike Unary/Binary/Arithmetic the weights are not derived from
//! the domain by a closed-form rule — they are whatever the caller passes.

use crate::error::{QuboError, Result};
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, Term, VI};

use super::VariableAllocator;

pub fn encode(
    domain: Bounds,
    gammas: &[f64],
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    let (a, _b) = domain.conventioned()?;
    if gammas.is_empty() {
        return Err(QuboError::DomainError(
            "Linear encoding requires at least one coefficient".into(),
        ));
    }

    let targets = alloc.allocate(gammas.len());
    let mut expansion = Pbf::constant(a);
    for (&t, &gamma) in targets.iter().zip(gammas) {
        expansion.add_term(Term::single(t), gamma);
    }

    Ok(VirtualVariable::new(
        EncodingMethod::Linear,
        source,
        targets,
        expansion,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CounterAllocator;
    use std::collections::HashMap;

    #[test]
    fn linear_expansion_is_offset_plus_weighted_sum() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            Bounds::Integer { lo: 1, hi: 1 },
            &[2.0, 5.0],
            Some(VI(0)),
            &mut alloc,
        )
        .unwrap();
        assert_eq!(vv.targets.len(), 2);
        assert!(vv.penalty.is_none());

        let mut x: HashMap<VI, bool> = vv.targets.iter().map(|&t| (t, false)).collect();
        assert_eq!(vv.expansion.evaluate_full(&x).unwrap(), 1.0);
        x.insert(vv.targets[0], true);
        assert_eq!(vv.expansion.evaluate_full(&x).unwrap(), 3.0);
        x.insert(vv.targets[1], true);
        assert_eq!(vv.expansion.evaluate_full(&x).unwrap(), 8.0);
    }

    #[test]
    fn linear_rejects_empty_coefficient_list() {
        let mut alloc = CounterAllocator::default();
        assert!(encode(Bounds::Integer { lo: 0, hi: 0 }, &[], None, &mut alloc).is_err());
    }
}
