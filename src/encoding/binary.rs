//! Binary encoding: power-of-two weighted bits with a corrective top bit so
//! the full range is covered exactly.
//!
//! Integer: `γ_i = 2^i` for `i < N-1`, `γ_{N-1} = M - 2^{N-1} + 1`, with
//! `N = ceil(log2(M+1))`, `M = β - α`. Real (`n` bits): `γ_i =
//! ((b-a)/(2^n-1)) · 2^i`.

use crate::error::{QuboError, Result};
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, Term, VI};

use super::{BitBudget, VariableAllocator};

fn bits_for_m(m: i64) -> usize {
    if m <= 0 {
        return 0;
    }
    ((m as f64 + 1.0).log2().ceil() as i64).max(1) as usize
}

fn tolerance_bits(span: f64, tau: f64) -> Result<usize> {
    if tau <= 0.0 {
        return Err(QuboError::DomainError("tolerance must be > 0".into()));
    }
    let n = (1.0 + span.abs() / (4.0 * tau)).log2().ceil();
    Ok(n.max(1.0) as usize)
}

pub fn encode(
    domain: Bounds,
    budget: BitBudget,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    let (a, b) = domain.conventioned()?;

    if domain.is_integer() {
        let m = (b - a).round() as i64;
        if m == 0 {
            return Ok(VirtualVariable::new(
                EncodingMethod::Binary,
                source,
                vec![],
                Pbf::constant(a),
                None,
            ));
        }
        let n = match budget {
            BitBudget::Exact => bits_for_m(m),
            BitBudget::Bits(n) => n,
            BitBudget::Tolerance(tau) => tolerance_bits((b - a).abs(), tau)?,
        };
        let targets = alloc.allocate(n);
        let mut expansion = Pbf::constant(a);
        for (i, &t) in targets.iter().enumerate() {
            let gamma = if i + 1 == n {
                m as f64 - 2f64.powi((n - 1) as i32) + 1.0
            } else {
                2f64.powi(i as i32)
            };
            expansion.add_term(Term::single(t), gamma);
        }
        Ok(VirtualVariable::new(
            EncodingMethod::Binary,
            source,
            targets,
            expansion,
            None,
        ))
    } else {
        let n = match budget {
            BitBudget::Exact => {
                return Err(QuboError::DomainError(
                    "Binary on a real domain requires an explicit bit budget or tolerance".into(),
                ))
            }
            BitBudget::Bits(n) => n,
            BitBudget::Tolerance(tau) => tolerance_bits(b - a, tau)?,
        };
        if n == 0 {
            return Err(QuboError::DomainError("Binary needs at least 1 bit".into()));
        }
        let denom = (2f64.powi(n as i32) - 1.0).max(1.0);
        let scale = (b - a) / denom;
        let targets = alloc.allocate(n);
        let mut expansion = Pbf::constant(a);
        for (i, &t) in targets.iter().enumerate() {
            expansion.add_term(Term::single(t), scale * 2f64.powi(i as i32));
        }
        Ok(VirtualVariable::new(
            EncodingMethod::Binary,
            source,
            targets,
            expansion,
            None,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CounterAllocator;
    use std::collections::HashMap;

    fn eval_all_bits(vv: &VirtualVariable, pattern: &[bool]) -> f64 {
        let x: HashMap<VI, bool> = vv
            .targets
            .iter()
            .copied()
            .zip(pattern.iter().copied())
            .collect();
        vv.expansion.evaluate_full(&x).unwrap()
    }

    #[test]
    fn integer_binary_covers_every_value_in_range() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            Bounds::Integer { lo: 2, hi: 4 },
            BitBudget::Exact,
            Some(VI(0)),
            &mut alloc,
        )
        .unwrap();
        // M = 2, N = ceil(log2(3)) = 2
        assert_eq!(vv.targets.len(), 2);
        let mut reachable = std::collections::HashSet::new();
        for mask in 0..(1 << vv.targets.len()) {
            let pattern: Vec<bool> = (0..vv.targets.len()).map(|i| mask & (1 << i) != 0).collect();
            reachable.insert(eval_all_bits(&vv, &pattern) as i64);
        }
        for v in 2..=4 {
            assert!(reachable.contains(&v), "missing value {v}");
        }
    }

    #[test]
    fn zero_width_is_constant() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            Bounds::Integer { lo: 7, hi: 7 },
            BitBudget::Exact,
            None,
            &mut alloc,
        )
        .unwrap();
        assert!(vv.targets.is_empty());
        assert_eq!(vv.expansion.as_scalar().unwrap(), 7.0);
    }
}
