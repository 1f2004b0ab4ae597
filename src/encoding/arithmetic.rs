//! Arithmetic-progression encoding: `γ_i = i` for `i < N`, with a corrective
//! top bit `γ_N = M - N(N-1)/2`, `N = ceil((sqrt(1+8M)-1)/2)`. Triangular
//! weights reach `0..N(N-1)/2` exactly; the correction bit extends that to
//! the full range `M`.

use crate::error::{QuboError, Result};
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, Term, VI};

use super::{BitBudget, VariableAllocator};

/// Total bit count (`N + 1`) needed to represent `M` exactly.
fn bits_for_m(m: f64) -> usize {
    if m <= 0.0 {
        return 0;
    }
    let big_n = ((1.0 + 8.0 * m).sqrt() - 1.0) / 2.0;
    (big_n.ceil() as i64 + 1).max(1) as usize
}

fn tolerance_bits(span: f64, tau: f64) -> Result<usize> {
    if tau <= 0.0 {
        return Err(QuboError::DomainError("tolerance must be > 0".into()));
    }
    let n = (1.0 + (3.0 + span.abs() / (2.0 * tau)).sqrt()) / 2.0;
    Ok(n.ceil().max(1.0) as usize)
}

pub fn encode(
    domain: Bounds,
    budget: BitBudget,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    if !domain.is_integer() {
        return Err(QuboError::DomainError(
            "Arithmetic encoding requires an integer domain".into(),
        ));
    }
    let (a, b) = domain.conventioned()?;
    let m = b - a;

    if m == 0.0 {
        return Ok(VirtualVariable::new(
            EncodingMethod::Arithmetic,
            source,
            vec![],
            Pbf::constant(a),
            None,
        ));
    }

    let total_bits = match budget {
        BitBudget::Exact => bits_for_m(m),
        BitBudget::Bits(n) => n,
        BitBudget::Tolerance(tau) => tolerance_bits(m, tau)?,
    };
    if total_bits == 0 {
        return Err(QuboError::DomainError(
            "Arithmetic encoding needs at least 1 bit for a nonzero-width domain".into(),
        ));
    }

    let big_n = (total_bits - 1) as f64; // number of pure-triangular bits
    let targets = alloc.allocate(total_bits);
    let mut expansion = Pbf::constant(a);
    for (i, &t) in targets.iter().enumerate() {
        let gamma = if i + 1 == total_bits {
            m - big_n * (big_n - 1.0) / 2.0
        } else {
            i as f64
        };
        expansion.add_term(Term::single(t), gamma);
    }

    Ok(VirtualVariable::new(
        EncodingMethod::Arithmetic,
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
    fn covers_full_range() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            Bounds::Integer { lo: 0, hi: 10 },
            BitBudget::Exact,
            Some(VI(0)),
            &mut alloc,
        )
        .unwrap();
        let mut reachable = std::collections::HashSet::new();
        for mask in 0..(1u32 << vv.targets.len()) {
            let x: HashMap<VI, bool> = vv
                .targets
                .iter()
                .enumerate()
                .map(|(i, &t)| (t, mask & (1 << i) != 0))
                .collect();
            reachable.insert(vv.expansion.evaluate_full(&x).unwrap() as i64);
        }
        for v in 0..=10 {
            assert!(reachable.contains(&v), "missing {v}");
        }
    }

    #[test]
    fn zero_width_domain_is_constant() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            Bounds::Integer { lo: 3, hi: 3 },
            BitBudget::Exact,
            None,
            &mut alloc,
        )
        .unwrap();
        assert!(vv.targets.is_empty());
    }

    #[test]
    fn real_domain_rejected() {
        let mut alloc = CounterAllocator::default();
        assert!(encode(
            Bounds::Real { lo: 0.0, hi: 1.0 },
            BitBudget::Exact,
            None,
            &mut alloc
        )
        .is_err());
    }
}
