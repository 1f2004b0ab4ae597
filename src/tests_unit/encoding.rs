use super::*;
use crate::types::Bounds;
use proptest::prelude::*;
use std::collections::HashMap;

fn all_assignments(targets: &[VI]) -> Vec<HashMap<VI, bool>> {
    let n = targets.len();
    (0..(1u32 << n))
        .map(|mask| {
            targets
                .iter()
                .enumerate()
                .map(|(i, &t)| (t, mask & (1 << i) != 0))
                .collect()
        })
        .collect()
}

fn check_covers_range_and_penalty_contract(vv: &VirtualVariable, lo: i64, hi: i64) {
    let mut reachable_valid = std::collections::HashSet::new();
    for x in all_assignments(&vv.targets) {
        let h = vv.penalty.as_ref().map(|p| p.evaluate_full(&x).unwrap());
        if let Some(h) = h {
            assert!(h >= 0.0, "penalty must be nonnegative");
        }
        let xi = vv.expansion.evaluate_full(&x).unwrap();
        let valid = h.map(|h| h == 0.0).unwrap_or(true);
        if valid {
            reachable_valid.insert(xi.round() as i64);
        }
    }
    for v in lo..=hi {
        assert!(
            reachable_valid.contains(&v),
            "value {v} not reachable with h=0"
        );
    }
}

#[test]
fn unary_covers_range_with_no_penalty() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::Unary,
        Bounds::Integer { lo: 0, hi: 4 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_none());
    check_covers_range_and_penalty_contract(&vv, 0, 4);
}

#[test]
fn linear_covers_requested_values_with_no_penalty() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::Linear {
            gammas: vec![1.0, 2.0, 4.0],
        },
        Bounds::Integer { lo: 0, hi: 0 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_none());
    check_covers_range_and_penalty_contract(&vv, 0, 7);
}

#[test]
fn binary_covers_range_with_no_penalty() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::Binary,
        Bounds::Integer { lo: 1, hi: 9 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_none());
    check_covers_range_and_penalty_contract(&vv, 1, 9);
}

#[test]
fn arithmetic_covers_range_with_no_penalty() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::Arithmetic,
        Bounds::Integer { lo: 0, hi: 7 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_none());
    check_covers_range_and_penalty_contract(&vv, 0, 7);
}

#[test]
fn one_hot_covers_range_and_penalizes_invalid_patterns() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::OneHot,
        Bounds::Integer { lo: 0, hi: 3 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_some());
    check_covers_range_and_penalty_contract(&vv, 0, 3);
}

#[test]
fn domain_wall_covers_range_and_penalizes_invalid_patterns() {
    let mut alloc = CounterAllocator::default();
    let vv = encode(
        EncodingKind::DomainWall,
        Bounds::Integer { lo: 0, hi: 4 },
        BitBudget::Exact,
        Some(VI(0)),
        &mut alloc,
    )
    .unwrap();
    assert!(vv.penalty.is_some());
    check_covers_range_and_penalty_contract(&vv, 0, 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_unary_bit_count_bounds_max_error(lo in -5i64..5, width in 1i64..12, tau in 0.1..2.0_f64) {
        let hi = lo + width;
        let span = (hi - lo) as f64;
        let n = (1.0 + span / (4.0 * tau)).ceil().max(1.0) as usize;

        let mut alloc = CounterAllocator::default();
        let vv = encode(
            EncodingKind::Unary,
            Bounds::Real { lo: lo as f64, hi: hi as f64 },
            BitBudget::Bits(n),
            None,
            &mut alloc,
        )
        .unwrap();

        // Worst-case quantization error for n equal unary steps is
        // (span / n) / 2 <= tau, by construction of n from the formula.
        let step = span / n as f64;
        prop_assert!(step / 2.0 <= tau + 1e-9);
    }

    #[test]
    fn prop_one_hot_penalty_zero_iff_exactly_one_hot(n in 1usize..6, mask in 0u32..64) {
        let mut alloc = CounterAllocator::default();
        let vv = encode(
            EncodingKind::OneHot,
            Bounds::Integer { lo: 0, hi: n as i64 },
            BitBudget::Exact,
            None,
            &mut alloc,
        )
        .unwrap();
        let bits = vv.targets.len();
        let mask = mask as usize & ((1 << bits) - 1);
        let x: HashMap<VI, bool> = vv
            .targets
            .iter()
            .enumerate()
            .map(|(i, &t)| (t, mask & (1 << i) != 0))
            .collect();
        let h = vv.penalty.as_ref().unwrap().evaluate_full(&x).unwrap();
        let popcount = (mask as u32).count_ones();
        if popcount == 1 {
            prop_assert_eq!(h, 0.0);
        } else {
            prop_assert!(h > 0.0);
        }
    }
}
