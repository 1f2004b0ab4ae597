use super::*;
use crate::types::VI;
use proptest::prelude::*;
use std::collections::HashMap;

fn assign(bits: &[bool]) -> HashMap<VI, bool> {
    bits.iter()
        .enumerate()
        .map(|(i, &b)| (VI(i), b))
        .collect()
}

#[test]
fn insert_removes_zero_coefficient() {
    let mut p = Pbf::zero();
    p.insert(Term::single(VI(0)), 3.0);
    assert_eq!(p.num_terms(), 1);
    p.insert(Term::single(VI(0)), 0.0);
    assert!(p.is_zero());
}

#[test]
fn add_term_cancels_to_zero() {
    let mut p = Pbf::zero();
    p.add_term(Term::single(VI(0)), 2.0);
    p.add_term(Term::single(VI(0)), -2.0);
    assert!(p.is_zero());
}

#[test]
fn multiplication_is_multilinear_idempotent() {
    // (f*x)*x == f*x for a Boolean x: repeated variables collapse.
    let x = Pbf::variable(VI(0));
    let f = Pbf::constant(3.0) + &Pbf::variable(VI(1));
    let fx = &f * &x;
    let fxx = &fx * &x;
    assert!(fx.equals_exact(&fxx));
}

#[test]
fn f_minus_f_is_zero() {
    let f = Pbf::constant(2.0) + &(&Pbf::variable(VI(0)) * &Pbf::variable(VI(1)));
    let zero = &f - &f;
    assert!(zero.is_zero());
}

#[test]
fn f_times_zero_is_zero() {
    let f = Pbf::constant(2.0) + &Pbf::variable(VI(0));
    let zero = &f * &Pbf::zero();
    assert!(zero.is_zero());
}

#[test]
fn f_pow_zero_is_one() {
    let f = Pbf::constant(2.0) + &Pbf::variable(VI(0));
    let one = f.pow(0).unwrap();
    assert!(one.equals_exact(&Pbf::constant(1.0)));
}

#[test]
fn pow_negative_fails() {
    let f = Pbf::variable(VI(0));
    assert!(f.pow(-1).is_err());
}

#[test]
fn division_by_zero_fails() {
    let f = Pbf::variable(VI(0));
    assert!((&f / 0.0).is_err());
}

#[test]
fn evaluate_full_matches_boolean_sum_definition() {
    // f = 1 - 2*x0 + 3*x0*x1
    let mut f = Pbf::constant(1.0);
    f.add_term(Term::single(VI(0)), -2.0);
    f.add_term(Term::from_vars([VI(0), VI(1)]), 3.0);

    // x0=1,x1=1 -> 1 - 2 + 3 = 2
    assert_eq!(f.evaluate_full(&assign(&[true, true])).unwrap(), 2.0);
    // x0=1,x1=0 -> 1 - 2 = -1
    assert_eq!(f.evaluate_full(&assign(&[true, false])).unwrap(), -1.0);
    // x0=0,x1=1 -> 1
    assert_eq!(f.evaluate_full(&assign(&[false, true])).unwrap(), 1.0);
}

#[test]
fn evaluate_partial_drops_zeroed_terms_and_fixes_ones() {
    let mut f = Pbf::constant(1.0);
    f.add_term(Term::single(VI(0)), 2.0);
    f.add_term(Term::from_vars([VI(0), VI(1)]), 5.0);

    let mut x = HashMap::new();
    x.insert(VI(0), true);
    let residual = f.evaluate_partial(&x);
    // x0 fixed to 1: constant 1 + 2 survives as constant; the x0*x1 term
    // becomes just x1 with coefficient 5.
    assert_eq!(residual.coefficient(&Term::constant()), 3.0);
    assert_eq!(residual.coefficient(&Term::single(VI(1))), 5.0);

    let mut y = HashMap::new();
    y.insert(VI(0), false);
    let residual0 = f.evaluate_partial(&y);
    assert!(residual0.equals_exact(&Pbf::constant(1.0)));
}

#[test]
fn degree_and_bounds() {
    let mut f = Pbf::constant(1.0);
    f.add_term(Term::single(VI(0)), -3.0);
    f.add_term(Term::from_vars([VI(0), VI(1)]), 2.0);
    assert_eq!(f.degree(), 2);
    assert_eq!(f.lower_bound(), 1.0 - 3.0);
    assert_eq!(f.upper_bound(), 1.0 + 2.0);
    assert_eq!(f.gap(), f.upper_bound() - f.lower_bound());
}

#[test]
fn discretize_round_trips_integer_coefficients() {
    let mut f = Pbf::constant(2.0);
    f.add_term(Term::single(VI(0)), -3.0);
    f.add_term(Term::from_vars([VI(0), VI(1)]), 7.0);
    let d = f.discretize(1e-6).unwrap();
    assert!(d.approx_eq(&f, 1e-9));
}

#[test]
fn discretize_rejects_nonpositive_tolerance() {
    let f = Pbf::constant(1.0);
    assert!(f.discretize(0.0).is_err());
    assert!(f.discretize(-1.0).is_err());
}

#[test]
fn as_scalar_fails_for_nonconstant() {
    let f = Pbf::variable(VI(0));
    assert!(f.as_scalar().is_err());
    assert_eq!(Pbf::constant(4.0).as_scalar().unwrap(), 4.0);
}

proptest! {
    #[test]
    fn prop_addition_is_commutative(a in -10.0..10.0_f64, b in -10.0..10.0_f64) {
        let f = Pbf::constant(a) + &Pbf::variable(VI(0));
        let g = Pbf::constant(b) + &Pbf::variable(VI(1));
        prop_assert!((&f + &g).equals_exact(&(&g + &f)));
    }

    #[test]
    fn prop_addition_is_associative(a in -10.0..10.0_f64, b in -10.0..10.0_f64, c in -10.0..10.0_f64) {
        let f = Pbf::constant(a) + &Pbf::variable(VI(0));
        let g = Pbf::constant(b) + &Pbf::variable(VI(1));
        let h = Pbf::constant(c) + &Pbf::variable(VI(2));
        let lhs = &(&f + &g) + &h;
        let rhs = &f + &(&g + &h);
        prop_assert!(lhs.equals_exact(&rhs));
    }

    #[test]
    fn prop_multiplication_is_commutative(a in -5.0..5.0_f64) {
        let f = Pbf::constant(a) + &Pbf::variable(VI(0));
        let g = Pbf::variable(VI(1));
        prop_assert!((&f * &g).equals_exact(&(&g * &f)));
    }

    #[test]
    fn prop_multiplication_distributes_over_addition(a in -5.0..5.0_f64, b in -5.0..5.0_f64) {
        let f = Pbf::variable(VI(0));
        let g = Pbf::constant(a) + &Pbf::variable(VI(1));
        let h = Pbf::constant(b) + &Pbf::variable(VI(2));
        let lhs = &f * &(&g + &h);
        let rhs = &(&f * &g) + &(&f * &h);
        prop_assert!(lhs.approx_eq(&rhs, 1e-9));
    }

    #[test]
    fn prop_evaluate_full_matches_definition(bits in proptest::collection::vec(any::<bool>(), 3)) {
        let mut f = Pbf::constant(1.0);
        f.add_term(Term::single(VI(0)), 2.0);
        f.add_term(Term::from_vars([VI(1), VI(2)]), -3.0);
        f.add_term(Term::from_vars([VI(0), VI(1), VI(2)]), 5.0);

        let x = assign(&bits);
        let got = f.evaluate_full(&x).unwrap();

        // Direct definition: sum of coefficients over terms whose variables are all 1.
        let expected: f64 = f
            .iter()
            .filter(|(t, _)| t.vars().all(|v| bits[v.index()]))
            .map(|(_, &c)| c)
            .sum();
        prop_assert_eq!(got, expected);
    }
}
