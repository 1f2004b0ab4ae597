//! End-to-end pipeline scenarios: build a source model, compile it, and
//! check the compiled QUBO's semantics (optimum value/assignment, degree,
//! determinism) rather than its literal numeric coefficients — a
//! differently-but-validly designed pipeline (different penalty sizing,
//! different quadratization tie-breaking) is free to land on a different
//! exact `Q` without being wrong.

use qubo_compiler::prelude::*;
use qubo_compiler::testing;
use std::collections::HashMap;

fn best_assignment(form: &QuadraticForm, model: &VirtualModel) -> HashMap<VI, f64> {
    let (_, winners) = testing::BruteForceQubo::minimize(form);
    back_map(model, form, &winners[0]).unwrap()
}

/// Scenario 1: maximize `x^T A x` over three binaries with `A =
/// [[-1,2,2],[2,-1,2],[2,2,-1]]`, subject to SOS1(x). The only feasible
/// points are the three unit vectors and the all-zero vector, each scoring
/// `0` on the diagonal (A's diagonal is all `-1`, off-diagonal terms vanish
/// once at most one variable is set) — so every feasible point, including
/// x=(0,0,0), ties at the optimum 0.
#[test]
fn scenario_1_max_quadratic_form_with_sos1() {
    let mut source = SourceModel::new();
    for i in 0..3 {
        source.add_variable(VI(i), Bounds::Binary);
    }
    let a = [[-1.0, 2.0, 2.0], [2.0, -1.0, 2.0], [2.0, 2.0, -1.0]];
    let mut objective = Expr::constant(0.0);
    for i in 0..3 {
        for j in 0..3 {
            if a[i][j] != 0.0 {
                objective = objective.with_quadratic(VI(i), VI(j), a[i][j]);
            }
        }
    }
    source.set_objective(Direction::Maximize, objective);
    source.add_constraint(ConstraintKind::Sos1 {
        vars: vec![VI(0), VI(1), VI(2)],
    });

    let config = CompilerConfig::default();
    let overrides = Overrides::default();
    let mut model = VirtualModel::new(3);
    let form = compile(&source, &config, &overrides, &mut model).unwrap();

    assert!(form.num_vars() <= 4); // 3 source bits + at most 1 quadratization aux
    let (best, _) = testing::BruteForceQubo::minimize(&form);
    assert!((best - 0.0).abs() < 1e-9);

    let recovered = best_assignment(&form, &model);
    let set: Vec<f64> = (0..3).map(|i| recovered[&VI(i)]).collect();
    assert!(set.iter().sum::<f64>() <= 1.0 + 1e-9);
}

/// Scenario 2: `p*q = 15`, `p` an integer in `[2,4]`, `q` an integer in
/// `[4,8]`. The only integer solution is `p=3, q=5`.
#[test]
fn scenario_2_integer_product_equality() {
    let mut source = SourceModel::new();
    source.add_variable(VI(0), Bounds::Integer { lo: 2, hi: 4 });
    source.add_variable(VI(1), Bounds::Integer { lo: 4, hi: 8 });
    source.set_objective(Direction::Minimize, Expr::constant(0.0));
    source.add_constraint(ConstraintKind::Linear {
        expr: Expr::constant(0.0).with_quadratic(VI(0), VI(1), 1.0),
        set: LinearSet::Eq(15.0),
    });

    let mut config = CompilerConfig::default();
    config.stable_quadratization = true;
    let overrides = Overrides::default();
    let mut model = VirtualModel::new(2);
    let form = compile(&source, &config, &overrides, &mut model).unwrap();
    assert!(form.evaluate(&vec![false; form.num_vars()]).is_finite());

    let recovered = best_assignment(&form, &model);
    assert_eq!(recovered[&VI(0)], 3.0);
    assert_eq!(recovered[&VI(1)], 5.0);
}

/// Scenario 3: Max-Cut on a 5-node graph via `sum G_ij*(x_i XOR x_j)`,
/// `XOR(x,y) = x + y - 2xy`. Edges: (1,2),(1,3),(2,4),(3,4),(3,5),(4,5)
/// (1-indexed in the scenario; `VI(0..4)` here). Max cut value is 5.
#[test]
fn scenario_3_max_cut_via_xor_objective() {
    let edges = [(0, 1), (0, 2), (1, 3), (2, 3), (2, 4), (3, 4)];
    let mut source = SourceModel::new();
    for i in 0..5 {
        source.add_variable(VI(i), Bounds::Binary);
    }
    let mut objective = Expr::constant(0.0);
    for &(i, j) in &edges {
        objective = objective
            .with_linear(VI(i), 1.0)
            .with_linear(VI(j), 1.0)
            .with_quadratic(VI(i), VI(j), -2.0);
    }
    source.set_objective(Direction::Maximize, objective);

    let config = CompilerConfig::default();
    let overrides = Overrides::default();
    let mut model = VirtualModel::new(5);
    let form = compile(&source, &config, &overrides, &mut model).unwrap();

    let (best, _) = testing::BruteForceQubo::minimize(&form);
    let recovered = best_assignment(&form, &model);
    let cut_value: f64 = edges
        .iter()
        .map(|&(i, j)| {
            let xi = recovered[&VI(i)];
            let xj = recovered[&VI(j)];
            xi + xj - 2.0 * xi * xj
        })
        .sum();
    assert_eq!(cut_value, 5.0);
    // minimizing the negated-objective form equals -5 at the optimum.
    assert!((best + 5.0).abs() < 1e-9);
}

/// Determinism: compiling the same source model twice, with
/// StableQuadratization on, yields the identical emitted polynomial.
#[test]
fn determinism_same_model_compiles_identically() {
    let build = || {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.add_variable(VI(1), Bounds::Binary);
        source.add_variable(VI(2), Bounds::Binary);
        source.set_objective(
            Direction::Minimize,
            Expr::constant(0.0)
                .with_quadratic(VI(0), VI(1), 1.0)
                .with_quadratic(VI(1), VI(2), 1.0)
                .with_quadratic(VI(0), VI(2), 1.0),
        );
        source.add_constraint(ConstraintKind::Sos1 {
            vars: vec![VI(0), VI(1), VI(2)],
        });
        source
    };

    let mut config = CompilerConfig::default();
    config.stable_quadratization = true;
    let overrides = Overrides::default();

    let source_a = build();
    let mut model_a = VirtualModel::new(3);
    let form_a = compile(&source_a, &config, &overrides, &mut model_a).unwrap();

    let source_b = build();
    let mut model_b = VirtualModel::new(3);
    let form_b = compile(&source_b, &config, &overrides, &mut model_b).unwrap();

    assert_eq!(form_a.linear, form_b.linear);
    assert_eq!(form_a.quadratic, form_b.quadratic);
    assert_eq!(form_a.constant, form_b.constant);
}
