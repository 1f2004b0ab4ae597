//! Assembler / Quadratizer / Emitter (C5): combine translated PBFs into one
//! weighted Hamiltonian, reduce it to degree <= 2, and bucket it into the
//! canonical quadratic form the caller gets back.

mod quadratize;

use crate::config::CompilerConfig;
use crate::error::{QuboError, Result};
use crate::model::{CompilationStatus, VirtualModel};
use crate::pbf::Pbf;
use crate::source::SourceModel;
use crate::translate::{self, Overrides, TranslatedModel};
use crate::types::{Direction, VI};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

pub use quadratize::quadratize;

/// The emitted target model: a scalar quadratic objective over binary
/// variables, `b + sum_i linear_i x_i + sum_{i<j} quadratic_{ij} x_i x_j`.
///
/// Linear terms live on the (implicit) diagonal and quadratic terms live
/// strictly above it: the symmetric convention where the diagonal encodes
/// linear terms, in upper-triangular `Q` form. `variable_order[i]` is the
/// source [`VI`] dense index `i` refers to, the back-mapping anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadraticForm {
    pub num_vars: usize,
    pub linear: Vec<f64>,
    pub quadratic: BTreeMap<(usize, usize), f64>,
    pub constant: f64,
    pub variable_order: Vec<VI>,
}

impl QuadraticForm {
    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// `b + sum linear_i x_i + sum_{i<j} quadratic_{ij} x_i x_j`.
    pub fn evaluate(&self, config: &[bool]) -> f64 {
        let mut v = self.constant;
        for (i, &bit) in config.iter().enumerate() {
            if bit {
                v += self.linear[i];
            }
        }
        for (&(i, j), &c) in &self.quadratic {
            if config[i] && config[j] {
                v += c;
            }
        }
        v
    }

    /// The upper-triangular dense `Q` matrix (diagonal = linear, strict
    /// upper = quadratic), for callers that want the `½xᵀQx` form directly.
    pub fn to_upper_triangular_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.num_vars;
        let mut q = vec![vec![0.0; n]; n];
        for (i, &c) in self.linear.iter().enumerate() {
            q[i][i] = c;
        }
        for (&(i, j), &c) in &self.quadratic {
            q[i][j] = c;
        }
        q
    }
}

/// Weighted sum of the translated model's pieces: `f + sum(rho*g) +
/// sum(theta*h) + sum(eta*s)`.
pub fn assemble(translated: &TranslatedModel) -> Pbf {
    let mut h = Pbf::zero();
    h += &translated.objective;
    for c in &translated.constraints {
        h += &(&c.violation * c.rho);
        if let (Some(s), Some(eta)) = (&c.slack_penalty, c.eta) {
            h += &(s * eta);
        }
    }
    for (hv, theta) in &translated.variable_penalties {
        h += &(hv * *theta);
    }
    h
}

/// Bucket a degree <= 2 polynomial into a [`QuadraticForm`]. Fails with
/// `CompilationFailure` (`QuadratizationIncomplete`) if a degree >= 3 term
/// survives.
pub fn emit(h: &Pbf) -> Result<QuadraticForm> {
    let variable_order: Vec<VI> = h.variables().into_iter().collect();
    let index: HashMap<VI, usize> = variable_order
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    let n = variable_order.len();

    let mut linear = vec![0.0; n];
    let mut quadratic = BTreeMap::new();
    let mut constant = 0.0;

    for (t, &c) in h.iter() {
        match t.degree() {
            0 => constant += c,
            1 => {
                let v = t.vars().next().expect("degree 1 term has one variable");
                linear[index[&v]] += c;
            }
            2 => {
                let mut vars = t.vars();
                let a = index[&vars.next().expect("degree 2 term has two variables")];
                let b = index[&vars.next().expect("degree 2 term has two variables")];
                let key = if a < b { (a, b) } else { (b, a) };
                *quadratic.entry(key).or_insert(0.0) += c;
            }
            d => {
                return Err(QuboError::CompilationFailure(format!(
                    "quadratization incomplete: residual degree-{d} term after quadratization"
                )))
            }
        }
    }

    Ok(QuadraticForm {
        num_vars: n,
        linear,
        quadratic,
        constant,
        variable_order,
    })
}

/// Reconstructs each source variable's original value from a binary
/// assignment over `form`'s dense variable order, by evaluating every
/// registered virtual variable's expansion at that assignment. Target
/// bits that never made it into the emitted form (their coefficient
/// cancelled to exactly zero everywhere) default to `false` — they have
/// no remaining influence on the objective by construction.
pub fn back_map(
    model: &VirtualModel,
    form: &QuadraticForm,
    assignment: &[bool],
) -> Result<HashMap<VI, f64>> {
    let mut x: HashMap<VI, bool> = HashMap::new();
    for (i, &v) in form.variable_order.iter().enumerate() {
        x.insert(v, assignment[i]);
    }
    let mut out = HashMap::new();
    for vv in model.variables() {
        if let Some(source) = vv.source {
            for &t in &vv.targets {
                x.entry(t).or_insert(false);
            }
            out.insert(source, vv.expansion.evaluate_full(&x)?);
        }
    }
    Ok(out)
}

/// Runs the full `compile!` pipeline: encode source variables, translate
/// the objective/constraints, assemble the weighted Hamiltonian, apply
/// sense handling, quadratize, and emit. `model` must already be seeded
/// with enough headroom (`VirtualModel::new(source.variables.len())`, or
/// more) for its own allocator to hand out fresh target/auxiliary `VI`s
/// without colliding with source variable indices. On failure `model` is
/// left in `Failed` status; call [`VirtualModel::reset`] before retrying.
pub fn compile(
    source: &SourceModel,
    config: &CompilerConfig,
    overrides: &Overrides,
    model: &mut VirtualModel,
) -> Result<QuadraticForm> {
    model.set_status(CompilationStatus::InProgress);
    let started = Instant::now();

    let result = (|| {
        let mut translated = translate::translate(source, config, overrides, model)?;

        // The emitted objective is always minimize-shaped: the target
        // model carries a bare scalar quadratic objective, no sense. For a
        // maximizing source, negate f before assembly so minimizing the
        // assembled/quadratized H is exactly maximizing the original
        // objective; the penalty/gadget terms stay un-negated so they keep
        // enforcing validity toward zero either way.
        let sense = source.objective_sense.unwrap_or(Direction::Minimize);
        if sense == Direction::Maximize {
            translated.objective = -&translated.objective;
        }

        let mut h = assemble(&translated);

        if config.quadratize {
            let (reduced, aux) = quadratize(&h, model, config.stable_quadratization);
            for vv in aux {
                model.register(vv)?;
            }
            h = reduced;
        } else if h.degree() >= 3 {
            return Err(QuboError::CompilationFailure(
                "quadratization disabled but a degree >= 3 term is present".into(),
            ));
        }

        emit(&h)
    })();

    model.set_compilation_time(started.elapsed());
    match &result {
        Ok(_) => model.set_status(CompilationStatus::LocallyCompiled),
        Err(_) => model.set_status(CompilationStatus::Failed),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ConstraintKind, Expr, LinearSet};
    use crate::types::{Bounds, Term};

    #[test]
    fn emit_buckets_constant_linear_quadratic_terms() {
        let mut h = Pbf::zero();
        h.add_term(Term::constant(), 3.0);
        h.add_term(Term::single(VI(0)), 2.0);
        h.add_term(Term::from_vars([VI(0), VI(1)]), -1.0);
        let form = emit(&h).unwrap();
        assert_eq!(form.num_vars, 2);
        assert_eq!(form.constant, 3.0);
        assert_eq!(form.evaluate(&[true, true]), 3.0 + 2.0 - 1.0);
    }

    #[test]
    fn emit_rejects_residual_cubic_term() {
        let mut h = Pbf::zero();
        h.add_term(Term::from_vars([VI(0), VI(1), VI(2)]), 1.0);
        assert!(emit(&h).is_err());
    }

    #[test]
    fn compile_sos1_two_binaries_penalizes_both_set() {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.add_variable(VI(1), Bounds::Binary);
        source.set_objective(
            crate::types::Direction::Minimize,
            Expr::variable(VI(0)).with_linear(VI(1), -1.0),
        );
        source.add_constraint(ConstraintKind::Sos1 {
            vars: vec![VI(0), VI(1)],
        });

        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        let mut model = VirtualModel::new(2);
        let form = compile(&source, &config, &overrides, &mut model).unwrap();

        assert_eq!(model.status(), CompilationStatus::LocallyCompiled);
        // both-set (1,1) must score worse than the feasible (0,1).
        let both = form.evaluate(&vec![true; form.num_vars()]);
        let mut feasible = vec![false; form.num_vars()];
        feasible[1] = true;
        let feasible_score = form.evaluate(&feasible);
        assert!(both > feasible_score);
    }

    #[test]
    fn compile_negates_only_the_objective_for_maximization() {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.set_objective(crate::types::Direction::Maximize, Expr::variable(VI(0)));
        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        let mut model = VirtualModel::new(1);
        let form = compile(&source, &config, &overrides, &mut model).unwrap();
        // maximize x0 => minimize -x0, so the emitted linear coefficient is -1.
        assert_eq!(form.linear[0], -1.0);
        assert_eq!(form.evaluate(&[true]), -1.0);
        assert_eq!(form.evaluate(&[false]), 0.0);
    }

    #[test]
    fn maximize_sense_keeps_sos1_penalty_sign_through_quadratization() {
        // Maximize x0 + x1 subject to SOS1(x0, x1): the only feasible optima
        // are (1,0)/(0,1), each scoring 1. The quadratization gadget must
        // still penalize w != x0*x1 even though the objective got negated.
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.add_variable(VI(1), Bounds::Binary);
        source.set_objective(
            crate::types::Direction::Maximize,
            Expr::variable(VI(0)).with_linear(VI(1), 1.0),
        );
        source.add_constraint(ConstraintKind::Sos1 {
            vars: vec![VI(0), VI(1)],
        });

        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        let mut model = VirtualModel::new(2);
        let form = compile(&source, &config, &overrides, &mut model).unwrap();

        let (_, winners) = crate::testing::BruteForceQubo::minimize(&form);
        let assignment = &winners[0];
        let recovered = back_map(&model, &form, assignment).unwrap();
        let x0 = recovered[&VI(0)];
        let x1 = recovered[&VI(1)];
        assert_eq!(x0 + x1, 1.0);
    }
}
