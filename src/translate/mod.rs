//! The Translator (C4): turns source expressions and constraints into
//! pseudo-Boolean "violation" polynomials, and sizes their penalty weights.

use crate::config::CompilerConfig;
use crate::encoding::{self, BitBudget, EncodingKind, VariableAllocator};
use crate::error::{QuboError, Result};
use crate::model::VirtualModel;
use crate::pbf::Pbf;
use crate::source::{ConstraintKind, Expr, LinearSet, SourceModel};
use crate::types::{Bounds, Term, VI};
use std::collections::HashMap;

/// Per-entity overrides a caller may set before `compile!` runs.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub variable_encoding: HashMap<VI, (EncodingKind, BitBudget)>,
    /// θ override, keyed by source variable.
    pub variable_penalty: HashMap<VI, f64>,
    /// ρ override, keyed by constraint index.
    pub constraint_penalty: HashMap<usize, f64>,
    /// η override, keyed by constraint index.
    pub slack_penalty: HashMap<usize, f64>,
}

/// A translated constraint: its violation polynomial, penalty weight, and
/// (for `<=`/`>=`) the slack's own encoding-validity penalty and weight.
#[derive(Debug, Clone)]
pub struct TranslatedConstraint {
    pub violation: Pbf,
    pub rho: f64,
    pub slack_penalty: Option<Pbf>,
    pub eta: Option<f64>,
}

/// Everything the Assembler needs: the objective PBF, every constraint's
/// violation/weight, and every source variable's encoding-validity penalty
/// with its θ weight.
#[derive(Debug, Clone)]
pub struct TranslatedModel {
    pub objective: Pbf,
    pub constraints: Vec<TranslatedConstraint>,
    pub variable_penalties: Vec<(Pbf, f64)>,
}

fn bit_budget_for(
    v: VI,
    config: &CompilerConfig,
    overrides: &Overrides,
) -> (EncodingKind, BitBudget) {
    overrides
        .variable_encoding
        .get(&v)
        .cloned()
        .unwrap_or_else(|| (config.default_encoding_method.clone(), config.default_bit_budget()))
}

/// Encode every source variable that has not already been registered,
/// per its override or the model-wide default.
fn encode_source_variables(
    source: &SourceModel,
    config: &CompilerConfig,
    overrides: &Overrides,
    model: &mut VirtualModel,
) -> Result<()> {
    for &v in &source.variables {
        if model.lookup_source(v).is_some() {
            continue;
        }
        let domain = source.domain_of(v)?;
        let (kind, budget) = bit_budget_for(v, config, overrides);
        let vv = encoding::encode(kind, domain, budget, Some(v), model)?;
        model.register(vv)?;
    }
    Ok(())
}

/// Substitute every variable in `expr` with its registered expansion and
/// fold the result through PBF arithmetic. Every variable `expr` mentions
/// must already be encoded.
pub fn translate_expr(expr: &Expr, model: &VirtualModel) -> Result<Pbf> {
    let mut out = Pbf::constant(expr.constant);
    for &(v, c) in &expr.linear {
        let xi = model.expansion_of(v)?;
        out += &(xi * c);
    }
    for &(i, j, c) in &expr.quadratic {
        let xi = model.expansion_of(i)?;
        let xj = model.expansion_of(j)?;
        let product = &(xi * c) * xj;
        if i == j {
            // on-diagonal: c·x_i² folded through the ½xᵀQx convention.
            out += &(&product * 0.5);
        } else {
            out += &product;
        }
    }
    Ok(out)
}

/// The default penalty weight: `1 + ceil(gap(f))`, used for `ρ` (against
/// the objective) and, by the same reasoning, for `θ`/`η` (an encoding's
/// own validity penalty must also dominate any possible objective swing).
fn default_penalty_weight(objective: &Pbf) -> f64 {
    1.0 + objective.gap().ceil()
}

fn translate_sos1(vars: &[VI], model: &VirtualModel) -> Result<Pbf> {
    let mut g = Pbf::zero();
    for i in 0..vars.len() {
        let xi = model.expansion_of(vars[i])?;
        for j in (i + 1)..vars.len() {
            let xj = model.expansion_of(vars[j])?;
            g += &(xi * xj);
        }
    }
    Ok(g)
}

/// Translates `f <= k` (or, after negating `expr` and `k`, `f >= k`) into a
/// slack-augmented equality violation `(phi - k + s)^2`, encoding a fresh
/// slack over `[0, k - min(phi)]` with the model's default encoding.
fn translate_le(
    expr: &Expr,
    k: f64,
    config: &CompilerConfig,
    model: &mut VirtualModel,
) -> Result<(Pbf, Option<Pbf>)> {
    let phi = translate_expr(expr, model)?;
    let slack_hi = (k - phi.lower_bound()).floor() as i64;
    if slack_hi < 0 {
        return Err(QuboError::DomainError(format!(
            "slack domain [0, {slack_hi}] is empty: constraint is infeasible for every assignment"
        )));
    }
    let slack_domain = Bounds::Integer { lo: 0, hi: slack_hi };
    let slack_vv = encoding::encode(
        config.default_encoding_method,
        slack_domain,
        config.default_bit_budget(),
        None,
        model,
    )?;
    let slack_penalty = slack_vv.penalty.clone();
    let slack_expansion = slack_vv.expansion.clone();
    model.register(slack_vv)?;

    let mut d = phi;
    d.add_term(Term::constant(), -k);
    d += &slack_expansion;
    let violation = &d * &d;
    Ok((violation, slack_penalty))
}

/// Runs the full translation stage: encodes every source variable, then
/// translates the objective and every constraint.
pub fn translate(
    source: &SourceModel,
    config: &CompilerConfig,
    overrides: &Overrides,
    model: &mut VirtualModel,
) -> Result<TranslatedModel> {
    encode_source_variables(source, config, overrides, model)?;

    let objective = translate_expr(&source.objective, model)?;

    let mut variable_penalties = Vec::new();
    for &v in &source.variables {
        if let Some(h) = model.penalty_of(v) {
            let theta = overrides
                .variable_penalty
                .get(&v)
                .copied()
                .unwrap_or_else(|| default_penalty_weight(&objective));
            variable_penalties.push((h.clone(), theta));
        }
    }

    let mut constraints = Vec::new();
    for (idx, kind) in source.constraints.iter().enumerate() {
        let default_rho = default_penalty_weight(&objective);
        let rho = overrides
            .constraint_penalty
            .get(&idx)
            .copied()
            .unwrap_or(default_rho);

        let (violation, slack_penalty) = match kind {
            ConstraintKind::Linear {
                expr,
                set: LinearSet::Eq(k),
            } => {
                let phi = translate_expr(expr, model)?;
                let mut d = phi;
                d.add_term(Term::constant(), -k);
                (&d * &d, None)
            }
            ConstraintKind::Linear {
                expr,
                set: LinearSet::Le(k),
            } => translate_le(expr, *k, config, model)?,
            ConstraintKind::Linear {
                expr,
                set: LinearSet::Ge(k),
            } => {
                let negated = Expr {
                    constant: -expr.constant,
                    linear: expr.linear.iter().map(|&(v, c)| (v, -c)).collect(),
                    quadratic: expr.quadratic.iter().map(|&(i, j, c)| (i, j, -c)).collect(),
                };
                translate_le(&negated, -*k, config, model)?
            }
            ConstraintKind::Sos1 { vars } => (translate_sos1(vars, model)?, None),
        };

        let eta = slack_penalty.as_ref().map(|_| {
            overrides
                .slack_penalty
                .get(&idx)
                .copied()
                .unwrap_or(default_rho)
        });

        constraints.push(TranslatedConstraint {
            violation,
            rho,
            slack_penalty,
            eta,
        });
    }

    Ok(TranslatedModel {
        objective,
        constraints,
        variable_penalties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn translate_affine_objective_substitutes_binary_mirror() {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.set_objective(Direction::Minimize, Expr::variable(VI(0)).with_linear(VI(0), 2.0));
        // net coefficient on x0 is 1.0 (default Expr::variable) + 2.0 = 3.0
        let mut model = VirtualModel::new(1);
        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        let translated = translate(&source, &config, &overrides, &mut model).unwrap();
        assert_eq!(translated.objective.coefficient(&Term::single(VI(0))), 3.0);
    }

    #[test]
    fn le_constraint_with_infeasible_slack_domain_fails() {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.set_objective(Direction::Minimize, Expr::variable(VI(0)));
        source.add_constraint(ConstraintKind::Linear {
            expr: Expr::constant(5.0),
            set: LinearSet::Le(2.0),
        });
        let mut model = VirtualModel::new(1);
        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        assert!(translate(&source, &config, &overrides, &mut model).is_err());
    }

    #[test]
    fn sos1_translates_to_pairwise_product_sum() {
        let mut source = SourceModel::new();
        source.add_variable(VI(0), Bounds::Binary);
        source.add_variable(VI(1), Bounds::Binary);
        source.set_objective(Direction::Minimize, Expr::constant(0.0));
        source.add_constraint(ConstraintKind::Sos1 {
            vars: vec![VI(0), VI(1)],
        });
        let mut model = VirtualModel::new(2);
        let config = CompilerConfig::default();
        let overrides = Overrides::default();
        let translated = translate(&source, &config, &overrides, &mut model).unwrap();
        let g = &translated.constraints[0].violation;
        assert_eq!(g.coefficient(&Term::from_vars([VI(0), VI(1)])), 1.0);
    }
}
