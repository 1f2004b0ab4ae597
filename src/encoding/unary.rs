//! Unary encoding. Integer: `n = b - a` bits, `ξ = a + Σ y_i`, no penalty.
//! Real (`n` explicit bits): `ξ = a + ((b-a)/n) Σ y_i`.

use crate::error::{QuboError, Result};
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, VI};

use super::{BitBudget, VariableAllocator};

fn tolerance_bits(span: f64, tau: f64) -> Result<usize> {
    if tau <= 0.0 {
        return Err(QuboError::DomainError("tolerance must be > 0".into()));
    }
    let n = 1.0 + span.abs() / (4.0 * tau);
    Ok(n.ceil().max(1.0) as usize)
}

pub fn encode(
    domain: Bounds,
    budget: BitBudget,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    let (a, b) = domain.conventioned()?;
    let span = b - a;

    let n = match (domain, budget) {
        (Bounds::Real { .. }, BitBudget::Exact) => {
            return Err(QuboError::DomainError(
                "Unary on a real domain requires an explicit bit budget or tolerance".into(),
            ))
        }
        (_, BitBudget::Exact) => span.round() as usize,
        (_, BitBudget::Bits(n)) => n,
        (_, BitBudget::Tolerance(tau)) => tolerance_bits(span, tau)?,
    };

    if n == 0 {
        // M == 0 (or explicitly requested zero bits): constant expansion,
        // no targets.
        return Ok(VirtualVariable::new(
            EncodingMethod::Unary,
            source,
            vec![],
            Pbf::constant(a),
            None,
        ));
    }

    let step = span / n as f64;
    let targets = alloc.allocate(n);
    let mut expansion = Pbf::constant(a);
    for &t in &targets {
        expansion.add_term(crate::types::Term::single(t), step);
    }

    Ok(VirtualVariable::new(
        EncodingMethod::Unary,
        source,
        targets,
        expansion,
        None,
    ))
}
