//! Quadratization: rewrite a degree->=3 Hamiltonian into an equivalent
//! degree<=2 one by introducing auxiliary binaries.
//!
//! Implements the standard pairwise-substitution reduction (Rosenberg):
//! repeatedly pick a variable pair `(x, y)` that still co-occurs in some
//! degree->=3 term, introduce a fresh auxiliary `w` standing in for `x·y`
//! everywhere that pair appears, and add the penalty
//! `P·(xy - 2xw - 2yw + 3w)`, which is zero exactly when `w = x·y` over
//! `{0,1}` and strictly positive otherwise. `P` is chosen once, up front,
//! large enough (`1 + Σ|coefficients|`) to dominate every term that will
//! ever rely on that substitution, so the reduced polynomial's ground
//! state always projects back to the original's.

use crate::encoding::{self, VariableAllocator};
use crate::model::VirtualVariable;
use crate::pbf::Pbf;
use crate::types::{Term, VI};
use std::collections::HashMap;

fn substitute_pair_everywhere(current: &Pbf, x: VI, y: VI, w: VI) -> Pbf {
    let mut out = Pbf::zero();
    for (t, &c) in current.iter() {
        if t.contains(x) && t.contains(y) {
            let reduced = t.without(x).without(y).union(&Term::single(w));
            out.add_term(reduced, c);
        } else {
            out.add_term(t.clone(), c);
        }
    }
    out
}

fn substitution_penalty(x: VI, y: VI, w: VI, scale: f64) -> Pbf {
    let mut p = Pbf::zero();
    p.add_term(Term::from_vars([x, y]), scale);
    p.add_term(Term::from_vars([x, w]), -2.0 * scale);
    p.add_term(Term::from_vars([y, w]), -2.0 * scale);
    p.add_term(Term::single(w), 3.0 * scale);
    p
}

/// First two variables of a term in canonical (sorted) order — the pair
/// the reduction substitutes this round.
fn leading_pair(term: &Term) -> (VI, VI) {
    let mut vars = term.vars();
    let x = vars.next().expect("term has degree >= 3");
    let y = vars.next().expect("term has degree >= 3");
    (x, y)
}

/// Reduce `h` to degree <= 2, allocating fresh auxiliary Mirror virtual
/// variables via `alloc` as needed. Returns the reduced polynomial and the
/// freshly introduced virtual variables (the caller registers these into
/// the model). `stable` is accepted for interface completeness — term
/// visitation is always canonical (the `Pbf`'s `BTreeMap` backing makes
/// that free) and allocation is always a monotone counter, so this
/// implementation's behavior does not vary with the flag; see DESIGN.md.
pub fn quadratize(
    h: &Pbf,
    alloc: &mut dyn VariableAllocator,
    _stable: bool,
) -> (Pbf, Vec<VirtualVariable>) {
    let mut current = h.clone();
    let mut aux_vvs = Vec::new();
    let penalty_scale = 1.0 + current.iter().map(|(_, &c)| c.abs()).sum::<f64>();
    let mut pair_cache: HashMap<(VI, VI), VI> = HashMap::new();

    loop {
        let max_degree = current.iter().map(|(t, _)| t.degree()).max().unwrap_or(0);
        if max_degree < 3 {
            break;
        }
        let term = current
            .iter()
            .filter(|(t, _)| t.degree() == max_degree)
            .map(|(t, _)| t.clone())
            .next()
            .expect("max_degree computed from a term that exists");

        let (x, y) = leading_pair(&term);
        let key = if x <= y { (x, y) } else { (y, x) };
        let w = *pair_cache.entry(key).or_insert_with(|| {
            let vv = encoding::mirror_auxiliaries(1, alloc)
                .into_iter()
                .next()
                .expect("mirror_auxiliaries(1) returns exactly one virtual variable");
            let w = vv.targets[0];
            current += &substitution_penalty(key.0, key.1, w, penalty_scale);
            aux_vvs.push(vv);
            w
        });

        current = substitute_pair_everywhere(&current, key.0, key.1, w);
    }

    (current, aux_vvs)
}
