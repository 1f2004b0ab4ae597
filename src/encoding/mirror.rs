//! Mirror encoding: a one-to-one binary passthrough, `y ≡ x`.

use crate::error::Result;
use crate::model::virtual_variable::{EncodingMethod, VirtualVariable};
use crate::pbf::Pbf;
use crate::types::{Bounds, VI};

use super::VariableAllocator;

pub fn encode(
    domain: Bounds,
    source: Option<VI>,
    alloc: &mut dyn VariableAllocator,
) -> Result<VirtualVariable> {
    debug_assert!(matches!(domain, Bounds::Binary), "Mirror only applies to binary domains");
    let target = alloc.allocate(1)[0];
    Ok(VirtualVariable::new(
        EncodingMethod::Mirror,
        source,
        vec![target],
        Pbf::variable(target),
        None,
    ))
}

/// A Mirror virtual variable over an already-allocated target, with no
/// source and no penalty — used for quadratization auxiliaries.
pub fn mirror_of(target: VI) -> VirtualVariable {
    VirtualVariable::new(
        EncodingMethod::Mirror,
        None,
        vec![target],
        Pbf::variable(target),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CounterAllocator;

    #[test]
    fn mirror_expansion_is_identity() {
        let mut alloc = CounterAllocator::default();
        let vv = encode(Bounds::Binary, Some(VI(7)), &mut alloc).unwrap();
        assert_eq!(vv.targets.len(), 1);
        assert!(vv.penalty.is_none());
        assert_eq!(vv.expansion.coefficient(&crate::types::Term::single(vv.targets[0])), 1.0);
    }
}
