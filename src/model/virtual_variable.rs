//! Virtual variables: the record type an encoder produces.

use crate::pbf::Pbf;
use crate::types::VI;
use serde::{Deserialize, Serialize};

/// Which named strategy produced a [`VirtualVariable`]. Carried alongside
/// the expansion/penalty PBFs purely for introspection and diagnostics —
/// the actual encode-time dispatch lives in [`crate::encoding::Encoding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingMethod {
    Mirror,
    Linear,
    Unary,
    Binary,
    Arithmetic,
    OneHot,
    DomainWall,
}

/// A record bundling an encoding choice, the source variable it expands
/// (absent for quadratization auxiliaries), its ordered target variables,
/// the expansion polynomial ξ, and an optional penalty polynomial h.
///
/// Invariants (enforced by [`crate::model::VirtualModel::register`]):
/// every non-auxiliary virtual variable has exactly one source `VI`, unique
/// across virtual variables; every target `VI` is owned by exactly one
/// virtual variable; `h`, when present, is nonnegative over `{0,1}` target
/// assignments and zero precisely on valid assignments.
#[derive(Debug, Clone)]
pub struct VirtualVariable {
    pub method: EncodingMethod,
    pub source: Option<VI>,
    pub targets: Vec<VI>,
    pub expansion: Pbf,
    pub penalty: Option<Pbf>,
}

impl VirtualVariable {
    pub fn new(
        method: EncodingMethod,
        source: Option<VI>,
        targets: Vec<VI>,
        expansion: Pbf,
        penalty: Option<Pbf>,
    ) -> Self {
        Self {
            method,
            source,
            targets,
            expansion,
            penalty,
        }
    }

    pub fn is_auxiliary(&self) -> bool {
        self.source.is_none()
    }
}
