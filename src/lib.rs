//! # qubo-compiler
//!
//! Compiles a mixed integer/real/binary optimization model into an
//! equivalent Quadratic Unconstrained Binary Optimization (QUBO) problem:
//! `minimize ½xᵀQx + aᵀx + b` over `x ∈ {0,1}ⁿ`.
//!
//! The core is three tightly coupled subsystems:
//!
//! - [`pbf`]: a Pseudo-Boolean Function algebra — multilinear polynomials
//!   over Boolean variables with exact arithmetic, substitution,
//!   evaluation, and bounds analysis.
//! - [`encoding`]: a variable-encoding layer that expands each bounded
//!   source variable into a set of binary targets (Mirror, Unary, Binary,
//!   Arithmetic, One-Hot, Domain-Wall), each producing an expansion
//!   polynomial and possibly a validity penalty.
//! - a compiler pipeline ([`source`] ingest → [`translate`] → [`assemble`])
//!   that translates the objective and constraints into pseudo-Boolean
//!   form, assembles a single weighted Hamiltonian, quadratizes any
//!   higher-degree terms, and emits a canonical quadratic objective.
//!
//! [`model`] is the registry ([`model::VirtualModel`]) binding source
//! variables to their chosen encodings and tracking compilation state.
//!
//! Out of scope: solving the emitted QUBO, any particular sampler or
//! annealer, and continuous relaxation — this crate only reformulates.
//!
//! ## Example
//!
//! ```rust
//! use qubo_compiler::prelude::*;
//!
//! let mut source = SourceModel::new();
//! source.add_variable(VI(0), Bounds::Binary);
//! source.add_variable(VI(1), Bounds::Binary);
//! source.set_objective(
//!     Direction::Minimize,
//!     Expr::variable(VI(0)).with_linear(VI(1), -1.0),
//! );
//! source.add_constraint(ConstraintKind::Sos1 {
//!     vars: vec![VI(0), VI(1)],
//! });
//!
//! let config = CompilerConfig::default();
//! let overrides = Overrides::default();
//! let mut model = VirtualModel::new(2);
//! let form = compile(&source, &config, &overrides, &mut model).unwrap();
//! assert_eq!(model.status(), CompilationStatus::LocallyCompiled);
//! ```

pub mod assemble;
pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod pbf;
pub mod source;
pub mod translate;

pub mod testing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assemble::{assemble, back_map, compile, emit, quadratize, QuadraticForm};
    pub use crate::config::{CompilerConfig, QuadratizationMethod};
    pub use crate::encoding::{
        BitBudget, CounterAllocator, EncodingKind, VariableAllocator,
    };
    pub use crate::error::{QuboError, Result};
    pub use crate::model::{CompilationStatus, EncodingMethod, VirtualModel, VirtualVariable};
    pub use crate::pbf::Pbf;
    pub use crate::source::{
        ConstraintKind, Expr, FunctionKind, LinearSet, SetKind, SourceModel,
    };
    pub use crate::translate::{Overrides, TranslatedConstraint, TranslatedModel};
    pub use crate::types::{Bounds, Direction, Term, VI};
}

pub mod types;

// Re-export the most commonly used items at the crate root.
pub use assemble::compile;
pub use error::{QuboError, Result};
pub use model::VirtualModel;
pub use pbf::Pbf;
pub use types::{Bounds, Direction, Term, VI};
