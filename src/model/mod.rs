//! Virtual Model (C3): the registry binding source variables to their
//! encodings, and the working Hamiltonian state `compile!` assembles.

pub mod virtual_model;
pub mod virtual_variable;

pub use virtual_model::{CompilationStatus, VirtualModel};
pub use virtual_variable::{EncodingMethod, VirtualVariable};
