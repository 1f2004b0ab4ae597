//! Error types for the qubo-compiler library.

use thiserror::Error;

/// Errors that can occur while building or compiling a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuboError {
    /// Raised during `compile!` whenever an invariant is violated: a missing
    /// bound, an inconsistent encoding, or a residual degree-3+ term that
    /// survived quadratization.
    #[error("compilation failed: {0}")]
    CompilationFailure(String),

    /// Division by zero or a negative exponent on a PBF.
    #[error("arithmetic failure: {0}")]
    ArithmeticFailure(String),

    /// Tolerance <= 0, negative bit budget, or an integer domain with a > b
    /// after conventioning.
    #[error("domain error: {0}")]
    DomainError(String),

    /// A constraint function/set pair the translator cannot handle.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
}

/// Result type alias for qubo-compiler operations.
pub type Result<T> = std::result::Result<T, QuboError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let e = QuboError::DomainError("a > b".into());
        assert_eq!(e.to_string(), "domain error: a > b");
    }
}
