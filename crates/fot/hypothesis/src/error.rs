use thiserror::Error;

/// Errors from the hypothesis-state layer.
///
/// Degenerate data (an all-zero state) is not an error; these variants are
/// caller mistakes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HypothesisError {
    #[error("state dimension must be positive, got {0}")]
    InvalidDimension(usize),

    #[error("unknown observable: {0}")]
    UnknownObservable(String),

    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f64),
}
