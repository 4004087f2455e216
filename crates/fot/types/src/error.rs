use thiserror::Error;

/// Errors from the core type layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("invalid collapse policy: {0}")]
    InvalidPolicy(String),

    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    #[error("invalid hex length: {0} (expected 64)")]
    InvalidHashLength(usize),

    #[error("invalid hex character")]
    InvalidHashHex,
}
