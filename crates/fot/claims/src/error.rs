use fot_types::{ClaimId, TypesError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClaimError {
    /// The policy declares a tolerance but no agreement delta was observed.
    #[error("claim {0} declares an agreement tolerance but no agreement delta was supplied")]
    MissingAgreement(ClaimId),

    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    #[error("claim not found: {0}")]
    NotFound(ClaimId),

    #[error("claim already recorded: {0}")]
    Duplicate(ClaimId),

    #[error("unknown trial phase: {0}")]
    UnknownPhase(String),

    #[error("repository lock poisoned")]
    LockError,

    #[error(transparent)]
    Types(#[from] TypesError),
}
