use fot_claims::ClaimError;
use fot_hypothesis::HypothesisError;
use fot_readiness::ReadinessError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Hypothesis(#[from] HypothesisError),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error("record not ready: no track reached its minimum ({0} below)")]
    NotReady(usize),

    #[error("rng lock poisoned")]
    LockError,
}

pub type EngineResult<T> = Result<T, EngineError>;
