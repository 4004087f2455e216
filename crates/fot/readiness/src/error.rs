use thiserror::Error;

/// Errors from the readiness layer.
///
/// Data problems inside a track are reported as gaps, not errors. A track
/// only returns `Err` when a record section has the wrong shape entirely;
/// the validator converts that into a NOT_READY verdict.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReadinessError {
    #[error("unknown validation track: {0}")]
    UnknownTrack(String),

    #[error("record must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("field '{field}' must be {expected}, found {found}")]
    WrongShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}
