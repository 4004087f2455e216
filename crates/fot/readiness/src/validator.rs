use crate::config::ReadinessConfig;
use crate::error::ReadinessError;
use crate::record::{kind_of, RecordMap};
use crate::tracks::{self, TrackScorer, TrackValidator};
use crate::types::{DataGap, GapSeverity, ReadinessStatus, ReadinessVerdict, ValidationTrack};
use serde_json::Value;
use tracing::{debug, warn};

/// Runs every registered track against a record.
///
/// One track failing never aborts the others: the error is folded into a
/// NOT_READY verdict for that track alone.
pub struct ReadinessValidator {
    config: ReadinessConfig,
    tracks: Vec<Box<dyn TrackValidator>>,
}

impl ReadinessValidator {
    pub fn new(config: ReadinessConfig) -> Self {
        Self {
            config,
            tracks: tracks::builtin(),
        }
    }

    /// Replace the implementation registered for `validator.track()`.
    pub fn with_track(mut self, validator: Box<dyn TrackValidator>) -> Self {
        let track = validator.track();
        match self.tracks.iter().position(|t| t.track() == track) {
            Some(i) => self.tracks[i] = validator,
            None => self.tracks.push(validator),
        }
        self
    }

    pub fn config(&self) -> &ReadinessConfig {
        &self.config
    }

    /// One verdict per track, in registration order.
    pub fn validate(&self, record: &RecordMap) -> Vec<ReadinessVerdict> {
        self.tracks
            .iter()
            .map(|t| self.run(t.as_ref(), record))
            .collect()
    }

    /// Validate an arbitrary JSON value. Anything other than an object fails
    /// every track.
    pub fn validate_value(&self, value: &Value) -> Vec<ReadinessVerdict> {
        match value {
            Value::Object(fields) => self.validate(&RecordMap::new(fields.clone())),
            other => {
                let err = ReadinessError::NotAnObject(kind_of(other));
                self.tracks
                    .iter()
                    .map(|t| self.failed(t.track(), &err))
                    .collect()
            }
        }
    }

    /// Validate a single track.
    pub fn validate_track(
        &self,
        record: &RecordMap,
        track: ValidationTrack,
    ) -> Result<ReadinessVerdict, ReadinessError> {
        self.tracks
            .iter()
            .find(|t| t.track() == track)
            .map(|t| self.run(t.as_ref(), record))
            .ok_or_else(|| ReadinessError::UnknownTrack(track.to_string()))
    }

    /// Validate a single track by its wire name.
    pub fn validate_track_named(
        &self,
        record: &RecordMap,
        name: &str,
    ) -> Result<ReadinessVerdict, ReadinessError> {
        self.validate_track(record, name.parse()?)
    }

    fn run(&self, validator: &dyn TrackValidator, record: &RecordMap) -> ReadinessVerdict {
        let track = validator.track();
        let mut scorer = TrackScorer::new();
        match validator.assess(record, &mut scorer) {
            Ok(()) => {
                let verdict = scorer.finish(track, &self.config);
                debug!(
                    track = %track,
                    score = verdict.score,
                    status = %verdict.status,
                    gaps = verdict.gaps.len(),
                    "track validated"
                );
                verdict
            }
            Err(e) => self.failed(track, &e),
        }
    }

    fn failed(&self, track: ValidationTrack, err: &ReadinessError) -> ReadinessVerdict {
        warn!(track = %track, error = %err, "track validation failed");
        ReadinessVerdict {
            track,
            status: ReadinessStatus::NotReady,
            score: 0.0,
            minimum: self.config.minimums.get(track),
            gaps: vec![DataGap::new(
                "validation_error",
                err.to_string(),
                GapSeverity::Critical,
            )],
            warnings: vec![format!("Validation error: {err}")],
            recommendations: vec!["Fix validation error and retry".to_string()],
        }
    }
}

impl Default for ReadinessValidator {
    fn default() -> Self {
        Self::new(ReadinessConfig::default())
    }
}

impl std::fmt::Debug for ReadinessValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessValidator")
            .field("config", &self.config)
            .field(
                "tracks",
                &self.tracks.iter().map(|t| t.track()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
