#![deny(unsafe_code)]
//! # fot-readiness
//!
//! Data-readiness gating for clinical artifacts.
//!
//! A clinical record is scored independently on seven [`ValidationTrack`]s.
//! Each track yields a [`ReadinessVerdict`] (READY / NEAR_MISS / NOT_READY,
//! a score in `[0, 1]`, gaps, warnings, recommendations); verdicts roll up
//! into a [`ReadinessSummary`]. Image studies and audio recordings go through
//! flat-field modality gates that report `{ready, missing, warnings}`.
//!
//! The validator never fails on data: malformed fields become gaps and a
//! track that errors out becomes a NOT_READY verdict carrying the error as a
//! critical gap. Only programmer errors (an unknown track name) are `Err`.
//!
//! ## Key Types
//!
//! - [`ReadinessValidator`] — runs every registered [`TrackValidator`]
//! - [`ReadinessConfig`] / [`TrackMinimums`] — per-track minimum scores
//! - [`ImageGate`] / [`AudioGate`] — modality gates producing a [`GateReport`]

pub mod config;
pub mod error;
pub mod gates;
pub mod record;
pub mod summary;
pub mod tracks;
pub mod types;
pub mod validator;

pub use config::{ReadinessConfig, TrackMinimums};
pub use error::ReadinessError;
pub use gates::{
    audio_readiness, image_readiness, AudioGate, AudioGateThresholds, GateReport, GateWarning,
    ImageGate, ImageGateThresholds,
};
pub use record::{FieldMap, Numeric, RecordMap};
pub use summary::summarize;
pub use tracks::{TrackScorer, TrackValidator};
pub use types::{
    DataGap, GapSeverity, OverallStatus, ReadinessStatus, ReadinessSummary, ReadinessVerdict,
    TrackDetail, ValidationTrack,
};
pub use validator::ReadinessValidator;
