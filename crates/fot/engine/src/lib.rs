#![deny(unsafe_code)]
//! # fot-engine
//!
//! Wires readiness validation, hypothesis encoding, virtue scoring and claim
//! emission into one per-case pipeline.
//!
//! ## Key Types
//!
//! - [`EngineConfig`] — every tunable, loadable from TOML
//! - [`ClinicalEngine`] — runs the pipeline and the modality gates
//! - [`CaseReport`] — verdicts, summary, judgment, measurements, emitted claims

pub mod config;
pub mod engine;
pub mod error;

pub use config::{EngineConfig, EvolutionConfig};
pub use engine::{CaseReport, ClinicalEngine, ConfirmatoryOutcome, GateKind};
pub use error::EngineError;
