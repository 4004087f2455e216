#![deny(unsafe_code)]
//! # fot-hypothesis
//!
//! Competing clinical hypotheses as a normalized vector of complex weights.
//!
//! The vector is a scoring device, not a physical model: magnitudes carry
//! evidence strength, phases are bookkeeping, and a sparse correlation table
//! links symptom slots to hypothesis slots.
//!
//! Pipeline: [`Encoder::encode`] builds a [`HypothesisState`] from a
//! [`ClinicalRecord`]; [`VirtueAggregator::score`] runs the four
//! [`VirtueSupervisor`]s and returns a [`VirtueJudgment`];
//! [`evolve`] damps the state over simulated time and [`measure`] extracts
//! named observables.
//!
//! All randomness goes through a caller-supplied [`rand::Rng`] in the
//! `*_with_rng` entry points.
//!
//! ## Key Types
//!
//! - [`HypothesisState`] — amplitudes, named slots, correlations, decay rate
//! - [`EncoderConfig`] — dimension, seed magnitude, differential catalog
//! - [`VirtueAggregator`] / [`AggregationConfig`] / [`VetoPolicy`]
//! - [`VirtueJudgment`] — status, dominant component, uncertainty, hash
//! - [`Observable`] — named measurement

pub mod aggregate;
pub mod encoder;
pub mod error;
pub mod evolution;
pub mod measure;
pub mod state;
pub mod virtue;

pub use aggregate::{
    reproducibility_hash, AggregationConfig, HypothesisStatus, VetoPolicy, VirtueAggregator,
    VirtueJudgment,
};
pub use encoder::{ClinicalRecord, Encoder, EncoderConfig, DEFAULT_DIFFERENTIALS};
pub use error::HypothesisError;
pub use evolution::{evolve, evolve_with_rng};
pub use measure::{coherence, entanglement_entropy, measure, measure_named, Measured, Observable};
pub use state::{Correlation, HypothesisState, Slot};
pub use virtue::{
    ClinicalContext, Honesty, Justice, NonMaleficence, Prudence, Virtue, VirtueScores,
    VirtueSupervisor,
};
