#![deny(unsafe_code)]
//! # fot-types
//!
//! Core vocabulary of the Field of Truth evidence-claim lifecycle.
//!
//! Every conclusion the system reaches is a [`Claim`]: a set of
//! [`Measurement`]s paired with a [`CollapsePolicy`] and an [`Evidence`]
//! provenance record. Claims are append-only; the single permitted mutation
//! is marking them collapsed once the policy is satisfied.
//!
//! ## Key Types
//!
//! - [`Claim`] / [`ClaimBuilder`] — the externally visible unit of evidence
//! - [`CollapsePolicy`] — replications, alpha spent, completeness floor, agreement tolerance
//! - [`Evidence`] — tools used, input entities, generation timestamp
//! - [`ContentHash`] — BLAKE3 content address used for reproducibility hashes

pub mod claim;
pub mod error;
pub mod hash;
pub mod policy;

pub use claim::{new_id, Claim, ClaimBuilder, ClaimId, Evidence, Measurement, Verdict};
pub use error::TypesError;
pub use hash::ContentHash;
pub use policy::CollapsePolicy;
