#![deny(unsafe_code)]
//! # fot-claims
//!
//! Deciding when a [`Claim`](fot_types::Claim) is final.
//!
//! [`CollapseProtocol`] compares a claim's [`CollapsePolicy`](fot_types::CollapsePolicy)
//! against a [`CollapseObservation`] (toolchain agreement, replications,
//! completeness) and either marks the claim collapsed or classifies the miss.
//! Claims are produced from judgments and readiness results by the
//! [`emit`] functions and kept in a [`ClaimRepository`], which the host owns.
//!
//! ## Key Types
//!
//! - [`CollapseProtocol`] / [`CollapseDecision`] / [`CollapseFailure`]
//! - [`ClaimRepository`] / [`InMemoryClaimRepository`]
//! - [`TrialState`] / [`Endpoint`] / [`TrialPhase`]

pub mod emit;
pub mod error;
pub mod protocol;
pub mod repository;
pub mod trial;

pub use emit::{
    adverse_event_claim, claim_from_gate_report, claim_from_judgment, claim_from_readiness,
    confirmatory_claim,
};
pub use error::ClaimError;
pub use protocol::{
    toolchain_agreement, CollapseDecision, CollapseFailure, CollapseObservation, CollapseProtocol,
};
pub use repository::{ClaimRepository, InMemoryClaimRepository};
pub use trial::{default_endpoints, Endpoint, EndpointKind, TrialPhase, TrialState};
