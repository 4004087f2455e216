#[path = "property/state_norm.rs"]
mod state_norm;

#[path = "property/readiness_scores.rs"]
mod readiness_scores;

#[path = "property/collapse_idempotence.rs"]
mod collapse_idempotence;
