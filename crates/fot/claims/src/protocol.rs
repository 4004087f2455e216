use crate::emit::metrics;
use crate::error::ClaimError;
use crate::repository::ClaimRepository;
use fot_types::{Claim, ClaimId, CollapsePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Whether two toolchains agree: `|delta| <= max`, always true without a
/// tolerance.
pub fn toolchain_agreement(delta_observed: f64, delta_max: Option<f64>) -> bool {
    match delta_max {
        None => true,
        Some(max) => delta_observed.abs() <= max,
    }
}

/// What the caller observed for a claim. The protocol never fabricates any
/// of these values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapseObservation {
    /// Absolute difference between two independent estimates.
    pub agreement_delta: Option<f64>,
    /// Independent replications completed. Unchecked when `None`.
    pub replications: Option<u32>,
    /// Observed data completeness in `[0, 1]`. Unchecked when `None`.
    pub completeness: Option<f64>,
}

impl CollapseObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observation from two toolchain estimates of the same quantity.
    pub fn from_estimates(a: f64, b: f64) -> Self {
        Self {
            agreement_delta: Some((a - b).abs()),
            ..Self::default()
        }
    }

    /// Observation from the agreement-delta measurement a claim carries,
    /// if any.
    pub fn from_claim(claim: &Claim) -> Self {
        Self {
            agreement_delta: claim
                .measurement(metrics::AGREEMENT_DELTA)
                .or_else(|| claim.measurement(metrics::TOOLCHAIN_AGREEMENT_DELTA))
                .map(|m| m.value.abs()),
            ..Self::default()
        }
    }

    pub fn with_agreement_delta(mut self, delta: f64) -> Self {
        self.agreement_delta = Some(delta);
        self
    }

    pub fn with_replications(mut self, replications: u32) -> Self {
        self.replications = Some(replications);
        self
    }

    pub fn with_completeness(mut self, completeness: f64) -> Self {
        self.completeness = Some(completeness);
        self
    }

    fn validate(&self) -> Result<(), ClaimError> {
        if let Some(delta) = self.agreement_delta {
            if !delta.is_finite() || delta < 0.0 {
                return Err(ClaimError::InvalidObservation(format!(
                    "agreement delta {delta} must be a non-negative number"
                )));
            }
        }
        if let Some(c) = self.completeness {
            if !(0.0..=1.0).contains(&c) {
                return Err(ClaimError::InvalidObservation(format!(
                    "completeness {c} outside [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// One unmet collapse criterion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "criterion", rename_all = "snake_case")]
pub enum CollapseFailure {
    Disagreement { observed: f64, max: f64 },
    Replications { observed: u32, required: u32 },
    Completeness { observed: f64, min: f64 },
}

impl CollapseFailure {
    /// Within the relaxed band that makes a miss a near miss.
    pub fn is_near(&self) -> bool {
        match *self {
            Self::Disagreement { observed, max } => observed <= max * 1.25,
            Self::Replications { observed, required } => observed + 1 >= required,
            Self::Completeness { observed, min } => observed >= min * 0.8,
        }
    }
}

impl fmt::Display for CollapseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disagreement { observed, max } => {
                write!(f, "toolchain disagreement {observed:.4} exceeds {max}")
            }
            Self::Replications { observed, required } => {
                write!(f, "{observed} of {required} required replications")
            }
            Self::Completeness { observed, min } => {
                write!(f, "completeness {observed:.3} below {min}")
            }
        }
    }
}

/// Outcome of evaluating a claim against its policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum CollapseDecision {
    Collapsed,
    /// Every failing criterion is within its relaxed band.
    NearMiss { failures: Vec<CollapseFailure> },
    Rejected { failures: Vec<CollapseFailure> },
}

impl CollapseDecision {
    pub fn collapses(&self) -> bool {
        matches!(self, Self::Collapsed)
    }

    pub fn failures(&self) -> &[CollapseFailure] {
        match self {
            Self::Collapsed => &[],
            Self::NearMiss { failures } | Self::Rejected { failures } => failures,
        }
    }

    /// Human-readable reason, empty when collapsed.
    pub fn reason(&self) -> String {
        self.failures()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Applies collapse policies to claims.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollapseProtocol;

impl CollapseProtocol {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate `policy` against an observation without touching any claim.
    pub fn evaluate_policy(
        &self,
        claim_id: &ClaimId,
        policy: &CollapsePolicy,
        observation: &CollapseObservation,
    ) -> Result<CollapseDecision, ClaimError> {
        policy.validate()?;
        observation.validate()?;

        let mut failures = Vec::new();

        if let Some(max) = policy.agreement_delta_max {
            let delta = observation
                .agreement_delta
                .ok_or_else(|| ClaimError::MissingAgreement(claim_id.clone()))?;
            if !toolchain_agreement(delta, Some(max)) {
                failures.push(CollapseFailure::Disagreement {
                    observed: delta,
                    max,
                });
            }
        }

        if let Some(observed) = observation.replications {
            if observed < policy.replications {
                failures.push(CollapseFailure::Replications {
                    observed,
                    required: policy.replications,
                });
            }
        }

        if let Some(observed) = observation.completeness {
            if observed < policy.min_completeness {
                failures.push(CollapseFailure::Completeness {
                    observed,
                    min: policy.min_completeness,
                });
            }
        }

        Ok(if failures.is_empty() {
            CollapseDecision::Collapsed
        } else if failures.iter().all(CollapseFailure::is_near) {
            CollapseDecision::NearMiss { failures }
        } else {
            CollapseDecision::Rejected { failures }
        })
    }

    pub fn evaluate(
        &self,
        claim: &Claim,
        observation: &CollapseObservation,
    ) -> Result<CollapseDecision, ClaimError> {
        self.evaluate_policy(&claim.id, &claim.policy, observation)
    }

    /// Collapse `claim` if the observation satisfies its policy.
    ///
    /// Idempotent: an already collapsed claim stays collapsed and returns
    /// `true` without being re-evaluated. A claim that does not collapse is
    /// left untouched.
    pub fn attempt_collapse(
        &self,
        claim: &mut Claim,
        observation: &CollapseObservation,
    ) -> Result<bool, ClaimError> {
        if claim.is_collapsed() {
            return Ok(true);
        }
        let decision = self.evaluate(claim, observation)?;
        if decision.collapses() {
            claim.mark_collapsed();
            info!(claim_id = %claim.id, problem = %claim.addresses_problem, "claim collapsed");
            Ok(true)
        } else {
            debug!(
                claim_id = %claim.id,
                reason = %decision.reason(),
                "claim not collapsed"
            );
            Ok(false)
        }
    }

    /// [`attempt_collapse`](Self::attempt_collapse) with an agreement delta
    /// computed from two estimates.
    pub fn attempt_collapse_with_estimates(
        &self,
        claim: &mut Claim,
        estimate_a: f64,
        estimate_b: f64,
    ) -> Result<bool, ClaimError> {
        self.attempt_collapse(claim, &CollapseObservation::from_estimates(estimate_a, estimate_b))
    }

    /// Evaluate a stored claim and mark it collapsed in the repository.
    pub fn attempt_in<R: ClaimRepository + ?Sized>(
        &self,
        repository: &R,
        id: &ClaimId,
        observation: &CollapseObservation,
    ) -> Result<bool, ClaimError> {
        let claim = repository
            .get(id)?
            .ok_or_else(|| ClaimError::NotFound(id.clone()))?;
        if claim.is_collapsed() {
            return Ok(true);
        }
        let decision = self.evaluate(&claim, observation)?;
        if !decision.collapses() {
            debug!(claim_id = %id, reason = %decision.reason(), "stored claim not collapsed");
            return Ok(false);
        }
        repository.mark_collapsed(id)?;
        info!(claim_id = %id, problem = %claim.addresses_problem, "stored claim collapsed");
        Ok(true)
    }
}
