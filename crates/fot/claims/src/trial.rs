//! Trial phases, endpoints and the running trial state.

use crate::emit::{metrics, problems};
use crate::error::ClaimError;
use fot_types::{new_id, Claim, CollapsePolicy, Verdict};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrialPhase {
    /// In-silico screening and pre-registration.
    #[serde(rename = "Phase 0")]
    Phase0,
    #[serde(rename = "Phase I")]
    PhaseI,
    #[serde(rename = "Phase II")]
    PhaseII,
    #[serde(rename = "Phase III")]
    PhaseIII,
}

impl TrialPhase {
    pub const ALL: [TrialPhase; 4] = [Self::Phase0, Self::PhaseI, Self::PhaseII, Self::PhaseIII];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phase0 => "Phase 0",
            Self::PhaseI => "Phase I",
            Self::PhaseII => "Phase II",
            Self::PhaseIII => "Phase III",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Self::Phase0 => "In-Silico",
            Self::PhaseI => "Safety",
            Self::PhaseII => "Efficacy / Dose",
            Self::PhaseIII => "Confirmatory",
        }
    }
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrialPhase {
    type Err = ClaimError;

    /// Accepts `"Phase II"`, `"phase ii"` and labelled forms such as
    /// `"Phase 0 (In-Silico)"`; only the first two words count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let phase = match (words.next(), words.next()) {
            (Some(p), Some(n)) if p.eq_ignore_ascii_case("phase") => {
                match n.trim_end_matches(':').to_ascii_uppercase().as_str() {
                    "0" => Some(Self::Phase0),
                    "I" | "1" => Some(Self::PhaseI),
                    "II" | "2" => Some(Self::PhaseII),
                    "III" | "3" => Some(Self::PhaseIII),
                    _ => None,
                }
            }
            _ => None,
        };
        phase.ok_or_else(|| ClaimError::UnknownPhase(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Efficacy,
    Safety,
    Pk,
    Imaging,
    Audio,
}

/// A trial endpoint and the policy its claims collapse under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EndpointKind,
    pub metric: String,
    /// Human-readable success criterion.
    pub success_rule: String,
    pub collapse: CollapsePolicy,
}

impl Endpoint {
    pub fn new(
        name: impl Into<String>,
        kind: EndpointKind,
        metric: impl Into<String>,
        success_rule: impl Into<String>,
        collapse: CollapsePolicy,
    ) -> Self {
        Self {
            id: new_id("ep"),
            name: name.into(),
            kind,
            metric: metric.into(),
            success_rule: success_rule.into(),
            collapse,
        }
    }
}

/// HbA1c week-12 efficacy and TEAE safety.
pub fn default_endpoints() -> Result<Vec<Endpoint>, ClaimError> {
    Ok(vec![
        Endpoint::new(
            "HbA1c Change at Week 12",
            EndpointKind::Efficacy,
            "HbA1cDelta",
            "Mean ΔHbA1c ≤ -0.5% vs control; p<0.05",
            CollapsePolicy::new(2, 0.9)?
                .with_alpha_spent(0.025)
                .with_agreement_delta_max(0.05),
        ),
        Endpoint::new(
            "Treatment-Emergent AEs",
            EndpointKind::Safety,
            "TEAE_Rate",
            "No DLT; TEAE profile acceptable vs SoC",
            CollapsePolicy::new(2, 0.8)?.with_agreement_delta_max(0.05),
        ),
    ])
}

/// Snapshot of a trial derived from its claims.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialState {
    pub candidate_id: String,
    pub indication: String,
    pub phase: TrialPhase,
    pub endpoints: Vec<Endpoint>,
    #[serde(default)]
    pub readiness_ok: bool,
    #[serde(default)]
    pub replication_count: u32,
    #[serde(default)]
    pub collapsed_claims: u32,
}

impl TrialState {
    pub fn new(
        candidate_id: impl Into<String>,
        indication: impl Into<String>,
        phase: TrialPhase,
    ) -> Result<Self, ClaimError> {
        Ok(Self {
            candidate_id: candidate_id.into(),
            indication: indication.into(),
            phase,
            endpoints: default_endpoints()?,
            readiness_ok: false,
            replication_count: 0,
            collapsed_claims: 0,
        })
    }

    pub fn with_endpoints(mut self, endpoints: Vec<Endpoint>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Recompute the derived counters from a claim log.
    ///
    /// `readiness_ok` follows the most recent readiness claim; replications
    /// count collapsed confirmatory claims.
    pub fn refresh_from(&mut self, claims: &[Claim]) {
        self.collapsed_claims = count(claims.iter().filter(|c| c.is_collapsed()));
        self.replication_count = count(claims.iter().filter(|c| {
            c.is_collapsed() && c.addresses_problem == problems::PRIMARY_CONFIRMATORY
        }));
        if let Some(latest) = claims.iter().rev().find(|c| {
            c.addresses_problem == problems::ENDPOINT_READINESS
                || c.addresses_problem == problems::DATA_READINESS
        }) {
            self.readiness_ok = latest.verdict != Some(Verdict::NearMiss)
                && latest
                    .measurement(metrics::READINESS_SCORE)
                    .is_some_and(|m| m.value > 0.0);
        }
    }
}

fn count<'a>(claims: impl Iterator<Item = &'a Claim>) -> u32 {
    u32::try_from(claims.count()).unwrap_or(u32::MAX)
}
