use crate::error::TypesError;
use crate::policy::CollapsePolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a prefixed unique identifier, e.g. `claim:6f1c…`.
pub fn new_id(prefix: &str) -> String {
    format!("{}:{}", prefix, uuid::Uuid::new_v4())
}

/// Unique claim identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(pub String);

impl ClaimId {
    pub fn generate() -> Self {
        Self(new_id("claim"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClaimId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single measured quantity with its uncertainty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "hasMetric")]
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub uncertainty: f64,
}

impl Measurement {
    pub fn new(metric: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value,
            unit: unit.into(),
            uncertainty: 0.0,
        }
    }

    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = uncertainty;
        self
    }
}

/// Provenance of a claim: which tools produced it from which inputs, and when.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    /// Tool identifiers (e.g. `tool:AnalysisA`).
    pub used: Vec<String>,
    /// Input entity identifiers (e.g. `dataset:locked-db`).
    pub used_entity: Vec<String>,
    #[serde(rename = "wasGeneratedBy")]
    pub generated_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new() -> Self {
        Self {
            used: Vec::new(),
            used_entity: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.used.push(tool.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.used_entity.push(entity.into());
        self
    }

    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }
}

impl Default for Evidence {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome label attached to a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Narrowly failed a threshold; targeted remediation is likely to succeed.
    NearMiss,
    /// Failed outright.
    Rejected,
    /// Policy satisfied; the claim is final.
    Collapsed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NearMiss => write!(f, "NearMiss"),
            Self::Rejected => write!(f, "Rejected"),
            Self::Collapsed => write!(f, "Collapsed"),
        }
    }
}

/// The externally visible unit of evidence.
///
/// Append-only: once created, the only mutation is [`Claim::mark_collapsed`],
/// which sets the collapsed flag exactly once and never clears it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub addresses_problem: String,
    pub measurements: Vec<Measurement>,
    #[serde(rename = "collapse")]
    pub policy: CollapsePolicy,
    pub evidence: Evidence,
    collapsed: bool,
    pub verdict: Option<Verdict>,
    pub reason: Option<String>,
}

impl Claim {
    pub fn builder(addresses_problem: impl Into<String>) -> ClaimBuilder {
        ClaimBuilder::new(addresses_problem)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Mark the claim final. Returns `true` if this call changed the flag.
    pub fn mark_collapsed(&mut self) -> bool {
        if self.collapsed {
            return false;
        }
        self.collapsed = true;
        self.verdict = Some(Verdict::Collapsed);
        true
    }

    /// Look up a measurement by metric name.
    pub fn measurement(&self, metric: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.metric == metric)
    }
}

/// Fluent constructor for [`Claim`]; validates the policy on build.
#[derive(Clone, Debug)]
pub struct ClaimBuilder {
    id: Option<ClaimId>,
    addresses_problem: String,
    measurements: Vec<Measurement>,
    policy: CollapsePolicy,
    evidence: Evidence,
    verdict: Option<Verdict>,
    reason: Option<String>,
}

impl ClaimBuilder {
    pub fn new(addresses_problem: impl Into<String>) -> Self {
        Self {
            id: None,
            addresses_problem: addresses_problem.into(),
            measurements: Vec::new(),
            policy: CollapsePolicy::default(),
            evidence: Evidence::new(),
            verdict: None,
            reason: None,
        }
    }

    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    pub fn with_policy(mut self, policy: CollapsePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_verdict(mut self, verdict: Verdict, reason: impl Into<String>) -> Self {
        self.verdict = Some(verdict);
        self.reason = Some(reason.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn build(self) -> Result<Claim, TypesError> {
        self.policy.validate()?;
        if self.addresses_problem.trim().is_empty() {
            return Err(TypesError::InvalidClaim(
                "claim must address a problem".into(),
            ));
        }
        if self.verdict == Some(Verdict::Collapsed) {
            return Err(TypesError::InvalidClaim(
                "claims are created open; collapse goes through the protocol".into(),
            ));
        }
        Ok(Claim {
            id: self.id.unwrap_or_else(ClaimId::generate),
            addresses_problem: self.addresses_problem,
            measurements: self.measurements,
            policy: self.policy,
            evidence: self.evidence,
            collapsed: false,
            verdict: self.verdict,
            reason: self.reason,
        })
    }
}
