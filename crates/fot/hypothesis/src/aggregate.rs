use crate::state::HypothesisState;
use crate::virtue::{
    ClinicalContext, Honesty, Justice, NonMaleficence, Prudence, Virtue, VirtueScores,
    VirtueSupervisor,
};
use chrono::{DateTime, Utc};
use fot_types::ContentHash;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Resolution status of a scored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HypothesisStatus {
    /// Competing hypotheses remain open.
    Superposed,
    /// Probed but not resolved.
    Measured,
    /// Resolved to the dominant hypothesis.
    Collapsed,
}

impl fmt::Display for HypothesisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superposed => write!(f, "SUPERPOSED"),
            Self::Measured => write!(f, "MEASURED"),
            Self::Collapsed => write!(f, "COLLAPSED"),
        }
    }
}

/// What a non-maleficence veto does to the status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VetoPolicy {
    /// A veto always yields SUPERPOSED.
    #[default]
    ForceSuperposed,
    /// A veto only lowers the mean compliance.
    AverageOnly,
}

/// Compliance thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Compliance strictly above this collapses.
    pub collapse_threshold: f64,
    /// Compliance strictly above this is MEASURED.
    pub measure_threshold: f64,
    pub veto_policy: VetoPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            collapse_threshold: 0.8,
            measure_threshold: 0.6,
            veto_policy: VetoPolicy::default(),
        }
    }
}

impl AggregationConfig {
    pub fn status_for(&self, compliance: f64) -> HypothesisStatus {
        if compliance > self.collapse_threshold {
            HypothesisStatus::Collapsed
        } else if compliance > self.measure_threshold {
            HypothesisStatus::Measured
        } else {
            HypothesisStatus::Superposed
        }
    }
}

/// Claim-level outcome of scoring one state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtueJudgment {
    pub case_id: String,
    pub status: HypothesisStatus,
    pub dominant_index: usize,
    pub amplitude: Complex64,
    /// Squared magnitude of the dominant amplitude.
    pub probability: f64,
    /// Argument of the dominant amplitude, in `(-π, π]`.
    pub phase: f64,
    /// Probability-weighted RMS index distance from the dominant index.
    /// `None` for a zero state.
    pub uncertainty: Option<f64>,
    /// Symptoms correlated with the hypothesis block.
    pub correlated: Vec<String>,
    pub scores: VirtueScores,
    /// Mean of the four virtue scores.
    pub compliance: f64,
    pub vetoed: bool,
    pub measurement_type: String,
    pub collapse_policy: String,
    pub reproducibility_hash: ContentHash,
    pub evaluated_at: DateTime<Utc>,
}

impl VirtueJudgment {
    /// Recompute the hash from the judgment's own fields.
    pub fn verify_hash(&self) -> bool {
        reproducibility_hash(&self.case_id, self.compliance, self.evaluated_at)
            == self.reproducibility_hash
    }
}

/// BLAKE3 over case id, compliance (12 decimals) and RFC 3339 timestamp.
pub fn reproducibility_hash(case_id: &str, compliance: f64, at: DateTime<Utc>) -> ContentHash {
    let compliance = format!("{compliance:.12}");
    let at = at.to_rfc3339();
    ContentHash::hash_fields([case_id.as_bytes(), compliance.as_bytes(), at.as_bytes()])
}

/// Runs the supervisors over a state and decides its status.
pub struct VirtueAggregator {
    config: AggregationConfig,
    supervisors: Vec<Box<dyn VirtueSupervisor>>,
}

impl VirtueAggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self {
            config,
            supervisors: vec![
                Box::new(Honesty::default()),
                Box::new(Prudence),
                Box::new(Justice),
                Box::new(NonMaleficence),
            ],
        }
    }

    /// Replace the supervisor for `supervisor.virtue()`.
    pub fn with_supervisor(mut self, supervisor: Box<dyn VirtueSupervisor>) -> Self {
        let virtue = supervisor.virtue();
        if let Some(slot) = self.supervisors.iter_mut().find(|s| s.virtue() == virtue) {
            *slot = supervisor;
        }
        self
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// All four scores for one state/context pair.
    pub fn scores(&self, state: &HypothesisState, context: &ClinicalContext) -> VirtueScores {
        let mut scores = VirtueScores::default();
        for supervisor in &self.supervisors {
            scores.set(supervisor.virtue(), supervisor.score(state, context));
        }
        scores
    }

    /// Score a state, timestamped now.
    pub fn score(&self, state: &HypothesisState, context: &ClinicalContext) -> VirtueJudgment {
        self.score_at(state, context, Utc::now())
    }

    /// Score a state with an explicit evaluation time.
    pub fn score_at(
        &self,
        state: &HypothesisState,
        context: &ClinicalContext,
        evaluated_at: DateTime<Utc>,
    ) -> VirtueJudgment {
        let scores = self.scores(state, context);
        let compliance = scores.mean();
        let vetoed = scores.vetoed();

        let mut status = self.config.status_for(compliance);
        if vetoed && self.config.veto_policy == VetoPolicy::ForceSuperposed {
            if status != HypothesisStatus::Superposed {
                warn!(
                    case_id = %state.case_id,
                    compliance,
                    would_be = %status,
                    harm = ?context.harm_indicators,
                    "non-maleficence veto forces superposed"
                );
            }
            status = HypothesisStatus::Superposed;
        }

        let (dominant_index, amplitude, probability, uncertainty) = match state.dominant_index() {
            Some(k) if !state.is_zero() => {
                let uncertainty = state
                    .amplitudes
                    .iter()
                    .enumerate()
                    .map(|(i, a)| a.norm_sqr() * (i as f64 - k as f64).powi(2))
                    .sum::<f64>()
                    .sqrt();
                let amplitude = state.amplitudes[k];
                (k, amplitude, amplitude.norm_sqr(), Some(uncertainty))
            }
            _ => (0, Complex64::new(0.0, 0.0), 0.0, None),
        };

        debug!(
            case_id = %state.case_id,
            status = %status,
            compliance,
            probability,
            "state scored"
        );

        VirtueJudgment {
            case_id: state.case_id.clone(),
            status,
            dominant_index,
            amplitude,
            probability,
            phase: if probability > 0.0 { amplitude.arg() } else { 0.0 },
            uncertainty,
            correlated: state.correlated_symptoms(),
            scores,
            compliance,
            vetoed,
            measurement_type: "clinical_diagnosis".to_string(),
            collapse_policy: "virtue_supervised".to_string(),
            reproducibility_hash: reproducibility_hash(&state.case_id, compliance, evaluated_at),
            evaluated_at,
        }
    }
}

impl Default for VirtueAggregator {
    fn default() -> Self {
        Self::new(AggregationConfig::default())
    }
}

impl fmt::Debug for VirtueAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtueAggregator")
            .field("config", &self.config)
            .field(
                "supervisors",
                &self.supervisors.iter().map(|s| s.virtue()).collect::<Vec<Virtue>>(),
            )
            .finish()
    }
}
