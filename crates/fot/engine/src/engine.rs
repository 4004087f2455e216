use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use chrono::Utc;
use fot_claims::{
    claim_from_gate_report, claim_from_judgment, claim_from_readiness, confirmatory_claim,
    ClaimRepository, CollapseDecision, CollapseObservation, CollapseProtocol,
};
use fot_hypothesis::{
    coherence, entanglement_entropy, evolve_with_rng, measure, ClinicalRecord, Encoder,
    HypothesisState, Measured, Observable, VirtueAggregator, VirtueJudgment,
};
use fot_readiness::record::kind_of;
use fot_readiness::{
    summarize, AudioGate, GateReport, ImageGate, OverallStatus, ReadinessError,
    ReadinessSummary, ReadinessValidator, ReadinessVerdict,
};
use fot_types::Claim;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    Image,
    Audio,
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "image"),
            Self::Audio => write!(f, "audio"),
        }
    }
}

/// Everything the pipeline produced for one case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseReport {
    pub case_id: String,
    pub verdicts: Vec<ReadinessVerdict>,
    pub summary: ReadinessSummary,
    pub judgment: VirtueJudgment,
    /// Observable name → reading, taken after evolution.
    pub measurements: BTreeMap<String, Measured>,
    pub coherence: f64,
    pub entanglement_entropy: f64,
    /// Probability mass left after evolution damping.
    pub total_probability: f64,
    pub evolution_steps: u32,
    /// Claims appended to the repository, in emission order.
    pub claims: Vec<Claim>,
}

/// A confirmatory claim and what the protocol decided about it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmatoryOutcome {
    pub claim: Claim,
    pub decision: CollapseDecision,
}

/// Per-case evidence pipeline.
///
/// Owns no claims: every emitted claim goes to the repository the caller
/// passes in. Safe to share across threads; the RNG is the only mutable
/// state.
pub struct ClinicalEngine {
    config: EngineConfig,
    validator: ReadinessValidator,
    image_gate: ImageGate,
    audio_gate: AudioGate,
    encoder: Encoder,
    aggregator: VirtueAggregator,
    protocol: CollapseProtocol,
    rng: Mutex<StdRng>,
}

impl ClinicalEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            validator: ReadinessValidator::new(config.readiness.clone()),
            image_gate: ImageGate::new(config.image_gate.clone()),
            audio_gate: AudioGate::new(config.audio_gate.clone()),
            encoder: Encoder::new(config.encoder.clone())?,
            aggregator: VirtueAggregator::new(config.aggregation.clone()),
            protocol: CollapseProtocol::new(),
            rng: Mutex::new(rng),
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the readiness validator, e.g. to register a custom track.
    pub fn with_validator(mut self, validator: ReadinessValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_aggregator(mut self, aggregator: VirtueAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Run all seven tracks and summarize.
    pub fn validate(&self, record: &Value) -> (Vec<ReadinessVerdict>, ReadinessSummary) {
        let verdicts = self.validator.validate_value(record);
        let summary = summarize(&verdicts);
        (verdicts, summary)
    }

    pub fn gate(&self, kind: GateKind, fields: &Value) -> EngineResult<GateReport> {
        let fields = fields
            .as_object()
            .ok_or_else(|| ReadinessError::NotAnObject(kind_of(fields)))?;
        let report = match kind {
            GateKind::Image => self.image_gate.check(fields),
            GateKind::Audio => self.audio_gate.check(fields),
        };
        debug!(gate = %kind, ready = report.ready, missing = report.missing.len(), "gate checked");
        Ok(report)
    }

    /// Run a gate and record its endpoint-readiness claim.
    pub fn gate_and_emit(
        &self,
        kind: GateKind,
        fields: &Value,
        repository: &dyn ClaimRepository,
    ) -> EngineResult<(GateReport, Claim)> {
        let report = self.gate(kind, fields)?;
        let claim = claim_from_gate_report(&report, &fields.to_string(), Utc::now())?;
        repository.append(claim.clone())?;
        Ok((report, claim))
    }

    /// Encode a raw case record.
    pub fn encode(&self, record: &Value) -> EngineResult<HypothesisState> {
        let clinical = ClinicalRecord::from_json(record);
        let mut rng = self.rng.lock().map_err(|_| EngineError::LockError)?;
        Ok(self.encoder.encode_with_rng(&clinical, &mut *rng))
    }

    /// Apply `steps` evolution steps of the configured time step.
    pub fn evolve(&self, state: HypothesisState, steps: u32) -> EngineResult<HypothesisState> {
        let mut rng = self.rng.lock().map_err(|_| EngineError::LockError)?;
        let mut state = state;
        for _ in 0..steps {
            state = evolve_with_rng(&state, self.config.evolution.time_step, &mut *rng)?;
        }
        Ok(state)
    }

    /// Full pipeline with the configured number of evolution steps.
    ///
    /// Readiness does not gate the hypothesis steps: a NOT_READY record is
    /// still encoded and scored, and its readiness claim records the gaps.
    /// Use [`assess_ready`](Self::assess_ready) to refuse such records.
    pub fn assess(
        &self,
        record: &Value,
        repository: &dyn ClaimRepository,
    ) -> EngineResult<CaseReport> {
        self.assess_with_steps(record, self.config.evolution.steps, repository)
    }

    /// Like [`assess`](Self::assess), but fails with
    /// [`EngineError::NotReady`] before encoding when the readiness summary
    /// is NOT_READY. Nothing is stored in that case.
    pub fn assess_ready(
        &self,
        record: &Value,
        repository: &dyn ClaimRepository,
    ) -> EngineResult<CaseReport> {
        let (_, summary) = self.validate(record);
        if summary.status == OverallStatus::NotReady {
            return Err(EngineError::NotReady(summary.not_ready_tracks.len()));
        }
        self.assess(record, repository)
    }

    /// validate → summarize → encode → evolve → score → emit.
    ///
    /// Both claims are stored in one repository write.
    pub fn assess_with_steps(
        &self,
        record: &Value,
        steps: u32,
        repository: &dyn ClaimRepository,
    ) -> EngineResult<CaseReport> {
        let (verdicts, summary) = self.validate(record);
        let state = self.evolve(self.encode(record)?, steps)?;
        let judgment = self.aggregator.score(&state, &self.config.context);

        let measurements = Observable::ALL
            .iter()
            .map(|&o| (o.as_str().to_string(), measure(&state, o)))
            .collect();

        let claims = vec![claim_from_readiness(&summary)?, claim_from_judgment(&judgment)?];
        repository.append_all(claims.clone())?;

        info!(
            case_id = %state.case_id,
            readiness = %summary.status,
            status = %judgment.status,
            compliance = judgment.compliance,
            claims = claims.len(),
            "case assessed"
        );

        Ok(CaseReport {
            case_id: state.case_id.clone(),
            verdicts,
            summary,
            measurements,
            coherence: coherence(&state),
            entanglement_entropy: entanglement_entropy(&state),
            total_probability: state.total_probability(),
            evolution_steps: steps,
            judgment,
            claims,
        })
    }

    /// Emit a confirmatory claim from two toolchain estimates and try to
    /// collapse it on their agreement.
    pub fn confirm(
        &self,
        estimate_a: f64,
        estimate_b: f64,
        tolerance: Option<f64>,
        repository: &dyn ClaimRepository,
    ) -> EngineResult<ConfirmatoryOutcome> {
        let mut claim = confirmatory_claim(estimate_a, estimate_b, tolerance, Utc::now())?;
        let observation = CollapseObservation::from_estimates(estimate_a, estimate_b);
        let decision = self.protocol.evaluate(&claim, &observation)?;
        self.protocol.attempt_collapse(&mut claim, &observation)?;
        repository.append(claim.clone())?;
        Ok(ConfirmatoryOutcome { claim, decision })
    }
}

impl fmt::Debug for ClinicalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClinicalEngine")
            .field("config", &self.config)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
