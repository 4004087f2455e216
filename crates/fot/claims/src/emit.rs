//! Turning judgments and readiness results into claims.
//!
//! Every function here produces an *open* claim; collapse only ever happens
//! through [`CollapseProtocol`](crate::CollapseProtocol).

use crate::error::ClaimError;
use chrono::{DateTime, Utc};
use fot_hypothesis::VirtueJudgment;
use fot_readiness::{GateReport, ReadinessSummary};
use fot_types::{Claim, CollapsePolicy, Evidence, Measurement, Verdict};

/// Problem identifiers claims are emitted against.
pub mod problems {
    pub const CLINICAL_DIAGNOSIS: &str = "fcl:ClinicalDiagnosis";
    pub const ENDPOINT_READINESS: &str = "fcl:Endpoint_Readiness";
    pub const DATA_READINESS: &str = "fcl:Data_Readiness";
    pub const PRIMARY_CONFIRMATORY: &str = "fcl:PrimaryConfirmatory_HbA1c";
    pub const SAFETY_TEAE: &str = "fcl:Safety_TEAE_Profile";
}

/// Metric names used in emitted measurements.
pub mod metrics {
    pub const PROBABILITY: &str = "fcl:DiagnosisProbability";
    pub const UNCERTAINTY: &str = "fcl:DiagnosisUncertainty";
    pub const COMPLIANCE: &str = "fcl:VirtueCompliance";
    pub const READINESS_SCORE: &str = "fct:ReadinessScore";
    pub const ESTIMATE_A: &str = "fcl:EstimateA";
    pub const ESTIMATE_B: &str = "fcl:EstimateB";
    pub const AGREEMENT_DELTA: &str = "fcl:AgreementDelta";
    pub const TOOLCHAIN_AGREEMENT_DELTA: &str = "fcl:ToolchainAgreementDelta";
    pub const TEAE_EVENT_COUNT: &str = "fcl:TEAE_EventCount";
}

const GATE_NEAR_MISS_REASON: &str = "Improve acquisition per warnings.";

/// Diagnosis claim from a virtue judgment.
///
/// Carries the dominant probability, its uncertainty (omitted for a zero
/// state) and the compliance score. The default policy applies.
pub fn claim_from_judgment(judgment: &VirtueJudgment) -> Result<Claim, ClaimError> {
    let mut builder = Claim::builder(problems::CLINICAL_DIAGNOSIS)
        .with_measurement(Measurement::new(
            metrics::PROBABILITY,
            judgment.probability,
            "probability",
        ));
    if let Some(uncertainty) = judgment.uncertainty {
        builder = builder.with_measurement(Measurement::new(
            metrics::UNCERTAINTY,
            uncertainty,
            "index",
        ));
    }
    let claim = builder
        .with_measurement(Measurement::new(
            metrics::COMPLIANCE,
            judgment.compliance,
            "score",
        ))
        .with_evidence(
            Evidence::new()
                .with_tool("tool:VirtueAggregator")
                .with_entity(format!("case:{}", judgment.case_id))
                .with_entity(format!("hash:{}", judgment.reproducibility_hash.short()))
                .generated_at(judgment.evaluated_at),
        )
        .with_reason(format!("status {}", judgment.status))
        .build()?;
    Ok(claim)
}

/// Endpoint-readiness claim from an image or audio gate.
///
/// Emitted whether or not the gate passed; a failing gate yields a
/// `NearMiss` verdict.
pub fn claim_from_gate_report(
    report: &GateReport,
    payload: &str,
    at: DateTime<Utc>,
) -> Result<Claim, ClaimError> {
    let policy = CollapsePolicy::new(1, 1.0)?.with_agreement_delta_max(0.02);
    let mut builder = Claim::builder(problems::ENDPOINT_READINESS)
        .with_measurement(Measurement::new(
            metrics::READINESS_SCORE,
            if report.ready { 1.0 } else { 0.0 },
            "score",
        ))
        .with_policy(policy)
        .with_evidence(
            Evidence::new()
                .with_tool("tool:ReadinessGate")
                .with_entity(format!("payload:{}", payload.len()))
                .generated_at(at),
        );
    if !report.ready {
        builder = builder.with_verdict(Verdict::NearMiss, GATE_NEAR_MISS_REASON);
    }
    Ok(builder.build()?)
}

/// Data-readiness claim from a validator summary.
pub fn claim_from_readiness(summary: &ReadinessSummary) -> Result<Claim, ClaimError> {
    let policy = CollapsePolicy::new(1, 1.0)?.with_agreement_delta_max(0.02);
    let mut evidence = Evidence::new()
        .with_tool("tool:ReadinessValidator")
        .generated_at(summary.generated_at);
    for detail in &summary.track_details {
        evidence = evidence.with_entity(format!("track:{}", detail.track));
    }
    let mut builder = Claim::builder(problems::DATA_READINESS)
        .with_measurement(Measurement::new(
            metrics::READINESS_SCORE,
            summary.score,
            "score",
        ))
        .with_policy(policy)
        .with_evidence(evidence);
    if !summary.is_fully_ready() {
        let reason = summary
            .recommendations
            .first()
            .cloned()
            .unwrap_or_else(|| format!("readiness {}", summary.status));
        builder = builder.with_verdict(Verdict::NearMiss, reason);
    }
    Ok(builder.build()?)
}

/// Primary confirmatory claim from two independent toolchain estimates.
pub fn confirmatory_claim(
    estimate_a: f64,
    estimate_b: f64,
    agreement_delta_max: Option<f64>,
    at: DateTime<Utc>,
) -> Result<Claim, ClaimError> {
    let mut policy = CollapsePolicy::new(2, 0.95)?.with_alpha_spent(0.025);
    policy.agreement_delta_max = agreement_delta_max;
    let claim = Claim::builder(problems::PRIMARY_CONFIRMATORY)
        .with_measurement(Measurement::new(metrics::ESTIMATE_A, estimate_a, "percent"))
        .with_measurement(Measurement::new(metrics::ESTIMATE_B, estimate_b, "percent"))
        .with_measurement(Measurement::new(
            metrics::AGREEMENT_DELTA,
            (estimate_a - estimate_b).abs(),
            "delta",
        ))
        .with_policy(policy)
        .with_evidence(
            Evidence::new()
                .with_tool("tool:AnalysisA")
                .with_tool("tool:AnalysisB")
                .with_entity("dataset:locked-db")
                .generated_at(at),
        )
        .build()?;
    Ok(claim)
}

/// Safety claim recording one treatment-emergent adverse event.
pub fn adverse_event_claim(
    term: &str,
    serious: bool,
    medication: Option<&str>,
    at: DateTime<Utc>,
) -> Result<Claim, ClaimError> {
    let mut evidence = Evidence::new()
        .with_tool("tool:AEParser")
        .with_entity(format!("text:{term}"))
        .with_entity(format!("serious:{}", if serious { "Yes" } else { "No" }))
        .generated_at(at);
    if let Some(med) = medication.filter(|m| !m.trim().is_empty()) {
        evidence = evidence.with_entity(format!("med:{med}"));
    }
    let claim = Claim::builder(problems::SAFETY_TEAE)
        .with_measurement(Measurement::new(metrics::TEAE_EVENT_COUNT, 1.0, "events"))
        .with_policy(CollapsePolicy::new(2, 0.8)?)
        .with_evidence(evidence)
        .build()?;
    Ok(claim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CollapseObservation, CollapseProtocol};
    use fot_readiness::{image_readiness, summarize, ReadinessVerdict};
    use serde_json::json;

    #[test]
    fn confirmatory_claim_records_delta() {
        let claim = confirmatory_claim(-0.72, -0.74, Some(0.05), Utc::now()).unwrap();
        assert!(!claim.is_collapsed());
        let delta = claim.measurement(metrics::AGREEMENT_DELTA).unwrap().value;
        assert!((delta - 0.02).abs() < 1e-12);
        assert_eq!(claim.policy.alpha_spent, Some(0.025));

        let mut claim = claim;
        let obs = CollapseObservation::from_claim(&claim);
        assert!(CollapseProtocol.attempt_collapse(&mut claim, &obs).unwrap());
    }

    #[test]
    fn failing_gate_emits_near_miss() {
        let fields = json!({ "modality": "MR" });
        let report = image_readiness(fields.as_object().unwrap());
        assert!(!report.ready);
        let claim = claim_from_gate_report(&report, "{\"modality\":\"MR\"}", Utc::now()).unwrap();
        assert_eq!(claim.verdict, Some(Verdict::NearMiss));
        assert_eq!(claim.reason.as_deref(), Some(GATE_NEAR_MISS_REASON));
        assert_eq!(claim.measurement(metrics::READINESS_SCORE).unwrap().value, 0.0);
        assert_eq!(claim.policy.agreement_delta_max, Some(0.02));
        assert_eq!(claim.evidence.used_entity, vec!["payload:17".to_string()]);
    }

    #[test]
    fn passing_gate_has_no_verdict() {
        let report = GateReport {
            ready: true,
            missing: Vec::new(),
            warnings: Vec::new(),
        };
        let claim = claim_from_gate_report(&report, "{}", Utc::now()).unwrap();
        assert_eq!(claim.verdict, None);
        assert_eq!(claim.measurement(metrics::READINESS_SCORE).unwrap().value, 1.0);
    }

    #[test]
    fn readiness_summary_claim() {
        let verdicts: Vec<ReadinessVerdict> = Vec::new();
        let summary = summarize(&verdicts);
        let claim = claim_from_readiness(&summary).unwrap();
        assert_eq!(claim.addresses_problem, problems::DATA_READINESS);
        assert_eq!(claim.verdict, Some(Verdict::NearMiss));
    }

    #[test]
    fn adverse_event_skips_blank_medication() {
        let claim = adverse_event_claim("Headache, mild", false, Some("  "), Utc::now()).unwrap();
        assert_eq!(claim.evidence.used_entity.len(), 2);
        assert_eq!(claim.policy.min_completeness, 0.8);
        assert_eq!(claim.measurement(metrics::TEAE_EVENT_COUNT).unwrap().value, 1.0);
    }
}
