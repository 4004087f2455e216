//! E2E: the engine runs a full case through validation, encoding, scoring
//! and claim emission.

use fot_claims::{ClaimRepository, InMemoryClaimRepository};
use fot_engine::{ClinicalEngine, EngineConfig};
use fot_hypothesis::{EncoderConfig, HypothesisStatus};
use fot_readiness::{ReadinessStatus, ValidationTrack};
use fot_tests::chest_pain_record;

fn engine(seed: u64) -> ClinicalEngine {
    let mut config = EngineConfig::default().with_seed(seed);
    config.encoder = EncoderConfig::default().with_dimension(128);
    ClinicalEngine::new(config).unwrap()
}

#[test]
fn complete_case_reaches_ready_on_vitals_and_triage() {
    let repo = InMemoryClaimRepository::new();
    let report = engine(5).assess(&chest_pain_record(), &repo).unwrap();

    let status_of = |track: ValidationTrack| {
        report
            .verdicts
            .iter()
            .find(|v| v.track == track)
            .map(|v| v.status)
            .unwrap()
    };
    assert_eq!(status_of(ValidationTrack::TriageAssessment), ReadinessStatus::Ready);
    assert_eq!(status_of(ValidationTrack::VitalSignsMonitoring), ReadinessStatus::Ready);
    assert!(report.verdicts.iter().all(|v| (0.0..=1.0).contains(&v.score)));

    assert_eq!(report.case_id, "ed-chest-001");
    assert!(report.judgment.verify_hash());
    assert_eq!(repo.list().unwrap().len(), report.claims.len());
}

#[test]
fn harm_indicator_forces_superposed() {
    let mut config = EngineConfig::default().with_seed(9);
    config.encoder = EncoderConfig::default().with_dimension(128);
    config.context = config.context.with_harm_indicator("contraindicated_thrombolysis");
    let engine = ClinicalEngine::new(config).unwrap();

    let repo = InMemoryClaimRepository::new();
    let report = engine.assess(&chest_pain_record(), &repo).unwrap();
    assert!(report.judgment.vetoed);
    assert_eq!(report.judgment.scores.non_maleficence, 0.0);
    assert_eq!(report.judgment.status, HypothesisStatus::Superposed);
}

#[test]
fn same_seed_same_judgment() {
    let repo = InMemoryClaimRepository::new();
    let a = engine(21).assess_with_steps(&chest_pain_record(), 3, &repo).unwrap();
    let b = engine(21).assess_with_steps(&chest_pain_record(), 3, &repo).unwrap();

    assert_eq!(a.judgment.status, b.judgment.status);
    assert_eq!(a.judgment.probability, b.judgment.probability);
    assert_eq!(a.judgment.dominant_index, b.judgment.dominant_index);
    assert_eq!(a.total_probability, b.total_probability);
}
