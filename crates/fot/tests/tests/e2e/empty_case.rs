//! E2E: a case with no data encodes to a zero state and fails every track.

use fot_hypothesis::{
    measure, ClinicalContext, ClinicalRecord, Encoder, EncoderConfig, Observable,
    VirtueAggregator,
};
use fot_readiness::{summarize, OverallStatus, ReadinessStatus, ReadinessValidator, ValidationTrack};
use fot_tests::empty_record;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn empty_record_encodes_to_zero_state() {
    let encoder = Encoder::new(
        EncoderConfig::default()
            .with_dimension(64)
            .with_differentials(std::iter::empty::<&str>()),
    )
    .unwrap();
    let record = ClinicalRecord::from_json(&empty_record());
    let state = encoder.encode_with_rng(&record, &mut StdRng::seed_from_u64(1));

    assert!(state.is_zero());
    assert_eq!(state.norm(), 0.0);
    assert_eq!(state.decoherence_rate, 0.0);

    let judgment = VirtueAggregator::default().score(&state, &ClinicalContext::default());
    assert_eq!(judgment.probability, 0.0);
    assert_eq!(judgment.phase, 0.0);
    assert!(judgment.uncertainty.is_none());
    assert_eq!(measure(&state, Observable::DominantConfidence).value, 0.0);
    assert_eq!(measure(&state, Observable::ActiveHypothesisCount).value, 0.0);
}

#[test]
fn empty_record_fails_every_track() {
    let verdicts = ReadinessValidator::default().validate_value(&empty_record());

    assert_eq!(verdicts.len(), ValidationTrack::ALL.len());
    for verdict in &verdicts {
        assert_eq!(verdict.status, ReadinessStatus::NotReady, "{}", verdict.track);
        assert!(!verdict.gaps.is_empty(), "{} reported no gaps", verdict.track);
    }

    let summary = summarize(&verdicts);
    assert_eq!(summary.status, OverallStatus::NotReady);
    assert_eq!(summary.not_ready_tracks.len(), 7);
    assert!(summary.ready_tracks.is_empty());
}

#[test]
fn non_object_record_fails_loudly() {
    let verdicts = ReadinessValidator::default().validate_value(&serde_json::json!("not a record"));
    assert!(verdicts
        .iter()
        .all(|v| v.gaps.iter().any(|g| g.field == "validation_error")));
}
