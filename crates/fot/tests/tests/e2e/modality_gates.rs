//! E2E: image and audio acquisition gates feed endpoint-readiness claims.

use chrono::Utc;
use fot_claims::{claim_from_gate_report, ClaimRepository, InMemoryClaimRepository};
use fot_readiness::{audio_readiness, image_readiness};
use fot_tests::{clean_audio_recording, image_study_with_phi};
use fot_types::Verdict;

#[test]
fn image_without_dimensions_and_with_phi_is_blocked() {
    let study = image_study_with_phi();
    let report = image_readiness(study.as_object().unwrap());

    assert!(!report.ready);
    assert!(report.missing.iter().any(|m| m == "widthPx"));
    assert!(report.missing.iter().any(|m| m == "heightPx"));
    // absent dimensions read as zero, so the size check fires instead
    assert!(!report.missing.iter().any(|m| m == "widthPx/heightPx integers"));
    assert!(report.warning_messages().contains(&"shortest side < 512px"));
    assert!(report
        .blocking_warnings()
        .any(|w| w.message.contains("PHI")));

    let repo = InMemoryClaimRepository::new();
    let claim = claim_from_gate_report(&report, &study.to_string(), Utc::now()).unwrap();
    repo.append(claim).unwrap();
    let stored = repo.by_problem("fcl:Endpoint_Readiness").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].verdict, Some(Verdict::NearMiss));
    assert!(!stored[0].is_collapsed());
}

#[test]
fn clean_audio_passes() {
    let report = audio_readiness(clean_audio_recording().as_object().unwrap());
    assert!(report.ready, "missing {:?}, warnings {:?}", report.missing, report.warning_messages());
    assert!(report.warnings.is_empty());
}

#[test]
fn advisory_audio_warnings_do_not_block() {
    let mut signal = clean_audio_recording();
    signal["channels"] = 2.into();
    signal["calibrationPassed"] = false.into();
    let report = audio_readiness(signal.as_object().unwrap());

    assert!(report.ready);
    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.blocking_warnings().count(), 0);
}

#[test]
fn low_sample_rate_blocks_audio() {
    let mut signal = clean_audio_recording();
    signal["sampleRateHz"] = 2000.into();
    let report = audio_readiness(signal.as_object().unwrap());
    assert!(!report.ready);
    assert!(report.warning_messages().contains(&"sampleRateHz < 4000"));
}
