//! E2E: twin-toolchain confirmatory claims collapse only when the
//! estimates agree within the declared tolerance.

use chrono::Utc;
use fot_claims::{
    confirmatory_claim, ClaimRepository, CollapseDecision, CollapseObservation,
    CollapseProtocol, InMemoryClaimRepository, TrialPhase, TrialState,
};

#[test]
fn estimates_within_tolerance_collapse() {
    let mut claim = confirmatory_claim(-0.72, -0.74, Some(0.05), Utc::now()).unwrap();
    let collapsed = CollapseProtocol::new()
        .attempt_collapse_with_estimates(&mut claim, -0.72, -0.74)
        .unwrap();

    assert!(collapsed);
    assert!(claim.is_collapsed());
}

#[test]
fn estimates_outside_tolerance_stay_open() {
    let mut claim = confirmatory_claim(-0.72, -0.74, Some(0.01), Utc::now()).unwrap();
    let collapsed = CollapseProtocol::new()
        .attempt_collapse_with_estimates(&mut claim, -0.72, -0.74)
        .unwrap();

    assert!(!collapsed);
    assert!(!claim.is_collapsed());
    assert!(claim.verdict.is_none());
}

#[test]
fn stored_claims_drive_trial_state() {
    let repo = InMemoryClaimRepository::new();
    let protocol = CollapseProtocol::new();

    let agreed = repo
        .append(confirmatory_claim(-0.72, -0.74, Some(0.05), Utc::now()).unwrap())
        .unwrap();
    let disputed = repo
        .append(confirmatory_claim(-0.72, -0.74, Some(0.01), Utc::now()).unwrap())
        .unwrap();

    for id in [&agreed, &disputed] {
        let claim = repo.get(id).unwrap().unwrap();
        let observation = CollapseObservation::from_claim(&claim);
        protocol.attempt_in(&repo, id, &observation).unwrap();
    }

    let disputed_claim = repo.get(&disputed).unwrap().unwrap();
    let decision = protocol
        .evaluate(&disputed_claim, &CollapseObservation::from_claim(&disputed_claim))
        .unwrap();
    assert!(matches!(decision, CollapseDecision::Rejected { .. }));

    let mut trial = TrialState::new("CAND-001", "Type 2 diabetes", TrialPhase::PhaseIII).unwrap();
    trial.refresh_from(&repo.list().unwrap());
    assert_eq!(trial.collapsed_claims, 1);
    assert_eq!(trial.replication_count, 1);
}
