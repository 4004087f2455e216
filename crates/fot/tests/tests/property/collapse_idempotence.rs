//! Property tests: collapse is monotone and idempotent.

use chrono::Utc;
use fot_claims::{confirmatory_claim, toolchain_agreement, CollapseObservation, CollapseProtocol};
use proptest::prelude::*;

proptest! {
    /// Applying the protocol twice leaves the same flag as applying it once.
    #[test]
    fn attempt_collapse_is_idempotent(
        a in -2.0f64..2.0,
        b in -2.0f64..2.0,
        tolerance in prop::option::of(0.0f64..0.5),
    ) {
        let protocol = CollapseProtocol::new();
        let observation = CollapseObservation::from_estimates(a, b);

        let mut once = confirmatory_claim(a, b, tolerance, Utc::now()).unwrap();
        let first = protocol.attempt_collapse(&mut once, &observation).unwrap();

        let mut twice = once.clone();
        let second = protocol.attempt_collapse(&mut twice, &observation).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(once.is_collapsed(), twice.is_collapsed());
        prop_assert_eq!(first, toolchain_agreement((a - b).abs(), tolerance));
    }

    /// A collapsed claim never reopens, whatever is observed later.
    #[test]
    fn collapsed_claims_stay_collapsed(later_delta in 0.0f64..10.0) {
        let protocol = CollapseProtocol::new();
        let mut claim = confirmatory_claim(1.0, 1.0, Some(0.05), Utc::now()).unwrap();
        prop_assert!(protocol.attempt_collapse_with_estimates(&mut claim, 1.0, 1.0).unwrap());

        let later = CollapseObservation::new().with_agreement_delta(later_delta);
        prop_assert!(protocol.attempt_collapse(&mut claim, &later).unwrap());
        prop_assert!(claim.is_collapsed());
    }
}
