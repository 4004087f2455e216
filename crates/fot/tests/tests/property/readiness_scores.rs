//! Property tests: every track scores inside [0, 1] and its status is a
//! function of score against the configured minimum.

use fot_readiness::{ReadinessConfig, ReadinessStatus, ReadinessValidator};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A JSON leaf of any shape, so malformed fields are exercised too.
fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-50.0f64..300.0).prop_map(|v| json!(v)),
        "[a-z ]{0,12}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,8}", 0..3).prop_map(|v| json!(v)),
    ]
}

fn arb_vitals() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(
        prop_oneof![
            Just("systolic_bp".to_string()),
            Just("diastolic_bp".to_string()),
            Just("heart_rate".to_string()),
            Just("respiratory_rate".to_string()),
            Just("temperature_c".to_string()),
        ],
        prop_oneof![(20.0f64..220.0).prop_map(|v| json!(v)), arb_leaf()],
        0..5,
    )
    .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_record() -> impl Strategy<Value = Value> {
    let keys = prop_oneof![
        Just("chief_complaint"),
        Just("symptoms"),
        Just("age"),
        Just("allergies"),
        Just("medications"),
        Just("previous_tests"),
        Just("diagnostic_plan"),
        Just("imaging_study"),
        Just("audio_study"),
        Just("laboratory"),
        Just("test_timing"),
        Just("monitoring_frequency"),
        Just("vital_trends"),
    ];
    (
        prop::collection::vec((keys, arb_leaf()), 0..10),
        prop::option::of(arb_vitals()),
    )
        .prop_map(|(fields, vitals)| {
            let mut record = Map::new();
            for (key, value) in fields {
                record.insert(key.to_string(), value);
            }
            if let Some(vitals) = vitals {
                record.insert("vital_signs".into(), vitals);
            }
            Value::Object(record)
        })
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scores_bounded_and_status_monotonic(record in arb_record()) {
        let config = ReadinessConfig::default();
        let validator = ReadinessValidator::new(config.clone());

        for verdict in validator.validate_value(&record) {
            prop_assert!((0.0..=1.0).contains(&verdict.score), "{}: {}", verdict.track, verdict.score);
            let min = config.minimums.get(verdict.track);
            prop_assert_eq!(verdict.minimum, min);
            let expected = if verdict.score >= min {
                ReadinessStatus::Ready
            } else if verdict.score >= config.near_miss_factor * min {
                ReadinessStatus::NearMiss
            } else {
                ReadinessStatus::NotReady
            };
            prop_assert_eq!(verdict.status, expected);
        }
    }

    /// Validation is a pure function of the record.
    #[test]
    fn validation_is_repeatable(record in arb_record()) {
        let validator = ReadinessValidator::default();
        prop_assert_eq!(validator.validate_value(&record), validator.validate_value(&record));
    }
}
