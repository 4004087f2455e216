use super::{creatinine, has_contrast_allergy, mentions_chest_pain, TrackScorer, TrackValidator};
use crate::error::ReadinessError;
use crate::record::RecordMap;
use crate::types::{DataGap, GapSeverity, ValidationTrack};
use serde_json::Value;

/// Prior workup and the planned diagnostic tests, screened for
/// contraindications and for missing cardiac markers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NextDiagnosticStepTrack;

impl TrackValidator for NextDiagnosticStepTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::NextDiagnosticStep
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        if record.is_present("previous_tests") {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new(
                    "previous_tests",
                    "No previous diagnostic tests documented",
                    GapSeverity::Medium,
                )
                .with_example("['EKG', 'Chest X-ray', 'Troponin']"),
            );
        }

        let plan: Vec<&str> = record
            .list("diagnostic_plan")?
            .map(|tests| tests.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        if record.is_present("diagnostic_plan") {
            scorer.credit(0.3);
        } else {
            scorer.gap(
                DataGap::new("diagnostic_plan", "No diagnostic plan provided", GapSeverity::High)
                    .with_example("['EKG', 'Chest X-ray', 'Troponin', 'Echocardiogram']"),
            );
        }

        let plans = |needle: &str| plan.iter().any(|t| t.to_lowercase().contains(needle));

        if has_contrast_allergy(record)?
            && (plan.iter().any(|t| t.contains("CT")) || plans("angiography"))
        {
            scorer.warn(
                "Patient allergic to contrast dye - CT with contrast contraindicated",
                "Consider non-contrast CT or alternative imaging",
            );
        }

        if creatinine(record)?.is_some_and(|c| c > 1.5) && plans("contrast") {
            scorer.warn(
                "Elevated creatinine - contrast administration risky",
                "Consider alternative imaging or pre-hydration",
            );
        }

        if mentions_chest_pain(record) && !plans("troponin") {
            scorer.warn(
                "Chest pain without troponin - consider cardiac workup",
                "Add troponin to diagnostic plan",
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadinessConfig;
    use crate::types::ReadinessVerdict;
    use serde_json::json;

    fn run(value: Value) -> ReadinessVerdict {
        let record = RecordMap::from_value(value).unwrap();
        let mut scorer = TrackScorer::new();
        NextDiagnosticStepTrack.assess(&record, &mut scorer).unwrap();
        scorer.finish(ValidationTrack::NextDiagnosticStep, &ReadinessConfig::default())
    }

    #[test]
    fn contrast_allergy_with_ct_plan() {
        let v = run(json!({
            "allergies": ["Contrast_Dye"],
            "previous_tests": ["EKG"],
            "diagnostic_plan": ["CT angiography with contrast"],
        }));
        assert!((v.score - 0.5).abs() < 1e-9);
        assert_eq!(
            v.warnings[0],
            "Patient allergic to contrast dye - CT with contrast contraindicated"
        );
    }

    #[test]
    fn renal_risk_with_contrast() {
        let v = run(json!({
            "laboratory": {"creatinine": 2.1},
            "diagnostic_plan": ["Contrast echo", "Troponin"],
        }));
        assert_eq!(v.warnings, vec!["Elevated creatinine - contrast administration risky"]);
    }

    #[test]
    fn chest_pain_needs_troponin() {
        let v = run(json!({
            "chief_complaint": "Crushing chest pain",
            "diagnostic_plan": ["EKG"],
        }));
        assert_eq!(v.recommendations, vec!["Add troponin to diagnostic plan"]);
    }
}
