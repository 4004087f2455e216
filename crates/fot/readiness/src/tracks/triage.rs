use super::{check_abnormal_vitals, check_required_vitals, TrackScorer, TrackValidator, VitalAdvice};
use crate::error::ReadinessError;
use crate::record::RecordMap;
use crate::types::{DataGap, GapSeverity, ValidationTrack};

const ADVICE: VitalAdvice = VitalAdvice {
    blood_pressure: "Monitor blood pressure closely",
    heart_rate: "Consider cardiac monitoring",
    respiratory_rate: "Monitor respiratory status",
    temperature: "Monitor for infection or hypothermia",
};

/// Chief complaint, vitals and symptoms needed to triage a patient.
#[derive(Clone, Copy, Debug, Default)]
pub struct TriageAssessmentTrack;

impl TrackValidator for TriageAssessmentTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::TriageAssessment
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        if record.is_present("chief_complaint") {
            scorer.credit(0.3);
        } else {
            scorer.gap(
                DataGap::new(
                    "chief_complaint",
                    "No chief complaint provided",
                    GapSeverity::Critical,
                )
                .with_example("chest pain"),
            );
        }

        let empty = serde_json::Map::new();
        let vitals = record.object("vital_signs")?.unwrap_or(&empty);
        let present = check_required_vitals(vitals, scorer);
        scorer.credit(0.1 * present as f64);
        if !vitals.is_empty() {
            check_abnormal_vitals(vitals, scorer, &ADVICE);
        }

        if record.is_present("symptoms") {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new("symptoms", "No symptom information provided", GapSeverity::High)
                    .with_example("{'chest_pain': {'intensity': 0.8, 'quality': 'crushing'}}"),
            );
        }

        Ok(())
    }
}
