use super::{check_abnormal_vitals, check_required_vitals, TrackScorer, TrackValidator, VitalAdvice};
use crate::error::ReadinessError;
use crate::record::RecordMap;
use crate::types::{DataGap, GapSeverity, ValidationTrack};

const ADVICE: VitalAdvice = VitalAdvice {
    blood_pressure: "Increase monitoring frequency",
    heart_rate: "Consider continuous cardiac monitoring",
    respiratory_rate: "Monitor respiratory status closely",
    temperature: "Monitor for infection or hypothermia",
};

/// Vital signs, their trends and the monitoring schedule.
#[derive(Clone, Copy, Debug, Default)]
pub struct VitalSignsMonitoringTrack;

impl TrackValidator for VitalSignsMonitoringTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::VitalSignsMonitoring
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        let vitals = record.object("vital_signs")?.filter(|v| !v.is_empty());
        match vitals {
            None => scorer.gap(
                DataGap::new("vital_signs", "No vital signs provided", GapSeverity::Critical)
                    .with_example("{'systolic_bp': 120, 'diastolic_bp': 80, 'heart_rate': 70}"),
            ),
            Some(vitals) => {
                scorer.credit(0.5);
                check_required_vitals(vitals, scorer);
            }
        }

        if record.object("vital_trends")?.is_some_and(|t| !t.is_empty()) {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new("vital_trends", "No vital signs trends provided", GapSeverity::Medium)
                    .with_example("{'systolic_bp_trend': 'stable', 'heart_rate_trend': 'increasing'}"),
            );
        }

        if record.is_present("monitoring_frequency") {
            scorer.credit(0.1);
        } else {
            scorer.gap(
                DataGap::new(
                    "monitoring_frequency",
                    "No monitoring frequency specified",
                    GapSeverity::Medium,
                )
                .with_example("every 15 minutes"),
            );
        }

        if let Some(vitals) = vitals {
            check_abnormal_vitals(vitals, scorer, &ADVICE);
        }

        Ok(())
    }
}
