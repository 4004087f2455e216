use super::{mentions_chest_pain, TrackScorer, TrackValidator};
use crate::error::ReadinessError;
use crate::record::{Numeric, RecordMap};
use crate::types::{DataGap, GapSeverity, ValidationTrack};

/// Analyte → (low, high) outside which a value is critical.
const CRITICAL_RANGES: [(&str, f64, f64); 5] = [
    ("glucose", 50.0, 400.0),
    ("creatinine", 0.5, 3.0),
    ("troponin", 0.0, 0.04),
    ("potassium", 3.0, 6.0),
    ("sodium", 130.0, 150.0),
];

/// Laboratory panel presence, critical values and collection timing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaboratoryAnalysisTrack;

impl TrackValidator for LaboratoryAnalysisTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::LaboratoryAnalysis
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        let labs = record.object("laboratory")?.filter(|l| !l.is_empty());
        match labs {
            None => scorer.gap(
                DataGap::new("laboratory", "No laboratory results provided", GapSeverity::High)
                    .with_example("{'glucose': 120, 'creatinine': 1.0, 'troponin': 0.01}"),
            ),
            Some(labs) => {
                scorer.credit(0.4);
                for (test, low, high) in CRITICAL_RANGES {
                    match Numeric::read(labs.get(test)) {
                        Numeric::Value(v) if v < low || v > high => scorer.warn(
                            format!("Critical {test}: {v} (normal: {low}-{high})"),
                            format!("Monitor {test} closely"),
                        ),
                        Numeric::Malformed => scorer.gap(DataGap::new(
                            format!("laboratory.{test}"),
                            format!("Laboratory value is not numeric: {test}"),
                            GapSeverity::Medium,
                        )),
                        _ => {}
                    }
                }
            }
        }

        if record.object("test_timing")?.is_some_and(|t| !t.is_empty()) {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new("test_timing", "No test timing information", GapSeverity::Medium)
                    .with_example("{'collection_time': '2024-01-15T10:30:00Z', 'fasting': 'yes'}"),
            );
        }

        let has_troponin = labs.is_some_and(|l| l.contains_key("troponin"));
        if mentions_chest_pain(record) && !has_troponin {
            scorer.warn(
                "Chest pain without troponin - consider cardiac workup",
                "Add troponin to laboratory panel",
            );
        }

        Ok(())
    }
}
