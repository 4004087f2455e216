use super::{creatinine, has_contrast_allergy, TrackScorer, TrackValidator};
use crate::error::ReadinessError;
use crate::record::RecordMap;
use crate::types::{DataGap, GapSeverity, ValidationTrack};
use serde_json::Value;

const REQUIRED: [(&str, &str); 3] = [("modality", "CT"), ("bodySite", "chest"), ("contrast", "yes")];

/// Imaging study description, patient preparation and contrast safety.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImagingReadinessTrack;

impl TrackValidator for ImagingReadinessTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::ImagingReadiness
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        let study = record.object("imaging_study")?.filter(|s| !s.is_empty());
        match study {
            None => scorer.gap(
                DataGap::new(
                    "imaging_study",
                    "No imaging study information provided",
                    GapSeverity::High,
                )
                .with_example("{'modality': 'CT', 'bodySite': 'chest', 'contrast': 'yes'}"),
            ),
            Some(study) => {
                scorer.credit(0.4);
                for (field, example) in REQUIRED {
                    if !study.contains_key(field) {
                        scorer.gap(
                            DataGap::new(
                                format!("imaging_study.{field}"),
                                format!("Missing imaging field: {field}"),
                                GapSeverity::High,
                            )
                            .with_example(example),
                        );
                    }
                }
            }
        }

        if record.object("patient_preparation")?.is_some_and(|p| !p.is_empty()) {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new(
                    "patient_preparation",
                    "No patient preparation information",
                    GapSeverity::Medium,
                )
                .with_example("{'npo': '4 hours', 'medications': 'hold metformin'}"),
            );
        }

        let with_contrast = study
            .and_then(|s| s.get("contrast"))
            .and_then(Value::as_str)
            .is_some_and(|c| c.eq_ignore_ascii_case("yes"));

        if with_contrast && has_contrast_allergy(record)? {
            scorer.warn(
                "Contrast allergy - imaging contraindicated",
                "Consider non-contrast imaging or pre-medication",
            );
        }
        if with_contrast && creatinine(record)?.is_some_and(|c| c > 1.5) {
            scorer.warn(
                "Elevated creatinine - contrast risky",
                "Consider alternative imaging or pre-hydration",
            );
        }

        Ok(())
    }
}
