use super::{TrackScorer, TrackValidator};
use crate::error::ReadinessError;
use crate::record::RecordMap;
use crate::types::{DataGap, GapSeverity, ValidationTrack};
use serde_json::Value;

const REQUIRED: [(&str, &str); 3] = [
    ("modality", "heart_sounds"),
    ("duration", "30s"),
    ("quality", "good"),
];

/// Auscultation recording description, positioning and environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioReadinessTrack;

impl TrackValidator for AudioReadinessTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::AudioReadiness
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        let study = record.object("audio_study")?.filter(|s| !s.is_empty());
        match study {
            None => scorer.gap(
                DataGap::new(
                    "audio_study",
                    "No audio study information provided",
                    GapSeverity::High,
                )
                .with_example("{'modality': 'heart_sounds', 'duration': '30s', 'quality': 'good'}"),
            ),
            Some(study) => {
                scorer.credit(0.4);
                for (field, example) in REQUIRED {
                    if !study.contains_key(field) {
                        scorer.gap(
                            DataGap::new(
                                format!("audio_study.{field}"),
                                format!("Missing audio field: {field}"),
                                GapSeverity::High,
                            )
                            .with_example(example),
                        );
                    }
                }
            }
        }

        if record.object("patient_positioning")?.is_some_and(|p| !p.is_empty()) {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new(
                    "patient_positioning",
                    "No patient positioning information",
                    GapSeverity::Medium,
                )
                .with_example("{'position': 'supine', 'quiet_room': 'yes'}"),
            );
        }

        if record.object("environment")?.is_some_and(|e| !e.is_empty()) {
            scorer.credit(0.1);
        } else {
            scorer.gap(
                DataGap::new("environment", "No environmental information", GapSeverity::Low)
                    .with_example("{'noise_level': 'low', 'temperature': 'comfortable'}"),
            );
        }

        let poor = study
            .and_then(|s| s.get("quality"))
            .and_then(Value::as_str)
            .is_some_and(|q| q.eq_ignore_ascii_case("poor"));
        if poor {
            scorer.warn(
                "Poor audio quality may affect analysis",
                "Re-record with better positioning and environment",
            );
        }

        Ok(())
    }
}
