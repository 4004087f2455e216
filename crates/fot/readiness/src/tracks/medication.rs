use super::{TrackScorer, TrackValidator};
use crate::error::ReadinessError;
use crate::record::{is_truthy, Numeric, RecordMap};
use crate::types::{DataGap, GapSeverity, ValidationTrack};
use serde_json::Value;

/// Medication → allergy substrings that interact with it.
const INTERACTIONS: [(&str, &[&str]); 3] = [
    ("warfarin", &["aspirin", "ibuprofen"]),
    ("digoxin", &["furosemide"]),
    ("metformin", &["contrast_dye"]),
];

const MED_EXAMPLE: &str = "{'name': 'Aspirin', 'dose': '81mg', 'frequency': 'daily'}";

/// Medication list and allergy completeness, plus interaction screening.
#[derive(Clone, Copy, Debug, Default)]
pub struct MedicationSafetyTrack;

impl TrackValidator for MedicationSafetyTrack {
    fn track(&self) -> ValidationTrack {
        ValidationTrack::MedicationSafety
    }

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError> {
        let medications = record.list("medications")?.filter(|m| !m.is_empty());
        match medications {
            None => scorer.gap(
                DataGap::new("medications", "No medication list provided", GapSeverity::High)
                    .with_example(format!("[{MED_EXAMPLE}]")),
            ),
            Some(meds) => {
                scorer.credit(0.3);
                for (i, med) in meds.iter().enumerate() {
                    check_entry(i, med, scorer);
                }
            }
        }

        let allergies = record.string_list_lower("allergies")?;
        if record.is_present("allergies") {
            scorer.credit(0.2);
        } else {
            scorer.gap(
                DataGap::new("allergies", "No allergy information provided", GapSeverity::High)
                    .with_example("['Penicillin', 'Shellfish']"),
            );
        }

        let med_names: Vec<String> = medications
            .into_iter()
            .flatten()
            .filter_map(|m| m.get("name").and_then(Value::as_str))
            .map(str::to_lowercase)
            .collect();

        for med in &med_names {
            let Some((_, agents)) = INTERACTIONS.iter().find(|(name, _)| *name == med.as_str()) else {
                continue;
            };
            for agent in *agents {
                if allergies.iter().any(|a| a.contains(agent)) {
                    scorer.warn(
                        format!("Potential interaction: {med} with {agent}"),
                        format!("Review {med} dosing with {agent} allergy"),
                    );
                }
            }
        }

        let age = match record.numeric("age") {
            Numeric::Value(age) => age,
            Numeric::Absent => 0.0,
            Numeric::Malformed => {
                scorer.gap(
                    DataGap::new("age", "Age is not numeric", GapSeverity::Low).with_example("65"),
                );
                0.0
            }
        };
        if age > 65.0 && med_names.iter().any(|m| m.contains("warfarin")) {
            scorer.warn(
                "Elderly patient on warfarin - monitor INR closely",
                "Consider dose adjustment based on INR",
            );
        }

        Ok(())
    }
}

fn check_entry(index: usize, med: &Value, scorer: &mut TrackScorer) {
    let Some(entry) = med.as_object() else {
        scorer.gap(
            DataGap::new(
                format!("medications[{index}]"),
                "Medication should be an object with name, dose, frequency",
                GapSeverity::Medium,
            )
            .with_example(MED_EXAMPLE),
        );
        return;
    };
    if !is_truthy(entry.get("name")) {
        scorer.gap(
            DataGap::new(
                format!("medications[{index}].name"),
                "Medication name missing",
                GapSeverity::Medium,
            )
            .with_example("Aspirin"),
        );
    }
    if !is_truthy(entry.get("dose")) {
        scorer.gap(
            DataGap::new(
                format!("medications[{index}].dose"),
                "Medication dose missing",
                GapSeverity::Medium,
            )
            .with_example("81mg"),
        );
    }
}
