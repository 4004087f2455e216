//! Built-in readiness tracks.
//!
//! Every track follows the same shape: credit each section that is present,
//! record a [`DataGap`] for each one that is missing, then run cross-field
//! checks that only add warnings and recommendations. [`TrackScorer::finish`]
//! applies the per-gap penalty and classifies the result.

mod audio;
mod imaging;
mod laboratory;
mod medication;
mod next_step;
mod triage;
mod vital_signs;

pub use audio::AudioReadinessTrack;
pub use imaging::ImagingReadinessTrack;
pub use laboratory::LaboratoryAnalysisTrack;
pub use medication::MedicationSafetyTrack;
pub use next_step::NextDiagnosticStepTrack;
pub use triage::TriageAssessmentTrack;
pub use vital_signs::VitalSignsMonitoringTrack;

use crate::config::ReadinessConfig;
use crate::error::ReadinessError;
use crate::record::{Numeric, RecordMap};
use crate::types::{DataGap, GapSeverity, ReadinessStatus, ReadinessVerdict, ValidationTrack};
use serde_json::{Map, Value};

/// One independently scored readiness track.
///
/// Implementations must not fail on missing or malformed data; those become
/// gaps. An `Err` means a record section had an unusable shape and turns the
/// whole track NOT_READY.
pub trait TrackValidator: Send + Sync {
    fn track(&self) -> ValidationTrack;

    fn assess(&self, record: &RecordMap, scorer: &mut TrackScorer) -> Result<(), ReadinessError>;
}

/// The seven built-in tracks, in [`ValidationTrack::ALL`] order.
pub fn builtin() -> Vec<Box<dyn TrackValidator>> {
    vec![
        Box::new(MedicationSafetyTrack),
        Box::new(TriageAssessmentTrack),
        Box::new(NextDiagnosticStepTrack),
        Box::new(ImagingReadinessTrack),
        Box::new(AudioReadinessTrack),
        Box::new(LaboratoryAnalysisTrack),
        Box::new(VitalSignsMonitoringTrack),
    ]
}

/// Accumulates score, gaps, warnings and recommendations for one track.
#[derive(Clone, Debug, Default)]
pub struct TrackScorer {
    score: f64,
    gaps: Vec<DataGap>,
    warnings: Vec<String>,
    recommendations: Vec<String>,
}

impl TrackScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, amount: f64) {
        self.score += amount;
    }

    pub fn gap(&mut self, gap: DataGap) {
        self.gaps.push(gap);
    }

    /// Record a warning together with the recommendation that answers it.
    pub fn warn(&mut self, warning: impl Into<String>, recommendation: impl Into<String>) {
        self.warnings.push(warning.into());
        self.recommendations.push(recommendation.into());
    }

    /// Score before gap penalties.
    pub fn raw_score(&self) -> f64 {
        self.score
    }

    pub fn gaps(&self) -> &[DataGap] {
        &self.gaps
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Apply the gap penalty, clamp into `[0, 1]` and classify.
    pub fn finish(self, track: ValidationTrack, config: &ReadinessConfig) -> ReadinessVerdict {
        let penalty = self.gaps.len() as f64 * config.gap_penalty;
        let score = (self.score - penalty).clamp(0.0, 1.0);
        let minimum = config.minimums.get(track);

        ReadinessVerdict {
            track,
            status: ReadinessStatus::classify(score, minimum, config.near_miss_factor),
            score,
            minimum,
            gaps: self.gaps,
            warnings: self.warnings,
            recommendations: self.recommendations,
        }
    }
}

/// Vital signs every complete record carries.
pub(crate) const REQUIRED_VITALS: [&str; 5] = [
    "systolic_bp",
    "diastolic_bp",
    "heart_rate",
    "respiratory_rate",
    "temperature_c",
];

fn vital_example(vital: &str) -> &'static str {
    if vital == "temperature_c" {
        "37.0"
    } else {
        "120"
    }
}

/// Record a high-severity gap per missing required vital and a medium one per
/// non-numeric vital. Returns how many were usable numbers.
pub(crate) fn check_required_vitals(vitals: &Map<String, Value>, scorer: &mut TrackScorer) -> usize {
    let mut usable = 0;
    for vital in REQUIRED_VITALS {
        match Numeric::read(vitals.get(vital)) {
            Numeric::Value(_) => usable += 1,
            Numeric::Malformed => {
                vital_value(vitals, vital, scorer);
            }
            Numeric::Absent => scorer.gap(
                DataGap::new(
                    format!("vital_signs.{vital}"),
                    format!("Missing vital sign: {vital}"),
                    GapSeverity::High,
                )
                .with_example(vital_example(vital)),
            ),
        }
    }
    usable
}

/// Recommendations attached to each abnormal-vital warning.
pub(crate) struct VitalAdvice {
    pub blood_pressure: &'static str,
    pub heart_rate: &'static str,
    pub respiratory_rate: &'static str,
    pub temperature: &'static str,
}

/// Read one vital as a number. A non-numeric value is recorded as a gap.
pub(crate) fn vital_value(
    vitals: &Map<String, Value>,
    vital: &str,
    scorer: &mut TrackScorer,
) -> Option<f64> {
    match Numeric::read(vitals.get(vital)) {
        Numeric::Value(v) => Some(v),
        Numeric::Absent => None,
        Numeric::Malformed => {
            scorer.gap(
                DataGap::new(
                    format!("vital_signs.{vital}"),
                    format!("Vital sign is not numeric: {vital}"),
                    GapSeverity::Medium,
                )
                .with_example(vital_example(vital)),
            );
            None
        }
    }
}

/// Flag vitals outside the adult reference ranges. Absent and non-numeric
/// vitals are skipped; [`check_required_vitals`] already recorded them.
pub(crate) fn check_abnormal_vitals(
    vitals: &Map<String, Value>,
    scorer: &mut TrackScorer,
    advice: &VitalAdvice,
) {
    let reading = |vital: &str| Numeric::read(vitals.get(vital)).value();
    if let Some(sbp) = reading("systolic_bp") {
        if !(90.0..=180.0).contains(&sbp) {
            scorer.warn(format!("Abnormal blood pressure: {sbp}"), advice.blood_pressure);
        }
    }
    if let Some(hr) = reading("heart_rate") {
        if !(50.0..=120.0).contains(&hr) {
            scorer.warn(format!("Abnormal heart rate: {hr}"), advice.heart_rate);
        }
    }
    if let Some(rr) = reading("respiratory_rate") {
        if !(12.0..=24.0).contains(&rr) {
            scorer.warn(format!("Abnormal respiratory rate: {rr}"), advice.respiratory_rate);
        }
    }
    if let Some(temp) = reading("temperature_c") {
        if !(36.0..=38.5).contains(&temp) {
            scorer.warn(format!("Abnormal temperature: {temp}°C"), advice.temperature);
        }
    }
}

/// Serum creatinine from the `laboratory` section, when numeric.
pub(crate) fn creatinine(record: &RecordMap) -> Result<Option<f64>, ReadinessError> {
    Ok(record
        .object("laboratory")?
        .and_then(|lab| Numeric::read(lab.get("creatinine")).value()))
}

/// Whether the record lists `contrast_dye` among its allergies.
pub(crate) fn has_contrast_allergy(record: &RecordMap) -> Result<bool, ReadinessError> {
    Ok(record
        .string_list_lower("allergies")?
        .iter()
        .any(|a| a == "contrast_dye"))
}

pub(crate) fn mentions_chest_pain(record: &RecordMap) -> bool {
    record.text_lower("chief_complaint").contains("chest pain")
}
