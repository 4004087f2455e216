use crate::types::ValidationTrack;
use serde::{Deserialize, Serialize};

/// Minimum score each track must reach to be READY.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMinimums {
    pub medication_safety: f64,
    pub triage_assessment: f64,
    pub next_diagnostic_step: f64,
    pub imaging_readiness: f64,
    pub audio_readiness: f64,
    pub laboratory_analysis: f64,
    pub vital_signs_monitoring: f64,
}

impl TrackMinimums {
    pub fn get(&self, track: ValidationTrack) -> f64 {
        match track {
            ValidationTrack::MedicationSafety => self.medication_safety,
            ValidationTrack::TriageAssessment => self.triage_assessment,
            ValidationTrack::NextDiagnosticStep => self.next_diagnostic_step,
            ValidationTrack::ImagingReadiness => self.imaging_readiness,
            ValidationTrack::AudioReadiness => self.audio_readiness,
            ValidationTrack::LaboratoryAnalysis => self.laboratory_analysis,
            ValidationTrack::VitalSignsMonitoring => self.vital_signs_monitoring,
        }
    }
}

impl Default for TrackMinimums {
    fn default() -> Self {
        Self {
            medication_safety: 0.7,
            triage_assessment: 0.6,
            next_diagnostic_step: 0.8,
            imaging_readiness: 0.9,
            audio_readiness: 0.9,
            laboratory_analysis: 0.8,
            vital_signs_monitoring: 0.7,
        }
    }
}

/// Scoring configuration shared by all tracks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub minimums: TrackMinimums,
    /// Fraction of the minimum at or above which a failing track is NEAR_MISS.
    pub near_miss_factor: f64,
    /// Score deducted per gap, after all credits are added.
    pub gap_penalty: f64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            minimums: TrackMinimums::default(),
            near_miss_factor: 0.8,
            gap_penalty: 0.1,
        }
    }
}
