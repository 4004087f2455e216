use crate::error::ReadinessError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven independent clinical readiness tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationTrack {
    MedicationSafety,
    TriageAssessment,
    NextDiagnosticStep,
    ImagingReadiness,
    AudioReadiness,
    LaboratoryAnalysis,
    VitalSignsMonitoring,
}

impl ValidationTrack {
    /// All tracks, in evaluation order.
    pub const ALL: [ValidationTrack; 7] = [
        Self::MedicationSafety,
        Self::TriageAssessment,
        Self::NextDiagnosticStep,
        Self::ImagingReadiness,
        Self::AudioReadiness,
        Self::LaboratoryAnalysis,
        Self::VitalSignsMonitoring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MedicationSafety => "MedicationSafety",
            Self::TriageAssessment => "TriageAssessment",
            Self::NextDiagnosticStep => "NextDiagnosticStep",
            Self::ImagingReadiness => "ImagingReadiness",
            Self::AudioReadiness => "AudioReadiness",
            Self::LaboratoryAnalysis => "LaboratoryAnalysis",
            Self::VitalSignsMonitoring => "VitalSignsMonitoring",
        }
    }
}

impl fmt::Display for ValidationTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationTrack {
    type Err = ReadinessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReadinessError::UnknownTrack(s.to_string()))
    }
}

/// Per-track readiness status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessStatus {
    Ready,
    NearMiss,
    NotReady,
}

impl ReadinessStatus {
    /// Map a score to a status relative to the track minimum.
    ///
    /// `score >= minimum` is READY, `score >= factor * minimum` is NEAR_MISS,
    /// anything lower is NOT_READY.
    pub fn classify(score: f64, minimum: f64, near_miss_factor: f64) -> Self {
        if score >= minimum {
            Self::Ready
        } else if score >= minimum * near_miss_factor {
            Self::NearMiss
        } else {
            Self::NotReady
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::NearMiss => write!(f, "NEAR_MISS"),
            Self::NotReady => write!(f, "NOT_READY"),
        }
    }
}

/// Severity of a data gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// A missing or malformed piece of a clinical record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataGap {
    /// Dotted field path, e.g. `vital_signs.heart_rate`.
    pub field: String,
    pub reason: String,
    /// Example of a well-formed value.
    pub example: Option<String>,
    pub severity: GapSeverity,
}

impl DataGap {
    pub fn new(
        field: impl Into<String>,
        reason: impl Into<String>,
        severity: GapSeverity,
    ) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            example: None,
            severity,
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// Outcome of one validation track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessVerdict {
    pub track: ValidationTrack,
    pub status: ReadinessStatus,
    /// Score in `[0, 1]`.
    pub score: f64,
    /// Configured minimum this score was judged against.
    pub minimum: f64,
    pub gaps: Vec<DataGap>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ReadinessVerdict {
    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }

    pub fn has_critical_gap(&self) -> bool {
        self.gaps.iter().any(|g| g.severity == GapSeverity::Critical)
    }
}

/// Aggregate readiness over all tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    FullyReady,
    PartiallyReady,
    NotReady,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullyReady => write!(f, "FULLY_READY"),
            Self::PartiallyReady => write!(f, "PARTIALLY_READY"),
            Self::NotReady => write!(f, "NOT_READY"),
        }
    }
}

/// Condensed per-track line of a summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackDetail {
    pub track: ValidationTrack,
    pub status: ReadinessStatus,
    pub score: f64,
    pub gap_count: usize,
    pub warning_count: usize,
}

/// Rollup of all track verdicts for one record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSummary {
    pub status: OverallStatus,
    /// Arithmetic mean of the track scores.
    pub score: f64,
    pub ready_tracks: Vec<ValidationTrack>,
    pub near_miss_tracks: Vec<ValidationTrack>,
    pub not_ready_tracks: Vec<ValidationTrack>,
    pub track_details: Vec<TrackDetail>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ReadinessSummary {
    pub fn is_fully_ready(&self) -> bool {
        self.status == OverallStatus::FullyReady
    }
}
