use crate::types::{OverallStatus, ReadinessStatus, ReadinessSummary, ReadinessVerdict, TrackDetail};
use chrono::Utc;

/// Roll per-track verdicts up into a [`ReadinessSummary`].
///
/// The overall score is the mean track score (0 when there are no
/// verdicts). FULLY_READY needs every track READY, PARTIALLY_READY at least
/// one.
pub fn summarize(verdicts: &[ReadinessVerdict]) -> ReadinessSummary {
    let with_status = |status: ReadinessStatus| {
        verdicts
            .iter()
            .filter(|v| v.status == status)
            .map(|v| v.track)
            .collect::<Vec<_>>()
    };
    let ready_tracks = with_status(ReadinessStatus::Ready);
    let near_miss_tracks = with_status(ReadinessStatus::NearMiss);
    let not_ready_tracks = with_status(ReadinessStatus::NotReady);

    let score = if verdicts.is_empty() {
        0.0
    } else {
        verdicts.iter().map(|v| v.score).sum::<f64>() / verdicts.len() as f64
    };

    let status = if !verdicts.is_empty() && ready_tracks.len() == verdicts.len() {
        OverallStatus::FullyReady
    } else if !ready_tracks.is_empty() {
        OverallStatus::PartiallyReady
    } else {
        OverallStatus::NotReady
    };

    ReadinessSummary {
        status,
        score,
        ready_tracks,
        near_miss_tracks,
        not_ready_tracks,
        track_details: verdicts
            .iter()
            .map(|v| TrackDetail {
                track: v.track,
                status: v.status,
                score: v.score,
                gap_count: v.gaps.len(),
                warning_count: v.warnings.len(),
            })
            .collect(),
        recommendations: verdicts
            .iter()
            .flat_map(|v| v.recommendations.iter().cloned())
            .collect(),
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationTrack;

    fn verdict(track: ValidationTrack, status: ReadinessStatus, score: f64) -> ReadinessVerdict {
        ReadinessVerdict {
            track,
            status,
            score,
            minimum: 0.7,
            gaps: vec![],
            warnings: vec![],
            recommendations: vec![format!("check {track}")],
        }
    }

    #[test]
    fn all_ready_is_fully_ready() {
        let verdicts: Vec<_> = ValidationTrack::ALL
            .iter()
            .map(|t| verdict(*t, ReadinessStatus::Ready, 0.9))
            .collect();
        let summary = summarize(&verdicts);
        assert!(summary.is_fully_ready());
        assert!((summary.score - 0.9).abs() < 1e-9);
        assert_eq!(summary.recommendations.len(), 7);
    }

    #[test]
    fn partitions_by_status() {
        let verdicts = vec![
            verdict(ValidationTrack::TriageAssessment, ReadinessStatus::Ready, 1.0),
            verdict(ValidationTrack::MedicationSafety, ReadinessStatus::NearMiss, 0.6),
            verdict(ValidationTrack::ImagingReadiness, ReadinessStatus::NotReady, 0.2),
        ];
        let summary = summarize(&verdicts);
        assert_eq!(summary.status, OverallStatus::PartiallyReady);
        assert_eq!(summary.ready_tracks, vec![ValidationTrack::TriageAssessment]);
        assert_eq!(summary.near_miss_tracks, vec![ValidationTrack::MedicationSafety]);
        assert_eq!(summary.not_ready_tracks, vec![ValidationTrack::ImagingReadiness]);
        assert!((summary.score - 0.6).abs() < 1e-9);
        assert_eq!(summary.track_details[1].status, ReadinessStatus::NearMiss);
    }

    #[test]
    fn nothing_ready() {
        let verdicts = vec![verdict(
            ValidationTrack::AudioReadiness,
            ReadinessStatus::NearMiss,
            0.75,
        )];
        assert_eq!(summarize(&verdicts).status, OverallStatus::NotReady);
    }

    #[test]
    fn empty_input() {
        let summary = summarize(&[]);
        assert_eq!(summary.status, OverallStatus::NotReady);
        assert_eq!(summary.score, 0.0);
    }
}
