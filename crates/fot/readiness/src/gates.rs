//! Flat-field readiness gates for image studies and audio recordings.
//!
//! Unlike the seven-track validator these gates do not score; they list
//! missing fields and quality warnings, and a study is ready only when
//! nothing is missing and no warning is blocking.

use crate::record::{is_blank, is_truthy, FieldMap, Numeric};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A quality or safety finding raised by a gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateWarning {
    pub message: String,
    /// Blocking warnings make the study not ready.
    pub blocking: bool,
}

impl GateWarning {
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            blocking: true,
        }
    }

    pub fn advisory(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            blocking: false,
        }
    }
}

/// Gate outcome: `{ready, missing, warnings}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    pub ready: bool,
    pub missing: Vec<String>,
    pub warnings: Vec<GateWarning>,
}

impl GateReport {
    fn settle(mut self) -> Self {
        self.ready = self.missing.is_empty() && !self.warnings.iter().any(|w| w.blocking);
        self
    }

    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|w| w.message.as_str()).collect()
    }

    pub fn blocking_warnings(&self) -> impl Iterator<Item = &GateWarning> {
        self.warnings.iter().filter(|w| w.blocking)
    }

    fn need(&mut self, fields: &FieldMap, keys: &[&str]) {
        for key in keys {
            if is_blank(fields.get(*key)) {
                self.missing.push((*key).to_string());
            }
        }
    }
}

/// Image quality thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageGateThresholds {
    pub min_focus: f64,
    pub min_exposure: f64,
    pub max_exposure: f64,
    pub min_snr_db: f64,
    pub min_side_px: i64,
}

impl Default for ImageGateThresholds {
    fn default() -> Self {
        Self {
            min_focus: 0.6,
            min_exposure: 0.3,
            max_exposure: 0.9,
            min_snr_db: 20.0,
            min_side_px: 512,
        }
    }
}

/// Audio quality thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioGateThresholds {
    pub min_sample_rate_hz: i64,
    pub min_bit_depth: i64,
    /// Non-blocking.
    pub expected_channels: i64,
    /// Non-blocking.
    pub min_duration_sec: f64,
    pub min_snr_db: f64,
    pub max_noise_floor_dbfs: f64,
    pub max_artifact_score: f64,
}

impl Default for AudioGateThresholds {
    fn default() -> Self {
        Self {
            min_sample_rate_hz: 4000,
            min_bit_depth: 16,
            expected_channels: 1,
            min_duration_sec: 10.0,
            min_snr_db: 20.0,
            max_noise_floor_dbfs: -35.0,
            max_artifact_score: 0.4,
        }
    }
}

const IMAGE_REQUIRED: [&str; 6] = [
    "modality",
    "bodySite",
    "acquiredAt",
    "deviceModel",
    "widthPx",
    "heightPx",
];

const AUDIO_REQUIRED: [&str; 7] = [
    "bodySite",
    "sampleRateHz",
    "bitDepth",
    "channels",
    "durationSec",
    "deviceModel",
    "acquiredAt",
];

/// Readiness gate for image studies.
#[derive(Clone, Debug, Default)]
pub struct ImageGate {
    thresholds: ImageGateThresholds,
}

impl ImageGate {
    pub fn new(thresholds: ImageGateThresholds) -> Self {
        Self { thresholds }
    }

    pub fn check(&self, study: &FieldMap) -> GateReport {
        let t = &self.thresholds;
        let mut report = GateReport::default();
        report.need(study, &IMAGE_REQUIRED);

        let spacing = study.get("pixelSpacingMm").filter(|v| !v.is_null());
        if spacing.is_none() && !is_truthy(study.get("scaleRef")) {
            report.missing.push("pixelSpacingMm OR scaleRef".to_string());
        }

        if !is_zero_or_null(study.get("phiBurninFlag")) {
            report.warnings.push(GateWarning::blocking(
                "phiBurninFlag indicates possible PHI; block until redacted",
            ));
        }

        let quality = QualityMetrics::read(study, &mut report);
        if let Some(focus) = quality.value("fimg:Quality_FocusScore", &mut report) {
            if focus < t.min_focus {
                report
                    .warnings
                    .push(GateWarning::blocking(format!("focus < {}", t.min_focus)));
            }
        }
        if let Some(exposure) = quality.value("fimg:Quality_ExposureScore", &mut report) {
            if exposure < t.min_exposure || exposure > t.max_exposure {
                report.warnings.push(GateWarning::blocking(format!(
                    "exposure out of {}–{}",
                    t.min_exposure, t.max_exposure
                )));
            }
        }
        if let Some(snr) = quality.value("fimg:Quality_SNR_dB", &mut report) {
            if snr < t.min_snr_db {
                report
                    .warnings
                    .push(GateWarning::blocking(format!("SNR < {} dB", t.min_snr_db)));
            }
        }

        match (
            lenient_int(study.get("widthPx")),
            lenient_int(study.get("heightPx")),
        ) {
            (Some(w), Some(h)) => {
                if w.min(h) < t.min_side_px {
                    report.warnings.push(GateWarning::blocking(format!(
                        "shortest side < {}px",
                        t.min_side_px
                    )));
                }
            }
            _ => report.missing.push("widthPx/heightPx integers".to_string()),
        }

        let report = report.settle();
        debug!(
            ready = report.ready,
            missing = report.missing.len(),
            warnings = report.warnings.len(),
            "image gate evaluated"
        );
        report
    }
}

/// Readiness gate for audio recordings.
#[derive(Clone, Debug, Default)]
pub struct AudioGate {
    thresholds: AudioGateThresholds,
}

impl AudioGate {
    pub fn new(thresholds: AudioGateThresholds) -> Self {
        Self { thresholds }
    }

    pub fn check(&self, signal: &FieldMap) -> GateReport {
        let t = &self.thresholds;
        let mut report = GateReport::default();
        report.need(signal, &AUDIO_REQUIRED);

        let calibrated = match signal.get("calibrationPassed") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64() == Some(1.0),
            _ => false,
        };
        if !calibrated {
            report
                .warnings
                .push(GateWarning::advisory("calibration not passed"));
        }

        let mut malformed = false;
        match lenient_int(signal.get("sampleRateHz")) {
            Some(rate) if rate < t.min_sample_rate_hz => report.warnings.push(
                GateWarning::blocking(format!("sampleRateHz < {}", t.min_sample_rate_hz)),
            ),
            Some(_) => {}
            None => malformed = true,
        }
        match lenient_int(signal.get("bitDepth")) {
            Some(depth) if depth < t.min_bit_depth => report
                .warnings
                .push(GateWarning::blocking(format!("bitDepth < {}", t.min_bit_depth))),
            Some(_) => {}
            None => malformed = true,
        }
        match lenient_int(signal.get("channels")) {
            Some(ch) if ch != t.expected_channels => report.warnings.push(GateWarning::advisory(
                format!("channels != {} (not blocking)", t.expected_channels),
            )),
            Some(_) => {}
            None => malformed = true,
        }
        match lenient_float(signal.get("durationSec")) {
            Some(secs) if secs < t.min_duration_sec => report.warnings.push(
                GateWarning::advisory(format!("duration < {}s", t.min_duration_sec)),
            ),
            Some(_) => {}
            None => malformed = true,
        }
        if malformed {
            report
                .missing
                .push("numeric audio attributes malformed".to_string());
        }

        let quality = QualityMetrics::read(signal, &mut report);
        if let Some(snr) = quality.value("faud:Quality_SNR_dB", &mut report) {
            if snr < t.min_snr_db {
                report
                    .warnings
                    .push(GateWarning::blocking(format!("SNR < {} dB", t.min_snr_db)));
            }
        }
        if let Some(floor) = quality.value("faud:Quality_NoiseFloor_dBFS", &mut report) {
            if floor > t.max_noise_floor_dbfs {
                report.warnings.push(GateWarning::blocking(format!(
                    "noise floor > {} dBFS",
                    t.max_noise_floor_dbfs
                )));
            }
        }
        if let Some(artifact) = quality.value("faud:Quality_ArtifactScore", &mut report) {
            if artifact > t.max_artifact_score {
                report.warnings.push(GateWarning::blocking(format!(
                    "artifact score > {}",
                    t.max_artifact_score
                )));
            }
        }

        let report = report.settle();
        debug!(
            ready = report.ready,
            missing = report.missing.len(),
            warnings = report.warnings.len(),
            "audio gate evaluated"
        );
        report
    }
}

/// Image gate with default thresholds.
pub fn image_readiness(study: &FieldMap) -> GateReport {
    ImageGate::default().check(study)
}

/// Audio gate with default thresholds.
pub fn audio_readiness(signal: &FieldMap) -> GateReport {
    AudioGate::default().check(signal)
}

/// `qualityMeasurements: [{hasMetric, value}]`, last entry per metric wins.
struct QualityMetrics<'a> {
    entries: Vec<&'a serde_json::Map<String, Value>>,
}

impl<'a> QualityMetrics<'a> {
    fn read(fields: &'a FieldMap, report: &mut GateReport) -> Self {
        let entries = match fields.get("qualityMeasurements") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
            Some(_) => {
                report
                    .missing
                    .push("qualityMeasurements must be a list".to_string());
                Vec::new()
            }
        };
        Self { entries }
    }

    fn value(&self, metric: &str, report: &mut GateReport) -> Option<f64> {
        let entry = self
            .entries
            .iter()
            .rev()
            .find(|m| m.get("hasMetric").and_then(Value::as_str) == Some(metric))?;
        match Numeric::read(entry.get("value")) {
            Numeric::Value(v) => Some(v),
            Numeric::Absent => None,
            Numeric::Malformed => {
                report.missing.push(format!("{metric} value numeric"));
                None
            }
        }
    }
}

fn is_zero_or_null(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

/// Integer coercion for size/rate fields. Absent reads as 0, floats
/// truncate, integer strings parse; anything else is malformed.
fn lenient_int(value: Option<&Value>) -> Option<i64> {
    match value {
        None => Some(0),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Float coercion for durations. Absent reads as 0.
fn lenient_float(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(Value::Bool(b)) => Some(f64::from(u8::from(*b))),
        other => Numeric::read(other).value(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    fn good_image() -> FieldMap {
        fields(json!({
            "modality": "dermoscopy",
            "bodySite": "left forearm",
            "acquiredAt": "2025-01-15T10:30:00Z",
            "deviceModel": "DermLite DL5",
            "widthPx": 2048,
            "heightPx": 1536,
            "pixelSpacingMm": 0.05,
            "phiBurninFlag": 0,
            "qualityMeasurements": [
                {"hasMetric": "fimg:Quality_FocusScore", "value": 0.82},
                {"hasMetric": "fimg:Quality_ExposureScore", "value": 0.55},
                {"hasMetric": "fimg:Quality_SNR_dB", "value": 31.0}
            ]
        }))
    }

    fn good_audio() -> FieldMap {
        fields(json!({
            "bodySite": "apex",
            "sampleRateHz": 8000,
            "bitDepth": 16,
            "channels": 1,
            "durationSec": 30.0,
            "deviceModel": "Eko Core",
            "acquiredAt": "2025-01-15T10:30:00Z",
            "calibrationPassed": true,
            "qualityMeasurements": [
                {"hasMetric": "faud:Quality_SNR_dB", "value": 28.0},
                {"hasMetric": "faud:Quality_NoiseFloor_dBFS", "value": -48.0},
                {"hasMetric": "faud:Quality_ArtifactScore", "value": 0.1}
            ]
        }))
    }

    #[test]
    fn good_image_is_ready() {
        let report = image_readiness(&good_image());
        assert!(report.ready, "{report:?}");
        assert!(report.missing.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn image_without_size_and_with_phi() {
        let mut study = good_image();
        study.remove("widthPx");
        study.remove("heightPx");
        study.insert("phiBurninFlag".into(), json!(1));
        let report = image_readiness(&study);
        assert!(!report.ready);
        assert!(report.missing.contains(&"widthPx".to_string()));
        assert!(report.missing.contains(&"heightPx".to_string()));
        assert!(report
            .warning_messages()
            .contains(&"phiBurninFlag indicates possible PHI; block until redacted"));
        assert!(report.warning_messages().contains(&"shortest side < 512px"));
    }

    #[test]
    fn image_scale_alternatives() {
        let mut study = good_image();
        study.remove("pixelSpacingMm");
        assert!(image_readiness(&study)
            .missing
            .contains(&"pixelSpacingMm OR scaleRef".to_string()));
        study.insert("scaleRef".into(), json!("ruler-10mm"));
        assert!(image_readiness(&study).ready);
    }

    #[test]
    fn non_integer_size() {
        let mut study = good_image();
        study.insert("widthPx".into(), json!("wide"));
        let report = image_readiness(&study);
        assert_eq!(report.missing, vec!["widthPx/heightPx integers"]);
        assert!(!report.ready);
    }

    #[test]
    fn image_quality_failures_block() {
        let mut study = good_image();
        study.insert(
            "qualityMeasurements".into(),
            json!([
                {"hasMetric": "fimg:Quality_FocusScore", "value": 0.4},
                {"hasMetric": "fimg:Quality_ExposureScore", "value": 0.95},
                {"hasMetric": "fimg:Quality_SNR_dB", "value": 12}
            ]),
        );
        let report = image_readiness(&study);
        assert_eq!(
            report.warning_messages(),
            vec!["focus < 0.6", "exposure out of 0.3–0.9", "SNR < 20 dB"]
        );
        assert_eq!(report.blocking_warnings().count(), 3);
        assert!(!report.ready);
    }

    #[test]
    fn good_audio_is_ready() {
        let report = audio_readiness(&good_audio());
        assert!(report.ready, "{report:?}");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn stereo_short_uncalibrated_audio_is_still_ready() {
        let mut signal = good_audio();
        signal.insert("channels".into(), json!(2));
        signal.insert("durationSec".into(), json!(6.5));
        signal.insert("calibrationPassed".into(), json!(0));
        let report = audio_readiness(&signal);
        assert!(report.ready);
        assert_eq!(
            report.warning_messages(),
            vec![
                "calibration not passed",
                "channels != 1 (not blocking)",
                "duration < 10s"
            ]
        );
    }

    #[test]
    fn audio_blocking_failures() {
        let mut signal = good_audio();
        signal.insert("sampleRateHz".into(), json!(2000));
        signal.insert("bitDepth".into(), json!(8));
        signal.insert(
            "qualityMeasurements".into(),
            json!([
                {"hasMetric": "faud:Quality_SNR_dB", "value": 15},
                {"hasMetric": "faud:Quality_NoiseFloor_dBFS", "value": -20},
                {"hasMetric": "faud:Quality_ArtifactScore", "value": 0.7}
            ]),
        );
        let report = audio_readiness(&signal);
        assert!(!report.ready);
        assert_eq!(report.blocking_warnings().count(), 5);
    }

    #[test]
    fn malformed_audio_numbers() {
        let mut signal = good_audio();
        signal.insert("bitDepth".into(), json!("sixteen"));
        signal.insert("durationSec".into(), json!([30]));
        let report = audio_readiness(&signal);
        assert_eq!(report.missing, vec!["numeric audio attributes malformed"]);
        assert!(!report.ready);
    }

    #[test]
    fn custom_thresholds() {
        let gate = AudioGate::new(AudioGateThresholds {
            min_sample_rate_hz: 16000,
            ..Default::default()
        });
        let report = gate.check(&good_audio());
        assert_eq!(report.warning_messages(), vec!["sampleRateHz < 16000"]);
    }

    #[test]
    fn report_wire_shape() {
        let report = image_readiness(&good_image());
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["ready"], json!(true));
        assert!(v["missing"].is_array());
        assert!(v["warnings"].is_array());
    }
}
