use crate::error::HypothesisError;
use crate::state::{normalize, Correlation, HypothesisState, Slot};
use fot_types::ContentHash;
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::f64::consts::TAU;
use tracing::debug;

/// Differential diagnoses seeded into every chest-pain work-up.
pub const DEFAULT_DIFFERENTIALS: [&str; 8] = [
    "myocardial_infarction",
    "angina",
    "anxiety",
    "gastroesophageal_reflux",
    "pneumonia",
    "pulmonary_embolism",
    "aortic_dissection",
    "pericarditis",
];

/// Intensity assumed for a symptom that does not state one.
const DEFAULT_INTENSITY: f64 = 0.5;

const MAX_DECOHERENCE: f64 = 0.5;
const COMPLEXITY_DIVISOR: f64 = 20.0;

/// Encoder parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Length of the amplitude vector.
    pub dimension: usize,
    /// Magnitude given to each catalog hypothesis before normalization.
    pub hypothesis_seed: f64,
    /// Correlation weight between every symptom and every hypothesis.
    pub correlation_weight: f64,
    /// Vital signs map to `(value - vital_offset) / vital_scale`, clamped
    /// into `[0, 1]`.
    pub vital_offset: f64,
    pub vital_scale: f64,
    pub differentials: Vec<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dimension: 1024,
            hypothesis_seed: 0.1,
            correlation_weight: 0.3,
            vital_offset: 50.0,
            vital_scale: 100.0,
            differentials: DEFAULT_DIFFERENTIALS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl EncoderConfig {
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_differentials<I, S>(mut self, differentials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.differentials = differentials.into_iter().map(Into::into).collect();
        self
    }
}

/// The parts of a case record the encoder reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub case_id: String,
    /// Symptom name → intensity.
    pub symptoms: BTreeMap<String, f64>,
    /// Vital sign name → raw value.
    pub vital_signs: BTreeMap<String, f64>,
}

impl ClinicalRecord {
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            ..Default::default()
        }
    }

    pub fn with_symptom(mut self, name: impl Into<String>, intensity: f64) -> Self {
        self.symptoms.insert(name.into(), intensity);
        self
    }

    pub fn with_vital(mut self, name: impl Into<String>, value: f64) -> Self {
        self.vital_signs.insert(name.into(), value);
        self
    }

    /// Read a raw JSON case record.
    ///
    /// `symptoms` is an object of `name → {intensity}`; a symptom without a
    /// numeric intensity gets 0.5. `vital_signs` is an object of numbers;
    /// non-numeric vitals are skipped. Without a `case_id` the id is derived
    /// from the record's content.
    pub fn from_json(record: &Value) -> Self {
        let case_id = match record.get("case_id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => ContentHash::hash(record.to_string().as_bytes()).short(),
        };

        let symptoms = record
            .get("symptoms")
            .and_then(Value::as_object)
            .map(|symptoms| {
                symptoms
                    .iter()
                    .map(|(name, details)| {
                        let intensity = details
                            .get("intensity")
                            .and_then(as_number)
                            .unwrap_or(DEFAULT_INTENSITY);
                        (name.clone(), intensity)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let vital_signs = record
            .get("vital_signs")
            .and_then(Value::as_object)
            .map(|vitals| {
                vitals
                    .iter()
                    .filter_map(|(name, v)| as_number(v).map(|v| (name.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            case_id,
            symptoms,
            vital_signs,
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Builds [`HypothesisState`]s from clinical records.
#[derive(Clone, Debug)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Result<Self, HypothesisError> {
        if config.dimension == 0 {
            return Err(HypothesisError::InvalidDimension(0));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode with the thread-local RNG.
    pub fn encode(&self, record: &ClinicalRecord) -> HypothesisState {
        self.encode_with_rng(record, &mut rand::thread_rng())
    }

    /// Encode drawing every phase from `rng`.
    pub fn encode_with_rng<R: Rng + ?Sized>(
        &self,
        record: &ClinicalRecord,
        rng: &mut R,
    ) -> HypothesisState {
        let dim = self.config.dimension;
        let capacity = dim / 4;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); dim];

        let mut symptoms = BTreeMap::new();
        for (i, (name, intensity)) in record.symptoms.iter().enumerate().take(capacity) {
            let magnitude = if intensity.is_finite() {
                intensity.clamp(0.0, 1.0)
            } else {
                0.0
            };
            let weight = Complex64::from_polar(magnitude, rng.gen_range(0.0..TAU));
            amplitudes[i] = weight;
            symptoms.insert(name.clone(), Slot { index: i, weight });
        }

        let mut signs = BTreeMap::new();
        for (i, (name, value)) in record.vital_signs.iter().enumerate().take(capacity) {
            let index = capacity + i;
            let weight = Complex64::from_polar(self.rescale_vital(*value), rng.gen_range(0.0..TAU));
            amplitudes[index] = weight;
            signs.insert(name.clone(), Slot { index, weight });
        }

        let mut hypotheses = BTreeMap::new();
        for (j, name) in self.config.differentials.iter().enumerate().take(capacity) {
            let index = dim / 2 + j;
            let weight =
                Complex64::from_polar(self.config.hypothesis_seed, rng.gen_range(0.0..TAU));
            amplitudes[index] = weight;
            hypotheses.insert(name.clone(), Slot { index, weight });
        }

        let mut correlations = Vec::with_capacity(symptoms.len() * hypotheses.len());
        for symptom in symptoms.values() {
            for hypothesis in hypotheses.values() {
                correlations.push(Correlation {
                    symptom: symptom.index,
                    hypothesis: hypothesis.index,
                    weight: self.config.correlation_weight,
                });
            }
        }

        normalize(&mut amplitudes);

        let complexity =
            record.symptoms.len() + record.vital_signs.len() + self.config.differentials.len();
        let decoherence_rate = (complexity as f64 / COMPLEXITY_DIVISOR).min(MAX_DECOHERENCE);

        debug!(
            case_id = %record.case_id,
            symptoms = symptoms.len(),
            signs = signs.len(),
            hypotheses = hypotheses.len(),
            decoherence_rate,
            "case encoded"
        );

        HypothesisState {
            case_id: record.case_id.clone(),
            amplitudes,
            symptoms,
            signs,
            hypotheses,
            correlations,
            decoherence_rate,
        }
    }

    fn rescale_vital(&self, value: f64) -> f64 {
        if self.config.vital_scale == 0.0 {
            return 0.0;
        }
        ((value - self.config.vital_offset) / self.config.vital_scale).clamp(0.0, 1.0)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            config: EncoderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn chest_pain() -> ClinicalRecord {
        ClinicalRecord::new("DEMO_001")
            .with_symptom("chest_pain", 0.8)
            .with_symptom("shortness_breath", 0.6)
            .with_symptom("diaphoresis", 0.7)
            .with_vital("systolic_bp", 160.0)
            .with_vital("heart_rate", 110.0)
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = EncoderConfig::default().with_dimension(0);
        assert_eq!(
            Encoder::new(cfg).unwrap_err(),
            HypothesisError::InvalidDimension(0)
        );
    }

    #[test]
    fn encoded_state_is_unit_norm() {
        let encoder = Encoder::default();
        let state = encoder.encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(7));
        assert_eq!(state.dimension(), 1024);
        assert!((state.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn layout_by_quarter() {
        let encoder = Encoder::new(EncoderConfig::default().with_dimension(64)).unwrap();
        let state = encoder.encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(1));
        assert!(state.symptoms.values().all(|s| s.index < 16));
        assert!(state.signs.values().all(|s| (16..32).contains(&s.index)));
        assert!(state.hypotheses.values().all(|s| (32..48).contains(&s.index)));
        assert_eq!(state.hypotheses.len(), 8);
        let weight = state.symptom_weight("chest_pain").unwrap();
        assert!((weight.norm() - 0.8).abs() < 1e-12);
        // systolic 160 -> (160 - 50) / 100 clamps to 1
        assert!((state.sign_weight("systolic_bp").unwrap().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlations_link_every_symptom_to_every_hypothesis() {
        let state = Encoder::default().encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(3));
        assert_eq!(state.correlations.len(), 3 * 8);
        let mi = state.hypotheses["myocardial_infarction"].index;
        let cp = state.symptoms["chest_pain"].index;
        assert_eq!(state.correlation(mi, cp), 0.3);
        assert_eq!(state.correlated_symptoms().len(), 3);
    }

    #[test]
    fn decoherence_from_complexity() {
        let state = Encoder::default().encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(3));
        // 3 + 2 + 8 = 13 -> capped at 0.5
        assert_eq!(state.decoherence_rate, 0.5);

        let sparse = Encoder::new(EncoderConfig::default().with_differentials(["angina"])).unwrap();
        let state = sparse.encode_with_rng(
            &ClinicalRecord::new("x").with_symptom("cough", 0.4),
            &mut StdRng::seed_from_u64(3),
        );
        assert!((state.decoherence_rate - 0.1).abs() < 1e-12);
    }

    #[test]
    fn empty_record_without_catalog_is_zero() {
        let encoder =
            Encoder::new(EncoderConfig::default().with_differentials(Vec::<String>::new())).unwrap();
        let state = encoder.encode_with_rng(&ClinicalRecord::new("empty"), &mut StdRng::seed_from_u64(0));
        assert!(state.is_zero());
        assert_eq!(state.decoherence_rate, 0.0);
    }

    #[test]
    fn tiny_dimension_encodes_nothing() {
        let encoder = Encoder::new(EncoderConfig::default().with_dimension(3)).unwrap();
        let state = encoder.encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(0));
        assert!(state.is_zero());
        assert!(state.symptoms.is_empty());
    }

    #[test]
    fn same_seed_same_state() {
        let encoder = Encoder::default();
        let a = encoder.encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(42));
        let b = encoder.encode_with_rng(&chest_pain(), &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn from_json_reads_symptoms_and_vitals() {
        let record = ClinicalRecord::from_json(&json!({
            "case_id": "DEMO_001",
            "symptoms": {
                "chest_pain": {"intensity": 0.8, "quality": "crushing"},
                "nausea": {}
            },
            "vital_signs": {"heart_rate": 110, "temperature_c": "37.2", "rhythm": "irregular"}
        }));
        assert_eq!(record.case_id, "DEMO_001");
        assert_eq!(record.symptoms["chest_pain"], 0.8);
        assert_eq!(record.symptoms["nausea"], 0.5);
        assert_eq!(record.vital_signs.len(), 2);
    }

    #[test]
    fn from_json_derives_case_id() {
        let a = ClinicalRecord::from_json(&json!({"symptoms": {"cough": {}}}));
        let b = ClinicalRecord::from_json(&json!({"symptoms": {"cough": {}}}));
        assert_eq!(a.case_id.len(), 16);
        assert_eq!(a.case_id, b.case_id);
    }
}
