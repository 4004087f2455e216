use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named position in the state vector with the weight it was encoded with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub weight: Complex64,
}

/// Symmetric correlation between a symptom slot and a hypothesis slot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub symptom: usize,
    pub hypothesis: usize,
    pub weight: f64,
}

/// Weighted hypotheses for one case.
///
/// The vector is laid out in quarters: symptoms in `[0, D/4)`, vital signs
/// in `[D/4, D/2)`, differential hypotheses from `D/2`. After encoding the
/// vector has unit norm (or is all zero when nothing was encoded); after
/// evolution its norm is at most one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HypothesisState {
    pub case_id: String,
    pub amplitudes: Vec<Complex64>,
    pub symptoms: BTreeMap<String, Slot>,
    pub signs: BTreeMap<String, Slot>,
    pub hypotheses: BTreeMap<String, Slot>,
    pub correlations: Vec<Correlation>,
    /// Damping per unit time, in `[0, 0.5]`.
    pub decoherence_rate: f64,
}

impl HypothesisState {
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Euclidean norm of the amplitude vector.
    pub fn norm(&self) -> f64 {
        self.total_probability().sqrt()
    }

    /// Sum of squared magnitudes.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// No information was encoded.
    pub fn is_zero(&self) -> bool {
        self.amplitudes.iter().all(|a| a.norm_sqr() == 0.0)
    }

    /// Index of the largest probability; the first one on ties.
    pub fn dominant_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, a) in self.amplitudes.iter().enumerate() {
            let p = a.norm_sqr();
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Correlation weight between two indices, zero when unrelated.
    pub fn correlation(&self, a: usize, b: usize) -> f64 {
        self.correlations
            .iter()
            .find(|c| (c.symptom, c.hypothesis) == (a, b) || (c.symptom, c.hypothesis) == (b, a))
            .map_or(0.0, |c| c.weight)
    }

    pub fn symptom_weight(&self, name: &str) -> Option<Complex64> {
        self.symptoms.get(name).map(|s| s.weight)
    }

    pub fn sign_weight(&self, name: &str) -> Option<Complex64> {
        self.signs.get(name).map(|s| s.weight)
    }

    pub fn hypothesis_weight(&self, name: &str) -> Option<Complex64> {
        self.hypotheses.get(name).map(|s| s.weight)
    }

    /// Symptom names that carry at least one correlation into the
    /// hypothesis block.
    pub fn correlated_symptoms(&self) -> Vec<String> {
        self.symptoms
            .iter()
            .filter(|(_, slot)| self.correlations.iter().any(|c| c.symptom == slot.index))
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl fmt::Display for HypothesisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HypothesisState[{}: dim={}, symptoms={}, signs={}, hypotheses={}, norm={:.4}]",
            self.case_id,
            self.dimension(),
            self.symptoms.len(),
            self.signs.len(),
            self.hypotheses.len(),
            self.norm()
        )
    }
}

/// Scale `amplitudes` to unit norm in place. A zero vector is left as is.
pub(crate) fn normalize(amplitudes: &mut [Complex64]) {
    let norm = amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    if norm > 0.0 {
        for a in amplitudes.iter_mut() {
            *a /= norm;
        }
    }
}
