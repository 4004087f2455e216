use crate::error::HypothesisError;
use crate::state::HypothesisState;
use crate::virtue::std_dev;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hypothesis weights above this magnitude count as active.
pub const ACTIVATION_THRESHOLD: f64 = 0.1;

/// Seeded placeholders sit exactly on the threshold; rounding in the polar
/// form must not promote them.
const ACTIVATION_TOLERANCE: f64 = 1e-9;

const COUNT_UNCERTAINTY: f64 = 0.1;

/// Named observables a state can be measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Observable {
    /// Largest probability, with the spread of the distribution.
    DominantConfidence,
    /// Mean symptom magnitude, with its spread.
    MagnitudeSeverity,
    /// Number of active hypotheses, with a nominal uncertainty.
    ActiveHypothesisCount,
}

impl Observable {
    pub const ALL: [Observable; 3] = [
        Self::DominantConfidence,
        Self::MagnitudeSeverity,
        Self::ActiveHypothesisCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DominantConfidence => "dominant-confidence",
            Self::MagnitudeSeverity => "magnitude-severity",
            Self::ActiveHypothesisCount => "active-hypothesis-count",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Observable {
    type Err = HypothesisError;

    /// Accepts the kebab-case names plus the legacy
    /// `diagnostic_confidence` / `symptom_severity` / `differential_count`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dominant-confidence" | "dominant_confidence" | "diagnostic_confidence" => {
                Ok(Self::DominantConfidence)
            }
            "magnitude-severity" | "magnitude_severity" | "symptom_severity" => {
                Ok(Self::MagnitudeSeverity)
            }
            "active-hypothesis-count" | "active_hypothesis_count" | "differential_count" => {
                Ok(Self::ActiveHypothesisCount)
            }
            other => Err(HypothesisError::UnknownObservable(other.to_string())),
        }
    }
}

/// A measured value and its uncertainty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measured {
    pub value: f64,
    pub uncertainty: f64,
}

impl From<Measured> for (f64, f64) {
    fn from(m: Measured) -> Self {
        (m.value, m.uncertainty)
    }
}

/// Extract an observable from a state.
pub fn measure(state: &HypothesisState, observable: Observable) -> Measured {
    match observable {
        Observable::DominantConfidence => {
            let probabilities = state.probabilities();
            let value = probabilities.iter().copied().fold(0.0, f64::max);
            Measured {
                value,
                uncertainty: std_dev(&probabilities),
            }
        }
        Observable::MagnitudeSeverity => {
            let magnitudes: Vec<f64> = state.symptoms.values().map(|s| s.weight.norm()).collect();
            if magnitudes.is_empty() {
                return Measured {
                    value: 0.0,
                    uncertainty: 0.0,
                };
            }
            Measured {
                value: magnitudes.iter().sum::<f64>() / magnitudes.len() as f64,
                uncertainty: std_dev(&magnitudes),
            }
        }
        Observable::ActiveHypothesisCount => {
            let active = state
                .hypotheses
                .values()
                .filter(|s| s.weight.norm() > ACTIVATION_THRESHOLD + ACTIVATION_TOLERANCE)
                .count();
            Measured {
                value: active as f64,
                uncertainty: COUNT_UNCERTAINTY,
            }
        }
    }
}

/// Measure by name. Unknown names are an error.
pub fn measure_named(state: &HypothesisState, observable: &str) -> Result<Measured, HypothesisError> {
    Ok(measure(state, observable.parse()?))
}

/// L1 norm of the amplitudes divided by the dimension.
pub fn coherence(state: &HypothesisState) -> f64 {
    if state.dimension() == 0 {
        return 0.0;
    }
    state.amplitudes.iter().map(|a| a.norm()).sum::<f64>() / state.dimension() as f64
}

/// Shannon entropy (natural log) of the probability distribution.
pub fn entanglement_entropy(state: &HypothesisState) -> f64 {
    -state
        .amplitudes
        .iter()
        .map(|a| a.norm_sqr())
        .filter(|p| *p > 0.0)
        .map(|p| p * p.ln())
        .sum::<f64>()
}
