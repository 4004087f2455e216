//! The four virtue supervisors.
//!
//! Each supervisor is a pure function of a state and a [`ClinicalContext`]
//! returning a score in `[0, 1]`. None of them mutate the state.

use crate::state::HypothesisState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied context the supervisors read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalContext {
    /// Preference for conservative options, `[0, 1]`.
    pub conservative_bias: f64,
    /// Any entry vetoes the judgment.
    pub harm_indicators: Vec<String>,
}

impl Default for ClinicalContext {
    fn default() -> Self {
        Self {
            conservative_bias: 0.8,
            harm_indicators: Vec::new(),
        }
    }
}

impl ClinicalContext {
    pub fn with_conservative_bias(mut self, bias: f64) -> Self {
        self.conservative_bias = bias;
        self
    }

    pub fn with_harm_indicator(mut self, indicator: impl Into<String>) -> Self {
        self.harm_indicators.push(indicator.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtue {
    Honesty,
    Prudence,
    Justice,
    NonMaleficence,
}

impl Virtue {
    pub const ALL: [Virtue; 4] = [
        Self::Honesty,
        Self::Prudence,
        Self::Justice,
        Self::NonMaleficence,
    ];
}

impl fmt::Display for Virtue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Honesty => write!(f, "honesty"),
            Self::Prudence => write!(f, "prudence"),
            Self::Justice => write!(f, "justice"),
            Self::NonMaleficence => write!(f, "non_maleficence"),
        }
    }
}

/// One independently configurable scorer.
pub trait VirtueSupervisor: Send + Sync {
    fn virtue(&self) -> Virtue;

    /// Score in `[0, 1]`.
    fn score(&self, state: &HypothesisState, context: &ClinicalContext) -> f64;
}

/// Rewards surfaced uncertainty: spread of magnitudes across the vector.
#[derive(Clone, Copy, Debug)]
pub struct Honesty {
    /// Standard deviation that earns a full score.
    pub full_spread: f64,
}

impl Default for Honesty {
    fn default() -> Self {
        Self { full_spread: 0.5 }
    }
}

impl VirtueSupervisor for Honesty {
    fn virtue(&self) -> Virtue {
        Virtue::Honesty
    }

    fn score(&self, state: &HypothesisState, _context: &ClinicalContext) -> f64 {
        let magnitudes: Vec<f64> = state.amplitudes.iter().map(|a| a.norm()).collect();
        (std_dev(&magnitudes) / self.full_spread).clamp(0.0, 1.0)
    }
}

/// Returns the context's conservative bias.
#[derive(Clone, Copy, Debug, Default)]
pub struct Prudence;

impl VirtueSupervisor for Prudence {
    fn virtue(&self) -> Virtue {
        Virtue::Prudence
    }

    fn score(&self, _state: &HypothesisState, context: &ClinicalContext) -> f64 {
        if context.conservative_bias.is_nan() {
            return 0.0;
        }
        context.conservative_bias.clamp(0.0, 1.0)
    }
}

/// Normalized Shannon entropy of the probability distribution.
#[derive(Clone, Copy, Debug, Default)]
pub struct Justice;

impl VirtueSupervisor for Justice {
    fn virtue(&self) -> Virtue {
        Virtue::Justice
    }

    fn score(&self, state: &HypothesisState, _context: &ClinicalContext) -> f64 {
        let max_entropy = (state.dimension() as f64).ln();
        if max_entropy <= 0.0 {
            return 0.0;
        }
        (crate::measure::entanglement_entropy(state) / max_entropy).clamp(0.0, 1.0)
    }
}

/// Hard veto: zero when any harm indicator is present.
#[derive(Clone, Copy, Debug, Default)]
pub struct NonMaleficence;

impl VirtueSupervisor for NonMaleficence {
    fn virtue(&self) -> Virtue {
        Virtue::NonMaleficence
    }

    fn score(&self, _state: &HypothesisState, context: &ClinicalContext) -> f64 {
        if context.harm_indicators.is_empty() {
            1.0
        } else {
            0.0
        }
    }
}

/// Scores from all four supervisors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtueScores {
    pub honesty: f64,
    pub prudence: f64,
    pub justice: f64,
    pub non_maleficence: f64,
}

impl VirtueScores {
    pub fn get(&self, virtue: Virtue) -> f64 {
        match virtue {
            Virtue::Honesty => self.honesty,
            Virtue::Prudence => self.prudence,
            Virtue::Justice => self.justice,
            Virtue::NonMaleficence => self.non_maleficence,
        }
    }

    pub(crate) fn set(&mut self, virtue: Virtue, score: f64) {
        match virtue {
            Virtue::Honesty => self.honesty = score,
            Virtue::Prudence => self.prudence = score,
            Virtue::Justice => self.justice = score,
            Virtue::NonMaleficence => self.non_maleficence = score,
        }
    }

    /// Arithmetic mean: the virtue compliance.
    pub fn mean(&self) -> f64 {
        (self.honesty + self.prudence + self.justice + self.non_maleficence) / 4.0
    }

    pub fn vetoed(&self) -> bool {
        self.non_maleficence == 0.0
    }
}

/// Population standard deviation; zero for fewer than one value.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}
