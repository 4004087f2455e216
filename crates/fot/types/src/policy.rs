use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// Policy that decides when a claim may be marked final.
///
/// Declared per claim or per trial endpoint. Invariants:
/// `replications >= 1` and `min_completeness` in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsePolicy {
    /// Independent replications required before collapse.
    pub replications: u32,
    /// Statistical-significance budget spent on this claim, if any.
    pub alpha_spent: Option<f64>,
    /// Minimum data completeness fraction.
    pub min_completeness: f64,
    /// Maximum allowed disagreement between independent toolchains.
    /// `None` means no constraint.
    pub agreement_delta_max: Option<f64>,
}

impl CollapsePolicy {
    /// Create a policy with no alpha budget and no agreement constraint.
    pub fn new(replications: u32, min_completeness: f64) -> Result<Self, TypesError> {
        let policy = Self {
            replications,
            alpha_spent: None,
            min_completeness,
            agreement_delta_max: None,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_alpha_spent(mut self, alpha: f64) -> Self {
        self.alpha_spent = Some(alpha);
        self
    }

    pub fn with_agreement_delta_max(mut self, delta: f64) -> Self {
        self.agreement_delta_max = Some(delta);
        self
    }

    pub fn without_agreement_constraint(mut self) -> Self {
        self.agreement_delta_max = None;
        self
    }

    /// Check the policy invariants.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.replications < 1 {
            return Err(TypesError::InvalidPolicy(
                "replications must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_completeness) {
            return Err(TypesError::InvalidPolicy(format!(
                "min completeness {} outside [0, 1]",
                self.min_completeness
            )));
        }
        if let Some(alpha) = self.alpha_spent {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(TypesError::InvalidPolicy(format!(
                    "alpha spent {} outside [0, 1]",
                    alpha
                )));
            }
        }
        if let Some(delta) = self.agreement_delta_max {
            if !delta.is_finite() || delta < 0.0 {
                return Err(TypesError::InvalidPolicy(format!(
                    "agreement delta max {} must be a non-negative number",
                    delta
                )));
            }
        }
        Ok(())
    }
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        Self {
            replications: 2,
            alpha_spent: None,
            min_completeness: 0.9,
            agreement_delta_max: Some(0.05),
        }
    }
}
