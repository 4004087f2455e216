use crate::error::HypothesisError;
use crate::state::{normalize, HypothesisState};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;

/// Scale of the complex-normal perturbation entries.
const PERTURBATION_SCALE: f64 = 0.01;

/// Advance a state by `time_step` using the thread-local RNG.
pub fn evolve(state: &HypothesisState, time_step: f64) -> Result<HypothesisState, HypothesisError> {
    evolve_with_rng(state, time_step, &mut rand::thread_rng())
}

/// Advance a state by `time_step`.
///
/// The state is multiplied by `I + time_step * P`, where `P` has complex
/// standard-normal entries scaled by 0.01, renormalized to unit norm and
/// then damped by `exp(-decoherence_rate * time_step)`. The damping is not
/// renormalized away, so total probability may fall below one.
pub fn evolve_with_rng<R: Rng + ?Sized>(
    state: &HypothesisState,
    time_step: f64,
    rng: &mut R,
) -> Result<HypothesisState, HypothesisError> {
    if !time_step.is_finite() || time_step < 0.0 {
        return Err(HypothesisError::InvalidTimeStep(time_step));
    }

    let scale = time_step * PERTURBATION_SCALE;
    let mut next = Vec::with_capacity(state.dimension());
    for &own in &state.amplitudes {
        let mut acc = own;
        for &other in &state.amplitudes {
            let re: f64 = rng.sample(StandardNormal);
            let im: f64 = rng.sample(StandardNormal);
            acc += Complex64::new(re, im) * scale * other;
        }
        next.push(acc);
    }

    normalize(&mut next);
    let damping = (-state.decoherence_rate * time_step).exp();
    for a in next.iter_mut() {
        *a *= damping;
    }

    Ok(HypothesisState {
        case_id: state.case_id.clone(),
        amplitudes: next,
        symptoms: state.symptoms.clone(),
        signs: state.signs.clone(),
        hypotheses: state.hypotheses.clone(),
        correlations: state.correlations.clone(),
        decoherence_rate: state.decoherence_rate,
    })
}
