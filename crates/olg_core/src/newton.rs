use crate::autodiff::{value_and_derivative, Dual};
use crate::error::{ensure_finite, OlgError, Result};
use crate::traits::ScalarEquation;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonSettings {
    pub max_steps: usize,
    pub damping: f64,
    /// Convergence threshold on |f(x)|.
    pub tolerance: f64,
    /// Convergence threshold on the Newton step |Δx|.
    pub step_tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 50,
            damping: 1.0,
            tolerance: 1e-10,
            step_tolerance: 1.48e-8,
        }
    }
}

impl NewtonSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(OlgError::InvalidSettings {
                reason: "max_steps must be greater than zero",
            });
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(OlgError::InvalidSettings {
                reason: "damping must lie in (0, 1]",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(OlgError::InvalidSettings {
                reason: "tolerance must be positive and finite",
            });
        }
        if !(self.step_tolerance.is_finite() && self.step_tolerance >= 0.0) {
            return Err(OlgError::InvalidSettings {
                reason: "step_tolerance must be non-negative and finite",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootResult {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Finds a root of `equation` by Newton's method seeded at `initial_guess`.
///
/// Derivatives come from evaluating the residual on Dual numbers, so the
/// equation only has to be written once, generically over `Scalar`.
pub fn solve_root<E>(equation: &E, initial_guess: f64, settings: NewtonSettings) -> Result<RootResult>
where
    E: ScalarEquation<Dual> + ?Sized,
{
    settings.validate()?;
    ensure_finite("initial_guess", initial_guess)?;

    let mut x = initial_guess;
    let (mut value, mut slope) = value_and_derivative(equation, x);
    let mut iterations = 0usize;

    loop {
        if !value.is_finite() {
            return Err(OlgError::NonFiniteResidual { x, residual: value });
        }
        if value.abs() <= settings.tolerance {
            break;
        }
        if iterations >= settings.max_steps {
            return Err(OlgError::NonConvergence {
                max_steps: settings.max_steps,
                x,
                residual: value.abs(),
            });
        }
        if slope == 0.0 || !slope.is_finite() {
            return Err(OlgError::DegenerateDerivative {
                x,
                derivative: slope,
            });
        }

        let step = settings.damping * value / slope;
        x -= step;
        iterations += 1;
        (value, slope) = value_and_derivative(equation, x);
        trace!(iterations, x, residual = value, "newton step");

        if step.abs() <= settings.step_tolerance && value.is_finite() {
            break;
        }
    }

    Ok(RootResult {
        root: x,
        residual: value,
        iterations,
    })
}
