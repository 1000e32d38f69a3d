use crate::error::{ensure_open_unit, ensure_positive, OlgError, Result};
use serde::{Deserialize, Serialize};

/// Structural parameters of the economy.
///
/// Fields are private so every instance has passed validation, including
/// instances produced by deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParameterWire", into = "ParameterWire")]
pub struct ModelParameters {
    alpha: f64,
    beta: f64,
    theta: f64,
}

/// Unvalidated serde form of [`ModelParameters`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ParameterWire {
    alpha: f64,
    beta: f64,
    theta: f64,
}

impl ModelParameters {
    pub const DEFAULT_ALPHA: f64 = 0.4;
    pub const DEFAULT_BETA: f64 = 0.9;
    pub const DEFAULT_SHORT_RUN_THETA: f64 = 0.5;
    pub const DEFAULT_STEADY_STATE_THETA: f64 = 1.0;

    /// alpha: capital share, beta: discount factor, theta: relative risk aversion.
    pub fn new(alpha: f64, beta: f64, theta: f64) -> Result<Self> {
        ensure_open_unit("alpha", alpha)?;
        ensure_open_unit("beta", beta)?;
        ensure_positive("theta", theta)?;
        Ok(Self { alpha, beta, theta })
    }

    pub fn short_run_default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            beta: Self::DEFAULT_BETA,
            theta: Self::DEFAULT_SHORT_RUN_THETA,
        }
    }

    pub fn steady_state_default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            beta: Self::DEFAULT_BETA,
            theta: Self::DEFAULT_STEADY_STATE_THETA,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// True when theta = 1, where CRRA utility degenerates to ln(c).
    pub fn is_log_utility(&self) -> bool {
        (self.theta - 1.0).abs() <= f64::EPSILON
    }

    /// β^(−1/θ), the discounting term shared by the savings rule and the
    /// accumulation residual.
    pub(crate) fn impatience(&self) -> f64 {
        self.beta.powf(-1.0 / self.theta)
    }
}

impl TryFrom<ParameterWire> for ModelParameters {
    type Error = OlgError;

    fn try_from(wire: ParameterWire) -> Result<Self> {
        Self::new(wire.alpha, wire.beta, wire.theta)
    }
}

impl From<ModelParameters> for ParameterWire {
    fn from(params: ModelParameters) -> Self {
        Self {
            alpha: params.alpha,
            beta: params.beta,
            theta: params.theta,
        }
    }
}
