use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OlgError>;

/// Errors raised by the models and their solvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OlgError {
    /// An input lies outside the range where the model formulas are defined.
    #[error("{name} = {value} is outside its valid domain: {reason}")]
    Domain {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: &'static str },

    #[error("Newton solver failed to converge in {max_steps} steps (x = {x}, |f(x)| = {residual})")]
    NonConvergence {
        max_steps: usize,
        x: f64,
        residual: f64,
    },

    #[error("Newton solver hit a degenerate derivative {derivative} at x = {x}")]
    DegenerateDerivative { x: f64, derivative: f64 },

    #[error("non-finite residual {residual} at x = {x}")]
    NonFiniteResidual { x: f64, residual: f64 },

    /// Valid inputs whose result leaves the range of `f64`.
    #[error("{quantity} evaluated to {value}, outside the representable range")]
    NonFiniteOutput { quantity: &'static str, value: f64 },

    /// First failing point of a dynamics sample.
    #[error("capital update failed at grid point {index} (k = {capital})")]
    DynamicsPoint {
        index: usize,
        capital: f64,
        #[source]
        source: Box<OlgError>,
    },
}

pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OlgError::Domain {
            name,
            value,
            reason: "must be finite",
        })
    }
}

/// Passes `value` through when finite.
pub(crate) fn finite_output(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OlgError::NonFiniteOutput { quantity, value })
    }
}

pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(OlgError::Domain {
            name,
            value,
            reason: "must be strictly positive",
        })
    }
}

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(OlgError::Domain {
            name,
            value,
            reason: "must be non-negative",
        })
    }
}

pub(crate) fn ensure_open_unit(name: &'static str, value: f64) -> Result<()> {
    ensure_finite(name, value)?;
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(OlgError::Domain {
            name,
            value,
            reason: "must lie in the open interval (0, 1)",
        })
    }
}
