use crate::error::Result;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in the model equations.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {
    /// Lifts a plain constant into the scalar type.
    fn constant(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::nan)
    }
}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A scalar equation in one unknown, solved for `residual(x) = 0`.
///
/// Implementations are usually generic over `T: Scalar` so that a single
/// formula serves both plain evaluation and derivative evaluation.
pub trait ScalarEquation<T: Scalar> {
    fn residual(&self, x: T) -> T;
}

/// A one-dimensional discrete map x_{t+1} = g(x_t) whose evaluation may fail.
pub trait DiscreteMap {
    fn next_state(&self, x: f64) -> Result<f64>;
}
