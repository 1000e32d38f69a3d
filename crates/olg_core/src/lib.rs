pub mod autodiff;
pub mod error;
pub mod grid;
pub mod newton;
pub mod params;
pub mod plot;
pub mod short_run;
pub mod solvers;
pub mod steady_state;
/// The `olg_core` crate computes equilibria of a two-period overlapping-generations economy.
/// Every model is generic over `Scalar` so the same residual code runs on `f64` and on
/// Dual numbers, which is how Newton's method obtains exact derivatives.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `ScalarEquation` (residuals), `DiscreteMap` (accumulation laws).
/// - **Short run**: demand/supply curves of the capital market and the rate-grid clearing scan.
/// - **Steady state**: the capital-accumulation map, its fixed point, and transition dynamics.
/// - **Plot**: pure-data series and markers handed to an external rendering surface.
pub mod traits;

pub use error::{OlgError, Result};
pub use params::ModelParameters;
pub use short_run::{EquilibriumPoint, ShortRunMarketModel};
pub use steady_state::{SteadyStateModel, TransitionPoint};
