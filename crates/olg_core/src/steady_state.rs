//! Capital accumulation: the one-period update map, its fixed point, and
//! transition dynamics.
//!
//! Next-period capital k' solves the market-clearing residual
//!
//! ```text
//! g(k') = k' + k'·β^(−1/θ)·α^(1−1/θ)·k'^((αθ−α+1)/θ) − (1−α)·k^α
//! ```
//!
//! and a steady state is a root of h(k) = g evaluated at k' = k.

use crate::error::{ensure_non_negative, ensure_positive, finite_output, OlgError, Result};
use crate::grid::GridSpec;
use crate::newton::{solve_root, NewtonSettings};
use crate::params::ModelParameters;
use crate::plot::{Marker, PlotData, Series};
use crate::solvers::iterate_map;
use crate::traits::{DiscreteMap, Scalar, ScalarEquation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One sample of the accumulation map: (k_t, k_{t+1}).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionPoint {
    pub current: f64,
    pub next: f64,
}

/// The map g sampled over a grid, in ascending k_t.
pub type DynamicsSample = Vec<TransitionPoint>;

/// A steady state together with y* = α·k*.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteadyStateSummary {
    pub k_star: f64,
    pub y_star: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsPlot {
    pub plot: PlotData,
    pub steady_state: SteadyStateSummary,
}

/// Residual in next-period capital for a fixed current capital.
#[derive(Debug, Clone, Copy)]
pub struct NextCapitalResidual {
    params: ModelParameters,
    capital: f64,
}

impl<T: Scalar> ScalarEquation<T> for NextCapitalResidual {
    fn residual(&self, next: T) -> T {
        market_clearing(&self.params, next, T::constant(self.capital))
    }
}

/// Residual with current and next-period capital tied together.
#[derive(Debug, Clone, Copy)]
pub struct SteadyStateResidual {
    params: ModelParameters,
}

impl<T: Scalar> ScalarEquation<T> for SteadyStateResidual {
    fn residual(&self, capital: T) -> T {
        market_clearing(&self.params, capital, capital)
    }
}

fn market_clearing<T: Scalar>(params: &ModelParameters, next: T, current: T) -> T {
    let alpha = params.alpha();
    let theta = params.theta();
    let scale = params.impatience() * alpha.powf(1.0 - 1.0 / theta);
    let exponent = (alpha * theta - alpha + 1.0) / theta;

    let savings = next + next * T::constant(scale) * next.powf(T::constant(exponent));
    let wage = T::constant(1.0 - alpha) * current.powf(T::constant(alpha));
    savings - wage
}

#[derive(Debug, Clone)]
pub struct SteadyStateModel {
    params: ModelParameters,
    newton: NewtonSettings,
    history: Vec<f64>,
}

impl Default for SteadyStateModel {
    fn default() -> Self {
        Self::new(ModelParameters::steady_state_default())
    }
}

impl SteadyStateModel {
    pub const DEFAULT_INITIAL_GUESS: f64 = 0.2;
    /// Seed for the Newton solve behind every capital update.
    pub const UPDATE_SEED: f64 = 0.1;

    pub fn new(params: ModelParameters) -> Self {
        Self {
            params,
            newton: NewtonSettings::default(),
            history: Vec::new(),
        }
    }

    pub fn with_newton_settings(mut self, settings: NewtonSettings) -> Self {
        self.newton = settings;
        self
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn newton_settings(&self) -> &NewtonSettings {
        &self.newton
    }

    /// Steady states found so far, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn residual(&self, next: f64, current: f64) -> Result<f64> {
        ensure_non_negative("next_capital", next)?;
        ensure_non_negative("capital", current)?;
        finite_output("residual", market_clearing(&self.params, next, current))
    }

    pub fn steady_state_residual(&self, capital: f64) -> Result<f64> {
        ensure_non_negative("capital", capital)?;
        finite_output("steady-state residual", market_clearing(&self.params, capital, capital))
    }

    /// The residual whose root is the update from `capital`, for callers that
    /// want to drive the Newton solver themselves.
    pub fn update_equation(&self, capital: f64) -> NextCapitalResidual {
        NextCapitalResidual {
            params: self.params,
            capital,
        }
    }

    /// Next-period capital implied by current capital `capital`.
    pub fn capital_update(&self, capital: f64) -> Result<f64> {
        ensure_non_negative("capital", capital)?;
        let equation = self.update_equation(capital);
        let result = solve_root(&equation, Self::UPDATE_SEED, self.newton)?;
        debug!(
            capital,
            next = result.root,
            iterations = result.iterations,
            "capital update"
        );
        Ok(result.root)
    }

    /// Locates k* with Newton's method from `initial_guess` and records it.
    pub fn find_steady_state(&mut self, initial_guess: f64) -> Result<f64> {
        ensure_positive("initial_guess", initial_guess)?;
        let equation = SteadyStateResidual {
            params: self.params,
        };
        let result = solve_root(&equation, initial_guess, self.newton)?;
        let summary = self.summarize(result.root);
        info!(
            k_star = summary.k_star,
            y_star = summary.y_star,
            iterations = result.iterations,
            "steady state found"
        );
        self.history.push(result.root);
        Ok(result.root)
    }

    pub fn summarize(&self, k_star: f64) -> SteadyStateSummary {
        SteadyStateSummary {
            k_star,
            y_star: self.params.alpha() * k_star,
        }
    }

    /// Applies the capital update at `n_points` evenly spaced values over
    /// `[k_min, k_max]`. The first failing point aborts the sample and is
    /// reported with its grid index.
    ///
    /// The grid needs `n_points >= 2` and `0 <= k_min < k_max`; a degenerate
    /// one-point grid is `InvalidSettings`. Use [`Self::capital_update`] for a
    /// single capital stock.
    pub fn compute_dynamics(&self, k_min: f64, k_max: f64, n_points: usize) -> Result<DynamicsSample> {
        ensure_non_negative("k_min", k_min)?;
        let grid = GridSpec::new(k_min, k_max, n_points)?;

        grid.points()
            .into_iter()
            .enumerate()
            .map(|(index, current)| {
                self.capital_update(current)
                    .map(|next| TransitionPoint { current, next })
                    .map_err(|source| OlgError::DynamicsPoint {
                        index,
                        capital: current,
                        source: Box::new(source),
                    })
            })
            .collect()
    }

    /// Capital stocks k_0, …, k_periods along the transition from `initial_capital`.
    pub fn transition_path(&self, initial_capital: f64, periods: usize) -> Result<Vec<f64>> {
        ensure_non_negative("initial_capital", initial_capital)?;
        iterate_map(self, initial_capital, periods)
    }

    /// The 45° diagram: g, the identity line, and the steady-state marker.
    /// The steady state is recorded in the history.
    pub fn dynamics_plot(
        &mut self,
        k_min: f64,
        k_max: f64,
        n_points: usize,
        initial_guess: f64,
    ) -> Result<DynamicsPlot> {
        let sample = self.compute_dynamics(k_min, k_max, n_points)?;
        let k_star = self.find_steady_state(initial_guess)?;

        let map = sample.iter().map(|p| [p.current, p.next]).collect();
        let diagonal = sample.iter().map(|p| [p.current, p.current]).collect();
        let plot = PlotData::new("k_t", "k_{t+1}")
            .with_series(Series::new("g", map))
            .with_series(Series::new("45°", diagonal))
            .with_marker(Marker::new("k*", k_star, k_star));

        Ok(DynamicsPlot {
            plot,
            steady_state: self.summarize(k_star),
        })
    }
}

impl DiscreteMap for SteadyStateModel {
    fn next_state(&self, capital: f64) -> Result<f64> {
        self.capital_update(capital)
    }
}
