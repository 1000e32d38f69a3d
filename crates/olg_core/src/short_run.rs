//! Short-run capital market: demand and supply curves and the clearing scan.

use crate::error::{ensure_non_negative, ensure_positive, finite_output, OlgError, Result};
use crate::grid::{GridSpec, RateGrid};
use crate::params::ModelParameters;
use crate::plot::{Marker, PlotData, Series};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A market-clearing rate and the capital traded at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPoint {
    pub rate: f64,
    pub capital: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub grid: RateGrid,
    /// Largest accepted |demand − supply| at a grid point.
    pub tolerance: f64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            grid: RateGrid::default(),
            tolerance: ShortRunMarketModel::DEFAULT_TOLERANCE,
        }
    }
}

impl ScanSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(OlgError::Domain {
                name: "tolerance",
                value: self.tolerance,
                reason: "must be positive and finite",
            });
        }
        self.grid.validate()
    }
}

/// Demand and supply sampled over the same rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCurves {
    pub demand: Series,
    pub supply: Series,
}

#[derive(Debug, Clone)]
pub struct ShortRunMarketModel {
    params: ModelParameters,
    history: Vec<EquilibriumPoint>,
}

impl Default for ShortRunMarketModel {
    fn default() -> Self {
        Self::new(ModelParameters::short_run_default())
    }
}

impl ShortRunMarketModel {
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    pub fn new(params: ModelParameters) -> Self {
        Self {
            params,
            history: Vec::new(),
        }
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Equilibria found so far, oldest first.
    pub fn history(&self) -> &[EquilibriumPoint] {
        &self.history
    }

    /// CRRA utility c^(1−θ)/(1−θ); ln(c) when θ = 1.
    pub fn utility(&self, consumption: f64) -> Result<f64> {
        ensure_positive("consumption", consumption)?;
        if self.params.is_log_utility() {
            return Ok(consumption.ln());
        }
        let exponent = 1.0 - self.params.theta();
        finite_output("utility", consumption.powf(exponent) / exponent)
    }

    /// Capital demanded by firms at gross rate `rate`: (α/R)^(1/(1−α)).
    pub fn capital_demand(&self, rate: f64) -> Result<f64> {
        ensure_positive("rate", rate)?;
        finite_output("capital demand", self.demand_at(rate))
    }

    /// Savings of the young out of `wage` at rate `rate`.
    pub fn savings_supply(&self, wage: f64, rate: f64) -> Result<f64> {
        ensure_non_negative("wage", wage)?;
        ensure_positive("rate", rate)?;
        finite_output("savings supply", self.supply_at(wage, rate))
    }

    /// Scans the default rate grid with the given tolerance.
    ///
    /// Returns `Ok(None)` when no grid point clears the market; the history is
    /// only extended on success.
    pub fn find_equilibrium(
        &mut self,
        wage: f64,
        tolerance: f64,
    ) -> Result<Option<EquilibriumPoint>> {
        self.find_equilibrium_with(
            wage,
            ScanSettings {
                tolerance,
                ..ScanSettings::default()
            },
        )
    }

    /// Scans `settings.grid` in ascending order and reports the first rate at
    /// which demand and supply agree within `settings.tolerance`. When several
    /// rates qualify the lowest one wins.
    pub fn find_equilibrium_with(
        &mut self,
        wage: f64,
        settings: ScanSettings,
    ) -> Result<Option<EquilibriumPoint>> {
        ensure_non_negative("wage", wage)?;
        settings.validate()?;
        debug!(
            wage,
            tolerance = settings.tolerance,
            points = settings.grid.len(),
            "scanning rate grid"
        );

        let found = settings.grid.rates().find_map(|rate| {
            let demand = self.demand_at(rate);
            let gap = demand - self.supply_at(wage, rate);
            (gap.abs() <= settings.tolerance).then_some(EquilibriumPoint {
                rate,
                capital: demand,
            })
        });

        match found {
            Some(point) => {
                info!(
                    rate = point.rate,
                    capital = point.capital,
                    wage,
                    "short-run equilibrium found"
                );
                self.history.push(point);
            }
            None => warn!(
                wage,
                tolerance = settings.tolerance,
                "no market-clearing rate on the grid"
            ),
        }
        Ok(found)
    }

    /// Demand and supply curves over an evenly spaced, strictly positive rate grid.
    /// Fails if either curve overflows anywhere on the grid.
    pub fn market_curves(&self, wage: f64, rates: GridSpec) -> Result<MarketCurves> {
        ensure_non_negative("wage", wage)?;
        rates.validate()?;
        ensure_positive("rate", rates.min)?;

        let xs = rates.points();
        let curves = MarketCurves {
            demand: Series::sampled("demand", &xs, |rate| self.demand_at(rate)),
            supply: Series::sampled("supply", &xs, |rate| self.supply_at(wage, rate)),
        };
        for series in [&curves.demand, &curves.supply] {
            for &[_, value] in &series.points {
                finite_output("market curve", value)?;
            }
        }
        Ok(curves)
    }

    /// The market diagram: both curves plus the equilibrium marker when one
    /// exists. A found equilibrium is recorded in the history.
    pub fn market_plot(
        &mut self,
        wage: f64,
        rates: GridSpec,
        settings: ScanSettings,
    ) -> Result<PlotData> {
        let curves = self.market_curves(wage, rates)?;
        let equilibrium = self.find_equilibrium_with(wage, settings)?;

        let mut plot = PlotData::new("R", "k")
            .with_series(curves.demand)
            .with_series(curves.supply);
        if let Some(point) = equilibrium {
            plot = plot.with_marker(Marker::new("equilibrium", point.rate, point.capital));
        }
        Ok(plot)
    }

    fn demand_at(&self, rate: f64) -> f64 {
        let alpha = self.params.alpha();
        (alpha / rate).powf(1.0 / (1.0 - alpha))
    }

    fn supply_at(&self, wage: f64, rate: f64) -> f64 {
        let theta = self.params.theta();
        wage / (1.0 + self.params.impatience() * rate.powf((theta - 1.0) / theta))
    }
}

#[cfg(test)]
mod tests {
    use super::{ScanSettings, ShortRunMarketModel};
    use crate::error::OlgError;
    use crate::grid::{GridSpec, RateGrid};
    use crate::params::ModelParameters;
    use approx::assert_relative_eq;

    fn model() -> ShortRunMarketModel {
        ShortRunMarketModel::default()
    }

    #[test]
    fn utility_is_crra() {
        let model = model();
        // θ = 0.5: c^0.5 / 0.5
        assert_relative_eq!(model.utility(4.0).expect("utility"), 4.0, epsilon = 1e-12);
        assert!(matches!(
            model.utility(0.0),
            Err(OlgError::Domain {
                name: "consumption",
                ..
            })
        ));
        assert!(model.utility(-1.0).is_err());
    }

    #[test]
    fn utility_uses_log_when_theta_is_one() {
        let model = ShortRunMarketModel::new(ModelParameters::steady_state_default());
        assert_relative_eq!(
            model.utility(std::f64::consts::E).expect("utility"),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn demand_and_supply_match_closed_forms() {
        let model = model();
        assert_relative_eq!(model.capital_demand(0.4).expect("demand"), 1.0, epsilon = 1e-12);
        // θ = 0.5 gives exponent −1: w / (1 + β^−2 / R)
        let expected = 1.0 / (1.0 + 0.9_f64.powi(-2) / 0.5);
        assert_relative_eq!(
            model.savings_supply(1.0, 0.5).expect("supply"),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn curves_reject_invalid_inputs() {
        let model = model();
        assert!(model.capital_demand(0.0).is_err());
        assert!(model.capital_demand(-0.5).is_err());
        assert!(model.savings_supply(-1.0, 0.5).is_err());
        assert!(model.savings_supply(1.0, 0.0).is_err());
        assert!(model.savings_supply(f64::NAN, 0.5).is_err());
    }

    #[test]
    fn overflowing_curves_are_errors() {
        let params = ModelParameters::new(0.99, 0.9, 0.5).expect("valid parameters");
        let model = ShortRunMarketModel::new(params);
        // (0.99 / 1e-4)^100 exceeds f64::MAX.
        assert!(matches!(
            model.capital_demand(1e-4),
            Err(OlgError::NonFiniteOutput {
                quantity: "capital demand",
                ..
            })
        ));
        let rates = GridSpec::new(1e-4, 1.0, 10).expect("grid");
        assert!(matches!(
            model.market_curves(1.0, rates),
            Err(OlgError::NonFiniteOutput { .. })
        ));
        assert!(model.capital_demand(0.5).expect("demand").is_finite());
    }

    #[test]
    fn utility_overflow_is_an_error() {
        let params = ModelParameters::new(0.4, 0.9, 3.0).expect("valid parameters");
        let model = ShortRunMarketModel::new(params);
        // (1e-300)^(-2) / (-2) is -inf.
        assert!(matches!(
            model.utility(1e-300),
            Err(OlgError::NonFiniteOutput {
                quantity: "utility",
                ..
            })
        ));
    }

    #[test]
    fn finds_equilibrium_for_unit_wage() {
        let mut model = model();
        let point = model
            .find_equilibrium(1.0, 1e-4)
            .expect("valid inputs")
            .expect("equilibrium exists");

        assert!(point.rate > 0.0 && point.rate < 1.0);
        let demand = model.capital_demand(point.rate).expect("demand");
        let supply = model.savings_supply(1.0, point.rate).expect("supply");
        assert!((demand - supply).abs() <= 1e-4);
        assert_eq!(point.capital, demand);
        assert_eq!(model.history(), &[point]);
    }

    #[test]
    fn scan_is_deterministic() {
        let first = model().find_equilibrium(1.0, 1e-4).expect("valid");
        let second = model().find_equilibrium(1.0, 1e-4).expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn scan_reports_lowest_qualifying_rate() {
        let mut model = model();
        let tolerance = 0.05;
        let point = model
            .find_equilibrium(1.0, tolerance)
            .expect("valid")
            .expect("loose tolerance finds a point");

        let previous = point.rate - RateGrid::default().step;
        let gap = model.capital_demand(previous).expect("demand")
            - model.savings_supply(1.0, previous).expect("supply");
        assert!(gap.abs() > tolerance, "an earlier grid point also qualified");
    }

    #[test]
    fn tiny_wage_finds_nothing_and_leaves_history_untouched() {
        let mut model = model();
        let result = model.find_equilibrium(1e-9, 1e-4).expect("valid inputs");
        assert_eq!(result, None);
        assert!(model.history().is_empty());
    }

    #[test]
    fn history_appends_in_call_order() {
        let mut model = model();
        let first = model.find_equilibrium(1.0, 1e-4).expect("valid").expect("found");
        let _ = model.find_equilibrium(1e-9, 1e-4).expect("valid");
        let second = model.find_equilibrium(0.5, 1e-4).expect("valid").expect("found");
        assert_eq!(model.history(), &[first, second]);
        assert!(second.rate > first.rate, "a lower wage raises the clearing rate");
    }

    #[test]
    fn scan_rejects_invalid_arguments() {
        let mut model = model();
        assert!(model.find_equilibrium(-1.0, 1e-4).is_err());
        assert!(matches!(
            model.find_equilibrium(1.0, 0.0),
            Err(OlgError::Domain {
                name: "tolerance",
                ..
            })
        ));
        let bad_grid = ScanSettings {
            grid: RateGrid {
                step: 0.0,
                ..RateGrid::default()
            },
            ..ScanSettings::default()
        };
        assert!(matches!(
            model.find_equilibrium_with(1.0, bad_grid),
            Err(OlgError::InvalidSettings { .. })
        ));
        assert!(model.history().is_empty());
    }

    #[test]
    fn market_plot_marks_the_equilibrium() {
        let mut model = model();
        let rates = GridSpec::new(0.1, 1.0, 50).expect("grid");
        let plot = model
            .market_plot(1.0, rates, ScanSettings::default())
            .expect("plot");

        let demand = plot.series_named("demand").expect("demand series");
        let supply = plot.series_named("supply").expect("supply series");
        assert_eq!(demand.points.len(), 50);
        assert_eq!(supply.points.len(), 50);
        assert_eq!(demand.points[0][0], 0.1);
        assert_eq!(plot.markers.len(), 1);
        assert_eq!(plot.markers[0].x, model.history()[0].rate);
    }

    #[test]
    fn market_curves_require_positive_rates() {
        let model = model();
        let rates = GridSpec::new(0.0, 1.0, 10).expect("grid");
        assert!(model.market_curves(1.0, rates).is_err());
    }
}
