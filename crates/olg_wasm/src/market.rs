//! Short-run capital market wrapper.

use crate::shared::{build_params, flatten_pairs, serialize, to_js_error};
use js_sys::Float64Array;
use olg_core::grid::GridSpec;
use olg_core::short_run::ScanSettings;
use olg_core::ShortRunMarketModel;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmShortRunModel {
    model: ShortRunMarketModel,
}

#[wasm_bindgen]
impl WasmShortRunModel {
    #[wasm_bindgen(constructor)]
    pub fn new(alpha: f64, beta: f64, theta: f64) -> Result<WasmShortRunModel, JsValue> {
        console_error_panic_hook::set_once();
        let params = build_params(alpha, beta, theta).map_err(to_js_error)?;
        Ok(WasmShortRunModel {
            model: ShortRunMarketModel::new(params),
        })
    }

    pub fn utility(&self, consumption: f64) -> Result<f64, JsValue> {
        self.model
            .utility(consumption)
            .map_err(|e| JsValue::from_str(&format!("Utility failed: {}", e)))
    }

    pub fn capital_demand(&self, rate: f64) -> Result<f64, JsValue> {
        self.model
            .capital_demand(rate)
            .map_err(|e| JsValue::from_str(&format!("Capital demand failed: {}", e)))
    }

    pub fn savings_supply(&self, wage: f64, rate: f64) -> Result<f64, JsValue> {
        self.model
            .savings_supply(wage, rate)
            .map_err(|e| JsValue::from_str(&format!("Savings supply failed: {}", e)))
    }

    /// Returns `[rate, capital]`, or an empty array when no grid rate clears
    /// the market.
    pub fn find_equilibrium(&mut self, wage: f64, tolerance: f64) -> Result<Vec<f64>, JsValue> {
        let found = self
            .model
            .find_equilibrium(wage, tolerance)
            .map_err(|e| JsValue::from_str(&format!("Equilibrium search failed: {}", e)))?;
        Ok(found
            .map(|point| vec![point.rate, point.capital])
            .unwrap_or_default())
    }

    /// Demand followed by supply, each flattened as `[R0, k0, R1, k1, ...]`.
    pub fn market_curves(
        &self,
        wage: f64,
        rate_min: f64,
        rate_max: f64,
        samples: usize,
    ) -> Result<Vec<f64>, JsValue> {
        let grid = GridSpec::new(rate_min, rate_max, samples)
            .map_err(|e| JsValue::from_str(&format!("Invalid rate grid: {}", e)))?;
        let curves = self
            .model
            .market_curves(wage, grid)
            .map_err(|e| JsValue::from_str(&format!("Market curves failed: {}", e)))?;
        Ok(flatten_pairs(
            curves
                .demand
                .points
                .into_iter()
                .chain(curves.supply.points),
        ))
    }

    /// Full market diagram as a plot object; records the equilibrium.
    pub fn market_plot(
        &mut self,
        wage: f64,
        rate_min: f64,
        rate_max: f64,
        samples: usize,
        tolerance: f64,
    ) -> Result<JsValue, JsValue> {
        let grid = GridSpec::new(rate_min, rate_max, samples)
            .map_err(|e| JsValue::from_str(&format!("Invalid rate grid: {}", e)))?;
        let settings = ScanSettings {
            tolerance,
            ..ScanSettings::default()
        };
        let plot = self
            .model
            .market_plot(wage, grid, settings)
            .map_err(|e| JsValue::from_str(&format!("Market plot failed: {}", e)))?;
        serialize(&plot)
    }

    /// Recorded equilibria flattened as `[R0, k0, R1, k1, ...]`.
    pub fn history(&self) -> Float64Array {
        let flat = flatten_pairs(
            self.model
                .history()
                .iter()
                .map(|point| [point.rate, point.capital]),
        );
        Float64Array::from(flat.as_slice())
    }

    pub fn history_len(&self) -> usize {
        self.model.history().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_model() -> WasmShortRunModel {
        WasmShortRunModel::new(0.4, 0.9, 0.5).expect("default parameters are valid")
    }

    #[test]
    fn find_equilibrium_returns_pair_and_records_it() {
        let mut model = default_model();
        let pair = model.find_equilibrium(1.0, 1e-4).expect("search");
        assert_eq!(pair.len(), 2);
        assert!(pair[0] > 0.0 && pair[0] < 1.0);
        assert_eq!(model.history_len(), 1);
    }

    #[test]
    fn find_equilibrium_returns_empty_when_nothing_clears() {
        let mut model = default_model();
        let pair = model.find_equilibrium(1e-9, 1e-4).expect("search");
        assert!(pair.is_empty());
        assert_eq!(model.history_len(), 0);
    }

    #[test]
    fn market_curves_concatenate_demand_and_supply() {
        let model = default_model();
        let flat = model.market_curves(1.0, 0.1, 1.0, 10).expect("curves");
        assert_eq!(flat.len(), 2 * 2 * 10);
        // First pair is demand at R = 0.1, pair 10 is supply at R = 0.1.
        assert_eq!(flat[0], 0.1);
        assert_eq!(flat[20], 0.1);
        assert!(flat[1] > flat[21], "demand exceeds supply at low rates");
    }

    #[test]
    #[cfg(target_arch = "wasm32")]
    fn constructor_rejects_invalid_alpha() {
        let result = WasmShortRunModel::new(1.5, 0.9, 0.5);
        let message = result.err().and_then(|err| err.as_string()).unwrap_or_default();
        assert!(message.contains("Invalid model parameters"));
    }
}
