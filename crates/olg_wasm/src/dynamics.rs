//! Steady-state and transition-dynamics wrapper.

use crate::shared::{build_params, flatten_pairs, parse_newton_settings, serialize, to_js_error};
use anyhow::{Context, Result};
use js_sys::Float64Array;
use olg_core::newton::NewtonSettings;
use olg_core::SteadyStateModel;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmSteadyStateModel {
    model: SteadyStateModel,
}

fn build_model(
    alpha: f64,
    beta: f64,
    theta: f64,
    settings: Option<NewtonSettings>,
) -> Result<SteadyStateModel> {
    let params = build_params(alpha, beta, theta)?;
    let settings = settings.unwrap_or_default();
    settings.validate().context("Invalid Newton settings")?;
    Ok(SteadyStateModel::new(params).with_newton_settings(settings))
}

#[wasm_bindgen]
impl WasmSteadyStateModel {
    /// `newton_settings` may be `undefined` for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        alpha: f64,
        beta: f64,
        theta: f64,
        newton_settings: JsValue,
    ) -> Result<WasmSteadyStateModel, JsValue> {
        console_error_panic_hook::set_once();
        let settings = parse_newton_settings(newton_settings)?;
        let model = build_model(alpha, beta, theta, settings).map_err(to_js_error)?;
        Ok(WasmSteadyStateModel { model })
    }

    pub fn residual(&self, next: f64, current: f64) -> Result<f64, JsValue> {
        self.model
            .residual(next, current)
            .map_err(|e| JsValue::from_str(&format!("Residual failed: {}", e)))
    }

    pub fn steady_state_residual(&self, capital: f64) -> Result<f64, JsValue> {
        self.model
            .steady_state_residual(capital)
            .map_err(|e| JsValue::from_str(&format!("Residual failed: {}", e)))
    }

    pub fn capital_update(&self, capital: f64) -> Result<f64, JsValue> {
        self.model
            .capital_update(capital)
            .map_err(|e| JsValue::from_str(&format!("Capital update failed: {}", e)))
    }

    pub fn find_steady_state(&mut self, initial_guess: f64) -> Result<f64, JsValue> {
        self.model
            .find_steady_state(initial_guess)
            .map_err(|e| JsValue::from_str(&format!("Steady state solve failed: {}", e)))
    }

    /// Samples flattened as `[k_0, k'_0, k_1, k'_1, ...]`.
    pub fn compute_dynamics(
        &self,
        k_min: f64,
        k_max: f64,
        n_points: usize,
    ) -> Result<Vec<f64>, JsValue> {
        let sample = self
            .model
            .compute_dynamics(k_min, k_max, n_points)
            .map_err(|e| JsValue::from_str(&format!("Dynamics failed: {}", e)))?;
        Ok(flatten_pairs(sample.iter().map(|p| [p.current, p.next])))
    }

    pub fn transition_path(&self, initial_capital: f64, periods: usize) -> Result<Vec<f64>, JsValue> {
        self.model
            .transition_path(initial_capital, periods)
            .map_err(|e| JsValue::from_str(&format!("Transition path failed: {}", e)))
    }

    /// The 45° diagram and steady-state summary as a plain object.
    pub fn dynamics_plot(
        &mut self,
        k_min: f64,
        k_max: f64,
        n_points: usize,
        initial_guess: f64,
    ) -> Result<JsValue, JsValue> {
        let result = self
            .model
            .dynamics_plot(k_min, k_max, n_points, initial_guess)
            .map_err(|e| JsValue::from_str(&format!("Dynamics plot failed: {}", e)))?;
        serialize(&result)
    }

    pub fn history(&self) -> Float64Array {
        Float64Array::from(self.model.history())
    }

    pub fn history_len(&self) -> usize {
        self.model.history().len()
    }
}
