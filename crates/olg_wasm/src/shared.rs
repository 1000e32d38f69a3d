//! Conversions shared by the model wrappers.

use anyhow::{Context, Result};
use olg_core::newton::NewtonSettings;
use olg_core::ModelParameters;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub(crate) fn build_params(alpha: f64, beta: f64, theta: f64) -> Result<ModelParameters> {
    ModelParameters::new(alpha, beta, theta).context("Invalid model parameters")
}

/// Reads optional Newton settings; `undefined` or `null` selects the defaults.
pub(crate) fn parse_newton_settings(value: JsValue) -> Result<Option<NewtonSettings>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    from_value(value)
        .map(Some)
        .map_err(|e| JsValue::from_str(&format!("Invalid Newton settings: {}", e)))
}

pub(crate) fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Flattens pairs into `[x0, y0, x1, y1, ...]` for typed-array transfer.
pub(crate) fn flatten_pairs<I>(pairs: I) -> Vec<f64>
where
    I: IntoIterator<Item = [f64; 2]>,
{
    pairs.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::{build_params, flatten_pairs};

    #[test]
    fn flatten_pairs_interleaves_coordinates() {
        let flat = flatten_pairs(vec![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn build_params_adds_context() {
        let err = build_params(0.4, 1.5, 1.0).expect_err("beta out of range");
        let message = format!("{err:#}");
        assert!(message.contains("Invalid model parameters"));
        assert!(message.contains("beta"));
    }
}
