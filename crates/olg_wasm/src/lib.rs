//! WASM bridge exposing the OLG models to a JavaScript plotting surface.
//!
//! Methods hand back plain numbers, flat `[x0, y0, x1, y1, ...]` arrays, or
//! serde-converted plot objects. All drawing happens on the JS side.

mod dynamics;
mod market;
mod shared;

pub use dynamics::WasmSteadyStateModel;
pub use market::WasmShortRunModel;
