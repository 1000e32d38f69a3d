//! Pure-data output for an external rendering surface.
//!
//! The core never draws. It hands over labelled series of `[x, y]` pairs and
//! highlighted points; axes, legends, and annotations belong to the renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<[f64; 2]>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    /// Builds a series by evaluating `f` at each abscissa.
    pub fn sampled(label: impl Into<String>, xs: &[f64], f: impl Fn(f64) -> f64) -> Self {
        Self::new(label, xs.iter().map(|&x| [x, f(x)]).collect())
    }
}

/// A highlighted point, e.g. an equilibrium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl Marker {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl PlotData {
    pub fn new(x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            series: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn series_named(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.label == label)
    }
}
