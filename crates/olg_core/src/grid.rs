//! Sampling grids for curves, dynamics samples, and the interest-rate scan.

use crate::error::{OlgError, Result};
use serde::{Deserialize, Serialize};

/// Evenly spaced samples over a closed interval, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl GridSpec {
    pub fn new(min: f64, max: f64, samples: usize) -> Result<Self> {
        let spec = Self { min, max, samples };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            return Err(OlgError::InvalidSettings {
                reason: "grid range must be finite with max > min",
            });
        }
        if self.samples < 2 {
            return Err(OlgError::InvalidSettings {
                reason: "grid needs at least 2 samples",
            });
        }
        Ok(())
    }

    /// The sample points in ascending order; the last point is exactly `max`.
    pub fn points(&self) -> Vec<f64> {
        let last = self.samples - 1;
        let span = self.max - self.min;
        (0..self.samples)
            .map(|i| {
                if i == last {
                    self.max
                } else {
                    self.min + span * (i as f64) / (last as f64)
                }
            })
            .collect()
    }
}

/// Interest-rate grid scanned for market clearing. Both bounds are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateGrid {
    pub lower: f64,
    pub upper: f64,
    pub step: f64,
}

impl Default for RateGrid {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
            step: 1e-4,
        }
    }
}

impl RateGrid {
    pub fn validate(&self) -> Result<()> {
        if !self.lower.is_finite() || !self.upper.is_finite() || self.lower < 0.0 {
            return Err(OlgError::InvalidSettings {
                reason: "rate grid bounds must be finite and non-negative",
            });
        }
        if self.upper <= self.lower {
            return Err(OlgError::InvalidSettings {
                reason: "rate grid upper bound must exceed its lower bound",
            });
        }
        if !(self.step.is_finite() && self.step > 0.0) || self.step >= self.upper - self.lower {
            return Err(OlgError::InvalidSettings {
                reason: "rate grid step must be positive and smaller than the range",
            });
        }
        Ok(())
    }

    /// Number of interior points `lower + i * step` with `i >= 1` below `upper`.
    pub fn len(&self) -> usize {
        let intervals = ((self.upper - self.lower) / self.step - 1e-9).ceil();
        (intervals as usize).saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interior rates in ascending order. Each point is computed from its
    /// index so no rounding error accumulates across the scan.
    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        (1..=self.len()).map(move |i| self.lower + (i as f64) * self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::{GridSpec, RateGrid};
    use approx::assert_relative_eq;

    #[test]
    fn grid_points_hit_both_endpoints() {
        let grid = GridSpec::new(0.01, 1.0, 5).expect("valid grid");
        let points = grid.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], 0.01);
        assert_eq!(points[4], 1.0);
        assert_relative_eq!(points[2], 0.505, epsilon = 1e-12);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn grid_spec_rejects_degenerate_ranges() {
        assert!(GridSpec::new(1.0, 1.0, 5).is_err());
        assert!(GridSpec::new(2.0, 1.0, 5).is_err());
        assert!(GridSpec::new(0.0, 1.0, 1).is_err());
        assert!(GridSpec::new(0.0, f64::INFINITY, 5).is_err());
    }

    #[test]
    fn default_rate_grid_covers_open_unit_interval() {
        let grid = RateGrid::default();
        grid.validate().expect("default grid is valid");
        assert_eq!(grid.len(), 9999);
        let rates: Vec<f64> = grid.rates().collect();
        assert_relative_eq!(rates[0], 1e-4, epsilon = 1e-15);
        assert_relative_eq!(rates[rates.len() - 1], 0.9999, epsilon = 1e-12);
        assert!(rates.iter().all(|&r| r > 0.0 && r < 1.0));
    }

    #[test]
    fn rate_grid_handles_uneven_ranges() {
        let grid = RateGrid {
            lower: 0.0,
            upper: 0.35,
            step: 0.1,
        };
        let rates: Vec<f64> = grid.rates().collect();
        assert_eq!(rates.len(), 3);
        assert_relative_eq!(rates[2], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn rate_grid_rejects_bad_steps() {
        let too_coarse = RateGrid {
            step: 2.0,
            ..RateGrid::default()
        };
        assert!(too_coarse.validate().is_err());
        let negative = RateGrid {
            step: -1e-4,
            ..RateGrid::default()
        };
        assert!(negative.validate().is_err());
        let inverted = RateGrid {
            lower: 0.5,
            upper: 0.1,
            ..RateGrid::default()
        };
        assert!(inverted.validate().is_err());
    }
}
