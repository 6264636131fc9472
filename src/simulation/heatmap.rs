//! Residual price-difference heatmap over interest-rate correlation and
//! volatility ranges.
//!
//! The cell values are explicitly placeholder data — uniform random in
//! [0, 1) — standing in for a real correlation-based price-difference
//! model. The contract of this module is the grid's shape and axes, not
//! the numeric content of its cells.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of points along each heatmap axis unless a caller overrides it.
pub const DEFAULT_GRID_SIZE: usize = 10;

/// Errors arising from heatmap range handling.
#[derive(Debug, Error, PartialEq)]
pub enum HeatmapError {
    #[error("range must be a two-element numeric array, got {0}")]
    InvalidRangeType(String),
    #[error("range bounds must be finite, got ({start}, {end})")]
    NonFiniteBound { start: f64, end: f64 },
    #[error("grid size must be at least 1")]
    EmptyGrid,
}

/// A closed numeric range for one heatmap axis.
///
/// Bounds may arrive in either order; axes are always built over the
/// normalized `[min, max]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapRange {
    start: f64,
    end: f64,
}

impl HeatmapRange {
    pub fn new(start: f64, end: f64) -> Result<Self, HeatmapError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(HeatmapError::NonFiniteBound { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from a loosely-typed JSON value.
    ///
    /// Accepts exactly a two-element array of numbers; anything else —
    /// a string, an object, a wrong-arity array — is rejected with
    /// [`HeatmapError::InvalidRangeType`].
    pub fn from_json(value: &serde_json::Value) -> Result<Self, HeatmapError> {
        let invalid = || HeatmapError::InvalidRangeType(value.to_string());
        let items = value.as_array().ok_or_else(invalid)?;
        if items.len() != 2 {
            return Err(invalid());
        }
        let start = items[0].as_f64().ok_or_else(invalid)?;
        let end = items[1].as_f64().ok_or_else(invalid)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Bounds reordered to `(min, max)`.
    fn normalized(&self) -> (f64, f64) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// A square heatmap grid with its two axis vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapGrid {
    correlation_axis: Vec<f64>,
    volatility_axis: Vec<f64>,
    /// One row per correlation value, one column per volatility value.
    cells: Vec<Vec<f64>>,
}

impl HeatmapGrid {
    pub fn correlation_axis(&self) -> &[f64] {
        &self.correlation_axis
    }

    pub fn volatility_axis(&self) -> &[f64] {
        &self.volatility_axis
    }

    pub fn cells(&self) -> &[Vec<f64>] {
        &self.cells
    }

    pub fn grid_size(&self) -> usize {
        self.correlation_axis.len()
    }
}

/// Build a `grid_size x grid_size` residual-price heatmap.
///
/// Axis values are evenly spaced across the normalized ranges, inclusive
/// of both ends. Cell values are placeholder uniform random data in
/// [0, 1); see the module documentation.
pub fn residual_heatmap<R: Rng + ?Sized>(
    correlation: HeatmapRange,
    volatility: HeatmapRange,
    grid_size: usize,
    rng: &mut R,
) -> Result<HeatmapGrid, HeatmapError> {
    if grid_size == 0 {
        return Err(HeatmapError::EmptyGrid);
    }

    let (corr_lo, corr_hi) = correlation.normalized();
    let (vol_lo, vol_hi) = volatility.normalized();

    let cells = (0..grid_size)
        .map(|_| (0..grid_size).map(|_| rng.gen::<f64>()).collect())
        .collect();

    Ok(HeatmapGrid {
        correlation_axis: linspace(corr_lo, corr_hi, grid_size),
        volatility_axis: linspace(vol_lo, vol_hi, grid_size),
        cells,
    })
}

/// `points` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    if points == 1 {
        return vec![start];
    }
    let step = (end - start) / (points - 1) as f64;
    (0..points).map(|i| start + step * i as f64).collect()
}
