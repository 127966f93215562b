//! Map and mask helpers: spatial extent, value clipping and reductions.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Spatial bounds assigned to a displayed array, `(xmin, xmax, ymin, ymax)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Extent {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Extent covering one unit per grid cell, origin at zero.
    pub fn from_shape(rows: usize, cols: usize) -> Self {
        Self::new(0.0, cols as f64, 0.0, rows as f64)
    }

    pub fn x_span(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn y_span(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Height over width in data units, 1.0 when either span is degenerate.
    pub fn aspect(&self) -> f64 {
        let ratio = (self.y_span() / self.x_span()).abs();
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.xmin, self.xmax, self.ymin, self.ymax]
    }
}

impl From<[f64; 4]> for Extent {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Extent> for [f64; 4] {
    fn from(e: Extent) -> Self {
        e.as_array()
    }
}

/// The `[lo, lu]` bounds used to clamp displayed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRange {
    pub lower: f64,
    pub upper: f64,
}

impl ClipRange {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Both bounds zero means "auto": the data is displayed unclipped.
    pub fn is_auto(&self) -> bool {
        self.lower == 0.0 && self.upper == 0.0
    }

    /// Clamp `data` in place and return the bounds that were in effect.
    ///
    /// In auto mode both bounds resolve to the data minimum, and nothing is
    /// clamped: a value can never be below the minimum, and the upper bound
    /// is not applied in this branch.
    pub fn apply(&self, data: &mut Array2<f64>) -> (f64, f64) {
        if self.is_auto() {
            let min = finite_range(data.view()).map_or(0.0, |(min, _)| min);
            return (min, min);
        }

        let (lower, upper) = (self.lower, self.upper);
        data.mapv_inplace(|v| {
            if v < lower {
                lower
            } else if v > upper {
                upper
            } else {
                v
            }
        });
        (lower, upper)
    }
}

/// Minimum and maximum over the finite values, `None` if there are none.
pub fn finite_range(data: ArrayView2<f64>) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Largest absolute finite value, `None` if there are no finite values.
pub fn max_abs(data: ArrayView2<f64>) -> Option<f64> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .map(f64::abs)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// Widen a degenerate normalisation range so colours stay well defined.
pub fn nonsingular(min: f64, max: f64) -> (f64, f64) {
    const EXPANDER: f64 = 0.05;

    if max - min > f64::EPSILON * min.abs().max(max.abs()).max(1.0) {
        return (min, max);
    }
    if min == 0.0 && max == 0.0 {
        (-EXPANDER, EXPANDER)
    } else {
        (min - EXPANDER * min.abs(), max + EXPANDER * max.abs())
    }
}
