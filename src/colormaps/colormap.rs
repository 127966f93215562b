//! Colormap trait and lookup by name.

use crate::error::{Result, RplotError};

/// Trait for color mapping implementations
pub trait Colormap {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f64) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f64, min: f64, max: f64) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// A colormap traversed from its top end down.
pub struct Reversed {
    inner: Box<dyn Colormap>,
    name: String,
}

impl Reversed {
    pub fn new(inner: Box<dyn Colormap>) -> Self {
        let name = format!("{}_r", inner.name());
        Self { inner, name }
    }
}

impl Colormap for Reversed {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        self.inner.map_normalized(1.0 - value)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Get a colormap by name.
///
/// Names use matplotlib's spelling and are case-sensitive (`gray`, `Greys`,
/// `RdBu`); a `_r` suffix selects the reversed variant of any known colormap.
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    use super::{diverging::*, sequential::*};

    if let Some(base) = name.strip_suffix("_r") {
        return get_colormap(base).map(|inner| Box::new(Reversed::new(inner)) as Box<dyn Colormap>);
    }

    match name {
        "gray" | "grey" => Ok(Box::new(Gray)),
        "jet" => Ok(Box::new(Jet)),
        "hot" => Ok(Box::new(Hot)),
        "viridis" => Ok(Box::new(GradientColormap::viridis())),
        "plasma" => Ok(Box::new(GradientColormap::plasma())),
        "inferno" => Ok(Box::new(GradientColormap::inferno())),
        "magma" => Ok(Box::new(GradientColormap::magma())),
        "cividis" => Ok(Box::new(GradientColormap::cividis())),
        "turbo" => Ok(Box::new(GradientColormap::turbo())),
        "Greys" => Ok(Box::new(GradientColormap::greys())),
        "RdBu" => Ok(Box::new(GradientColormap::rdbu())),
        "coolwarm" => Ok(Box::new(coolwarm()?)),
        "seismic" => Ok(Box::new(seismic()?)),
        "bwr" => Ok(Box::new(bwr()?)),
        _ => Err(RplotError::InvalidParameter {
            param: "colormap".to_string(),
            message: format!("Unknown colormap: {}", name),
        }),
    }
}

/// Piecewise-linear interpolation through `(x, y)` anchors sorted by `x`.
pub fn segment_interp(anchors: &[(f64, f64)], t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    match anchors {
        [] => 0.0,
        [only] => only.1,
        _ => {
            let i = anchors
                .windows(2)
                .position(|w| t <= w[1].0)
                .unwrap_or(anchors.len() - 2);
            let (x0, y0) = anchors[i];
            let (x1, y1) = anchors[i + 1];
            if x1 > x0 {
                y0 + (y1 - y0) * (t - x0) / (x1 - x0)
            } else {
                y1
            }
        }
    }
}

/// Convert a channel intensity in `[0, 1]` to a byte.
pub fn channel_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
