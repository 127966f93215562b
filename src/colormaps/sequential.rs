//! Sequential colormaps (low to high progression).
//!
//! `gray`, `jet` and `hot` are defined by per-channel linear segments; the
//! perceptually uniform maps are sampled from `colorgrad` presets.

use super::colormap::{channel_u8, segment_interp, Colormap};

/// Linear black to white ramp
pub struct Gray;

impl Colormap for Gray {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let v = channel_u8(value);
        [v, v, v, 255]
    }

    fn name(&self) -> &str {
        "gray"
    }
}

const JET_RED: [(f64, f64); 5] = [(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: [(f64, f64); 5] = [(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Dark blue through cyan and yellow to dark red
pub struct Jet;

impl Colormap for Jet {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        [
            channel_u8(segment_interp(&JET_RED, value)),
            channel_u8(segment_interp(&JET_GREEN, value)),
            channel_u8(segment_interp(&JET_BLUE, value)),
            255,
        ]
    }

    fn name(&self) -> &str {
        "jet"
    }
}

const HOT_RED: [(f64, f64); 3] = [(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)];
const HOT_GREEN: [(f64, f64); 4] = [(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)];
const HOT_BLUE: [(f64, f64); 3] = [(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)];

/// Black through red and yellow to white
pub struct Hot;

impl Colormap for Hot {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        [
            channel_u8(segment_interp(&HOT_RED, value)),
            channel_u8(segment_interp(&HOT_GREEN, value)),
            channel_u8(segment_interp(&HOT_BLUE, value)),
            255,
        ]
    }

    fn name(&self) -> &str {
        "hot"
    }
}

/// Colormap sampled from a `colorgrad` gradient
pub struct GradientColormap {
    name: &'static str,
    gradient: colorgrad::Gradient,
}

impl GradientColormap {
    pub fn new(name: &'static str, gradient: colorgrad::Gradient) -> Self {
        Self { name, gradient }
    }

    pub fn viridis() -> Self {
        Self::new("viridis", colorgrad::viridis())
    }

    pub fn plasma() -> Self {
        Self::new("plasma", colorgrad::plasma())
    }

    pub fn inferno() -> Self {
        Self::new("inferno", colorgrad::inferno())
    }

    pub fn magma() -> Self {
        Self::new("magma", colorgrad::magma())
    }

    pub fn cividis() -> Self {
        Self::new("cividis", colorgrad::cividis())
    }

    pub fn turbo() -> Self {
        Self::new("turbo", colorgrad::turbo())
    }

    pub fn greys() -> Self {
        Self::new("Greys", colorgrad::greys())
    }

    pub fn rdbu() -> Self {
        Self::new("RdBu", colorgrad::rd_bu())
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f64) -> [u8; 4] {
        let [r, g, b, _] = self.gradient.at(value.clamp(0.0, 1.0)).to_rgba8();
        [r, g, b, 255]
    }

    fn name(&self) -> &str {
        self.name
    }
}
