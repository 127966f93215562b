//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for data that diverges from a central value.

use colorgrad::{Color, CustomGradient};

use super::sequential::GradientColormap;
use crate::error::{Result, RplotError};

fn build(name: &'static str, anchors: &[[u8; 3]]) -> Result<GradientColormap> {
    let colors: Vec<Color> = anchors
        .iter()
        .map(|&[r, g, b]| Color::from_rgba8(r, g, b, 255))
        .collect();
    let gradient = CustomGradient::new()
        .colors(&colors)
        .build()
        .map_err(|e| RplotError::Colormap {
            message: format!("Failed to build {} gradient: {}", name, e),
        })?;
    Ok(GradientColormap::new(name, gradient))
}

/// Coolwarm colormap - blue to red through light gray
pub fn coolwarm() -> Result<GradientColormap> {
    build(
        "coolwarm",
        &[
            [59, 76, 192],
            [98, 130, 234],
            [141, 176, 254],
            [184, 208, 249],
            [221, 221, 221],
            [245, 196, 173],
            [244, 154, 123],
            [222, 96, 77],
            [180, 4, 38],
        ],
    )
}

/// Seismic colormap - dark blue to dark red through white
pub fn seismic() -> Result<GradientColormap> {
    build(
        "seismic",
        &[
            [0, 0, 77],
            [0, 0, 255],
            [255, 255, 255],
            [255, 0, 0],
            [128, 0, 0],
        ],
    )
}

/// Blue-white-red colormap
pub fn bwr() -> Result<GradientColormap> {
    build("bwr", &[[0, 0, 255], [255, 255, 255], [255, 0, 0]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::Colormap;

    #[test]
    fn test_bwr_anchors() {
        let cmap = bwr().unwrap();
        assert_eq!(cmap.map_normalized(0.0), [0, 0, 255, 255]);
        assert_eq!(cmap.map_normalized(0.5), [255, 255, 255, 255]);
        assert_eq!(cmap.map_normalized(1.0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_diverging_ends_differ() {
        for cmap in [coolwarm().unwrap(), seismic().unwrap()] {
            let low = cmap.map_normalized(0.0);
            let high = cmap.map_normalized(1.0);
            // blue end vs red end
            assert!(low[2] > low[0], "{}", cmap.name());
            assert!(high[0] > high[2], "{}", cmap.name());
        }
    }
}
