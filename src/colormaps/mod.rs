//! Colormap implementations for image generation.
//!
//! This module provides matplotlib-compatible colormaps for the map raster
//! and the colorbar.

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{get_colormap, Colormap, Reversed};

// Re-export commonly used colormaps
pub use diverging::{bwr, coolwarm, seismic};
pub use sequential::{GradientColormap, Gray, Hot, Jet};
