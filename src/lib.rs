//! # rplot
//!
//! One-call rendering of 2D scientific maps.
//!
//! This library takes a 2D array plus a handful of display parameters and
//! writes a single image: a pseudocolor map with formatted axis ticks, a
//! colorbar whose label precision follows the data magnitude, optional title
//! and annotation text, and optional contour lines traced from a second array.
//!
//! ## Key Features
//!
//! - **One call**: [`render_map`] goes from array to image file
//! - **Adaptive ticks**: axis tick spacing chosen from the spatial extent
//! - **Contour overlays**: two-pass solid and dashed contours coloured to contrast with the map
//! - **Matplotlib-style colormaps**: `gray`, `jet`, `viridis` and friends, reversible with `_r`
//!
//! ## Architecture
//!
//! - **Data Layer**: loads maps from `.npy` or JSON files, or synthesises test fields
//! - **Layout**: pure functions for ticks, clipping, figure geometry and contour tracing
//! - **Rendering**: draws the figure through `plotters` to a bitmap or SVG file

pub mod colormaps;
pub mod config;
pub mod contour;
pub mod data_loader;
pub mod demo;
pub mod eps;
pub mod error;
pub mod field;
pub mod layout;
pub mod logging;
pub mod raster;
pub mod render;
pub mod synthetic;
pub mod ticks;

pub use config::{Config, StyleConfig};
pub use error::{Result, RplotError};
pub use field::Extent;
pub use logging::{
    generate_render_id, init_tracing, log_data_load_stats, log_error, log_operation_end,
    log_operation_start, log_timed_operation,
};
pub use render::{render_map, AxisUnit, DisplayConfig, OutputFormat};
