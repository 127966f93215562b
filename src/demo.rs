//! The built-in examples.
//!
//! Each example renders the synthetic Gaussian bump (or its noisy variant)
//! with a different combination of title, annotation, colormap, clipping and
//! contours. Contours are always traced on the clean bump.

use ndarray::Array2;
use std::path::PathBuf;
use tracing::info;

use crate::config::StyleConfig;
use crate::error::{Result, RplotError};
use crate::field::Extent;
use crate::render::{render_map, DisplayConfig};
use crate::synthetic::{gaussian_field, noisy_gaussian_field};

/// Numbers accepted by [`demo_case`]
pub const EXAMPLES: std::ops::RangeInclusive<u8> = 1..=7;

/// One example: what it shows and how it is displayed
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCase {
    pub number: u8,
    pub description: &'static str,
    /// Render the noisy field instead of the clean bump
    pub noisy: bool,
    pub display: DisplayConfig,
}

/// Field size, noise and output location shared by every example
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOptions {
    pub half_size: usize,
    pub noise_std: f64,
    pub seed: u64,
    pub output_dir: String,
    pub output_file: String,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            half_size: 500,
            noise_std: 1.0,
            seed: 0,
            output_dir: "./".to_string(),
            output_file: "test.jpg".to_string(),
        }
    }
}

/// Display parameters of example `number` for a `rows` x `cols` field
pub fn demo_case(number: u8, rows: usize, cols: usize) -> Result<DemoCase> {
    let extent = Extent::from_shape(rows, cols);
    let base = DisplayConfig::for_shape(rows, cols);

    let case = |description, noisy, display| DemoCase {
        number,
        description,
        noisy,
        display,
    };

    let case = match number {
        1 => case(
            "simple 2D map with colorbar",
            false,
            DisplayConfig {
                title: "noise".to_string(),
                annotation: " ".to_string(),
                levels: vec![1.0, 2.0],
                ..base
            },
        ),
        2 => case(
            "add title and annotation",
            false,
            DisplayConfig {
                title: "title ".to_string(),
                annotation: "annotation".to_string(),
                annotation_x: 200.0,
                annotation_y: 400.0,
                levels: vec![1.0, 2.0],
                ..base
            },
        ),
        3 => case(
            "use color",
            false,
            DisplayConfig {
                title: "title ".to_string(),
                annotation: "annotation".to_string(),
                annotation_x: 200.0,
                annotation_y: 400.0,
                colormap: "jet".to_string(),
                levels: vec![1.0, 2.0],
                ..base
            },
        ),
        4 => case(
            "map with contour",
            true,
            DisplayConfig {
                title_x: 0.0,
                title: "contour from original data".to_string(),
                dpi: 300,
                contour: 1.0,
                levels: vec![0.5, 1.7],
                ..base
            },
        ),
        5 => case(
            "map in a certain range of values + contour",
            true,
            DisplayConfig {
                clip_lower: 0.0,
                clip_upper: 0.8,
                title_x: extent.xmax * 0.15,
                title: "limited range".to_string(),
                dpi: 300,
                contour: 1.0,
                levels: vec![0.1, 0.6],
                ..base
            },
        ),
        6 => case(
            "map in color and contour gray",
            false,
            DisplayConfig {
                title_x: extent.xmax * -0.05,
                title: "map in color and contour gray".to_string(),
                colormap: "jet".to_string(),
                dpi: 300,
                contour: 1.0,
                levels: vec![0.1, 0.3, 0.8],
                ..base
            },
        ),
        7 => case(
            "map in gray and contour in color",
            false,
            DisplayConfig {
                title_x: extent.xmax * -0.05,
                title: "map in gray and contour in color".to_string(),
                dpi: 300,
                contour: 1.0,
                levels: vec![0.1, 0.3, 0.8],
                ..base
            },
        ),
        other => {
            return Err(RplotError::InvalidParameter {
                param: "example".to_string(),
                message: format!(
                    "Unknown example {}, expected {}..={}",
                    other,
                    EXAMPLES.start(),
                    EXAMPLES.end()
                ),
            });
        }
    };
    Ok(case)
}

/// Render example `number` and return the output path with the map as drawn.
pub fn run_demo(
    number: u8,
    options: &DemoOptions,
    style: &StyleConfig,
) -> Result<(PathBuf, Array2<f64>)> {
    let mask = gaussian_field(options.half_size);
    let (rows, cols) = mask.dim();

    let mut case = demo_case(number, rows, cols)?;
    case.display.output_dir = options.output_dir.clone();
    case.display.output_file = options.output_file.clone();

    info!(
        example = case.number,
        description = case.description,
        size = rows,
        noisy = case.noisy,
        "Rendering example"
    );

    let mut map = if case.noisy {
        noisy_gaussian_field(options.half_size, options.noise_std, options.seed)
    } else {
        mask.clone()
    };
    let path = render_map(&mut map, &case.display, mask.view(), style)?;
    Ok((path, map))
}
