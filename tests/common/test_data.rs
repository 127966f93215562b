//! Test data generation utilities.
//!
//! This module writes map, mask and display files with known content into a
//! scratch directory for the integration tests.

use ndarray::Array2;
use std::path::{Path, PathBuf};

use rplot::data_loader::save_array;
use rplot::synthetic::gaussian_field;
use rplot::{DisplayConfig, Result};

/// Linear ramp from 0 at the first row to 1 at the last row.
pub fn vertical_ramp(rows: usize, cols: usize) -> Array2<f64> {
    let last = (rows.max(2) - 1) as f64;
    Array2::from_shape_fn((rows, cols), |(i, _)| i as f64 / last)
}

/// Writes a Gaussian bump of half size `n` as `.npy` and returns its path.
pub fn create_gaussian_npy(dir: &Path, n: usize) -> Result<PathBuf> {
    let path = dir.join("gaussian.npy");
    save_array(&path, gaussian_field(n).view())?;
    Ok(path)
}

/// Writes `data` as a JSON array of rows and returns its path.
pub fn create_json_array(dir: &Path, name: &str, data: &Array2<f64>) -> Result<PathBuf> {
    let path = dir.join(name);
    save_array(&path, data.view())?;
    Ok(path)
}

/// Display parameters for a `rows` x `cols` map saved as `file` inside `dir`.
pub fn display_in(dir: &Path, file: &str, rows: usize, cols: usize) -> DisplayConfig {
    DisplayConfig {
        output_dir: format!("{}/", dir.display()),
        output_file: file.to_string(),
        ..DisplayConfig::for_shape(rows, cols)
    }
}

/// Writes display parameters as JSON and returns the path.
pub fn create_display_json(dir: &Path, display: &DisplayConfig) -> Result<PathBuf> {
    let path = dir.join("display.json");
    std::fs::write(&path, serde_json::to_string_pretty(display)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_ramp() {
        let ramp = vertical_ramp(5, 3);
        assert_eq!(ramp[[0, 2]], 0.0);
        assert_eq!(ramp[[4, 0]], 1.0);
        assert_eq!(ramp[[2, 1]], 0.5);
    }
}
