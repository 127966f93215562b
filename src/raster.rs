//! Colormapped rasterisation of the map.
//!
//! Pixels are sampled nearest-neighbour with the array's first row at the
//! bottom of the image, the way an image with origin "lower" is displayed.

use image::{Rgb, RgbImage};
use ndarray::ArrayView2;

use crate::colormaps::Colormap;
use crate::error::{Result, RplotError};

/// Colour used for pixels whose value is not finite
pub const MISSING_COLOR: [u8; 3] = [255, 255, 255];

/// Index of the data cell covering the centre of pixel `pixel` out of `pixels`
fn sample_index(pixel: u32, pixels: u32, cells: usize) -> usize {
    let t = (pixel as f64 + 0.5) / pixels as f64;
    ((t * cells as f64) as usize).min(cells - 1)
}

/// Render `data` into a `width` x `height` image using `colormap` over `range`
pub fn rasterize(
    data: ArrayView2<f64>,
    colormap: &dyn Colormap,
    range: (f64, f64),
    width: u32,
    height: u32,
) -> Result<RgbImage> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return Err(RplotError::ImageGeneration {
            message: "Cannot rasterize an empty array".to_string(),
        });
    }
    if width == 0 || height == 0 {
        return Err(RplotError::ImageGeneration {
            message: format!("Invalid raster size {}x{}", width, height),
        });
    }

    let (min_val, max_val) = range;
    let columns: Vec<usize> = (0..width).map(|x| sample_index(x, width, cols)).collect();

    let mut img = RgbImage::new(width, height);
    for y in 0..height {
        // image row 0 is the top, which shows the last data row
        let row = rows - 1 - sample_index(y, height, rows);
        for (x, &col) in columns.iter().enumerate() {
            let value = data[[row, col]];
            let color = if value.is_finite() {
                let [r, g, b, _] = colormap.map(value, min_val, max_val);
                [r, g, b]
            } else {
                MISSING_COLOR
            };
            img.put_pixel(x as u32, y, Rgb(color));
        }
    }

    Ok(img)
}
