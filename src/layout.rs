//! Figure geometry.
//!
//! Converts the figure size, subplot margins and colorbar settings of a
//! [`StyleConfig`] into pixel rectangles for a given resolution. The main
//! axes keep a data aspect ratio of one; axes, pad and colorbar are centred
//! together inside the subplot box.

use crate::config::StyleConfig;
use crate::field::Extent;

/// Points per inch
const POINTS_PER_INCH: f64 = 72.0;

/// Convert a length in points to pixels at the given resolution
pub fn points_to_pixels(points: f64, dpi: u32) -> f64 {
    points * dpi as f64 / POINTS_PER_INCH
}

/// Axis-aligned pixel rectangle, origin at the top-left corner of the figure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Point at the given fractions of the rectangle, measured from its lower-left corner
    pub fn fraction(&self, fx: f64, fy: f64) -> (i32, i32) {
        (
            self.x + (fx * self.width as f64).round() as i32,
            self.bottom() - (fy * self.height as f64).round() as i32,
        )
    }
}

/// Pixel geometry of one rendered map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    /// Figure width and height in pixels
    pub figure: (u32, u32),
    pub axes: PixelRect,
    pub colorbar: PixelRect,
    pub dpi: u32,
}

impl FigureLayout {
    pub fn compute(style: &StyleConfig, extent: &Extent, dpi: u32) -> Self {
        let [width_in, height_in] = style.figure_size;
        let fig_w = (width_in * dpi as f64).round().max(1.0);
        let fig_h = (height_in * dpi as f64).round().max(1.0);

        let m = &style.margins;
        let box_x0 = m.left * fig_w;
        let box_w = (m.right - m.left) * fig_w;
        let box_y0 = (1.0 - m.top) * fig_h;
        let box_h = (m.top - m.bottom) * fig_h;

        let pad = style.colorbar_pad * dpi as f64;
        let frac = style.colorbar_fraction;
        let aspect = extent.aspect();

        let width = ((box_w - pad) / (1.0 + frac)).min(box_h / aspect).max(1.0);
        let height = (width * aspect).max(1.0);
        let total = width * (1.0 + frac) + pad;

        let x0 = box_x0 + (box_w - total) / 2.0;
        let y0 = box_y0 + (box_h - height) / 2.0;

        let axes = PixelRect {
            x: x0.round() as i32,
            y: y0.round() as i32,
            width: width.round() as u32,
            height: height.round() as u32,
        };
        let colorbar = PixelRect {
            x: (x0 + width + pad).round() as i32,
            y: axes.y,
            width: (width * frac).round().max(1.0) as u32,
            height: axes.height,
        };

        Self {
            figure: (fig_w as u32, fig_h as u32),
            axes,
            colorbar,
            dpi,
        }
    }

    /// Length in points scaled to this layout's resolution
    pub fn px(&self, points: f64) -> f64 {
        points_to_pixels(points, self.dpi)
    }

    /// Like [`FigureLayout::px`], rounded and never below one pixel
    pub fn px_u32(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        assert_eq!(points_to_pixels(72.0, 100), 100.0);
        assert_eq!(points_to_pixels(18.0, 300), 75.0);
    }

    #[test]
    fn test_square_extent_at_100_dpi() {
        let layout = FigureLayout::compute(
            &StyleConfig::default(),
            &Extent::new(0.0, 1001.0, 0.0, 1001.0),
            100,
        );
        assert_eq!(layout.figure, (640, 480));
        // height limited by the 360px subplot box
        assert_eq!(
            layout.axes,
            PixelRect {
                x: 142,
                y: 48,
                width: 360,
                height: 360
            }
        );
        assert_eq!(layout.colorbar.x, 512);
        assert_eq!(layout.colorbar.width, 18);
        assert_eq!(layout.colorbar.height, 360);
    }

    #[test]
    fn test_wide_extent_is_width_limited() {
        let layout =
            FigureLayout::compute(&StyleConfig::default(), &Extent::new(0.0, 10.0, 0.0, 1.0), 100);
        assert!(layout.axes.width > layout.axes.height * 5);
        assert!(layout.colorbar.right() <= 576);
        assert!(layout.axes.x >= 96);
    }

    #[test]
    fn test_layout_scales_with_dpi() {
        let style = StyleConfig::default();
        let extent = Extent::new(0.0, 1.0, 0.0, 1.0);
        let low = FigureLayout::compute(&style, &extent, 100);
        let high = FigureLayout::compute(&style, &extent, 300);
        assert_eq!(high.figure, (1920, 1440));
        assert_eq!(high.axes.height, low.axes.height * 3);
        assert_eq!(high.px_u32(0.5), 2);
        assert_eq!(low.px_u32(0.1), 1);
    }

    #[test]
    fn test_fraction_is_measured_from_lower_left() {
        let rect = PixelRect {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
        };
        assert_eq!(rect.fraction(0.0, 0.0), (10, 70));
        assert_eq!(rect.fraction(1.0, 1.0), (110, 20));
        assert_eq!(rect.fraction(0.1, 0.1), (20, 65));
    }
}
