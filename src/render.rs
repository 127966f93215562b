//! One-call rendering of a 2D map with axes, colorbar, annotations and an
//! optional contour overlay.
//!
//! [`render_map`] clips the map, lays out the figure, picks axis ticks from
//! the spatial extent, places the title and annotation, overlays contours of
//! the mask, builds the colorbar with a precision chosen from the data
//! magnitude, and saves the file. Drawing goes through `plotters` so the same
//! figure can be written by the bitmap or the SVG backend; EPS output wraps
//! the composed bitmap.

use ndarray::{Array2, ArrayView2};
use once_cell::sync::OnceCell;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::colormaps::{get_colormap, Colormap};
use crate::config::{StyleConfig, TickStyle};
use crate::contour::{connect_segments, march_squares, normalize_levels, ContourScheme, LineColor};
use crate::eps::write_eps;
use crate::error::{Result, RplotError};
use crate::field::{finite_range, max_abs, nonsingular, ClipRange, Extent};
use crate::layout::{FigureLayout, PixelRect};
use crate::logging::{generate_render_id, log_error, log_timed_operation};
use crate::raster::rasterize;
use crate::ticks::{
    axis_ticks, colorbar_precision, format_axis_tick, format_colorbar_tick, nice_ticks,
    AxisTicks, FALLBACK_PRECISION,
};

/// Family name the embedded font is registered under
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_REGISTRATION: OnceCell<()> = OnceCell::new();

/// Make the embedded font available to `plotters` text rendering.
fn ensure_font_registered() -> Result<()> {
    FONT_REGISTRATION
        .get_or_try_init(|| {
            plotters::style::register_font(DEFAULT_FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| RplotError::ImageGeneration {
                    message: "Failed to load the embedded font".to_string(),
                })
        })
        .map(|_| ())
}

/// Caller-supplied display parameters for one rendered map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Lower clip bound; `0` together with `clip_upper == 0` disables clipping
    pub clip_lower: f64,
    pub clip_upper: f64,
    pub extent: Extent,
    /// Title position in data coordinates
    pub title_x: f64,
    pub title_y: f64,
    pub title: String,
    /// Text drawn near the lower-left corner of the axes
    pub annotation: String,
    /// Annotation position; `(0, 0)` selects arcsec axis units, anything else Mm
    pub annotation_x: f64,
    pub annotation_y: f64,
    pub colormap: String,
    pub dpi: u32,
    /// Prepended verbatim to `output_file`
    pub output_dir: String,
    pub output_file: String,
    /// Contours are drawn when this is greater than zero
    #[serde(default)]
    pub contour: f64,
    #[serde(default)]
    pub levels: Vec<f64>,
}

impl DisplayConfig {
    /// Unclipped gray map over the array's own index extent, written to `./test.jpg`
    pub fn for_shape(rows: usize, cols: usize) -> Self {
        let extent = Extent::from_shape(rows, cols);
        Self {
            clip_lower: 0.0,
            clip_upper: 0.0,
            title_x: extent.xmax * 0.25,
            title_y: extent.ymax * 1.05,
            extent,
            title: String::new(),
            annotation: String::new(),
            annotation_x: 0.0,
            annotation_y: 0.0,
            colormap: "gray".to_string(),
            dpi: 100,
            output_dir: "./".to_string(),
            output_file: "test.jpg".to_string(),
            contour: 0.0,
            levels: Vec::new(),
        }
    }

    pub fn clip_range(&self) -> ClipRange {
        ClipRange::new(self.clip_lower, self.clip_upper)
    }

    pub fn contours_enabled(&self) -> bool {
        self.contour > 0.0
    }

    pub fn axis_unit(&self) -> AxisUnit {
        AxisUnit::from_annotation_position(self.annotation_x, self.annotation_y)
    }

    /// `output_dir` and `output_file` joined as plain strings
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.output_dir, self.output_file))
    }
}

/// Unit printed on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisUnit {
    Arcsec,
    Mm,
}

impl AxisUnit {
    pub fn from_annotation_position(x: f64, y: f64) -> Self {
        if x == 0.0 && y == 0.0 {
            AxisUnit::Arcsec
        } else {
            AxisUnit::Mm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AxisUnit::Arcsec => "arcsec",
            AxisUnit::Mm => "Mm",
        }
    }
}

/// Encoder selected by the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raster formats written through the `image` crate
    Bitmap,
    Svg,
    /// Encapsulated PostScript wrapping the composed bitmap
    Eps,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" | "tga" | "ico" => {
                Ok(OutputFormat::Bitmap)
            }
            "svg" => Ok(OutputFormat::Svg),
            "eps" => Ok(OutputFormat::Eps),
            _ => Err(RplotError::UnsupportedFormat { extension }),
        }
    }
}

/// Render `map` with the given display parameters and save it to
/// `display.output_dir + display.output_file`.
///
/// The map is clipped in place when a clip range is set. `mask` is only used
/// for contours and is expected to cover the same extent as the map. On
/// success the output path is printed on standard output and returned.
pub fn render_map(
    map: &mut Array2<f64>,
    display: &DisplayConfig,
    mask: ArrayView2<f64>,
    style: &StyleConfig,
) -> Result<PathBuf> {
    let render_id = generate_render_id();
    let start = Instant::now();

    // tracing's macros bring a `display` helper into scope
    let (colormap, dpi, contour) = (&display.colormap, display.dpi, display.contour);
    debug!(
        operation = "render_map",
        render_id = %render_id,
        shape = ?map.dim(),
        mask_shape = ?mask.dim(),
        colormap = %colormap,
        dpi,
        contour,
        "Starting render"
    );

    let result = render_inner(map, display, mask, style, &render_id);
    match &result {
        Ok(path) => {
            println!("{}", path.display());
            info!(
                operation = "render_map",
                render_id = %render_id,
                path = %path.display(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Map rendered"
            );
        }
        Err(e) => log_error(e, "render_map"),
    }
    result
}

fn render_inner(
    map: &mut Array2<f64>,
    display: &DisplayConfig,
    mask: ArrayView2<f64>,
    style: &StyleConfig,
    render_id: &str,
) -> Result<PathBuf> {
    if map.is_empty() {
        return Err(RplotError::InvalidParameter {
            param: "data".to_string(),
            message: format!("Map must not be empty, got shape {:?}", map.dim()),
        });
    }
    if display.dpi == 0 {
        return Err(RplotError::InvalidParameter {
            param: "dpi".to_string(),
            message: "Resolution must be at least 1 dpi".to_string(),
        });
    }

    let colormap = get_colormap(&display.colormap)?;
    let path = display.output_path();
    let format = OutputFormat::from_path(&path)?;
    let levels = if display.contours_enabled() {
        Some(normalize_levels(&display.levels)?)
    } else {
        None
    };

    let bounds = display.clip_range().apply(map);
    debug!(render_id = %render_id, clip = ?bounds, "Applied clip range");

    let figure = Figure::prepare(map.view(), display, mask, style, colormap.as_ref(), levels)?;
    debug!(
        render_id = %render_id,
        figure = ?figure.layout.figure,
        axes = ?figure.layout.axes,
        value_range = ?figure.value_range,
        precision = figure.precision,
        "Prepared figure"
    );

    ensure_font_registered()?;
    match format {
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(&path, figure.layout.figure).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(RplotError::drawing)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(&path, figure.layout.figure).into_drawing_area();
            figure.draw(&root)?;
            root.present().map_err(RplotError::drawing)?;
        }
        OutputFormat::Eps => {
            let (width, height) = figure.layout.figure;
            let mut buffer = vec![0u8; width as usize * height as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, (width, height))
                    .into_drawing_area();
                figure.draw(&root)?;
                root.present().map_err(RplotError::drawing)?;
            }
            let img = image::RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
                RplotError::ImageGeneration {
                    message: format!("Figure buffer does not match its {}x{} size", width, height),
                }
            })?;
            write_eps(&path, &img, display.dpi)?;
        }
    }

    Ok(path)
}

/// Maps data coordinates onto a pixel rectangle.
#[derive(Debug, Clone, Copy)]
struct DataTransform {
    extent: Extent,
    rect: PixelRect,
}

impl DataTransform {
    fn span(span: f64) -> f64 {
        if span != 0.0 && span.is_finite() {
            span
        } else {
            1.0
        }
    }

    fn to_pixel_f(&self, x: f64, y: f64) -> (f64, f64) {
        let e = &self.extent;
        let fx = (x - e.xmin) / Self::span(e.x_span());
        let fy = (y - e.ymin) / Self::span(e.y_span());
        (
            self.rect.x as f64 + fx * self.rect.width as f64,
            self.rect.bottom() as f64 - fy * self.rect.height as f64,
        )
    }

    fn to_pixel(&self, x: f64, y: f64) -> (i32, i32) {
        let (px, py) = self.to_pixel_f(x, y);
        (px.round() as i32, py.round() as i32)
    }
}

/// One contour line in pixel space, ready to draw.
struct ContourLine {
    points: Vec<(f64, f64)>,
    color: LineColor,
    dashed: bool,
}

/// Everything needed to draw a map, computed before a backend exists.
struct Figure<'a> {
    layout: FigureLayout,
    transform: DataTransform,
    style: &'a StyleConfig,
    display: &'a DisplayConfig,
    raster: image::RgbImage,
    colorbar: image::RgbImage,
    x_ticks: AxisTicks,
    y_ticks: AxisTicks,
    value_range: (f64, f64),
    colorbar_ticks: Vec<f64>,
    precision: usize,
    contours: Vec<ContourLine>,
    grid: Option<LineColor>,
}

impl<'a> Figure<'a> {
    fn prepare(
        map: ArrayView2<f64>,
        display: &'a DisplayConfig,
        mask: ArrayView2<f64>,
        style: &'a StyleConfig,
        colormap: &dyn Colormap,
        levels: Option<Vec<f64>>,
    ) -> Result<Self> {
        let extent = display.extent;
        let layout = FigureLayout::compute(style, &extent, display.dpi);
        let transform = DataTransform {
            extent,
            rect: layout.axes,
        };

        let (vmin, vmax) = finite_range(map).unwrap_or((0.0, 0.0));
        let value_range = nonsingular(vmin, vmax);
        let raster = log_timed_operation("rasterize", || {
            rasterize(
                map,
                colormap,
                value_range,
                layout.axes.width,
                layout.axes.height,
            )
        })?;

        // one column ramp from the lowest to the highest value
        let steps = layout.colorbar.height.max(2) as usize;
        let ramp = Array2::from_shape_fn((steps, 1), |(i, _)| {
            value_range.0 + (value_range.1 - value_range.0) * (i as f64 + 0.5) / steps as f64
        });
        let colorbar = rasterize(
            ramp.view(),
            colormap,
            value_range,
            layout.colorbar.width,
            layout.colorbar.height,
        )?;

        let precision = max_abs(map)
            .and_then(colorbar_precision)
            .unwrap_or(FALLBACK_PRECISION);
        let colorbar_ticks = nice_ticks(value_range.0, value_range.1, style.colorbar_bins);

        let (x_lo, x_hi) = ordered(extent.xmin, extent.xmax);
        let (y_lo, y_hi) = ordered(extent.ymin, extent.ymax);

        let (contours, grid) = match levels {
            Some(levels) => {
                let scheme = ContourScheme::for_colormap(&display.colormap);
                let lines = log_timed_operation("trace_contours", || {
                    trace_contours(mask, &levels, &scheme, &transform)
                });
                (lines, Some(scheme.grid))
            }
            None => (Vec::new(), None),
        };

        Ok(Self {
            layout,
            transform,
            style,
            display,
            raster,
            colorbar,
            x_ticks: axis_ticks(x_lo, x_hi),
            y_ticks: axis_ticks(y_lo, y_hi),
            value_range,
            colorbar_ticks,
            precision,
            contours,
            grid,
        })
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(RplotError::drawing)?;

        let axes = self.layout.axes;
        blit(root, axes, &self.raster)?;

        if let Some(grid) = self.grid {
            self.draw_minor_grid(root, grid)?;
        }
        self.draw_contours(root)?;
        self.draw_frame(root, axes)?;
        self.draw_axes_ticks(root)?;
        self.draw_axis_labels(root)?;
        self.draw_title(root)?;
        self.draw_annotation(root)?;
        self.draw_colorbar(root)?;
        Ok(())
    }

    fn font(&self, points: f64) -> TextStyle<'a> {
        (self.style.font_family.as_str(), self.layout.px(points))
            .into_font()
            .color(&BLACK)
    }

    fn draw_minor_grid<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        grid: LineColor,
    ) -> Result<()> {
        let (r, g, b) = grid.rgb();
        let line = ShapeStyle {
            color: RGBColor(r, g, b).mix(self.style.grid_alpha),
            filled: false,
            stroke_width: self.layout.px_u32(self.style.grid_line_width),
        };
        let axes = self.layout.axes;

        for &x in &self.x_ticks.minor {
            let (px, _) = self.transform.to_pixel(x, self.transform.extent.ymin);
            root.draw(&PathElement::new(vec![(px, axes.y), (px, axes.bottom())], line))
                .map_err(RplotError::drawing)?;
        }
        for &y in &self.y_ticks.minor {
            let (_, py) = self.transform.to_pixel(self.transform.extent.xmin, y);
            root.draw(&PathElement::new(vec![(axes.x, py), (axes.right(), py)], line))
                .map_err(RplotError::drawing)?;
        }
        Ok(())
    }

    fn draw_contours<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let width = self.layout.px(self.style.contour_line_width);
        let [on, off] = self.style.dash_pattern;

        for line in &self.contours {
            let (r, g, b) = line.color.rgb();
            let shape = ShapeStyle {
                color: RGBColor(r, g, b).to_rgba(),
                filled: false,
                stroke_width: width.round().max(1.0) as u32,
            };
            let pieces = if line.dashed {
                crate::contour::dash_polyline(&line.points, on * width, off * width)
            } else {
                vec![line.points.clone()]
            };
            for piece in pieces {
                let pixels: Vec<(i32, i32)> = piece
                    .iter()
                    .map(|&(x, y)| (x.round() as i32, y.round() as i32))
                    .collect();
                root.draw(&PathElement::new(pixels, shape))
                    .map_err(RplotError::drawing)?;
            }
        }
        Ok(())
    }

    fn draw_frame<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        rect: PixelRect,
    ) -> Result<()> {
        let stroke = ShapeStyle {
            color: BLACK.to_rgba(),
            filled: false,
            stroke_width: self.layout.px_u32(self.style.axis_line_width),
        };
        root.draw(&Rectangle::new(
            [(rect.x, rect.y), (rect.right(), rect.bottom())],
            stroke,
        ))
        .map_err(RplotError::drawing)
    }

    fn tick_stroke(&self, ticks: &TickStyle) -> ShapeStyle {
        ShapeStyle {
            color: BLACK.to_rgba(),
            filled: false,
            stroke_width: self.layout.px_u32(ticks.width),
        }
    }

    fn draw_axes_ticks<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let axes = self.layout.axes;
        let extent = self.transform.extent;
        let label_font = self.font(self.style.tick_label_size);

        // x axis: marks point down out of the frame
        let xt = &self.style.x_ticks;
        let stroke = self.tick_stroke(xt);
        for (values, length) in [
            (&self.x_ticks.minor, xt.minor_length),
            (&self.x_ticks.major, xt.major_length),
        ] {
            let length = self.layout.px(length).round() as i32;
            for &x in values {
                let (px, _) = self.transform.to_pixel(x, extent.ymin);
                root.draw(&PathElement::new(
                    vec![(px, axes.bottom()), (px, axes.bottom() + length)],
                    stroke,
                ))
                .map_err(RplotError::drawing)?;
            }
        }
        let label_y = axes.bottom() + self.layout.px(xt.major_length + xt.pad).round() as i32;
        let centered = label_font.pos(Pos::new(HPos::Center, VPos::Top));
        for &x in &self.x_ticks.major {
            let (px, _) = self.transform.to_pixel(x, extent.ymin);
            root.draw_text(&format_axis_tick(x), &centered, (px, label_y))
                .map_err(RplotError::drawing)?;
        }

        // y axis: marks point left out of the frame
        let yt = &self.style.y_ticks;
        let stroke = self.tick_stroke(yt);
        for (values, length) in [
            (&self.y_ticks.minor, yt.minor_length),
            (&self.y_ticks.major, yt.major_length),
        ] {
            let length = self.layout.px(length).round() as i32;
            for &y in values {
                let (_, py) = self.transform.to_pixel(extent.xmin, y);
                root.draw(&PathElement::new(
                    vec![(axes.x - length, py), (axes.x, py)],
                    stroke,
                ))
                .map_err(RplotError::drawing)?;
            }
        }
        let label_x = axes.x - self.layout.px(yt.major_length + yt.pad).round() as i32;
        let right = label_font.pos(Pos::new(HPos::Right, VPos::Center));
        for &y in &self.y_ticks.major {
            let (_, py) = self.transform.to_pixel(extent.xmin, y);
            root.draw_text(&format_axis_tick(y), &right, (label_x, py))
                .map_err(RplotError::drawing)?;
        }
        Ok(())
    }

    /// Widest and tallest major tick label, in pixels
    fn tick_label_extent<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(u32, u32)> {
        let font = self.font(self.style.tick_label_size);
        let mut width = 0;
        let mut height = 0;
        for v in self.x_ticks.major.iter().chain(self.y_ticks.major.iter()) {
            let (w, h) = root
                .estimate_text_size(&format_axis_tick(*v), &font)
                .map_err(RplotError::drawing)?;
            width = width.max(w);
            height = height.max(h);
        }
        Ok((width, height))
    }

    fn draw_axis_labels<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        const LABEL_PAD: f64 = 4.0;

        let axes = self.layout.axes;
        let unit = self.display.axis_unit().label();
        let font = self.font(self.style.axis_label_size);
        let (label_w, label_h) = self.tick_label_extent(root)?;

        let xt = &self.style.x_ticks;
        let y = axes.bottom()
            + self.layout.px(xt.major_length + xt.pad + LABEL_PAD).round() as i32
            + label_h as i32;
        root.draw_text(
            unit,
            &font.pos(Pos::new(HPos::Center, VPos::Top)),
            (axes.x + axes.width as i32 / 2, y),
        )
        .map_err(RplotError::drawing)?;

        let yt = &self.style.y_ticks;
        let (_, unit_h) = root
            .estimate_text_size(unit, &font)
            .map_err(RplotError::drawing)?;
        let x = axes.x
            - self.layout.px(yt.major_length + yt.pad + LABEL_PAD).round() as i32
            - label_w as i32
            - unit_h as i32 / 2;
        root.draw_text(
            unit,
            &font
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Center, VPos::Center)),
            (x, axes.y + axes.height as i32 / 2),
        )
        .map_err(RplotError::drawing)
    }

    fn draw_title<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        if self.display.title.trim().is_empty() {
            return Ok(());
        }
        let anchor = self
            .transform
            .to_pixel(self.display.title_x, self.display.title_y);
        let font = self
            .font(self.style.title_size)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        root.draw_text(&self.display.title, &font, anchor)
            .map_err(RplotError::drawing)
    }

    fn draw_annotation<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        // a blank but non-empty annotation still draws its box
        let text = &self.display.annotation;
        if text.is_empty() {
            return Ok(());
        }

        let [fx, fy] = self.style.annotation_position;
        let (x, y) = self.layout.axes.fraction(fx, fy);
        let font = self
            .font(self.style.annotation_size)
            .pos(Pos::new(HPos::Left, VPos::Bottom));
        let (w, h) = root
            .estimate_text_size(text, &font)
            .map_err(RplotError::drawing)?;
        let pad = self.layout.px(self.style.annotation_box_pad).round() as i32;

        let background = ShapeStyle {
            color: WHITE.mix(self.style.annotation_box_alpha),
            filled: true,
            stroke_width: 0,
        };
        root.draw(&Rectangle::new(
            [(x - pad, y - h as i32 - pad), (x + w as i32 + pad, y + pad)],
            background,
        ))
        .map_err(RplotError::drawing)?;
        root.draw_text(text, &font, (x, y))
            .map_err(RplotError::drawing)
    }

    fn draw_colorbar<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let bar = self.layout.colorbar;
        blit(root, bar, &self.colorbar)?;
        self.draw_frame(root, bar)?;

        let scale = DataTransform {
            extent: Extent::new(0.0, 1.0, self.value_range.0, self.value_range.1),
            rect: bar,
        };
        let yt = &self.style.y_ticks;
        let stroke = self.tick_stroke(yt);
        let length = self.layout.px(yt.major_length).round() as i32;
        let label_x = bar.right() + self.layout.px(yt.major_length + yt.pad).round() as i32;
        let font = self
            .font(self.style.colorbar_label_size)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for &v in &self.colorbar_ticks {
            let (_, py) = scale.to_pixel(0.0, v);
            root.draw(&PathElement::new(
                vec![(bar.right(), py), (bar.right() + length, py)],
                stroke,
            ))
            .map_err(RplotError::drawing)?;
            root.draw_text(&format_colorbar_tick(v, self.precision), &font, (label_x, py))
                .map_err(RplotError::drawing)?;
        }
        Ok(())
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Copy an RGB image onto the figure with its top-left corner at `rect`.
fn blit<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rect: PixelRect,
    img: &image::RgbImage,
) -> Result<()> {
    let (w, h) = img.dimensions();
    let element = BitMapElement::with_owned_buffer((rect.x, rect.y), (w, h), img.as_raw().clone())
        .ok_or_else(|| RplotError::ImageGeneration {
            message: format!("Raster buffer does not match its {}x{} size", w, h),
        })?;
    root.draw(&element).map_err(RplotError::drawing)
}

/// Contour lines of `mask` for every level and pass, converted to pixels.
///
/// Grid corners sit at cell centres of the extent, as for an image drawn
/// with its origin in the lower-left corner.
fn trace_contours(
    mask: ArrayView2<f64>,
    levels: &[f64],
    scheme: &ContourScheme,
    transform: &DataTransform,
) -> Vec<ContourLine> {
    let (rows, cols) = mask.dim();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let extent = transform.extent;
    let dx = extent.x_span() / cols as f64;
    let dy = extent.y_span() / rows as f64;

    let traced: Vec<Vec<Vec<(f64, f64)>>> = levels
        .iter()
        .map(|&level| {
            connect_segments(&march_squares(mask, level))
                .into_iter()
                .map(|line| {
                    line.points
                        .iter()
                        .map(|p| {
                            transform.to_pixel_f(
                                extent.xmin + (p.x + 0.5) * dx,
                                extent.ymin + (p.y + 0.5) * dy,
                            )
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    let mut lines = Vec::new();
    for pass in &scheme.passes {
        for (i, polylines) in traced.iter().enumerate() {
            let color = pass.color_for_level(i);
            lines.extend(polylines.iter().map(|points| ContourLine {
                points: points.clone(),
                color,
                dashed: pass.dashed,
            }));
        }
    }
    lines
}
