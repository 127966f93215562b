//! Contour line (isoline) extraction using the marching squares algorithm,
//! and the two-pass colour schemes used to overlay them on a map.

use ndarray::ArrayView2;
use std::collections::{HashMap, VecDeque};

use crate::error::{Result, RplotError};

/// A point in grid index space: `x` runs along columns, `y` along rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn key(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A connected contour line
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Marching squares over `mask`, returning the unordered segments of the
/// isoline at `level` in grid index coordinates.
///
/// Corner `(row, col)` sits at `Point { x: col, y: row }`. Cells touching a
/// NaN are skipped; saddle cells produce two segments.
pub fn march_squares(mask: ArrayView2<f64>, level: f64) -> Vec<Segment> {
    let (rows, cols) = mask.dim();
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let v00 = mask[[r, c]];
            let v01 = mask[[r, c + 1]];
            let v11 = mask[[r + 1, c + 1]];
            let v10 = mask[[r + 1, c]];
            if v00.is_nan() || v01.is_nan() || v11.is_nan() || v10.is_nan() {
                continue;
            }

            let mut case = 0u8;
            if v00 >= level {
                case |= 1;
            }
            if v01 >= level {
                case |= 2;
            }
            if v11 >= level {
                case |= 4;
            }
            if v10 >= level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let (x, y) = (c as f64, r as f64);
            let low = || crossing(Point::new(x, y), Point::new(x + 1.0, y), v00, v01, level);
            let right = || crossing(Point::new(x + 1.0, y), Point::new(x + 1.0, y + 1.0), v01, v11, level);
            let high = || crossing(Point::new(x, y + 1.0), Point::new(x + 1.0, y + 1.0), v10, v11, level);
            let left = || crossing(Point::new(x, y), Point::new(x, y + 1.0), v00, v10, level);
            let seg = |start: Point, end: Point| Segment { start, end };

            match case {
                1 | 14 => segments.push(seg(left(), low())),
                2 | 13 => segments.push(seg(low(), right())),
                3 | 12 => segments.push(seg(left(), right())),
                4 | 11 => segments.push(seg(right(), high())),
                6 | 9 => segments.push(seg(low(), high())),
                7 | 8 => segments.push(seg(left(), high())),
                5 | 10 => {
                    // saddle: decide by the cell centre
                    let centre = (v00 + v01 + v11 + v10) / 4.0;
                    let joined = (centre >= level) == (case == 5);
                    if joined {
                        segments.push(seg(left(), high()));
                        segments.push(seg(low(), right()));
                    } else {
                        segments.push(seg(left(), low()));
                        segments.push(seg(right(), high()));
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

/// Where `level` crosses the edge `a`-`b` with end values `va`, `vb`.
fn crossing(a: Point, b: Point, va: f64, vb: f64, level: f64) -> Point {
    let dv = vb - va;
    let t = if dv.abs() < f64::EPSILON {
        0.5
    } else {
        ((level - va) / dv).clamp(0.0, 1.0)
    };
    Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y))
}

/// Join segments that share endpoints into polylines.
///
/// Neighbouring cells compute a shared edge crossing from identical inputs,
/// so endpoints are matched exactly.
pub fn connect_segments(segments: &[Segment]) -> Vec<Polyline> {
    let mut by_point: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_point.entry(s.start.key()).or_default().push(i);
        by_point.entry(s.end.key()).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let next = |tip: Point, used: &mut Vec<bool>| -> Option<Point> {
        let candidates = by_point.get(&tip.key())?;
        let &i = candidates.iter().find(|&&i| !used[i])?;
        used[i] = true;
        let s = segments[i];
        Some(if s.start.key() == tip.key() { s.end } else { s.start })
    };

    let mut lines = Vec::new();
    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut points = VecDeque::from([segments[i].start, segments[i].end]);

        while let Some(p) = points.back().copied().and_then(|tip| next(tip, &mut used)) {
            points.push_back(p);
        }
        while let Some(p) = points.front().copied().and_then(|tip| next(tip, &mut used)) {
            points.push_front(p);
        }

        let points: Vec<Point> = points.into();
        let closed = points.len() > 2 && points.first().map(Point::key) == points.last().map(Point::key);
        lines.push(Polyline { points, closed });
    }
    lines
}

/// Contour levels as drawn: a single level is duplicated into two.
pub fn normalize_levels(levels: &[f64]) -> Result<Vec<f64>> {
    match levels {
        [] => Err(RplotError::Contour {
            message: "at least one contour level is required".to_string(),
        }),
        [level] => Ok(vec![*level, *level]),
        _ => Ok(levels.to_vec()),
    }
}

/// Named line colours used by the contour overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineColor {
    Black,
    White,
    Blue,
    Red,
    /// Gray at the given intensity in `[0, 1]`
    Gray(f64),
}

impl LineColor {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match *self {
            LineColor::Black => (0, 0, 0),
            LineColor::White => (255, 255, 255),
            LineColor::Blue => (0, 0, 255),
            LineColor::Red => (255, 0, 0),
            LineColor::Gray(v) => {
                let g = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                (g, g, g)
            }
        }
    }
}

/// One pass over every level; level `i` takes `colors[i % 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPass {
    pub colors: [LineColor; 2],
    pub dashed: bool,
}

impl ContourPass {
    pub fn color_for_level(&self, index: usize) -> LineColor {
        self.colors[index % 2]
    }
}

/// The overlay drawn when contours are enabled: a solid pass, a dashed
/// pass on top of it, and the colour of the minor grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourScheme {
    pub passes: [ContourPass; 2],
    pub grid: LineColor,
}

impl ContourScheme {
    /// Colour contours over a gray map, black and white over a coloured one.
    pub fn for_colormap(colormap: &str) -> Self {
        if colormap == "gray" {
            Self {
                passes: [
                    ContourPass {
                        colors: [LineColor::Blue, LineColor::Red],
                        dashed: false,
                    },
                    ContourPass {
                        colors: [LineColor::Black, LineColor::Black],
                        dashed: true,
                    },
                ],
                grid: LineColor::White,
            }
        } else {
            Self {
                passes: [
                    ContourPass {
                        colors: [LineColor::Black, LineColor::Black],
                        dashed: false,
                    },
                    ContourPass {
                        colors: [LineColor::Gray(0.6), LineColor::White],
                        dashed: true,
                    },
                ],
                grid: LineColor::Black,
            }
        }
    }
}

/// Split a polyline into the "on" pieces of an `on`/`off` dash pattern,
/// measured along the line.
pub fn dash_polyline(points: &[(f64, f64)], on: f64, off: f64) -> Vec<Vec<(f64, f64)>> {
    if points.len() < 2 || !(on > 0.0) || !(off >= 0.0) {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current = vec![points[0]];
    let mut drawing = true;
    let mut remaining = on;

    for pair in points.windows(2) {
        let (mut x0, mut y0) = pair[0];
        let (x1, y1) = pair[1];
        let mut length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();

        while length > remaining {
            let t = remaining / length;
            let split = (x0 + t * (x1 - x0), y0 + t * (y1 - y0));
            if drawing {
                current.push(split);
                dashes.push(std::mem::take(&mut current));
            } else {
                current = vec![split];
            }
            drawing = !drawing;
            length -= remaining;
            remaining = if drawing { on } else { off };
            x0 = split.0;
            y0 = split.1;
        }

        remaining -= length;
        if drawing {
            current.push((x1, y1));
        }
    }

    if drawing && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn bump(n: usize) -> Array2<f64> {
        let c = (n as f64 - 1.0) / 2.0;
        Array2::from_shape_fn((n, n), |(r, col)| {
            let dx = col as f64 - c;
            let dy = r as f64 - c;
            (-(dx * dx + dy * dy) / (n as f64)).exp()
        })
    }

    #[test]
    fn test_march_squares_flat_field() {
        let flat = Array2::from_elem((5, 5), 1.0);
        assert!(march_squares(flat.view(), 0.5).is_empty());
        assert!(march_squares(flat.view(), 2.0).is_empty());
    }

    #[test]
    fn test_march_squares_vertical_edge() {
        // left column low, right column high: one crossing per row band
        let grid = ndarray::array![[0.0, 1.0], [0.0, 1.0], [0.0, 1.0]];
        let segments = march_squares(grid.view(), 0.25);
        assert_eq!(segments.len(), 2);
        for s in &segments {
            assert_eq!(s.start.x, 0.25);
            assert_eq!(s.end.x, 0.25);
        }
    }

    #[test]
    fn test_bump_contour_is_closed() {
        let field = bump(21);
        let segments = march_squares(field.view(), 0.5);
        let lines = connect_segments(&segments);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        assert_eq!(lines[0].points.len(), segments.len() + 1);
    }

    #[test]
    fn test_nan_cells_are_skipped() {
        let mut field = bump(11);
        field.fill(f64::NAN);
        assert!(march_squares(field.view(), 0.5).is_empty());
    }

    #[test]
    fn test_normalize_levels() {
        assert_eq!(normalize_levels(&[0.5]).unwrap(), normalize_levels(&[0.5, 0.5]).unwrap());
        assert_eq!(normalize_levels(&[0.1, 0.3, 0.8]).unwrap(), vec![0.1, 0.3, 0.8]);
        assert!(normalize_levels(&[]).is_err());
    }

    #[test]
    fn test_scheme_for_gray() {
        let scheme = ContourScheme::for_colormap("gray");
        assert_eq!(scheme.passes[0].colors, [LineColor::Blue, LineColor::Red]);
        assert!(!scheme.passes[0].dashed);
        assert_eq!(scheme.passes[1].colors, [LineColor::Black, LineColor::Black]);
        assert!(scheme.passes[1].dashed);
        assert_eq!(scheme.grid, LineColor::White);
    }

    #[test]
    fn test_scheme_for_colour_maps() {
        for name in ["jet", "viridis", "gray_r"] {
            let scheme = ContourScheme::for_colormap(name);
            assert_eq!(scheme.passes[0].colors, [LineColor::Black, LineColor::Black]);
            assert!(!scheme.passes[0].dashed);
            assert_eq!(scheme.passes[1].colors, [LineColor::Gray(0.6), LineColor::White]);
            assert!(scheme.passes[1].dashed);
            assert_eq!(scheme.grid, LineColor::Black);
        }
        assert_eq!(LineColor::Gray(0.6).rgb(), (153, 153, 153));
    }

    #[test]
    fn test_level_colors_alternate() {
        let pass = ContourScheme::for_colormap("gray").passes[0];
        assert_eq!(pass.color_for_level(0), LineColor::Blue);
        assert_eq!(pass.color_for_level(1), LineColor::Red);
        assert_eq!(pass.color_for_level(2), LineColor::Blue);
    }

    fn assert_dash_eq(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a.0 - e.0).abs() < 1e-9 && (a.1 - e.1).abs() < 1e-9, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_dash_polyline() {
        let line = [(0.0, 0.0), (10.0, 0.0)];
        let dashes = dash_polyline(&line, 3.0, 1.0);
        assert_eq!(dashes.len(), 3);
        assert_dash_eq(&dashes[0], &[(0.0, 0.0), (3.0, 0.0)]);
        assert_dash_eq(&dashes[1], &[(4.0, 0.0), (7.0, 0.0)]);
        assert_dash_eq(&dashes[2], &[(8.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn test_dash_follows_corners() {
        let line = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)];
        let dashes = dash_polyline(&line, 3.0, 0.5);
        assert_eq!(dashes.len(), 2);
        assert_dash_eq(&dashes[0], &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0)]);
        assert_dash_eq(&dashes[1], &[(2.0, 1.5), (2.0, 2.0)]);
    }
}
