//! Tick placement and tick label formatting.
//!
//! Both the axis tick spacing and the colorbar label precision are chosen by
//! walking an ordered table of breakpoints; the first rung whose bound
//! admits the value wins.

/// Minor and major tick spacing for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSpacing {
    pub minor: f64,
    pub major: f64,
}

impl TickSpacing {
    const fn new(minor: f64, major: f64) -> Self {
        Self { minor, major }
    }
}

/// Upper bound of a ladder rung.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Below(f64),
    AtMost(f64),
}

impl Bound {
    fn admits(self, value: f64) -> bool {
        match self {
            Bound::Below(b) => value < b,
            Bound::AtMost(b) => value <= b,
        }
    }
}

/// Ascending rungs; values at or below zero never match.
fn climb<T: Copy>(ladder: &[(Bound, T)], value: f64) -> Option<T> {
    if !(value > 0.0) {
        return None;
    }
    ladder
        .iter()
        .find(|(bound, _)| bound.admits(value))
        .map(|&(_, rung)| rung)
}

const SPACING_LADDER: [(Bound, TickSpacing); 4] = [
    (Bound::Below(10.0), TickSpacing::new(1.0, 5.0)),
    (Bound::AtMost(50.0), TickSpacing::new(5.0, 10.0)),
    (Bound::AtMost(200.0), TickSpacing::new(10.0, 50.0)),
    (Bound::Below(1000.0), TickSpacing::new(100.0, 200.0)),
];

const PRECISION_LADDER: [(Bound, usize); 4] = [
    (Bound::AtMost(1.0), 3),
    (Bound::AtMost(2.0), 2),
    (Bound::AtMost(10.0), 1),
    (Bound::AtMost(f64::INFINITY), 0),
];

/// Decimal places used when the data has no positive magnitude.
pub const FALLBACK_PRECISION: usize = 3;

/// Tick spacing for an axis whose extent spans `span` data units.
///
/// Returns `None` for spans of 1000 or more and for non-positive spans.
pub fn tick_spacing(span: f64) -> Option<TickSpacing> {
    climb(&SPACING_LADDER, span)
}

/// Colorbar label decimals for data whose peak magnitude is `large`.
///
/// Returns `None` when `large` is not positive.
pub fn colorbar_precision(large: f64) -> Option<usize> {
    climb(&PRECISION_LADDER, large)
}

/// Every multiple of `step` inside `[lo, hi]` (either order).
pub fn multiple_ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }

    let tolerance = step * 1e-9;
    let first = ((lo - tolerance) / step).ceil() as i64;
    let last = ((hi + tolerance) / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Round-number step for at most `nbins` intervals across `[lo, hi]`.
pub fn nice_step(lo: f64, hi: f64, nbins: usize) -> Option<f64> {
    const STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

    let span = (hi - lo).abs();
    if !(span > 0.0) || !span.is_finite() || nbins == 0 {
        return None;
    }
    let raw = span / nbins as f64;
    let scale = 10f64.powf(raw.log10().floor());
    STEPS
        .iter()
        .map(|s| s * scale)
        .find(|&s| s >= raw * (1.0 - 1e-9))
}

/// Ticks on round numbers, at most `nbins + 1` of them, inside `[lo, hi]`.
pub fn nice_ticks(lo: f64, hi: f64, nbins: usize) -> Vec<f64> {
    match nice_step(lo, hi, nbins) {
        Some(step) => multiple_ticks(lo, hi, step),
        None if lo.is_finite() => vec![lo],
        None => Vec::new(),
    }
}

/// Major and minor tick positions for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTicks {
    pub major: Vec<f64>,
    pub minor: Vec<f64>,
}

/// Tick positions for the axis `[lo, hi]`.
///
/// Spans the ladder does not cover fall back to round-number major ticks
/// (at most five intervals) with minor ticks at a fifth of the major step.
pub fn axis_ticks(lo: f64, hi: f64) -> AxisTicks {
    let spacing = tick_spacing(hi - lo).or_else(|| {
        nice_step(lo, hi, 5).map(|major| TickSpacing {
            minor: major / 5.0,
            major,
        })
    });

    match spacing {
        Some(spacing) => AxisTicks {
            major: multiple_ticks(lo, hi, spacing.major),
            minor: multiple_ticks(lo, hi, spacing.minor),
        },
        None => AxisTicks {
            major: Vec::new(),
            minor: Vec::new(),
        },
    }
}

/// Axis tick label: integers without a fractional part, others shortest.
pub fn format_axis_tick(value: f64) -> String {
    // avoid "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        let s = format!("{:.6}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Colorbar tick label with a fixed number of decimals.
pub fn format_colorbar_tick(value: f64, decimals: usize) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}
