use plotters::style::RGBColor;

/// Piecewise linear anchors `(position, intensity)` of one color channel
type Segments = &'static [(f64, f64)];

const HOT_RED: Segments = &[(0.0, 0.0416), (0.365079, 1.0), (1.0, 1.0)];
const HOT_GREEN: Segments = &[(0.0, 0.0), (0.365079, 0.0), (0.746032, 1.0), (1.0, 1.0)];
const HOT_BLUE: Segments = &[(0.0, 0.0), (0.746032, 0.0), (1.0, 1.0)];

const BLUEGREEN_RED: Segments = &[(0.0, 0.0), (1.0, 0.0)];
const BLUEGREEN_GREEN: Segments = &[(0.0, 0.0), (1.0, 1.0)];
const BLUEGREEN_BLUE: Segments = &[(0.0, 0.2), (0.5, 0.5), (1.0, 0.0)];

/// Maps normalized values onto colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Black to white
    Gray,
    /// Black through red and yellow to white
    Hot,
    /// Dark blue to bright green, for sparse coefficient maps
    BlueGreen,
}

impl Colormap {
    /// Color at `t`, clamped into `[0, 1]`
    pub fn color(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (r, g, b) = match self {
            Colormap::Gray => (t, t, t),
            Colormap::Hot => (
                interpolate(HOT_RED, t),
                interpolate(HOT_GREEN, t),
                interpolate(HOT_BLUE, t),
            ),
            Colormap::BlueGreen => (
                interpolate(BLUEGREEN_RED, t),
                interpolate(BLUEGREEN_GREEN, t),
                interpolate(BLUEGREEN_BLUE, t),
            ),
        };

        RGBColor(to_byte(r), to_byte(g), to_byte(b))
    }

    /// Color of `value` within `limits`
    pub fn color_in(&self, value: f64, limits: (f64, f64)) -> RGBColor {
        self.color(normalize(value, limits))
    }
}

/// Position of `value` between `vmin` and `vmax`, `0` for empty ranges
pub fn normalize(value: f64, (vmin, vmax): (f64, f64)) -> f64 {
    if vmax > vmin {
        (value - vmin) / (vmax - vmin)
    } else {
        0.0
    }
}

/// Ticks lying within `limits`, the others have no place on a colorbar
pub(crate) fn ticks_within(ticks: &[f64], (vmin, vmax): (f64, f64)) -> Vec<f64> {
    let tol = 1e-9 * vmin.abs().max(vmax.abs()).max(1.0);
    ticks
        .iter()
        .copied()
        .filter(|t| *t >= vmin - tol && *t <= vmax + tol)
        .collect()
}

fn interpolate(segments: Segments, t: f64) -> f64 {
    for pair in segments.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if t <= x1 {
            return y0 + (y1 - y0) * (t - x0) / (x1 - x0);
        }
    }
    segments.last().map(|s| s.1).unwrap_or(0.0)
}

#[inline(always)]
fn to_byte(v: f64) -> u8 {
    (v * 255.0).round() as u8
}
