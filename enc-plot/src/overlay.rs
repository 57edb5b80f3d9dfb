use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{colormap::ticks_within, normalize, Colormap, Figure, Plane, RenderError};

/// Which overlay values are left transparent. `NaN` is always transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskRule {
    /// Hide values smaller than the threshold
    BelowThreshold(f64),
    /// Hide values equal to the given one
    EqualTo(f64),
    /// Show every value
    ShowAll,
}

impl MaskRule {
    /// Whether `value` is left transparent
    pub fn hides(&self, value: f64) -> bool {
        if value.is_nan() {
            return true;
        }
        match self {
            MaskRule::BelowThreshold(t) => value < *t,
            MaskRule::EqualTo(v) => value == *v,
            MaskRule::ShowAll => false,
        }
    }
}

/// Where the first row of a plane is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Bottom, like an image in anatomical orientation
    Lower,
    /// Top, like a matrix
    Upper,
}

/// Look of an [`OverlayFigure`]
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    /// Colormap of the background
    pub background_colormap: Colormap,
    /// Values mapped to the ends of the background colormap, the data range if `None`
    pub background_limits: Option<(f64, f64)>,
    /// Colormap of the overlay
    pub overlay_colormap: Colormap,
    /// Values mapped to the ends of the overlay colormap, the visible range if `None`
    pub overlay_limits: Option<(f64, f64)>,
    /// Overlay values to leave transparent
    pub mask_rule: MaskRule,
    /// Where row 0 goes
    pub origin: Origin,
    /// Color of the contour outline
    pub contour_color: RGBColor,
    /// Width of the contour outline in pixels
    pub contour_width: u32,
    /// Draw a vertical colorbar of the overlay in the upper left corner with these
    /// ticks, those outside the overlay limits are left out
    pub colorbar_ticks: Option<Vec<f64>>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            background_colormap: Colormap::Gray,
            background_limits: None,
            overlay_colormap: Colormap::Hot,
            overlay_limits: None,
            mask_rule: MaskRule::BelowThreshold(1e-6),
            origin: Origin::Lower,
            contour_color: BLUE,
            contour_width: 3,
            colorbar_ticks: None,
        }
    }
}

/// A value map drawn over a background, with the cells of a boolean mask
/// outlined along the edges where the mask changes.
#[derive(Debug, Clone)]
pub struct OverlayFigure<'a> {
    background: &'a Plane<f64>,
    overlay: &'a Plane<f64>,
    contour: &'a Plane<bool>,
    style: &'a OverlayStyle,
}

impl<'a> OverlayFigure<'a> {
    /// Create a new figure, all layers must share one shape
    pub fn new(
        background: &'a Plane<f64>,
        overlay: &'a Plane<f64>,
        contour: &'a Plane<bool>,
        style: &'a OverlayStyle,
    ) -> Result<Self, RenderError> {
        background.check_shape("overlay vs. background", overlay)?;
        background.check_shape("contour vs. background", contour)?;

        Ok(Self {
            background,
            overlay,
            contour,
            style,
        })
    }

    fn overlay_limits(&self) -> (f64, f64) {
        self.style.overlay_limits.unwrap_or_else(|| {
            value_range(
                self.overlay
                    .values()
                    .iter()
                    .copied()
                    .filter(|v| !self.style.mask_rule.hides(*v)),
            )
        })
    }

    fn draw_colorbar<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        ticks: &[f64],
        limits: (f64, f64),
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let (w, h) = root.dim_in_pixel();
        let (w, h) = (w as f64, h as f64);
        let (x0, x1) = ((0.08 * w) as i32, (0.13 * w) as i32);
        let (y0, y1) = ((0.03 * h) as i32, (0.5 * h) as i32);

        for y in y0..y1 {
            let t = (y1 - y) as f64 / (y1 - y0) as f64;
            let color = self.style.overlay_colormap.color(t);
            root.draw(&Rectangle::new([(x0, y), (x1, y + 1)], color.filled()))?;
        }
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))?;

        let font = ("sans-serif", 0.035 * h).into_font();
        for tick in ticks_within(ticks, limits) {
            let y = y1 - (normalize(tick, limits) * (y1 - y0) as f64) as i32;
            root.draw(&PathElement::new(vec![(x0 - 6, y), (x0, y)], WHITE.stroke_width(2)))?;
            root.draw(&Text::new(
                format!("{:.1}", tick),
                (x0 - 10, y),
                font.color(&WHITE).pos(Pos::new(HPos::Right, VPos::Center)),
            ))?;
        }

        Ok(())
    }
}

impl Figure for OverlayFigure<'_> {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;
        let cells = Cells::new(root.dim_in_pixel(), self.background.shape(), self.style.origin);
        let (rows, cols) = self.background.shape();

        let bg_limits = self
            .style
            .background_limits
            .unwrap_or_else(|| value_range(self.background.values().iter().copied()));
        let overlay_limits = self.overlay_limits();
        debug!(
            "overlay {}x{}, background limits {:?}, overlay limits {:?}",
            rows, cols, bg_limits, overlay_limits
        );

        for r in 0..rows {
            for c in 0..cols {
                let bg = self.background.get(r, c);
                let color = self.style.background_colormap.color_in(bg, bg_limits);
                root.draw(&Rectangle::new(cells.rect(r, c), color.filled()))?;

                let v = self.overlay.get(r, c);
                if !self.style.mask_rule.hides(v) {
                    let color = self.style.overlay_colormap.color_in(v, overlay_limits);
                    root.draw(&Rectangle::new(cells.rect(r, c), color.filled()))?;
                }
            }
        }

        let stroke = self.style.contour_color.stroke_width(self.style.contour_width);
        for r in 0..rows {
            for c in 0..cols {
                let inside = self.contour.get(r, c);
                if r + 1 < rows && inside != self.contour.get(r + 1, c) {
                    root.draw(&PathElement::new(cells.row_edge(r, c).to_vec(), stroke))?;
                }
                if c + 1 < cols && inside != self.contour.get(r, c + 1) {
                    root.draw(&PathElement::new(cells.col_edge(r, c).to_vec(), stroke))?;
                }
            }
        }

        if let Some(ticks) = &self.style.colorbar_ticks {
            self.draw_colorbar(root, ticks, overlay_limits)?;
        }

        Ok(())
    }
}

/// Pixel geometry of a plane stretched over a drawing area
struct Cells {
    width: f64,
    height: f64,
    rows: usize,
    cols: usize,
    origin: Origin,
}

impl Cells {
    fn new((width, height): (u32, u32), (rows, cols): (usize, usize), origin: Origin) -> Self {
        Self {
            width: width as f64,
            height: height as f64,
            rows,
            cols,
            origin,
        }
    }

    /// Row on screen, counted from the top
    fn screen_row(&self, r: usize) -> usize {
        match self.origin {
            Origin::Upper => r,
            Origin::Lower => self.rows - 1 - r,
        }
    }

    fn x(&self, c: usize) -> i32 {
        (c as f64 * self.width / self.cols as f64).round() as i32
    }

    fn y(&self, screen_row: usize) -> i32 {
        (screen_row as f64 * self.height / self.rows as f64).round() as i32
    }

    fn rect(&self, r: usize, c: usize) -> [(i32, i32); 2] {
        let s = self.screen_row(r);
        [(self.x(c), self.y(s)), (self.x(c + 1), self.y(s + 1))]
    }

    /// Edge between rows `r` and `r + 1` of column `c`
    fn row_edge(&self, r: usize, c: usize) -> [(i32, i32); 2] {
        let y = self.y(self.screen_row(r).max(self.screen_row(r + 1)));
        [(self.x(c), y), (self.x(c + 1), y)]
    }

    /// Edge between columns `c` and `c + 1` of row `r`
    fn col_edge(&self, r: usize, c: usize) -> [(i32, i32); 2] {
        let s = self.screen_row(r);
        let x = self.x(c + 1);
        [(x, self.y(s)), (x, self.y(s + 1))]
    }
}

/// Smallest and largest finite value, `(0, 1)` when there are none
fn value_range<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}
