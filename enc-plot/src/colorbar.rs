use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{colormap::ticks_within, normalize, Colormap, Figure};

/// A standalone horizontal colorbar legend
#[derive(Debug, Clone)]
pub struct ColorbarFigure {
    /// Colormap to show
    pub colormap: Colormap,
    /// Values at the left and right end of the bar
    pub limits: (f64, f64),
    /// Labelled positions below the bar, those outside `limits` are left out
    pub ticks: Vec<f64>,
}

impl Figure for ColorbarFigure {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;
        let (w, h) = root.dim_in_pixel();
        let (w, h) = (w as f64, h as f64);
        let (x0, x1) = ((0.08 * w) as i32, (0.92 * w) as i32);
        let (y0, y1) = (0, (0.5 * h) as i32);

        for x in x0..x1 {
            let t = (x - x0) as f64 / (x1 - x0) as f64;
            let color = self.colormap.color(t);
            root.draw(&Rectangle::new([(x, y0), (x + 1, y1)], color.filled()))?;
        }
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))?;

        let font = ("sans-serif", 0.3 * h).into_font();
        for tick in ticks_within(&self.ticks, self.limits) {
            let x = x0 + (normalize(tick, self.limits) * (x1 - x0) as f64).round() as i32;
            root.draw(&PathElement::new(vec![(x, y1), (x, y1 + 4)], BLACK.stroke_width(1)))?;
            root.draw(&Text::new(
                format!("{}", tick),
                (x, y1 + 6),
                font.color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top)),
            ))?;
        }

        Ok(())
    }
}
