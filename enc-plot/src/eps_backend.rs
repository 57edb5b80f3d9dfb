use std::{
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

use plotters_backend::{
    text_anchor::{HPos, VPos},
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

/// Average glyph advance of Helvetica, relative to the font size
const GLYPH_WIDTH: f64 = 0.6;

/// Encapsulated PostScript drawing backend.
///
/// Drawing operations are collected in memory and written out together with
/// the header on [`DrawingBackend::present`], or when the backend is dropped.
/// PostScript has no transparency, partially transparent colors are drawn
/// opaque and fully transparent ones are skipped.
pub struct EpsBackend {
    path: PathBuf,
    size: (u32, u32),
    body: String,
    saved: bool,
}

impl EpsBackend {
    /// Create a new backend writing a `size` points large page to `path`
    pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size,
            body: String::new(),
            saved: false,
        }
    }

    /// PostScript puts the origin at the bottom left
    #[inline(always)]
    fn flip(&self, (x, y): BackendCoord) -> (i32, i32) {
        (x, self.size.1 as i32 - y)
    }

    /// Selects the color, `false` when nothing should be drawn
    fn set_color(&mut self, color: BackendColor) -> bool {
        if color.alpha == 0.0 {
            return false;
        }
        let (r, g, b) = color.rgb;
        let _ = writeln!(
            self.body,
            "{:.4} {:.4} {:.4} setrgbcolor",
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0
        );
        true
    }

    fn set_stroke<S: BackendStyle>(&mut self, style: &S) -> bool {
        if !self.set_color(style.color()) {
            return false;
        }
        let _ = writeln!(self.body, "{} setlinewidth", style.stroke_width());
        true
    }

    fn trace_path<I: IntoIterator<Item = BackendCoord>>(&mut self, path: I) -> bool {
        let mut points = path.into_iter().map(|p| self.flip(p)).collect::<Vec<_>>().into_iter();
        let Some((x, y)) = points.next() else {
            return false;
        };
        let _ = writeln!(self.body, "newpath {} {} moveto", x, y);
        for (x, y) in points {
            let _ = writeln!(self.body, "{} {} lineto", x, y);
        }
        true
    }

    fn write_file(&mut self) -> io::Result<()> {
        let (w, h) = self.size;
        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
        let _ = writeln!(out, "%%BoundingBox: 0 0 {} {}", w, h);
        out.push_str("%%Creator: enc-plot\n%%Pages: 1\n%%EndComments\n");
        out.push_str("1 setlinecap 1 setlinejoin\n");
        out.push_str(&self.body);
        out.push_str("showpage\n%%EOF\n");

        fs::write(&self.path, out)?;
        self.saved = true;
        debug!("wrote {:?}", self.path);

        Ok(())
    }
}

/// Escapes the characters PostScript treats specially inside strings
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

impl DrawingBackend for EpsBackend {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        self.write_file().map_err(DrawingErrorKind::DrawingError)
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_color(color) {
            let (x, y) = self.flip(point);
            let _ = writeln!(self.body, "{} {} 1 1 rectfill", x, y - 1);
        }
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_stroke(style) && self.trace_path([from, to]) {
            self.body.push_str("stroke\n");
        }
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let (x0, y0) = self.flip((upper_left.0, bottom_right.1));
        let w = bottom_right.0 - upper_left.0;
        let h = bottom_right.1 - upper_left.1;
        if fill {
            if self.set_color(style.color()) {
                let _ = writeln!(self.body, "{} {} {} {} rectfill", x0, y0, w, h);
            }
        } else if self.set_stroke(style) {
            let _ = writeln!(self.body, "{} {} {} {} rectstroke", x0, y0, w, h);
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_stroke(style) && self.trace_path(path) {
            self.body.push_str("stroke\n");
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if self.set_color(style.color()) && self.trace_path(vert) {
            self.body.push_str("closepath fill\n");
        }
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let visible = if fill {
            self.set_color(style.color())
        } else {
            self.set_stroke(style)
        };
        if visible {
            let (x, y) = self.flip(center);
            let op = if fill { "fill" } else { "stroke" };
            let _ = writeln!(self.body, "newpath {} {} {} 0 360 arc {}", x, y, radius, op);
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if !self.set_color(style.color()) {
            return Ok(());
        }
        let size = style.size();
        let (x, y) = self.flip(pos);
        let anchor = style.anchor();
        let baseline = match anchor.v_pos {
            VPos::Top => y as f64 - 0.75 * size,
            VPos::Center => y as f64 - 0.35 * size,
            VPos::Bottom => y as f64,
        };
        let text = escape(text);

        let _ = writeln!(self.body, "/Helvetica findfont {:.2} scalefont setfont", size);
        let _ = writeln!(self.body, "{} {:.2} moveto", x, baseline);
        match anchor.h_pos {
            HPos::Left => {}
            HPos::Center => {
                let _ = writeln!(self.body, "({}) stringwidth pop 2 div neg 0 rmoveto", text);
            }
            HPos::Right => {
                let _ = writeln!(self.body, "({}) stringwidth pop neg 0 rmoveto", text);
            }
        }
        let _ = writeln!(self.body, "({}) show", text);

        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        let size = style.size();
        let width = text.chars().count() as f64 * size * GLYPH_WIDTH;

        Ok((width.ceil() as u32, size.ceil() as u32))
    }
}

impl Drop for EpsBackend {
    fn drop(&mut self) {
        if !self.saved {
            if let Err(e) = self.write_file() {
                warn!("could not write {:?}: {}", self.path, e);
            }
        }
    }
}
