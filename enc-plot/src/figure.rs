use std::{
    fs,
    path::{Path, PathBuf},
};

use plotters::{coord::Shift, prelude::*};

use crate::{EpsBackend, RenderError};

/// Something that can be drawn onto any plotters backend
pub trait Figure {
    /// Draw the whole figure onto `root`
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>;
}

/// Writes `figure` to `<out_dir>/<name>.svg`, `.png` and `.eps`,
/// creating `out_dir` when missing.
///
/// # Returns
/// The written files
pub fn render<F: Figure>(
    figure: &F,
    out_dir: &Path,
    name: &str,
    size: (u32, u32),
) -> Result<Vec<PathBuf>, RenderError> {
    fs::create_dir_all(out_dir).map_err(|source| RenderError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let svg = out_dir.join(format!("{}.svg", name));
    draw_on(figure, SVGBackend::new(&svg, size), &svg)?;
    let png = out_dir.join(format!("{}.png", name));
    draw_on(figure, BitMapBackend::new(&png, size), &png)?;
    let eps = out_dir.join(format!("{}.eps", name));
    draw_on(figure, EpsBackend::new(&eps, size), &eps)?;
    info!("rendered {} to {:?}", name, out_dir);

    Ok(vec![svg, png, eps])
}

fn draw_on<F: Figure, DB: DrawingBackend>(
    figure: &F,
    backend: DB,
    path: &Path,
) -> Result<(), RenderError> {
    let drawing_err = |e: DrawingAreaErrorKind<DB::ErrorType>| RenderError::Drawing {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let root = backend.into_drawing_area();
    figure.draw(&root).map_err(drawing_err)?;
    root.present().map_err(drawing_err)?;

    Ok(())
}
