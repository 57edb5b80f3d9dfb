//! Static figures of encoding results: value maps over a background image,
//! outlined regions and colorbar legends, written as SVG, PNG and EPS.

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod colorbar;
mod colormap;
mod eps_backend;
mod errors;
mod figure;
mod overlay;
mod plane;

pub use colorbar::ColorbarFigure;
pub use colormap::{normalize, Colormap};
pub use eps_backend::EpsBackend;
pub use errors::RenderError;
pub use figure::{render, Figure};
pub use overlay::{MaskRule, Origin, OverlayFigure, OverlayStyle};
pub use plane::Plane;
pub use plotters::style::RGBColor;
