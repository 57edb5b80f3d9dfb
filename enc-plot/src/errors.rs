use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of drawing or writing a figure
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output directory could not be created
    #[error("could not create {path:?}: {source}")]
    Io {
        /// Directory
        path: PathBuf,
        /// Cause
        source: io::Error,
    },

    /// A backend failed while drawing or saving
    #[error("drawing {path:?} failed: {reason}")]
    Drawing {
        /// File being drawn
        path: PathBuf,
        /// Error reported by the backend
        reason: String,
    },

    /// Layers of a figure do not cover the same grid
    #[error("{what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Layer being checked
        what: &'static str,
        /// Shape of the reference layer
        expected: (usize, usize),
        /// Offending shape
        got: (usize, usize),
    },
}
