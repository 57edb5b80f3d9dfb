use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while turning files on disk into matrices
#[derive(Debug, Error)]
pub enum BrainDataError {
    /// Plain file system failure
    #[error("failed to access {path:?}: {source}")]
    Io {
        /// The offending path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not a readable NIfTI image
    #[error("failed to read NIfTI image {path:?}: {source}")]
    Nifti {
        /// The offending path
        path: PathBuf,
        /// Underlying error
        source: nifti::NiftiError,
    },

    /// The image has an unexpected number of dimensions
    #[error("{path:?} has shape {shape:?}, expected a {expected}D image")]
    Dimensionality {
        /// The offending path
        path: PathBuf,
        /// Shape found in the file
        shape: Vec<usize>,
        /// Wanted number of dimensions
        expected: usize,
    },

    /// The label file is not valid delimited text
    #[error("failed to read label file {path:?}: {source}")]
    Csv {
        /// The offending path
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },

    /// A label cell is not an integer
    #[error("{path:?} row {row}: cannot parse {value:?} as an integer pixel value")]
    Parse {
        /// The offending path
        path: PathBuf,
        /// Zero based row of the cell
        row: usize,
        /// Raw cell content
        value: String,
    },

    /// Two arrays that must agree in shape do not
    #[error("{what}: expected shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// What was being compared
        what: &'static str,
        /// Shape required
        expected: Vec<usize>,
        /// Shape found
        got: Vec<usize>,
    },

    /// The dataset directory does not follow the expected layout
    #[error("dataset at {root:?}: {reason}")]
    Dataset {
        /// Dataset root directory
        root: PathBuf,
        /// What is missing or inconsistent
        reason: String,
    },

    /// Scans and stimuli of a run do not line up after clipping
    #[error("run {run} ({path:?}): {scans} scans but {labels} stimuli after clipping")]
    RunMismatch {
        /// Zero based run index
        run: usize,
        /// Functional image of the run
        path: PathBuf,
        /// Scans left
        scans: usize,
        /// Stimuli left
        labels: usize,
    },
}
