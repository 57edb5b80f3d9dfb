use brain_data::BrainDataError;
use lin_reg::LinRegError;
use thiserror::Error;

/// Failures of the encoding analysis
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Fold count incompatible with the number of samples
    #[error("cannot split {n_samples} samples into {n_folds} folds")]
    InvalidFolds {
        /// Requested folds
        n_folds: usize,
        /// Samples available
        n_samples: usize,
    },

    /// Stimuli and responses disagree on the number of samples
    #[error("{stimuli} stimulus rows but {responses} response rows")]
    SampleMismatch {
        /// Rows of the stimulus matrix
        stimuli: usize,
        /// Rows of the response matrix
        responses: usize,
    },

    /// Two matrices that must match element wise do not
    #[error("{what}: expected shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// What was compared
        what: &'static str,
        /// Shape of the reference
        expected: (usize, usize),
        /// Offending shape
        got: (usize, usize),
    },

    /// Nothing to fit
    #[error("stimulus and response matrices must not be empty")]
    Empty,

    /// Fitting or predicting one fold failed
    #[error("fold {fold}: {source}")]
    Fit {
        /// Index of the failing fold
        fold: usize,
        /// The regression error
        source: LinRegError,
    },

    /// A voxel index beyond the response matrix
    #[error("voxel {index} out of range, only {n_voxels} voxels")]
    VoxelOutOfRange {
        /// Requested voxel
        index: usize,
        /// Voxels available
        n_voxels: usize,
    },

    /// Regression failure outside of cross validation
    #[error(transparent)]
    LinReg(#[from] LinRegError),

    /// Coefficients could not be arranged on the stimulus grid
    #[error(transparent)]
    BrainData(#[from] BrainDataError),
}
