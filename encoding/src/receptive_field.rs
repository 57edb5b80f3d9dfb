use brain_data::StimulusGrid;
use lin_reg::{LarsPath, LassoLars};
use nalgebra::{DMatrix, DVector};

use crate::EncodingError;

/// Sparse map of the stimulus pixels driving one voxel
#[derive(Debug, Clone)]
pub struct ReceptiveField {
    /// Column of the response matrix the field belongs to
    pub voxel: usize,
    /// Coefficient of every pixel, laid out like the stimulus
    pub grid: StimulusGrid,
    /// The regularization path leading to `grid`
    pub path: LarsPath,
}

/// Walks the LARS lasso path from the stimuli onto a single voxel and
/// arranges the final coefficients on the stimulus grid.
pub fn estimate_receptive_field(
    lars: &LassoLars,
    stimuli: &DMatrix<f64>,
    responses: &DMatrix<f64>,
    voxel: usize,
    grid_shape: (usize, usize),
) -> Result<ReceptiveField, EncodingError> {
    if voxel >= responses.ncols() {
        return Err(EncodingError::VoxelOutOfRange {
            index: voxel,
            n_voxels: responses.ncols(),
        });
    }
    if stimuli.nrows() != responses.nrows() {
        return Err(EncodingError::SampleMismatch {
            stimuli: stimuli.nrows(),
            responses: responses.nrows(),
        });
    }

    let target: DVector<f64> = responses.column(voxel).into_owned();
    let path = lars.path(stimuli, &target)?;
    let grid = StimulusGrid::new(grid_shape, path.last_coefs().as_slice().to_vec())?;
    info!(
        "voxel {}: {} active pixels after {} steps",
        voxel,
        path.last_coefs().iter().filter(|c| **c != 0.0).count(),
        path.n_iter
    );

    Ok(ReceptiveField { voxel, grid, path })
}
