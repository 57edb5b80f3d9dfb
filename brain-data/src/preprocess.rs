use nalgebra::DMatrix;

use crate::{
    apply_mask_series, clean, read_labels, read_mask, read_series, stimulus_matrix, BrainDataError,
    CleanParams, Dataset, Mask,
};

/// How runs are turned into aligned stimulus and response matrices
#[derive(Debug, Clone)]
pub struct PreprocessParams {
    /// `(rows, cols)` of the stimulus pixel grid
    pub grid_shape: (usize, usize),
    /// Leading scans of every run to discard, compensates the hemodynamic delay
    pub scans_to_drop: usize,
    /// Trailing stimuli of every run to discard, so stimuli and scans stay aligned
    pub labels_to_drop: usize,
    /// Cleaning applied to each masked run before clipping
    pub clean: CleanParams,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            grid_shape: (10, 10),
            scans_to_drop: 2,
            labels_to_drop: 2,
            clean: CleanParams::default(),
        }
    }
}

/// Sample aligned data of all runs
#[derive(Debug, Clone)]
pub struct EncodingData {
    /// One row per sample, one column per stimulus pixel
    pub stimuli: DMatrix<f64>,
    /// One row per sample, one column per masked voxel
    pub responses: DMatrix<f64>,
    /// The mask the responses were extracted with
    pub mask: Mask,
    /// `(rows, cols)` of the stimulus pixel grid
    pub grid_shape: (usize, usize),
}

impl EncodingData {
    /// Number of aligned samples
    #[inline(always)]
    pub fn n_samples(&self) -> usize {
        self.stimuli.nrows()
    }

    /// Number of masked voxels
    #[inline(always)]
    pub fn n_voxels(&self) -> usize {
        self.responses.ncols()
    }
}

/// Loads, masks, cleans and clips every run of `dataset`, then stacks them
pub fn preprocess(dataset: &Dataset, params: &PreprocessParams) -> Result<EncodingData, BrainDataError> {
    info!("preprocessing {} runs of {:?}", dataset.runs.len(), dataset.root);
    let mask = read_mask(&dataset.mask)?;

    let mut responses = Vec::with_capacity(dataset.runs.len());
    let mut stimuli = Vec::with_capacity(dataset.runs.len());
    for (i, run) in dataset.runs.iter().enumerate() {
        let series = read_series(&run.func)?;
        let signals = clean(&apply_mask_series(&series, &mask)?, &params.clean);
        let n_scans = signals.nrows().saturating_sub(params.scans_to_drop);

        let grids = read_labels(&run.label, params.grid_shape)?;
        let n_labels = grids.len().saturating_sub(params.labels_to_drop);

        if n_scans != n_labels {
            return Err(BrainDataError::RunMismatch {
                run: i,
                path: run.func.clone(),
                scans: n_scans,
                labels: n_labels,
            });
        }
        debug!("run {}: {} aligned samples", i, n_scans);

        responses.push(signals.rows(params.scans_to_drop.min(signals.nrows()), n_scans).into_owned());
        stimuli.push(stimulus_matrix(&grids[..n_labels]));
    }

    let data = EncodingData {
        stimuli: vstack(&stimuli),
        responses: vstack(&responses),
        mask,
        grid_shape: params.grid_shape,
    };
    info!(
        "{} samples, {} pixels, {} voxels",
        data.n_samples(),
        data.stimuli.ncols(),
        data.n_voxels()
    );

    Ok(data)
}

/// Stacks matrices of equal width on top of each other
pub fn vstack(blocks: &[DMatrix<f64>]) -> DMatrix<f64> {
    let ncols = blocks.iter().map(|b| b.ncols()).max().unwrap_or(0);
    let nrows = blocks.iter().map(|b| b.nrows()).sum();

    let mut stacked = DMatrix::zeros(nrows, ncols);
    let mut offset = 0;
    for block in blocks.iter().filter(|b| b.nrows() > 0) {
        debug_assert_eq!(block.ncols(), ncols);
        stacked.rows_mut(offset, block.nrows()).copy_from(block);
        offset += block.nrows();
    }

    stacked
}
