use std::path::PathBuf;

use brain_data::PreprocessParams;

/// Everything the encoding analysis can be tuned with
#[derive(Debug, Clone)]
pub(crate) struct PipelineParams {
    /// Root of the dataset, holding `func/`, `label/` and the mask
    pub(crate) dataset_dir: PathBuf,
    /// Anatomical image drawn below the score maps
    pub(crate) background: PathBuf,
    /// Where the figures go
    pub(crate) output_dir: PathBuf,
    pub(crate) preprocess: PreprocessParams,
    pub(crate) n_folds: usize,
    /// Shuffle the samples before splitting them into folds
    pub(crate) fold_seed: Option<u64>,
    pub(crate) ridge_alpha: f64,
    pub(crate) lasso_alpha: f64,
    pub(crate) lasso_max_iter: usize,
    pub(crate) lasso_tol: f64,
    /// Steps along the LARS path of each receptive field
    pub(crate) lars_max_iter: usize,
    /// Response columns to estimate receptive fields for
    pub(crate) rf_voxels: Vec<usize>,
    /// `(x, y, z)` voxels outlined on the score maps, those off `slice` are not drawn
    pub(crate) contour_voxels: Vec<(usize, usize, usize)>,
    /// Axial slice of the score maps
    pub(crate) slice: usize,
    /// `(row, col)` stimulus pixel outlined on the receptive fields
    pub(crate) rf_pixel: (usize, usize),
    /// Scores below this are not drawn
    pub(crate) score_threshold: f64,
    pub(crate) figure_size: (u32, u32),
    pub(crate) colorbar_size: (u32, u32),
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from("miyawaki2008"),
            background: PathBuf::from("bg.nii.gz"),
            output_dir: PathBuf::from("output"),
            preprocess: PreprocessParams::default(),
            n_folds: 10,
            fold_seed: None,
            ridge_alpha: 100.0,
            lasso_alpha: 100.0,
            lasso_max_iter: 100_000,
            lasso_tol: 1e-4,
            lars_max_iter: 10,
            rf_voxels: vec![1700, 1800, 1900, 2000],
            contour_voxels: vec![(31, 9, 10), (31, 10, 10), (30, 10, 10), (32, 10, 10)],
            slice: 10,
            rf_pixel: (4, 2),
            score_threshold: 1e-6,
            figure_size: (800, 800),
            colorbar_size: (720, 120),
        }
    }
}
