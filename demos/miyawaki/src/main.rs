#[macro_use]
extern crate log;

mod errors;
mod params;
mod pipeline;

use std::path::PathBuf;

use params::PipelineParams;

const DATASET_DIR: &str = "miyawaki2008";
const BACKGROUND: &str = "bg.nii.gz";
const OUTPUT_DIR: &str = "output";
const N_FOLDS: usize = 10;
const FOLD_SEED: Option<u64> = None;
const ALPHA: f64 = 100.0;
const LASSO_MAX_ITER: usize = 100_000;
const LARS_MAX_ITER: usize = 10;

pub(crate) fn main() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let params = PipelineParams {
        dataset_dir: PathBuf::from(DATASET_DIR),
        background: PathBuf::from(BACKGROUND),
        output_dir: PathBuf::from(OUTPUT_DIR),
        n_folds: N_FOLDS,
        fold_seed: FOLD_SEED,
        ridge_alpha: ALPHA,
        lasso_alpha: ALPHA,
        lasso_max_iter: LASSO_MAX_ITER,
        lars_max_iter: LARS_MAX_ITER,
        ..Default::default()
    };
    debug!("{:?}", params);

    if let Err(e) = pipeline::run(&params) {
        error!("{}", e);
        std::process::exit(1);
    }
}
