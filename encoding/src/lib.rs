//! Cross-validated encoding models mapping visual stimuli onto voxel
//! responses, and sparse receptive field estimates of single voxels.

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod encoder;
mod errors;
mod kfold;
mod receptive_field;
mod scoring;

pub use encoder::{cross_validate, CvScores};
pub use errors::EncodingError;
pub use kfold::{Fold, KFold};
pub use receptive_field::{estimate_receptive_field, ReceptiveField};
pub use scoring::{mean_scores, r2_scores};
