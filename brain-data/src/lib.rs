//! Loading, masking and cleaning of fMRI runs and the visual stimuli shown
//! during them.

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod clean;
mod dataset;
mod errors;
mod masking;
mod nifti_io;
mod preprocess;
mod stimulus;

#[cfg(test)]
pub(crate) mod test_support;

pub use clean::{clean, CleanParams};
pub use dataset::{Dataset, DatasetLayout, Run};
pub use errors::BrainDataError;
pub use masking::{apply_mask, apply_mask_series, unmask, Mask};
pub use nifti_io::{read_mask, read_series, read_volume};
pub use preprocess::{preprocess, vstack, EncodingData, PreprocessParams};
pub use stimulus::{read_labels, stimulus_matrix, StimulusGrid};
