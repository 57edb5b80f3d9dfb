use brain_data::BrainDataError;
use enc_plot::RenderError;
use encoding::EncodingError;
use thiserror::Error;

/// Anything that stops the analysis
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or preprocessing failed
    #[error("data: {0}")]
    BrainData(#[from] BrainDataError),

    /// Cross validation or receptive field estimation failed
    #[error("encoding: {0}")]
    Encoding(#[from] EncodingError),

    /// A figure could not be written
    #[error("render: {0}")]
    Render(#[from] RenderError),

    /// A configured position lies outside the volume or stimulus grid
    #[error("{what} {index:?} outside of shape {shape:?}")]
    OutOfBounds {
        /// What was looked up
        what: &'static str,
        /// The offending position
        index: Vec<usize>,
        /// Shape it had to fit into
        shape: Vec<usize>,
    },
}
