use thiserror::Error;

/// Failures of fitting or applying a linear model
#[derive(Debug, Error)]
pub enum LinRegError {
    /// Design and targets disagree on the number of samples
    #[error("design has {design} rows but targets have {targets}")]
    SampleMismatch {
        /// Rows of the design matrix
        design: usize,
        /// Rows of the target matrix
        targets: usize,
    },

    /// A model was applied to data of the wrong width
    #[error("model expects {expected} features, got {got}")]
    FeatureMismatch {
        /// Features the model was fitted on
        expected: usize,
        /// Features of the given design
        got: usize,
    },

    /// Nothing to fit
    #[error("cannot fit on an empty design or target matrix")]
    Empty,

    /// The system to solve has no unique solution
    #[error("{0} system is singular")]
    Singular(&'static str),

    /// Coordinate descent ran out of iterations
    #[error(
        "coordinate descent did not converge for target {target} within {max_iter} iterations \
         (duality gap {gap:e} > {tol:e})"
    )]
    NotConverged {
        /// Column of the target matrix
        target: usize,
        /// The iteration cap
        max_iter: usize,
        /// Duality gap at the last check
        gap: f64,
        /// Tolerance the gap had to reach
        tol: f64,
    },
}
