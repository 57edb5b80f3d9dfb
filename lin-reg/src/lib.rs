//! Penalized linear regression on dense matrices.
//!
//! Every method maps the rows of a design matrix onto the rows of a target
//! matrix with one output per target column, and returns a [`LinearModel`].

#![deny(unused_imports)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

use nalgebra::{DMatrix, RowDVector};

mod centering;
mod errors;
mod lars;
mod lasso;
mod tikhonov_regularization;

pub use errors::LinRegError;
pub use lars::{LarsPath, LassoLars};
pub use lasso::Lasso;
pub use tikhonov_regularization::TikhonovRegularization;

/// Generic way of performing linear regression
pub trait LinReg: Clone {
    /// Fit a linear model, mapping inputs to targets
    ///
    /// # Parameters
    /// design: Input data with one sample per row and one feature per column
    /// targets: Target data with one sample per row and one output per column
    fn fit(&self, design: &DMatrix<f64>, targets: &DMatrix<f64>)
        -> Result<LinearModel, LinRegError>;
}

/// A fitted affine map `design * coefficients + intercept`
#[derive(Debug, Clone)]
pub struct LinearModel {
    /// One row per feature, one column per output
    coefficients: DMatrix<f64>,
    /// One entry per output
    intercept: RowDVector<f64>,
}

impl LinearModel {
    /// Create a new model from its coefficients and intercept
    pub fn new(coefficients: DMatrix<f64>, intercept: RowDVector<f64>) -> Self {
        debug_assert_eq!(coefficients.ncols(), intercept.ncols());
        Self {
            coefficients,
            intercept,
        }
    }

    /// Predict the outputs of every row in `design`
    pub fn predict(&self, design: &DMatrix<f64>) -> Result<DMatrix<f64>, LinRegError> {
        if design.ncols() != self.n_features() {
            return Err(LinRegError::FeatureMismatch {
                expected: self.n_features(),
                got: design.ncols(),
            });
        }
        let product = design * &self.coefficients;

        Ok(DMatrix::from_fn(product.nrows(), product.ncols(), |i, j| {
            product[(i, j)] + self.intercept[j]
        }))
    }

    /// The regression coefficients, features x outputs
    #[inline(always)]
    pub fn coefficients(&self) -> &DMatrix<f64> {
        &self.coefficients
    }

    /// The intercept of each output
    #[inline(always)]
    pub fn intercept(&self) -> &RowDVector<f64> {
        &self.intercept
    }

    /// Number of features the model expects
    #[inline(always)]
    pub fn n_features(&self) -> usize {
        self.coefficients.nrows()
    }
}

/// Checks that design and targets can be fitted against each other
pub(crate) fn check_shapes(
    design: &DMatrix<f64>,
    targets: &DMatrix<f64>,
) -> Result<(), LinRegError> {
    if design.nrows() != targets.nrows() {
        return Err(LinRegError::SampleMismatch {
            design: design.nrows(),
            targets: targets.nrows(),
        });
    }
    if design.is_empty() || targets.is_empty() {
        return Err(LinRegError::Empty);
    }

    Ok(())
}
