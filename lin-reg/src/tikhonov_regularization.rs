use nalgebra::DMatrix;

use crate::{centering::Centered, check_shapes, LinReg, LinRegError, LinearModel};

/// Tikhonov regularization aka ridge regression
/// It is particularly useful to mitigate the problem of multicollinearity in
/// linear regression
#[derive(Debug, Clone)]
pub struct TikhonovRegularization {
    /// Ridge parameter
    pub regularization_coeff: f64,
    /// Center design and targets and fit an intercept
    pub fit_intercept: bool,
    /// Scale each centered design column to unit L2 norm before fitting
    pub normalize: bool,
}

impl Default for TikhonovRegularization {
    fn default() -> Self {
        Self {
            regularization_coeff: 1.0,
            fit_intercept: true,
            normalize: false,
        }
    }
}

impl LinReg for TikhonovRegularization {
    fn fit(
        &self,
        design: &DMatrix<f64>,
        targets: &DMatrix<f64>,
    ) -> Result<LinearModel, LinRegError> {
        check_shapes(design, targets)?;
        let centered = Centered::new(design, targets, self.fit_intercept, self.normalize);
        let x = &centered.design;

        let reg_m: DMatrix<f64> =
            DMatrix::from_diagonal_element(x.ncols(), x.ncols(), self.regularization_coeff);

        let p0 = x.transpose() * x;
        let p1 = (p0 + reg_m).cholesky().ok_or(LinRegError::Singular("ridge"))?;
        let p2 = x.transpose() * &centered.targets;
        let weights = p1.solve(&p2);
        trace!("ridge weights: {}", weights);

        Ok(centered.into_model(weights))
    }
}
