use nalgebra::{DMatrix, DVector};

use crate::{centering::Centered, check_shapes, LinReg, LinRegError, LinearModel};

/// Least angle regression with the lasso modification.
///
/// Walks the lasso regularization path knot by knot. At every step the
/// coefficients move along the direction equiangular to all active
/// features, a feature joins when its correlation with the residual catches
/// up and leaves when its coefficient would cross zero.
#[derive(Debug, Clone)]
pub struct LassoLars {
    /// Maximum number of steps along the path
    pub max_iter: usize,
    /// Stop once the regularization falls to this value
    pub alpha_min: f64,
    /// Center design and targets and fit an intercept
    pub fit_intercept: bool,
    /// Scale each centered design column to unit L2 norm before fitting
    pub normalize: bool,
}

impl Default for LassoLars {
    fn default() -> Self {
        Self {
            max_iter: 500,
            alpha_min: 0.0,
            fit_intercept: true,
            normalize: true,
        }
    }
}

/// The knots visited by [`LassoLars`] on a single target
#[derive(Debug, Clone)]
pub struct LarsPath {
    /// Regularization at each knot, the first entry is the maximum correlation
    pub alphas: Vec<f64>,
    /// Coefficients at each knot, in the scale of the raw features
    pub coefs: Vec<DVector<f64>>,
    /// Features active at the end of the path, in order of entry
    pub active: Vec<usize>,
    /// Steps taken
    pub n_iter: usize,
}

impl LarsPath {
    /// Coefficients at the end of the path
    pub fn last_coefs(&self) -> &DVector<f64> {
        // a path always holds at least the all zero start
        &self.coefs[self.coefs.len() - 1]
    }
}

impl LinReg for LassoLars {
    fn fit(
        &self,
        design: &DMatrix<f64>,
        targets: &DMatrix<f64>,
    ) -> Result<LinearModel, LinRegError> {
        check_shapes(design, targets)?;
        let centered = Centered::new(design, targets, self.fit_intercept, self.normalize);

        let mut weights = DMatrix::zeros(design.ncols(), targets.ncols());
        for (target, y) in centered.targets.column_iter().enumerate() {
            let path = self.walk(&centered.design, &y.into_owned())?;
            debug!(
                "target {}: {} steps, active features {:?}",
                target, path.n_iter, path.active
            );
            weights.set_column(target, path.last_coefs());
        }

        Ok(centered.into_model(weights))
    }
}

impl LassoLars {
    /// The full path on a single target
    pub fn path(&self, design: &DMatrix<f64>, target: &DVector<f64>) -> Result<LarsPath, LinRegError> {
        let targets = DMatrix::from_column_slice(target.len(), 1, target.as_slice());
        check_shapes(design, &targets)?;
        let centered = Centered::new(design, &targets, self.fit_intercept, self.normalize);

        let mut path = self.walk(&centered.design, &centered.targets.column(0).into_owned())?;
        for coefs in path.coefs.iter_mut() {
            centered.unscale_coefficients(coefs.as_mut_slice());
        }

        Ok(path)
    }

    /// The path on centered data, coefficients stay in the scale of `x`
    fn walk(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<LarsPath, LinRegError> {
        let n = x.nrows();
        let p = x.ncols();
        let n_f = n as f64;
        let max_features = n.min(p);

        let mut coef = DVector::zeros(p);
        let mut active: Vec<usize> = Vec::with_capacity(max_features);
        let mut signs: Vec<f64> = Vec::with_capacity(max_features);
        let mut dropped_last = false;
        let mut n_iter = 0;

        let c_start = (x.transpose() * y).amax();
        let mut path = LarsPath {
            alphas: vec![c_start / n_f],
            coefs: vec![coef.clone()],
            active: vec![],
            n_iter: 0,
        };
        // residual correlations below this are rounding noise of a perfect fit
        let c_floor = c_start * 1e-12;

        loop {
            let residual = y - x * &coef;
            let cov = x.transpose() * &residual;
            let c = cov.amax();

            if n_iter >= self.max_iter || c / n_f <= self.alpha_min || c <= c_floor {
                break;
            }
            if !dropped_last {
                if active.len() >= max_features {
                    break;
                }
                let entering = (0..p)
                    .filter(|j| !active.contains(j))
                    .max_by(|a, b| cov[*a].abs().total_cmp(&cov[*b].abs()));
                let Some(j) = entering else { break };
                trace!("step {}: feature {} enters, correlation {}", n_iter, j, cov[j]);
                active.push(j);
                signs.push(if cov[j] < 0.0 { -1.0 } else { 1.0 });
            }
            dropped_last = false;

            let k = active.len();
            let x_active = DMatrix::from_fn(n, k, |i, a| x[(i, active[a])] * signs[a]);
            let gram = x_active.transpose() * &x_active;
            let chol = gram.cholesky().ok_or(LinRegError::Singular("lars gram"))?;
            let g_inv_ones = chol.solve(&DVector::from_element(k, 1.0));
            let norm_a = 1.0 / g_inv_ones.sum().sqrt();
            let w = g_inv_ones * norm_a;
            let equiangular = &x_active * &w;
            let a = x.transpose() * &equiangular;

            // step until an inactive feature catches up, or to the least squares fit
            let mut gamma = c / norm_a;
            for j in (0..p).filter(|j| !active.contains(j)) {
                for candidate in [
                    (c - cov[j]) / (norm_a - a[j]),
                    (c + cov[j]) / (norm_a + a[j]),
                ] {
                    if candidate.is_finite() && candidate > 1e-12 && candidate < gamma {
                        gamma = candidate;
                    }
                }
            }

            // lasso modification, a coefficient may not cross zero
            let mut drop = None;
            for (pos, &j) in active.iter().enumerate() {
                let crossing = -coef[j] / (signs[pos] * w[pos]);
                if crossing.is_finite() && crossing > 1e-12 && crossing < gamma {
                    gamma = crossing;
                    drop = Some(pos);
                }
            }

            let mut alpha = (c - gamma * norm_a) / n_f;
            let reached_min = alpha < self.alpha_min;
            if reached_min {
                gamma = (c - self.alpha_min * n_f) / norm_a;
                alpha = self.alpha_min;
                drop = None;
            }

            for (pos, &j) in active.iter().enumerate() {
                coef[j] += gamma * signs[pos] * w[pos];
            }
            n_iter += 1;

            if let Some(pos) = drop {
                let j = active.remove(pos);
                signs.remove(pos);
                coef[j] = 0.0;
                dropped_last = true;
                trace!("step {}: feature {} leaves the active set", n_iter, j);
            }

            path.alphas.push(alpha.max(0.0));
            path.coefs.push(coef.clone());

            if reached_min {
                break;
            }
        }

        path.active = active;
        path.n_iter = n_iter;

        Ok(path)
    }
}
