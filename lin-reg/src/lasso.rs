use nalgebra::{DMatrix, DVector};

use crate::{centering::Centered, check_shapes, LinReg, LinRegError, LinearModel};

/// L1 penalized least squares, solved by cyclic coordinate descent.
///
/// Minimizes `1 / (2 * n_samples) * ||y - X w||^2 + alpha * ||w||_1` for every
/// target column independently.
#[derive(Debug, Clone)]
pub struct Lasso {
    /// Weight of the L1 penalty
    pub alpha: f64,
    /// Maximum number of full sweeps over the features
    pub max_iter: usize,
    /// Convergence tolerance on the duality gap, relative to `||y||^2`
    pub tol: f64,
    /// Center design and targets and fit an intercept
    pub fit_intercept: bool,
    /// Scale each centered design column to unit L2 norm before fitting
    pub normalize: bool,
}

impl Default for Lasso {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iter: 1000,
            tol: 1e-4,
            fit_intercept: true,
            normalize: false,
        }
    }
}

impl LinReg for Lasso {
    fn fit(
        &self,
        design: &DMatrix<f64>,
        targets: &DMatrix<f64>,
    ) -> Result<LinearModel, LinRegError> {
        check_shapes(design, targets)?;
        if self.alpha == 0.0 {
            warn!("lasso with alpha = 0 is plain least squares and may converge slowly");
        }
        let centered = Centered::new(design, targets, self.fit_intercept, self.normalize);

        let mut weights = DMatrix::zeros(design.ncols(), targets.ncols());
        for (target, y) in centered.targets.column_iter().enumerate() {
            let w = self.descend(&centered.design, y.iter().copied().collect(), target)?;
            weights.set_column(target, &DVector::from_vec(w));
        }
        debug!(
            "lasso kept {} of {} coefficients",
            weights.iter().filter(|w| **w != 0.0).count(),
            weights.len()
        );

        Ok(centered.into_model(weights))
    }
}

impl Lasso {
    /// Coordinate descent on a single target
    fn descend(
        &self,
        x: &DMatrix<f64>,
        y: Vec<f64>,
        target: usize,
    ) -> Result<Vec<f64>, LinRegError> {
        let n = x.nrows();
        let p = x.ncols();
        let xs = x.as_slice();

        let mut w = vec![0.0; p];
        let y_norm2 = dot(&y, &y);
        if y_norm2 == 0.0 {
            return Ok(w);
        }

        let norm_cols: Vec<f64> = (0..p).map(|j| dot(column(xs, n, j), column(xs, n, j))).collect();
        let l1_reg = self.alpha * n as f64;
        let tol = self.tol * y_norm2;

        let mut residual = y.clone();
        let mut gap = f64::INFINITY;

        for n_iter in 0..self.max_iter {
            let mut w_max: f64 = 0.0;
            let mut d_w_max: f64 = 0.0;

            for j in 0..p {
                if norm_cols[j] == 0.0 {
                    continue;
                }
                let w_j = w[j];
                let x_j = column(xs, n, j);
                if w_j != 0.0 {
                    axpy(w_j, x_j, &mut residual);
                }

                w[j] = soft_threshold(dot(x_j, &residual), l1_reg) / norm_cols[j];

                if w[j] != 0.0 {
                    axpy(-w[j], x_j, &mut residual);
                }
                d_w_max = d_w_max.max((w[j] - w_j).abs());
                w_max = w_max.max(w[j].abs());
            }

            if w_max == 0.0 || d_w_max / w_max < self.tol || n_iter + 1 == self.max_iter {
                gap = duality_gap(x, &y, &residual, &w, l1_reg);
                if gap < tol {
                    trace!("target {} converged after {} sweeps", target, n_iter + 1);
                    return Ok(w);
                }
            }
        }

        Err(LinRegError::NotConverged {
            target,
            max_iter: self.max_iter,
            gap,
            tol,
        })
    }
}

/// Duality gap of the lasso problem at weights `w`, scaled by `n_samples`
fn duality_gap(x: &DMatrix<f64>, y: &[f64], residual: &[f64], w: &[f64], l1_reg: f64) -> f64 {
    let n = x.nrows();
    let xs = x.as_slice();
    let dual_norm = (0..x.ncols())
        .map(|j| dot(column(xs, n, j), residual).abs())
        .fold(0.0, f64::max);
    let r_norm2 = dot(residual, residual);

    let (gap, scale) = if dual_norm > l1_reg {
        let scale = l1_reg / dual_norm;
        (0.5 * (r_norm2 + r_norm2 * scale * scale), scale)
    } else {
        (r_norm2, 1.0)
    };
    let l1_norm: f64 = w.iter().map(|v| v.abs()).sum();

    gap + l1_reg * l1_norm - scale * dot(residual, y)
}

/// Column `j` of column major storage with `n` rows
#[inline(always)]
fn column(xs: &[f64], n: usize, j: usize) -> &[f64] {
    &xs[j * n..(j + 1) * n]
}

#[inline(always)]
fn soft_threshold(v: f64, threshold: f64) -> f64 {
    v.signum() * (v.abs() - threshold).max(0.0)
}

#[inline(always)]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

#[inline(always)]
fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    y.iter_mut().zip(x).for_each(|(y, x)| *y += alpha * x);
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};
    use round::round;

    use super::*;

    fn random_design(rng: &mut WyRand, n: usize, p: usize) -> DMatrix<f64> {
        DMatrix::from_fn(n, p, |_, _| rng.generate::<f64>() * 2.0 - 1.0)
    }

    #[test]
    fn small_penalty_recovers_sparse_weights() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let mut rng = WyRand::new_seed(0);
        let design = random_design(&mut rng, 50, 4);
        let targets = DMatrix::from_fn(50, 1, |i, _| {
            3.0 * design[(i, 0)] - 2.0 * design[(i, 2)] + 1.0
        });

        let regressor = Lasso {
            alpha: 1e-6,
            max_iter: 10_000,
            tol: 1e-10,
            ..Default::default()
        };
        let model = regressor.fit(&design, &targets).unwrap();
        let coefs: Vec<f64> = model.coefficients().iter().map(|v| round(*v, 3)).collect();
        info!("coefs: {:?}, intercept: {}", coefs, model.intercept());

        assert_eq!(coefs, vec![3.0, 0.0, -2.0, 0.0]);
        assert_eq!(round(model.intercept()[0], 3), 1.0);
    }

    #[test]
    fn huge_penalty_predicts_training_mean() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let mut rng = WyRand::new_seed(1);
        let design = random_design(&mut rng, 30, 5);
        let targets = DMatrix::from_fn(30, 2, |i, j| design[(i, j)] + j as f64 * 10.0);

        let regressor = Lasso {
            alpha: 100.0,
            normalize: true,
            ..Default::default()
        };
        let model = regressor.fit(&design, &targets).unwrap();
        assert!(model.coefficients().iter().all(|w| *w == 0.0));

        let preds = model.predict(&design).unwrap();
        for j in 0..2 {
            let mean = targets.column(j).mean();
            assert!(preds.column(j).iter().all(|p| (p - mean).abs() < 1e-12));
        }
    }

    #[test]
    fn iteration_cap_is_an_error() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let mut rng = WyRand::new_seed(2);
        // nearly collinear columns make coordinate descent crawl
        let base = random_design(&mut rng, 40, 1);
        let design = DMatrix::from_fn(40, 2, |i, j| base[(i, 0)] + j as f64 * 1e-6 * i as f64);
        let targets = DMatrix::from_fn(40, 1, |i, _| base[(i, 0)] + 1e-5 * i as f64);

        let regressor = Lasso {
            alpha: 1e-9,
            max_iter: 1,
            tol: 1e-12,
            ..Default::default()
        };
        assert!(matches!(
            regressor.fit(&design, &targets),
            Err(LinRegError::NotConverged {
                target: 0,
                max_iter: 1,
                ..
            })
        ));
    }

    #[test]
    fn constant_target_yields_zero_weights() {
        let design = DMatrix::from_vec(3, 1, vec![1.0, 2.0, 4.0]);
        let targets = DMatrix::from_vec(3, 1, vec![5.0, 5.0, 5.0]);

        let model = Lasso::default().fit(&design, &targets).unwrap();
        assert_eq!(model.coefficients()[0], 0.0);
        assert_eq!(model.intercept()[0], 5.0);
    }

    #[test]
    fn soft_threshold_shrinks_towards_zero() {
        assert_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
    }
}
