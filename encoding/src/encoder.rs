use lin_reg::LinReg;
use nalgebra::{DMatrix, DVector};

use crate::{mean_scores, r2_scores, EncodingError, KFold};

/// Held out scores of every fold
#[derive(Debug, Clone)]
pub struct CvScores {
    /// One R^2 per voxel for each fold, in fold order
    pub fold_scores: Vec<DVector<f64>>,
}

impl CvScores {
    /// Per voxel score averaged over the folds
    pub fn mean(&self) -> DVector<f64> {
        mean_scores(&self.fold_scores)
    }
}

/// Fits `regressor` on the training rows of every fold and scores its
/// predictions of the held out responses.
///
/// # Parameters
/// stimuli: One sample per row, one pixel per column
/// responses: One sample per row, one voxel per column
/// kfold: Partition of the samples
pub fn cross_validate<R: LinReg>(
    regressor: &R,
    stimuli: &DMatrix<f64>,
    responses: &DMatrix<f64>,
    kfold: &KFold,
) -> Result<CvScores, EncodingError> {
    if stimuli.nrows() != responses.nrows() {
        return Err(EncodingError::SampleMismatch {
            stimuli: stimuli.nrows(),
            responses: responses.nrows(),
        });
    }
    if stimuli.is_empty() || responses.is_empty() {
        return Err(EncodingError::Empty);
    }
    if kfold.n_samples() != stimuli.nrows() {
        return Err(EncodingError::InvalidFolds {
            n_folds: kfold.n_folds(),
            n_samples: stimuli.nrows(),
        });
    }

    let mut fold_scores = Vec::with_capacity(kfold.n_folds());
    for (fold, split) in kfold.folds().iter().enumerate() {
        let fit_err = |source| EncodingError::Fit { fold, source };

        let model = regressor
            .fit(
                &stimuli.select_rows(&split.train),
                &responses.select_rows(&split.train),
            )
            .map_err(fit_err)?;
        let predicted = model
            .predict(&stimuli.select_rows(&split.test))
            .map_err(fit_err)?;
        let scores = r2_scores(&responses.select_rows(&split.test), &predicted)?;
        debug!(
            "fold {}: {} train, {} test, mean score {:.4}",
            fold,
            split.train.len(),
            split.test.len(),
            scores.mean()
        );

        fold_scores.push(scores);
    }

    Ok(CvScores { fold_scores })
}

#[cfg(test)]
mod tests {
    use lin_reg::{Lasso, TikhonovRegularization};
    use nanorand::{Rng, WyRand};

    use super::*;

    /// Stimuli living in a two dimensional subspace and responses exactly linear in them
    fn linear_dataset(n: usize, p: usize, v: usize) -> (DMatrix<f64>, DMatrix<f64>) {
        let mut rng = WyRand::new_seed(0);
        let coords: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.generate::<f64>() * 2.0 - 1.0, rng.generate::<f64>() * 2.0 - 1.0))
            .collect();
        let stimuli = DMatrix::from_fn(n, p, |i, j| {
            let (a, b) = coords[i];
            a * ((j + 1) as f64).sin() + b * ((2 * j + 1) as f64).cos()
        });
        let weights = DMatrix::from_fn(p, v, |_, _| rng.generate::<f64>() - 0.5);
        let offsets = DMatrix::from_fn(n, v, |_, k| k as f64);

        let responses = &stimuli * weights + offsets;
        (stimuli, responses)
    }

    #[test]
    fn linear_responses_score_near_one() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let (stimuli, responses) = linear_dataset(20, 100, 3);
        let kfold = KFold::new(20, 5, None).unwrap();
        let ridge = TikhonovRegularization {
            regularization_coeff: 1e-6,
            fit_intercept: true,
            normalize: true,
        };

        let cv = cross_validate(&ridge, &stimuli, &responses, &kfold).unwrap();
        assert_eq!(cv.fold_scores.len(), 5);
        let mean = cv.mean();
        info!("mean scores: {:?}", mean);
        assert_eq!(mean.len(), 3);
        assert!(mean.iter().all(|s| *s > 0.999));
        assert!(cv.fold_scores.iter().flatten().all(|s| *s > 0.99));
    }

    #[test]
    fn huge_penalty_scores_at_most_zero() {
        let (stimuli, responses) = linear_dataset(20, 100, 2);
        let kfold = KFold::new(20, 4, Some(3)).unwrap();
        let lasso = Lasso {
            alpha: 100.0,
            normalize: true,
            ..Default::default()
        };

        // predicting the training mean never beats the held out mean
        let cv = cross_validate(&lasso, &stimuli, &responses, &kfold).unwrap();
        assert!(cv.fold_scores.iter().flatten().all(|s| *s <= 0.0));
    }

    #[test]
    fn misaligned_inputs_are_rejected() {
        let kfold = KFold::new(4, 2, None).unwrap();
        let ridge = TikhonovRegularization::default();

        assert!(matches!(
            cross_validate(&ridge, &DMatrix::zeros(4, 2), &DMatrix::zeros(5, 1), &kfold),
            Err(EncodingError::SampleMismatch {
                stimuli: 4,
                responses: 5
            })
        ));
        assert!(matches!(
            cross_validate(&ridge, &DMatrix::zeros(6, 2), &DMatrix::zeros(6, 1), &kfold),
            Err(EncodingError::InvalidFolds { .. })
        ));
        assert!(matches!(
            cross_validate(&ridge, &DMatrix::zeros(4, 0), &DMatrix::zeros(4, 1), &kfold),
            Err(EncodingError::Empty)
        ));
    }

    #[test]
    fn fit_failure_names_the_fold() {
        let mut rng = WyRand::new_seed(2);
        let base: Vec<f64> = (0..40).map(|_| rng.generate::<f64>() * 2.0 - 1.0).collect();
        let stimuli = DMatrix::from_fn(40, 2, |i, j| base[i] + j as f64 * 1e-6 * i as f64);
        let responses = DMatrix::from_fn(40, 1, |i, _| base[i] + 1e-5 * i as f64);
        let kfold = KFold::new(40, 2, None).unwrap();
        let lasso = Lasso {
            alpha: 1e-9,
            max_iter: 1,
            tol: 1e-12,
            ..Default::default()
        };

        assert!(matches!(
            cross_validate(&lasso, &stimuli, &responses, &kfold),
            Err(EncodingError::Fit { fold: 0, .. })
        ));
    }
}
