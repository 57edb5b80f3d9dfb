use nalgebra::{DMatrix, DVector};

use crate::EncodingError;

/// Coefficient of determination of every column, `1 - SS_res / SS_tot`.
///
/// A column whose actual values are constant has no variance to explain
/// and scores `0`.
pub fn r2_scores(
    actual: &DMatrix<f64>,
    predicted: &DMatrix<f64>,
) -> Result<DVector<f64>, EncodingError> {
    if actual.shape() != predicted.shape() {
        return Err(EncodingError::ShapeMismatch {
            what: "predictions vs. held out responses",
            expected: actual.shape(),
            got: predicted.shape(),
        });
    }

    Ok(DVector::from_iterator(
        actual.ncols(),
        actual
            .column_iter()
            .zip(predicted.column_iter())
            .map(|(y, pred)| {
                let mean = y.mean();
                let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
                if ss_tot == 0.0 {
                    return 0.0;
                }
                let ss_res: f64 = y.iter().zip(pred.iter()).map(|(v, p)| (v - p).powi(2)).sum();
                1.0 - ss_res / ss_tot
            }),
    ))
}

/// Element wise mean over folds
pub fn mean_scores(fold_scores: &[DVector<f64>]) -> DVector<f64> {
    let Some(first) = fold_scores.first() else {
        return DVector::zeros(0);
    };
    let mut sum = DVector::zeros(first.len());
    for scores in fold_scores {
        sum += scores;
    }

    sum / fold_scores.len() as f64
}
