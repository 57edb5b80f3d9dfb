use nalgebra::DMatrix;

/// Which cleaning steps to apply to masked signals
#[derive(Debug, Clone)]
pub struct CleanParams {
    /// Remove the least squares linear trend of every voxel
    pub detrend: bool,
    /// Scale every voxel to zero mean and unit variance
    pub standardize: bool,
}

impl Default for CleanParams {
    fn default() -> Self {
        Self {
            detrend: true,
            standardize: true,
        }
    }
}

/// Cleans every column (voxel) of `signals` along the sample axis.
///
/// Columns without variance end up all zero when standardized.
pub fn clean(signals: &DMatrix<f64>, params: &CleanParams) -> DMatrix<f64> {
    let mut out = signals.clone();
    let n = signals.nrows();
    if n == 0 || !(params.detrend || params.standardize) {
        return out;
    }

    let t_mean = (n - 1) as f64 / 2.0;
    let t_ss: f64 = (0..n).map(|t| (t as f64 - t_mean).powi(2)).sum();

    for mut column in out.column_iter_mut() {
        let mean = column.mean();
        column.add_scalar_mut(-mean);

        if params.detrend && t_ss > 0.0 {
            let slope = column
                .iter()
                .enumerate()
                .map(|(t, v)| (t as f64 - t_mean) * v)
                .sum::<f64>()
                / t_ss;
            for (t, v) in column.iter_mut().enumerate() {
                *v -= slope * (t as f64 - t_mean);
            }
        }

        if params.standardize {
            let std = (column.norm_squared() / n as f64).sqrt();
            if std > f64::EPSILON {
                column.unscale_mut(std);
            } else {
                column.fill(0.0);
            }
        }
    }

    out
}
