use nalgebra::{DMatrix, RowDVector};

use crate::LinearModel;

/// Design and targets shifted to zero column means, with the design columns
/// optionally scaled to unit L2 norm.
/// Keeps the offsets so fitted weights can be mapped back onto the raw data.
#[derive(Debug, Clone)]
pub(crate) struct Centered {
    pub(crate) design: DMatrix<f64>,
    pub(crate) targets: DMatrix<f64>,
    design_offset: RowDVector<f64>,
    design_scale: RowDVector<f64>,
    target_offset: RowDVector<f64>,
}

impl Centered {
    /// Centering only happens with `fit_intercept`, and scaling only with both flags set
    pub(crate) fn new(
        design: &DMatrix<f64>,
        targets: &DMatrix<f64>,
        fit_intercept: bool,
        normalize: bool,
    ) -> Self {
        let p = design.ncols();
        let o = targets.ncols();

        if !fit_intercept {
            return Self {
                design: design.clone(),
                targets: targets.clone(),
                design_offset: RowDVector::zeros(p),
                design_scale: RowDVector::from_element(p, 1.0),
                target_offset: RowDVector::zeros(o),
            };
        }

        let design_offset = column_means(design);
        let target_offset = column_means(targets);

        let mut design = DMatrix::from_fn(design.nrows(), p, |i, j| {
            design[(i, j)] - design_offset[j]
        });
        let targets = DMatrix::from_fn(targets.nrows(), o, |i, j| {
            targets[(i, j)] - target_offset[j]
        });

        let design_scale = if normalize {
            let scale = RowDVector::from_iterator(
                p,
                (0..p).map(|j| {
                    let norm = design.column(j).norm();
                    if norm == 0.0 {
                        1.0
                    } else {
                        norm
                    }
                }),
            );
            for j in 0..p {
                design.column_mut(j).unscale_mut(scale[j]);
            }
            scale
        } else {
            RowDVector::from_element(p, 1.0)
        };

        Self {
            design,
            targets,
            design_offset,
            design_scale,
            target_offset,
        }
    }

    /// Maps a coefficient vector of the scaled design back to the raw feature scale
    pub(crate) fn unscale_coefficients(&self, weights: &mut [f64]) {
        for (w, s) in weights.iter_mut().zip(self.design_scale.iter()) {
            *w /= s;
        }
    }

    /// Builds the model on raw data from weights fitted on the centered data
    pub(crate) fn into_model(&self, mut weights: DMatrix<f64>) -> LinearModel {
        for j in 0..weights.nrows() {
            weights.row_mut(j).unscale_mut(self.design_scale[j]);
        }
        let shift = &self.design_offset * &weights;
        let intercept = &self.target_offset - shift;

        LinearModel::new(weights, intercept)
    }
}

fn column_means(m: &DMatrix<f64>) -> RowDVector<f64> {
    RowDVector::from_iterator(m.ncols(), m.column_iter().map(|c| c.mean()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_and_normalizes_columns() {
        let design = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, 2.0, 5.0, 3.0, 5.0]);
        let targets = DMatrix::from_row_slice(3, 1, &[2.0, 4.0, 6.0]);

        let c = Centered::new(&design, &targets, true, true);

        assert!((c.design.column(0).norm() - 1.0).abs() < 1e-12);
        assert!(c.design.column(0).sum().abs() < 1e-12);
        // constant column is centered to zero and keeps a unit scale
        assert_eq!(c.design.column(1).norm(), 0.0);
        assert_eq!(c.targets.as_slice(), &[-2.0, 0.0, 2.0]);
    }

    #[test]
    fn no_intercept_leaves_data_untouched() {
        let design = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let targets = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);

        let c = Centered::new(&design, &targets, false, true);
        assert_eq!(c.design, design);
        assert_eq!(c.targets, targets);

        let model = c.into_model(DMatrix::from_row_slice(2, 1, &[1.0, 1.0]));
        assert_eq!(model.intercept()[0], 0.0);
    }
}
