use nalgebra::{DMatrix, DVector};
use ndarray::{Array3, Array4};

use crate::BrainDataError;

/// Boolean selection of voxels in a 3D volume.
///
/// Selected voxels are enumerated in C order over `(x, y, z)`, `z` varying
/// fastest. Every masking operation in this crate uses that order.
#[derive(Debug, Clone)]
pub struct Mask {
    data: Array3<bool>,
    positions: Vec<[usize; 3]>,
}

impl Mask {
    /// Create a new mask from a boolean volume
    pub fn new(data: Array3<bool>) -> Self {
        let positions = data
            .indexed_iter()
            .filter(|(_, selected)| **selected)
            .map(|((x, y, z), _)| [x, y, z])
            .collect();

        Self { data, positions }
    }

    /// Selects every non zero voxel of `volume`
    pub fn from_volume(volume: &Array3<f64>) -> Self {
        Self::new(volume.mapv(|v| v != 0.0))
    }

    /// Spatial shape the mask applies to
    #[inline(always)]
    pub fn shape(&self) -> [usize; 3] {
        let s = self.data.shape();
        [s[0], s[1], s[2]]
    }

    /// Number of selected voxels
    #[inline(always)]
    pub fn n_voxels(&self) -> usize {
        self.positions.len()
    }

    /// Coordinates of the selected voxels, in mask order
    #[inline(always)]
    pub fn positions(&self) -> &[[usize; 3]] {
        &self.positions
    }

    /// Whether the voxel at `(x, y, z)` is selected
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        self.data.get([x, y, z]).copied().unwrap_or(false)
    }

    fn check_shape(&self, what: &'static str, shape: &[usize]) -> Result<(), BrainDataError> {
        if shape != self.data.shape() {
            return Err(BrainDataError::ShapeMismatch {
                what,
                expected: self.data.shape().to_vec(),
                got: shape.to_vec(),
            });
        }
        Ok(())
    }
}

/// Intensities of `volume` at the masked positions
pub fn apply_mask(volume: &Array3<f64>, mask: &Mask) -> Result<DVector<f64>, BrainDataError> {
    mask.check_shape("volume vs. mask", volume.shape())?;

    Ok(DVector::from_iterator(
        mask.n_voxels(),
        mask.positions().iter().map(|p| volume[*p]),
    ))
}

/// Masks every scan of a run, one row per scan and one column per voxel
pub fn apply_mask_series(series: &Array4<f64>, mask: &Mask) -> Result<DMatrix<f64>, BrainDataError> {
    let shape = series.shape();
    mask.check_shape("functional run vs. mask", &shape[..3])?;

    let positions = mask.positions();
    Ok(DMatrix::from_fn(shape[3], positions.len(), |t, v| {
        let [x, y, z] = positions[v];
        series[[x, y, z, t]]
    }))
}

/// Scatters masked values back into a volume, unselected voxels are zero
pub fn unmask(values: &DVector<f64>, mask: &Mask) -> Result<Array3<f64>, BrainDataError> {
    if values.len() != mask.n_voxels() {
        return Err(BrainDataError::ShapeMismatch {
            what: "masked values vs. mask",
            expected: vec![mask.n_voxels()],
            got: vec![values.len()],
        });
    }

    let mut volume = Array3::zeros(mask.shape());
    for (p, v) in mask.positions().iter().zip(values.iter()) {
        volume[*p] = *v;
    }

    Ok(volume)
}

#[cfg(test)]
mod tests {
    use nanorand::{Rng, WyRand};

    use super::*;

    fn sparse_mask() -> Mask {
        let mut data = Array3::from_elem((3, 2, 2), false);
        data[[0, 0, 1]] = true;
        data[[1, 1, 0]] = true;
        data[[2, 0, 0]] = true;
        data[[2, 1, 1]] = true;
        Mask::new(data)
    }

    #[test]
    fn positions_follow_c_order() {
        let mask = sparse_mask();

        assert_eq!(mask.n_voxels(), 4);
        assert_eq!(mask.positions(), &[[0, 0, 1], [1, 1, 0], [2, 0, 0], [2, 1, 1]]);
    }

    #[test]
    fn mask_unmask_round_trip() {
        let mut rng = WyRand::new_seed(0);
        let mask = sparse_mask();
        let volume = Array3::from_shape_fn((3, 2, 2), |_| rng.generate::<f64>() + 1.0);

        let masked = apply_mask(&volume, &mask).unwrap();
        let restored = unmask(&masked, &mask).unwrap();

        for ((x, y, z), v) in restored.indexed_iter() {
            if mask.contains(x, y, z) {
                assert_eq!(*v, volume[[x, y, z]]);
            } else {
                assert_eq!(*v, 0.0);
            }
        }
    }

    #[test]
    fn series_rows_are_scans() {
        let mask = sparse_mask();
        let series = Array4::from_shape_fn((3, 2, 2, 5), |(x, y, z, t)| {
            (t * 1000 + x * 100 + y * 10 + z) as f64
        });

        let m = apply_mask_series(&series, &mask).unwrap();
        assert_eq!(m.shape(), (5, 4));
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(3, 1)], 3110.0);
        assert_eq!(m[(4, 3)], 4211.0);
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mask = sparse_mask();
        let volume = Array3::zeros((3, 2, 3));

        assert!(matches!(
            apply_mask(&volume, &mask),
            Err(BrainDataError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            unmask(&DVector::zeros(3), &mask),
            Err(BrainDataError::ShapeMismatch { .. })
        ));
    }
}
