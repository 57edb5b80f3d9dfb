use std::path::Path;

use ndarray::{Array3, Array4, ArrayD, Axis, Ix3, Ix4};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

use crate::{BrainDataError, Mask};

/// Reads a whole image, gzipped or not, as 64 bit floats indexed `[x, y, z, ...]`
fn read_ndarray(path: &Path) -> Result<ArrayD<f64>, BrainDataError> {
    let nifti_err = |source| BrainDataError::Nifti {
        path: path.to_path_buf(),
        source,
    };
    let obj = ReaderOptions::new().read_file(path).map_err(nifti_err)?;
    let data = obj.into_volume().into_ndarray::<f64>().map_err(nifti_err)?;
    debug!("read {:?} with shape {:?}", path, data.shape());

    Ok(data)
}

fn dimensionality_err(path: &Path, shape: &[usize], expected: usize) -> BrainDataError {
    BrainDataError::Dimensionality {
        path: path.to_path_buf(),
        shape: shape.to_vec(),
        expected,
    }
}

/// Reads a 3D volume. A 4D image holding a single scan is accepted as well.
pub fn read_volume(path: &Path) -> Result<Array3<f64>, BrainDataError> {
    let data = read_ndarray(path)?;
    let shape = data.shape().to_vec();
    let data = match shape.len() {
        3 => data,
        4 if shape[3] == 1 => data.index_axis_move(Axis(3), 0),
        _ => return Err(dimensionality_err(path, &shape, 3)),
    };

    data.into_dimensionality::<Ix3>()
        .map_err(|_| dimensionality_err(path, &shape, 3))
}

/// Reads a functional run as `[x, y, z, t]`. A 3D image is a run of one scan.
pub fn read_series(path: &Path) -> Result<Array4<f64>, BrainDataError> {
    let data = read_ndarray(path)?;
    let shape = data.shape().to_vec();
    let data = match shape.len() {
        3 => data.insert_axis(Axis(3)),
        4 => data,
        _ => return Err(dimensionality_err(path, &shape, 4)),
    };

    data.into_dimensionality::<Ix4>()
        .map_err(|_| dimensionality_err(path, &shape, 4))
}

/// Reads a mask image, every non zero voxel is selected
pub fn read_mask(path: &Path) -> Result<Mask, BrainDataError> {
    let mask = Mask::from_volume(&read_volume(path)?);
    info!("mask {:?} selects {} voxels", path, mask.n_voxels());

    Ok(mask)
}
