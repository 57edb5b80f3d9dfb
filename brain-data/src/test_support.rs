//! Fixture writers for the unit tests

use std::{fs, path::Path};

/// Writes a single file NIfTI-1 image of 64 bit floats, `data` in x fastest order
pub(crate) fn write_nifti(path: &Path, dims: &[usize], data: &[f64]) {
    assert_eq!(dims.iter().product::<usize>(), data.len());
    let mut header = vec![0u8; 352];
    header[0..4].copy_from_slice(&348i32.to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = dims.len() as i16;
    for (i, d) in dims.iter().enumerate() {
        dim[i + 1] = *d as i16;
    }
    for (i, d) in dim.iter().enumerate() {
        header[40 + 2 * i..42 + 2 * i].copy_from_slice(&d.to_le_bytes());
    }
    // datatype float64, 64 bits per voxel
    header[70..72].copy_from_slice(&64i16.to_le_bytes());
    header[72..74].copy_from_slice(&64i16.to_le_bytes());
    for i in 0..8 {
        header[76 + 4 * i..80 + 4 * i].copy_from_slice(&1f32.to_le_bytes());
    }
    header[108..112].copy_from_slice(&352f32.to_le_bytes());
    header[112..116].copy_from_slice(&1f32.to_le_bytes());
    header[344..348].copy_from_slice(b"n+1\0");

    for v in data {
        header.extend_from_slice(&v.to_le_bytes());
    }
    fs::write(path, header).unwrap();
}

/// Writes comma separated integer rows
pub(crate) fn write_labels(path: &Path, rows: &[Vec<i64>]) {
    let text: String = rows
        .iter()
        .map(|r| r.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",") + "\n")
        .collect();
    fs::write(path, text).unwrap();
}
