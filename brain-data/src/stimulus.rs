use std::path::Path;

use nalgebra::DMatrix;

use crate::BrainDataError;

/// A visual stimulus, pixel intensities on a `rows x cols` grid
#[derive(Debug, Clone, PartialEq)]
pub struct StimulusGrid {
    rows: usize,
    cols: usize,
    /// row major
    values: Vec<f64>,
}

impl StimulusGrid {
    /// Create a new grid from row major values
    pub fn new(shape: (usize, usize), values: Vec<f64>) -> Result<Self, BrainDataError> {
        let (rows, cols) = shape;
        if values.len() != rows * cols {
            return Err(BrainDataError::ShapeMismatch {
                what: "stimulus grid",
                expected: vec![rows * cols],
                got: vec![values.len()],
            });
        }

        Ok(Self { rows, cols, values })
    }

    /// Reshapes a flat label row where the row index varies fastest,
    /// i.e. `flat[r + rows * c]` is the pixel at row `r` and column `c`
    pub fn from_column_major(shape: (usize, usize), flat: &[f64]) -> Result<Self, BrainDataError> {
        let (rows, cols) = shape;
        if flat.len() != rows * cols {
            return Err(BrainDataError::ShapeMismatch {
                what: "label row",
                expected: vec![rows * cols],
                got: vec![flat.len()],
            });
        }
        let values = (0..rows * cols)
            .map(|i| flat[i / cols + rows * (i % cols)])
            .collect();

        Ok(Self { rows, cols, values })
    }

    /// Inverse of [`StimulusGrid::from_column_major`]
    pub fn to_column_major(&self) -> Vec<f64> {
        (0..self.rows * self.cols)
            .map(|i| self.get(i % self.rows, i / self.rows))
            .collect()
    }

    /// The pixels in row major order, the feature order of the stimulus matrix
    #[inline(always)]
    pub fn flatten(&self) -> &[f64] {
        &self.values
    }

    /// Pixel at row `r` and column `c`
    #[inline(always)]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.cols + c]
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Reads one stimulus per line of a comma separated file of integer pixels
pub fn read_labels(path: &Path, shape: (usize, usize)) -> Result<Vec<StimulusGrid>, BrainDataError> {
    let csv_err = |source| BrainDataError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut grids = vec![];
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let flat = record
            .iter()
            .map(|cell| {
                cell.parse::<i64>().map(|v| v as f64).map_err(|_| BrainDataError::Parse {
                    path: path.to_path_buf(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        grids.push(StimulusGrid::from_column_major(shape, &flat)?);
    }
    debug!("read {} stimuli from {:?}", grids.len(), path);

    Ok(grids)
}

/// One row per stimulus holding its flattened pixels
pub fn stimulus_matrix(grids: &[StimulusGrid]) -> DMatrix<f64> {
    let n_pixels = grids.first().map(|g| g.flatten().len()).unwrap_or(0);

    DMatrix::from_fn(grids.len(), n_pixels, |i, j| grids[i].flatten()[j])
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::test_support::write_labels;

    #[test]
    fn column_major_round_trip() {
        let flat: Vec<f64> = (0..100).map(|v| v as f64).collect();

        let grid = StimulusGrid::from_column_major((10, 10), &flat).unwrap();
        assert_eq!(grid.get(3, 0), 3.0);
        assert_eq!(grid.get(0, 3), 30.0);
        assert_eq!(grid.get(4, 2), 24.0);
        assert_eq!(grid.to_column_major(), flat);

        let again = StimulusGrid::new((10, 10), grid.flatten().to_vec()).unwrap();
        assert_eq!(again, grid);
    }

    #[test]
    fn non_square_grid() {
        let flat = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let grid = StimulusGrid::from_column_major((2, 3), &flat).unwrap();

        assert_eq!(grid.flatten(), &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
        assert_eq!(grid.to_column_major(), flat.to_vec());
    }

    #[test]
    fn labels_become_feature_rows() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let dir = tempdir().unwrap();
        let path = dir.path().join("label.csv");
        write_labels(&path, &[vec![0, 1, 0, 1], vec![1, 1, 0, 0], vec![0, 0, 0, 1]]);

        let grids = read_labels(&path, (2, 2)).unwrap();
        assert_eq!(grids.len(), 3);

        let m = stimulus_matrix(&grids);
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(m.row(1).iter().copied().collect::<Vec<_>>(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn malformed_labels_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("label.csv");
        std::fs::write(&path, "0,1,x,1\n").unwrap();
        assert!(matches!(
            read_labels(&path, (2, 2)),
            Err(BrainDataError::Parse { row: 0, .. })
        ));

        std::fs::write(&path, "0,1,1\n").unwrap();
        assert!(matches!(
            read_labels(&path, (2, 2)),
            Err(BrainDataError::ShapeMismatch { .. })
        ));
    }
}
