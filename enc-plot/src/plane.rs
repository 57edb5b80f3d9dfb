use crate::RenderError;

/// A row major 2D grid of values, the unit every figure layer is drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    rows: usize,
    cols: usize,
    values: Vec<T>,
}

impl<T: Copy> Plane<T> {
    /// Create a new plane from row major values
    pub fn new(rows: usize, cols: usize, values: Vec<T>) -> Result<Self, RenderError> {
        if values.len() != rows * cols {
            return Err(RenderError::ShapeMismatch {
                what: "plane values",
                expected: (rows, cols),
                got: (values.len(), 1),
            });
        }
        Ok(Self { rows, cols, values })
    }

    /// Create a new plane holding `f(row, col)` in every cell
    pub fn from_fn<F: FnMut(usize, usize) -> T>(rows: usize, cols: usize, mut f: F) -> Self {
        let values = (0..rows * cols).map(|i| f(i / cols, i % cols)).collect();
        Self { rows, cols, values }
    }

    /// A plane of `value` everywhere
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            values: vec![value; rows * cols],
        }
    }

    /// Value at row `r` and column `c`
    #[inline(always)]
    pub fn get(&self, r: usize, c: usize) -> T {
        self.values[r * self.cols + c]
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// All values in row major order
    #[inline(always)]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub(crate) fn check_shape<U>(&self, what: &'static str, other: &Plane<U>) -> Result<(), RenderError> {
        if (other.rows, other.cols) != self.shape() {
            return Err(RenderError::ShapeMismatch {
                what,
                expected: self.shape(),
                got: (other.rows, other.cols),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_layout() {
        let plane = Plane::from_fn(2, 3, |r, c| r * 10 + c);

        assert_eq!(plane.values(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(plane.get(1, 2), 12);
        assert_eq!(Plane::new(2, 3, plane.values().to_vec()).unwrap(), plane);
        assert!(Plane::new(2, 2, vec![0.0; 3]).is_err());
    }
}
