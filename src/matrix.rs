//! Row-major dense numeric matrix (component C1).
//!
//! A thin, shape-fixed wrapper around [`ndarray::Array2`] that adds the
//! handful of operations the clustering engine needs directly on the
//! matrix type: bulk row assignment, bulk fill, and locating the
//! `(row, col)` of the minimum element. Resizing is intentionally not
//! supported — shape is fixed at construction.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use num_traits::Float;

/// A dense, row-major matrix of `rows` × `cols` elements of type `T`.
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    data: Array2<T>,
}

impl<T> Matrix<T>
where
    T: Float,
{
    /// Builds a matrix of the given shape, every element initialized to `fill`.
    pub fn filled(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), fill),
        }
    }

    /// Builds a matrix of the given shape, every element initialized to zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }

    /// Wraps an existing [`ndarray::Array2`] as a `Matrix`.
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Element access by `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[[row, col]]
    }

    /// A read-only view of one row.
    pub fn row(&self, row: usize) -> ArrayView1<T> {
        self.data.row(row)
    }

    /// Overwrites one row with the given values.
    ///
    /// # Panics
    /// Panics if `values.len() != self.cols()`.
    pub fn set_row(&mut self, row: usize, values: &ArrayView1<T>) {
        assert_eq!(values.len(), self.cols(), "row length mismatch");
        self.data.row_mut(row).assign(values);
    }

    /// Fills every element with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Sets a single element.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[[row, col]] = value;
    }

    /// Locates the `(row, col)` of the minimum element and its value.
    ///
    /// Ties are broken by row-major order: the first minimum encountered
    /// when scanning rows in order, then columns within a row, wins.
    ///
    /// # Panics
    /// Panics if the matrix is empty.
    pub fn find_min(&self) -> ((usize, usize), T) {
        let mut best_coords = (0, 0);
        let mut best_value: Option<T> = None;
        for (r, row) in self.data.axis_iter(Axis(0)).enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if best_value.map_or(true, |b| value < b) {
                    best_value = Some(value);
                    best_coords = (r, c);
                }
            }
        }
        (
            best_coords,
            best_value.expect("find_min called on an empty matrix"),
        )
    }

    /// Iterates over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Borrows the underlying [`ndarray::Array2`].
    pub fn as_array(&self) -> &Array2<T> {
        &self.data
    }

    /// Copies a subset of rows (by index, in the given order) into a fresh matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let cols = self.cols();
        let mut out = Array2::zeros((indices.len(), cols));
        for (dst, &src) in indices.iter().enumerate() {
            out.row_mut(dst).assign(&self.data.row(src));
        }
        Self { data: out }
    }

    /// Sums of each row (used by callers computing per-point aggregates); not
    /// part of the original contract but convenient for tests.
    #[cfg(test)]
    pub fn row_sum(&self, row: usize) -> T {
        self.data.row(row).iter().fold(T::zero(), |acc, &x| acc + x)
    }
}

impl<T> From<Array2<T>> for Matrix<T>
where
    T: Float,
{
    fn from(data: Array2<T>) -> Self {
        Self::from_array(data)
    }
}

/// Build a [`Matrix`] directly from row-major data, checking the element count.
pub fn from_rows<T: Float>(rows: usize, cols: usize, data: Vec<T>) -> Result<Matrix<T>, String> {
    if data.len() != rows * cols {
        return Err(format!(
            "expected {} elements for a {}x{} matrix, got {}",
            rows * cols,
            rows,
            cols,
            data.len()
        ));
    }
    let array = Array1::from_vec(data)
        .into_shape((rows, cols))
        .map_err(|e| e.to_string())?;
    Ok(Matrix::from_array(array))
}
