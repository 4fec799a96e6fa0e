//! ColumnMatrix: dense column-major storage for host array values.
//!
//! The host numeric runtime lays matrices out column by column, and every
//! table of the (p, e, t) triple is read one column (one vertex, facet or
//! cell) at a time, so columns are the contiguous unit here.

use std::ops::Index;

use num_traits::Zero;

use crate::mesh_error::MeshBridgeError;

/// A `rows × cols` matrix stored column-major.
///
/// # Invariants
/// `data.len() == rows * cols`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawColumnMatrix<T>")]
pub struct ColumnMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

/// Unchecked wire form; deserialization goes through the shape check.
#[derive(serde::Deserialize)]
struct RawColumnMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> TryFrom<RawColumnMatrix<T>> for ColumnMatrix<T> {
    type Error = MeshBridgeError;

    fn try_from(raw: RawColumnMatrix<T>) -> Result<Self, Self::Error> {
        Self::from_column_major(raw.rows, raw.cols, raw.data)
    }
}

impl<T: Clone> ColumnMatrix<T> {
    /// A matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }
}

impl<T: Clone + Zero> ColumnMatrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::zero())
    }
}

impl<T> ColumnMatrix<T> {
    /// Wraps a column-major buffer.
    ///
    /// # Errors
    /// [`MeshBridgeError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_column_major(
        rows: usize,
        cols: usize,
        data: Vec<T>,
    ) -> Result<Self, MeshBridgeError> {
        if data.len() != rows * cols {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "matrix buffer length",
                expected: rows * cols,
                found: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// A 1×n row vector.
    pub fn from_row(values: Vec<T>) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: values,
        }
    }

    /// Builds a matrix from equally long columns.
    ///
    /// An empty iterator yields a `rows × 0` matrix.
    ///
    /// # Errors
    /// [`MeshBridgeError::ShapeMismatch`] if a column has the wrong length.
    pub fn from_columns<I, C>(rows: usize, columns: I) -> Result<Self, MeshBridgeError>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = T>,
    {
        let mut data = Vec::new();
        let mut cols = 0;
        for column in columns {
            let before = data.len();
            data.extend(column);
            if data.len() - before != rows {
                return Err(MeshBridgeError::ShapeMismatch {
                    what: "matrix column length",
                    expected: rows,
                    found: data.len() - before,
                });
            }
            cols += 1;
        }
        Ok(Self { rows, cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(col * self.rows + row)
        } else {
            None
        }
    }

    /// Overwrites one entry; out-of-range positions are reported, not ignored.
    ///
    /// # Errors
    /// [`MeshBridgeError::ShapeMismatch`] if `(row, col)` is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MeshBridgeError> {
        if row >= self.rows {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "matrix row",
                expected: self.rows,
                found: row,
            });
        }
        if col >= self.cols {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "matrix column",
                expected: self.cols,
                found: col,
            });
        }
        self.data[col * self.rows + row] = value;
        Ok(())
    }

    /// Column `col` as a contiguous slice.
    pub fn column(&self, col: usize) -> Option<&[T]> {
        (col < self.cols).then(|| &self.data[col * self.rows..(col + 1) * self.rows])
    }

    /// Iterate columns left to right.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        // chunks_exact rejects 0; a 0-row matrix still has `cols` empty columns
        (0..self.cols).map(move |c| &self.data[c * self.rows..(c + 1) * self.rows])
    }

    /// Row `row` as an owned vector (rows are strided).
    pub fn row(&self, row: usize) -> Option<Vec<T>>
    where
        T: Clone,
    {
        (row < self.rows).then(|| {
            self.data
                .iter()
                .skip(row)
                .step_by(self.rows)
                .cloned()
                .collect()
        })
    }

    /// The column-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Applies `f` to every entry, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ColumnMatrix<U> {
        ColumnMatrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for ColumnMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[col * self.rows + row]
    }
}
