//! Array-side data: column-major matrices and the `(p, e, t)` mesh triple.

pub mod matrix;
pub mod pet;

pub use matrix::ColumnMatrix;
pub use pet::{CellTable, FacetTable, PetMesh, PointSet};
