//! The PDE-tool `(p, e, t)` mesh triple.
//!
//! - `p`: D×Nv vertex coordinates, one column per vertex.
//! - `t`: (D+2)×Nc cells; rows `0..=D` are 1-based vertex indices, row `D+1`
//!   the subdomain label.
//! - `e`: R×Nf boundary facets, R = 7 (2D) or 10 (3D); rows `0..D` are 1-based
//!   vertex indices, row `D²` the boundary label, row `R-2` a constant domain
//!   tag, every other row zero.
//!
//! Vertex indices are stored as `i64` like every other integer entry so that
//! malformed input (zero, negative) can be reported rather than wrapped.

use crate::data::matrix::ColumnMatrix;
use crate::mesh_error::MeshBridgeError;

/// D×Nv coordinates.
pub type PointSet = ColumnMatrix<f64>;
/// (D+2)×Nc cell table.
pub type CellTable = ColumnMatrix<i64>;
/// R×Nf boundary facet table.
pub type FacetTable = ColumnMatrix<i64>;

/// Row count of the facet table for mesh dimension `dim`.
pub fn facet_table_rows(dim: usize) -> usize {
    match dim {
        2 => 7,
        d => d * d + 1,
    }
}

/// Row of the facet table carrying the boundary label (`D²`).
pub fn facet_label_row(dim: usize) -> usize {
    dim * dim
}

/// Row of the facet table carrying the domain tag (second to last).
pub fn facet_domain_row(dim: usize) -> usize {
    facet_table_rows(dim) - 2
}

/// Row count of the cell table for mesh dimension `dim`.
pub fn cell_table_rows(dim: usize) -> usize {
    dim + 2
}

/// Row of the cell table carrying the subdomain label.
pub fn cell_label_row(dim: usize) -> usize {
    dim + 1
}

/// Mesh dimension implied by a point set, checked against {2, 3}.
///
/// # Errors
/// [`MeshBridgeError::Dimension`] otherwise.
pub fn checked_dimension(points: &PointSet) -> Result<usize, MeshBridgeError> {
    match points.rows() {
        d @ (2 | 3) => Ok(d),
        dim => Err(MeshBridgeError::Dimension { dim }),
    }
}

/// A mesh in array form.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PetMesh {
    /// Vertex coordinates.
    pub p: PointSet,
    /// Boundary facets.
    pub e: FacetTable,
    /// Cells.
    pub t: CellTable,
}

impl PetMesh {
    pub fn new(p: PointSet, e: FacetTable, t: CellTable) -> Self {
        Self { p, e, t }
    }

    /// Geometric dimension D (rows of `p`), without validation.
    pub fn dimension(&self) -> usize {
        self.p.rows()
    }

    pub fn num_vertices(&self) -> usize {
        self.p.cols()
    }

    pub fn num_cells(&self) -> usize {
        self.t.cols()
    }

    pub fn num_facets(&self) -> usize {
        self.e.cols()
    }

    /// Checks shapes and vertex ranges.
    ///
    /// Accepted shapes: `t` with D+1 (unlabelled) or D+2 rows; `e` with at
    /// least D rows, or no columns at all. Every vertex entry must lie in
    /// `1..=Nv`.
    ///
    /// # Errors
    /// [`MeshBridgeError::Dimension`], [`MeshBridgeError::ShapeMismatch`] or
    /// [`MeshBridgeError::IndexOutOfRange`].
    pub fn validate(&self) -> Result<(), MeshBridgeError> {
        let dim = checked_dimension(&self.p)?;
        if self.t.rows() != dim + 1 && self.t.rows() != cell_table_rows(dim) {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "cell table rows",
                expected: cell_table_rows(dim),
                found: self.t.rows(),
            });
        }
        check_vertex_rows(&self.t, dim + 1, self.num_vertices())?;

        if self.e.cols() > 0 {
            if self.e.rows() < dim {
                return Err(MeshBridgeError::ShapeMismatch {
                    what: "facet table rows",
                    expected: facet_table_rows(dim),
                    found: self.e.rows(),
                });
            }
            check_vertex_rows(&self.e, dim, self.num_vertices())?;
        }
        Ok(())
    }
}

/// Checks that rows `0..vertex_rows` of `table` hold 1-based indices into
/// `num_vertices` vertices.
pub(crate) fn check_vertex_rows(
    table: &ColumnMatrix<i64>,
    vertex_rows: usize,
    num_vertices: usize,
) -> Result<(), MeshBridgeError> {
    for column in table.columns() {
        for &v in &column[..vertex_rows] {
            if v < 1 || v as u64 > num_vertices as u64 {
                return Err(MeshBridgeError::IndexOutOfRange {
                    what: "vertex",
                    index: v,
                    len: num_vertices,
                });
            }
        }
    }
    Ok(())
}
