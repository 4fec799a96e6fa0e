//! Array ↔ mesh conversion.
//!
//! Import subtracts one from every vertex entry and does nothing else; export
//! adds it back. Only exterior facets are ever written to a facet table.

use crate::algs::boundary::classify_facets;
use crate::bridge::config::BridgeConfig;
use crate::data::matrix::ColumnMatrix;
use crate::data::pet::{
    CellTable, FacetTable, PointSet, cell_label_row, cell_table_rows, check_vertex_rows,
    checked_dimension, facet_domain_row, facet_label_row, facet_table_rows,
};
use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;

/// Builds a mesh from a point set and the vertex rows of a cell table.
///
/// Rows past `D` (the label row) are ignored here; labels are attached by the
/// resolver.
///
/// # Errors
/// - [`MeshBridgeError::Dimension`] unless `points` has 2 or 3 rows.
/// - [`MeshBridgeError::ShapeMismatch`] if `cells` has fewer than D+1 rows.
/// - [`MeshBridgeError::IndexOutOfRange`] for a vertex entry outside `1..=Nv`.
/// - [`MeshBridgeError::InvalidCell`] for a degenerate cell.
pub fn build_mesh(points: &PointSet, cells: &CellTable) -> Result<SimplexMesh, MeshBridgeError> {
    let dim = checked_dimension(points)?;
    if cells.rows() < dim + 1 {
        return Err(MeshBridgeError::ShapeMismatch {
            what: "cell table rows",
            expected: cell_table_rows(dim),
            found: cells.rows(),
        });
    }
    check_vertex_rows(cells, dim + 1, points.cols())?;

    let connectivity = cells
        .columns()
        .flat_map(|column| column[..=dim].iter().map(|&v| (v - 1) as usize))
        .collect();
    SimplexMesh::new(dim, points.as_slice().to_vec(), connectivity)
}

/// Vertex coordinates of `mesh` as a D×Nv point set.
pub fn extract_points(mesh: &SimplexMesh) -> Result<PointSet, MeshBridgeError> {
    // the mesh buffer is vertex-major with `dimension()` values per vertex
    ColumnMatrix::from_column_major(
        mesh.dimension(),
        mesh.num_vertices(),
        mesh.coordinates().to_vec(),
    )
}

/// Cell table of `mesh`, labelled from `labels` or with `cfg.unlabeled`.
///
/// # Errors
/// [`MeshBridgeError::StaleLabels`] or [`MeshBridgeError::LabelDimension`] if
/// `labels` are not cell labels of `mesh`.
pub fn extract_cells(
    mesh: &SimplexMesh,
    labels: Option<&EntityLabels>,
    cfg: &BridgeConfig,
) -> Result<CellTable, MeshBridgeError> {
    let dim = mesh.dimension();
    if let Some(labels) = labels {
        labels.ensure_attached(mesh, dim)?;
    }
    let label_row = cell_label_row(dim);
    let columns = mesh.cells().enumerate().map(|(c, cell)| {
        let mut column: Vec<i64> = cell.iter().map(|&v| v as i64 + 1).collect();
        column.resize(label_row, 0);
        column.push(label_or_default(labels, c, cfg));
        column
    });
    ColumnMatrix::from_columns(cell_table_rows(dim), columns)
}

/// Facet table of the exterior facets of `mesh`, in facet-index order.
///
/// # Errors
/// [`MeshBridgeError::StaleLabels`] or [`MeshBridgeError::LabelDimension`] if
/// `labels` are not facet labels of `mesh`.
pub fn extract_boundary_facets(
    mesh: &SimplexMesh,
    labels: Option<&EntityLabels>,
    cfg: &BridgeConfig,
) -> Result<FacetTable, MeshBridgeError> {
    let dim = mesh.dimension();
    if let Some(labels) = labels {
        labels.ensure_attached(mesh, dim - 1)?;
    }
    let rows = facet_table_rows(dim);
    let (label_row, domain_row) = (facet_label_row(dim), facet_domain_row(dim));

    let boundary = classify_facets(mesh);
    let columns = boundary.exterior.iter().map(|&f| {
        let mut column = vec![0; rows];
        for (slot, &v) in column.iter_mut().zip(mesh.facet_vertices(f)) {
            *slot = v as i64 + 1;
        }
        column[domain_row] = cfg.facet_domain_tag;
        column[label_row] = label_or_default(labels, f, cfg);
        column
    });
    ColumnMatrix::from_columns(rows, columns)
}

fn label_or_default(labels: Option<&EntityLabels>, entity: usize, cfg: &BridgeConfig) -> i64 {
    labels
        .and_then(|l| l.get_label(entity))
        .unwrap_or(cfg.unlabeled)
}
