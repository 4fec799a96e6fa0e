//! Entity label resolution.
//!
//! A facet or cell table names entities by their 1-based vertex indices, in
//! any order. Each column is matched to a mesh entity by comparing sorted
//! vertex sets against the entities incident to the column's first vertex,
//! so the search stays local to one vertex star. The first match receives the
//! column's label.

use crate::bridge::config::{BridgeConfig, UnmatchedPolicy};
use crate::data::matrix::ColumnMatrix;
use crate::data::pet::{cell_label_row, check_vertex_rows, facet_label_row};
use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;

/// Where the vertex indices and the label sit in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableLayout {
    /// Entity dimension the columns describe.
    pub dimension: usize,
    /// Rows `0..vertex_rows` hold 1-based vertex indices.
    pub vertex_rows: usize,
    /// Row of the label; `None` (or a table too short to have it) means
    /// every matched entity gets the configured unlabeled value.
    pub label_row: Option<usize>,
}

impl TableLayout {
    /// Boundary facet table of a `dim`-mesh.
    pub fn facets(dim: usize) -> Self {
        Self {
            dimension: dim - 1,
            vertex_rows: dim,
            label_row: Some(facet_label_row(dim)),
        }
    }

    /// Cell table of a `dim`-mesh.
    pub fn cells(dim: usize) -> Self {
        Self {
            dimension: dim,
            vertex_rows: dim + 1,
            label_row: Some(cell_label_row(dim)),
        }
    }
}

/// Labels the entities of `mesh` named by the columns of `table`.
///
/// # Errors
/// - [`MeshBridgeError::LabelDimension`] if the layout names neither facets
///   nor cells of `mesh`.
/// - [`MeshBridgeError::ShapeMismatch`] if a non-empty table has fewer rows
///   than vertex rows.
/// - [`MeshBridgeError::IndexOutOfRange`] for a vertex entry outside `1..=Nv`.
/// - [`MeshBridgeError::UnmatchedEntity`] for a column matching no entity,
///   under [`UnmatchedPolicy::Error`].
pub fn resolve_and_label(
    mesh: &SimplexMesh,
    table: &ColumnMatrix<i64>,
    layout: TableLayout,
    cfg: &BridgeConfig,
) -> Result<EntityLabels, MeshBridgeError> {
    let mut labels = EntityLabels::new(mesh, layout.dimension);
    if table.cols() == 0 {
        return Ok(labels);
    }
    if layout.dimension > mesh.dimension() || layout.dimension + 1 < mesh.dimension() {
        return Err(MeshBridgeError::LabelDimension {
            expected: mesh.dimension(),
            found: layout.dimension,
        });
    }
    if layout.vertex_rows != layout.dimension + 1 {
        return Err(MeshBridgeError::ShapeMismatch {
            what: "vertices per entity",
            expected: layout.dimension + 1,
            found: layout.vertex_rows,
        });
    }
    if table.rows() < layout.vertex_rows {
        return Err(MeshBridgeError::ShapeMismatch {
            what: "table rows",
            expected: layout.vertex_rows,
            found: table.rows(),
        });
    }
    check_vertex_rows(table, layout.vertex_rows, mesh.num_vertices())?;
    let label_row = layout.label_row.filter(|&r| r < table.rows());

    let mut key = Vec::with_capacity(layout.vertex_rows);
    let mut unmatched = 0usize;
    for (column, entries) in table.columns().enumerate() {
        key.clear();
        key.extend(entries[..layout.vertex_rows].iter().map(|&v| (v - 1) as usize));
        let first = key[0];
        key.sort_unstable();

        let found = mesh
            .incident_entities(first, layout.dimension)
            .iter()
            .copied()
            .find(|&e| mesh.entity_vertices(layout.dimension, e) == Some(key.as_slice()));

        match found {
            Some(entity) => {
                let value = label_row.map_or(cfg.unlabeled, |r| entries[r]);
                labels.set_label(entity, value);
            }
            None => {
                unmatched += 1;
                match cfg.unmatched {
                    UnmatchedPolicy::Error => {
                        return Err(MeshBridgeError::UnmatchedEntity {
                            dimension: layout.dimension,
                            column,
                            vertices: key.iter().map(|&v| v + 1).collect(),
                        });
                    }
                    UnmatchedPolicy::Warn => log::warn!(
                        "column {column} (vertices {:?}) matches no dimension-{} entity; label dropped",
                        key.iter().map(|&v| v + 1).collect::<Vec<_>>(),
                        layout.dimension
                    ),
                    UnmatchedPolicy::Ignore => {}
                }
            }
        }
    }

    log::debug!(
        "resolved {} of {} dimension-{} columns on mesh {} ({} unmatched)",
        table.cols() - unmatched,
        table.cols(),
        layout.dimension,
        mesh.id(),
        unmatched
    );
    Ok(labels)
}

/// Resolves a boundary facet table (labels on dimension D-1).
pub fn resolve_facet_labels(
    mesh: &SimplexMesh,
    facets: &ColumnMatrix<i64>,
    cfg: &BridgeConfig,
) -> Result<EntityLabels, MeshBridgeError> {
    resolve_and_label(mesh, facets, TableLayout::facets(mesh.dimension()), cfg)
}

/// Resolves a cell table (labels on dimension D).
pub fn resolve_cell_labels(
    mesh: &SimplexMesh,
    cells: &ColumnMatrix<i64>,
    cfg: &BridgeConfig,
) -> Result<EntityLabels, MeshBridgeError> {
    resolve_and_label(mesh, cells, TableLayout::cells(mesh.dimension()), cfg)
}
