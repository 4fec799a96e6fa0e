//! Refinement driver: refine a mesh and carry its labels onto the child.

use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;
use crate::topology::refine::{CellMarkers, refine_marked};

/// Child mesh of one refinement together with its adapted labels.
#[derive(Clone, Debug)]
pub struct RefinementOutcome {
    pub mesh: SimplexMesh,
    pub facet_labels: EntityLabels,
    pub cell_labels: EntityLabels,
}

/// Refines `mesh` at `markers` and adapts both label functions.
///
/// The parent mesh and its labels are consumed, so none of them can be
/// consulted once the child exists. Entities whose parent had no label stay
/// unlabelled; the assembler writes the configured default for them.
///
/// # Errors
/// - [`MeshBridgeError::StaleLabels`] or [`MeshBridgeError::LabelDimension`]
///   if the labels are not facet/cell labels of `mesh`.
/// - Any error of [`refine_marked`].
pub fn refine_with_labels(
    mesh: SimplexMesh,
    markers: &CellMarkers,
    facet_labels: EntityLabels,
    cell_labels: EntityLabels,
) -> Result<RefinementOutcome, MeshBridgeError> {
    let dim = mesh.dimension();
    facet_labels.ensure_attached(&mesh, dim - 1)?;
    cell_labels.ensure_attached(&mesh, dim)?;

    let refined = refine_marked(&mesh, markers)?;
    let facet_labels = refined.facet_map.adapt_labels(&facet_labels, &refined.mesh)?;
    let cell_labels = refined.cell_map.adapt_labels(&cell_labels, &refined.mesh)?;

    Ok(RefinementOutcome {
        mesh: refined.mesh,
        facet_labels,
        cell_labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh() -> SimplexMesh {
        SimplexMesh::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0],
            vec![0, 2, 3, 0, 1, 3],
        )
        .unwrap()
    }

    #[test]
    fn labels_follow_their_entities() {
        let m = mesh();
        let mut facets = EntityLabels::new(&m, 1);
        facets.set_label(2, 1); // bottom (0,2)
        facets.set_label(4, 4); // left (0,1)
        let mut cells = EntityLabels::new(&m, 2);
        cells.set_label(0, 1);
        cells.set_label(1, 2);

        let out = refine_with_labels(m, &CellMarkers::all(2), facets, cells).unwrap();
        assert_eq!(out.mesh.num_cells(), 4);
        assert_eq!(out.facet_labels.mesh_id(), out.mesh.id());
        assert_eq!(out.facet_labels.len(), 2);
        assert_eq!(out.facet_labels.stratum_values(), vec![1, 4]);
        assert_eq!(out.cell_labels.stratum_entities(1), vec![0, 1]);
        assert_eq!(out.cell_labels.stratum_entities(2), vec![2, 3]);
    }

    #[test]
    fn foreign_labels_are_rejected_before_refining() {
        let m = mesh();
        let other = mesh();
        let facets = EntityLabels::new(&other, 1);
        let cells = EntityLabels::new(&m, 2);
        assert!(matches!(
            refine_with_labels(m, &CellMarkers::all(2), facets, cells),
            Err(MeshBridgeError::StaleLabels { .. })
        ));
    }
}
