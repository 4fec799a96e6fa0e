//! Result assembly: a labelled mesh back into the `(p, e, t)` triple.

use crate::bridge::config::BridgeConfig;
use crate::bridge::convert::{extract_boundary_facets, extract_cells, extract_points};
use crate::data::pet::PetMesh;
use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;

/// Serializes `mesh` with its labels; unlabelled entities get
/// `cfg.unlabeled`.
///
/// # Errors
/// Label attachment errors from the extractors.
pub fn assemble_pet(
    mesh: &SimplexMesh,
    facet_labels: Option<&EntityLabels>,
    cell_labels: Option<&EntityLabels>,
    cfg: &BridgeConfig,
) -> Result<PetMesh, MeshBridgeError> {
    let p = extract_points(mesh)?;
    let e = extract_boundary_facets(mesh, facet_labels, cfg)?;
    let t = extract_cells(mesh, cell_labels, cfg)?;
    log::debug!(
        "assembled mesh {}: {} points, {} boundary facets, {} cells",
        mesh.id(),
        p.cols(),
        e.cols(),
        t.cols()
    );
    Ok(PetMesh::new(p, e, t))
}
