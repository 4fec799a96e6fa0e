//! Cell selection for refinement.

use crate::mesh_error::MeshBridgeError;
use crate::topology::mesh::SimplexMesh;
use crate::topology::refine::CellMarkers;

/// Turns an optional list of 1-based cell indices into refinement markers.
///
/// `None` marks every cell. Duplicates are harmless; an empty list marks
/// nothing.
///
/// # Errors
/// [`MeshBridgeError::IndexOutOfRange`] for an index below 1 or above the
/// cell count.
pub fn build_refine_predicate(
    mesh: &SimplexMesh,
    cells: Option<&[i64]>,
) -> Result<CellMarkers, MeshBridgeError> {
    let num_cells = mesh.num_cells();
    let Some(cells) = cells else {
        return Ok(CellMarkers::all(num_cells));
    };

    check_cell_indices(num_cells, cells)?;
    CellMarkers::from_cells(num_cells, cells.iter().map(|&index| (index - 1) as usize))
}

/// Checks 1-based cell indices against a cell count without building a mesh.
///
/// # Errors
/// [`MeshBridgeError::IndexOutOfRange`] for the first index outside
/// `1..=num_cells`.
pub fn check_cell_indices(num_cells: usize, cells: &[i64]) -> Result<(), MeshBridgeError> {
    match cells
        .iter()
        .find(|&&index| index < 1 || index as u64 > num_cells as u64)
    {
        Some(&index) => Err(MeshBridgeError::IndexOutOfRange {
            what: "cell",
            index,
            len: num_cells,
        }),
        None => Ok(()),
    }
}
