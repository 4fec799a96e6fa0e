//! Boundary classification of facets.
//!
//! A facet is exterior when exactly one cell is incident to it, interior when
//! two are. Only exterior facets appear in an exported facet table.

use crate::topology::mesh::SimplexMesh;

/// Exterior/interior facet sets, each sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundaryClassification {
    pub exterior: Vec<usize>,
    pub interior: Vec<usize>,
}

/// Classify every facet of `mesh` by its incident cell count.
pub fn classify_facets(mesh: &SimplexMesh) -> BoundaryClassification {
    let (exterior, interior) = (0..mesh.num_facets()).partition(|&f| mesh.is_exterior_facet(f));
    BoundaryClassification { exterior, interior }
}
