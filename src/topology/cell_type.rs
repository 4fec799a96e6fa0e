//! Simplex cell types handled by the kernel.

use crate::mesh_error::MeshBridgeError;

/// Simplex shapes, indexed by topological dimension.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellType {
    /// 0D vertex.
    #[default]
    Vertex,
    /// 1D segment/edge.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 3D simplex (tet).
    Tetrahedron,
}

impl CellType {
    /// Cell type of the top-dimensional cells of a `dim`-dimensional mesh.
    ///
    /// # Errors
    /// [`MeshBridgeError::Dimension`] unless `dim` is 2 or 3.
    pub fn for_mesh_dimension(dim: usize) -> Result<Self, MeshBridgeError> {
        match dim {
            2 => Ok(CellType::Triangle),
            3 => Ok(CellType::Tetrahedron),
            _ => Err(MeshBridgeError::Dimension { dim }),
        }
    }

    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> usize {
        match self {
            CellType::Vertex => 0,
            CellType::Segment => 1,
            CellType::Triangle => 2,
            CellType::Tetrahedron => 3,
        }
    }

    /// Number of vertices of the simplex (`dimension + 1`).
    pub fn vertex_count(self) -> usize {
        self.dimension() + 1
    }

    /// Type of the codimension-1 entities bounding this cell.
    pub fn facet_type(self) -> Option<CellType> {
        match self {
            CellType::Vertex => None,
            CellType::Segment => Some(CellType::Vertex),
            CellType::Triangle => Some(CellType::Segment),
            CellType::Tetrahedron => Some(CellType::Triangle),
        }
    }

    /// Element name used by DOLFIN XML files.
    pub fn dolfin_name(self) -> &'static str {
        match self {
            CellType::Vertex => "vertex",
            CellType::Segment => "interval",
            CellType::Triangle => "triangle",
            CellType::Tetrahedron => "tetrahedron",
        }
    }

    /// Parse a DOLFIN XML element name.
    pub fn from_dolfin_name(name: &str) -> Option<Self> {
        match name {
            "vertex" => Some(CellType::Vertex),
            "interval" => Some(CellType::Segment),
            "triangle" => Some(CellType::Triangle),
            "tetrahedron" => Some(CellType::Tetrahedron),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_triangles_and_tets_are_mesh_cells() {
        assert_eq!(CellType::for_mesh_dimension(2), Ok(CellType::Triangle));
        assert_eq!(CellType::for_mesh_dimension(3), Ok(CellType::Tetrahedron));
        assert_eq!(
            CellType::for_mesh_dimension(1),
            Err(MeshBridgeError::Dimension { dim: 1 })
        );
        assert_eq!(
            CellType::for_mesh_dimension(4),
            Err(MeshBridgeError::Dimension { dim: 4 })
        );
    }

    #[test]
    fn facet_types_step_down_one_dimension() {
        for ct in [CellType::Segment, CellType::Triangle, CellType::Tetrahedron] {
            let facet = ct.facet_type().unwrap();
            assert_eq!(facet.dimension() + 1, ct.dimension());
            assert_eq!(CellType::from_dolfin_name(ct.dolfin_name()), Some(ct));
        }
        assert_eq!(CellType::Vertex.facet_type(), None);
    }
}
