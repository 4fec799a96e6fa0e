//! `SimplexMesh`: the kernel's topological mesh.
//!
//! A mesh stores vertex coordinates and simplex cells. Facets (edges in 2D,
//! triangles in 3D) are derived on first use and cached for the lifetime of
//! the mesh, together with the incidence relations the label resolver and
//! the refinement code query.
//!
//! # Ordering conventions
//! - Cell vertex lists are stored sorted ascending.
//! - Local facet `i` of a cell is the cell with its `i`-th vertex removed.
//! - Facets are numbered in order of first appearance when visiting cells in
//!   order and their local facets in order.
//!
//! Entity indices are dense and local to one mesh instance; they are *not*
//! stable across refinement. Every mesh carries a process-unique [`MeshId`]
//! so that per-entity data can detect being used with the wrong mesh.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use once_cell::sync::OnceCell;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshBridgeError;
use crate::topology::cell_type::CellType;

/// Identity of one mesh instance.
///
/// Clones of a mesh share its id (they describe the same entities); a mesh
/// produced by refinement always gets a fresh one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

impl MeshId {
    fn fresh() -> Self {
        MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sorted facet vertices, unused trailing slots hold `usize::MAX`.
type FacetKey = [usize; 3];

#[derive(Clone, Debug, Default)]
struct FacetConnectivity {
    /// `dim` sorted vertex indices per facet.
    facet_vertices: Vec<usize>,
    /// Facet index of local facet `i` of cell `c` at `c * (dim + 1) + i`.
    cell_facets: Vec<usize>,
    facet_cells: Vec<Vec<usize>>,
    vertex_facets: Vec<Vec<usize>>,
}

/// Simplicial mesh of triangles (2D) or tetrahedra (3D).
#[derive(Clone, Debug)]
pub struct SimplexMesh {
    id: MeshId,
    dim: usize,
    cell_type: CellType,
    /// `dim` coordinates per vertex.
    coordinates: Vec<f64>,
    /// `dim + 1` sorted vertex indices per cell.
    cells: Vec<usize>,
    vertex_cells: OnceCell<Vec<Vec<usize>>>,
    facets: OnceCell<FacetConnectivity>,
}

impl SimplexMesh {
    /// Build a mesh from flat, 0-based buffers.
    ///
    /// `coordinates` holds `dim` values per vertex and `cells` holds `dim + 1`
    /// vertex indices per cell. Cell vertex lists are sorted on insertion.
    ///
    /// # Errors
    /// - [`MeshBridgeError::Dimension`] unless `dim` is 2 or 3.
    /// - [`MeshBridgeError::ShapeMismatch`] for ragged buffers.
    /// - [`MeshBridgeError::IndexOutOfRange`] for a vertex index past the vertex count.
    /// - [`MeshBridgeError::InvalidCell`] for a cell repeating a vertex.
    pub fn new(
        dim: usize,
        coordinates: Vec<f64>,
        mut cells: Vec<usize>,
    ) -> Result<Self, MeshBridgeError> {
        let cell_type = CellType::for_mesh_dimension(dim)?;
        if coordinates.len() % dim != 0 {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "coordinate buffer length modulo dimension",
                expected: 0,
                found: coordinates.len() % dim,
            });
        }
        let per_cell = cell_type.vertex_count();
        if cells.len() % per_cell != 0 {
            return Err(MeshBridgeError::ShapeMismatch {
                what: "cell buffer length modulo vertices per cell",
                expected: 0,
                found: cells.len() % per_cell,
            });
        }

        let num_vertices = coordinates.len() / dim;
        for (c, cell) in cells.chunks_exact_mut(per_cell).enumerate() {
            if let Some(&v) = cell.iter().find(|&&v| v >= num_vertices) {
                return Err(MeshBridgeError::IndexOutOfRange {
                    what: "vertex",
                    index: v as i64 + 1,
                    len: num_vertices,
                });
            }
            cell.sort_unstable();
            if let Some(pair) = cell.windows(2).find(|w| w[0] == w[1]) {
                return Err(MeshBridgeError::InvalidCell {
                    cell: c,
                    reason: format!("vertex {} is repeated", pair[0]),
                });
            }
        }

        Ok(Self {
            id: MeshId::fresh(),
            dim,
            cell_type,
            coordinates,
            cells,
            vertex_cells: OnceCell::new(),
            facets: OnceCell::new(),
        })
    }

    /// Identity of this mesh instance.
    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Topological (and geometric) dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.coordinates.len() / self.dim
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len() / (self.dim + 1)
    }

    /// Number of facets; computes facet connectivity on first call.
    pub fn num_facets(&self) -> usize {
        self.connectivity().facet_cells.len()
    }

    /// Number of entities of dimension `d` (0 = vertices).
    pub fn num_entities(&self, d: usize) -> usize {
        if d == 0 {
            self.num_vertices()
        } else if d == self.dim {
            self.num_cells()
        } else if d + 1 == self.dim {
            self.num_facets()
        } else {
            0
        }
    }

    /// All coordinates, `dimension()` values per vertex.
    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn vertex_coordinates(&self, v: usize) -> &[f64] {
        &self.coordinates[v * self.dim..(v + 1) * self.dim]
    }

    /// Sorted vertex indices of cell `c`.
    pub fn cell_vertices(&self, c: usize) -> &[usize] {
        let n = self.dim + 1;
        &self.cells[c * n..(c + 1) * n]
    }

    /// Iterate over the sorted vertex lists of all cells.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &[usize]> + '_ {
        self.cells.chunks_exact(self.dim + 1)
    }

    /// Sorted vertex indices of facet `f`.
    pub fn facet_vertices(&self, f: usize) -> &[usize] {
        let n = self.dim;
        &self.connectivity().facet_vertices[f * n..(f + 1) * n]
    }

    /// Vertex indices of the entity `i` of dimension `d`; `None` for
    /// dimensions other than facets and cells.
    pub fn entity_vertices(&self, d: usize, i: usize) -> Option<&[usize]> {
        if d == self.dim {
            Some(self.cell_vertices(i))
        } else if d + 1 == self.dim {
            Some(self.facet_vertices(i))
        } else {
            None
        }
    }

    /// Cells incident to vertex `v`, ascending.
    pub fn vertex_cells(&self, v: usize) -> &[usize] {
        let incidence = self.vertex_cells.get_or_init(|| {
            let mut incidence = vec![Vec::new(); self.num_vertices()];
            for (c, cell) in self.cells().enumerate() {
                for &w in cell {
                    incidence[w].push(c);
                }
            }
            incidence
        });
        &incidence[v]
    }

    /// Facets incident to vertex `v`, ascending.
    pub fn vertex_facets(&self, v: usize) -> &[usize] {
        &self.connectivity().vertex_facets[v]
    }

    /// Entities of dimension `d` incident to vertex `v` (facets or cells).
    pub fn incident_entities(&self, v: usize, d: usize) -> &[usize] {
        if d == self.dim {
            self.vertex_cells(v)
        } else if d + 1 == self.dim {
            self.vertex_facets(v)
        } else {
            &[]
        }
    }

    /// Cells sharing facet `f` (one on the boundary, two inside).
    pub fn facet_cells(&self, f: usize) -> &[usize] {
        &self.connectivity().facet_cells[f]
    }

    /// Facet indices of cell `c`; entry `i` is the facet opposite local vertex `i`.
    pub fn cell_facets(&self, c: usize) -> &[usize] {
        let n = self.dim + 1;
        &self.connectivity().cell_facets[c * n..(c + 1) * n]
    }

    /// A facet is exterior when it bounds exactly one cell.
    pub fn is_exterior_facet(&self, f: usize) -> bool {
        self.facet_cells(f).len() == 1
    }

    /// Exterior facets in facet-index order.
    pub fn exterior_facets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_facets()).filter(move |&f| self.is_exterior_facet(f))
    }

    /// Squared Euclidean length of the segment between vertices `a` and `b`.
    pub fn edge_length_squared(&self, a: usize, b: usize) -> f64 {
        self.vertex_coordinates(a)
            .iter()
            .zip(self.vertex_coordinates(b))
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }

    fn connectivity(&self) -> &FacetConnectivity {
        self.facets.get_or_init(|| self.compute_facets())
    }

    fn compute_facets(&self) -> FacetConnectivity {
        let per_cell = self.dim + 1;
        let mut index: HashMap<FacetKey, usize> = HashMap::with_capacity(self.cells.len());
        let mut conn = FacetConnectivity {
            cell_facets: Vec::with_capacity(self.cells.len()),
            ..FacetConnectivity::default()
        };

        for (c, cell) in self.cells().enumerate() {
            for skip in 0..per_cell {
                let key = facet_key(cell, skip);
                let next = conn.facet_cells.len();
                let f = *index.entry(key).or_insert(next);
                if f == next {
                    conn.facet_vertices
                        .extend(key.iter().copied().filter(|&v| v != usize::MAX));
                    conn.facet_cells.push(Vec::with_capacity(2));
                }
                conn.cell_facets.push(f);
                conn.facet_cells[f].push(c);
            }
        }

        conn.vertex_facets = vec![Vec::new(); self.num_vertices()];
        for (f, verts) in conn.facet_vertices.chunks_exact(self.dim).enumerate() {
            for &v in verts {
                conn.vertex_facets[v].push(f);
            }
        }
        log::trace!(
            "mesh {}: derived {} facets from {} cells",
            self.id,
            conn.facet_cells.len(),
            self.num_cells()
        );
        conn
    }
}

fn facet_key(cell: &[usize], skip: usize) -> FacetKey {
    let mut key = [usize::MAX; 3];
    for (slot, &v) in key
        .iter_mut()
        .zip(cell.iter().enumerate().filter(|&(j, _)| j != skip).map(|(_, v)| v))
    {
        *slot = v;
    }
    key
}

impl DebugInvariants for SimplexMesh {
    fn validate_invariants(&self) -> Result<(), MeshBridgeError> {
        let nv = self.num_vertices();
        for (c, cell) in self.cells().enumerate() {
            if cell.windows(2).any(|w| w[0] >= w[1]) {
                return Err(MeshBridgeError::InvalidCell {
                    cell: c,
                    reason: format!("vertices {cell:?} are not strictly ascending"),
                });
            }
            if let Some(&v) = cell.iter().find(|&&v| v >= nv) {
                return Err(MeshBridgeError::IndexOutOfRange {
                    what: "vertex",
                    index: v as i64 + 1,
                    len: nv,
                });
            }
        }
        for f in 0..self.num_facets() {
            let cells = self.facet_cells(f).len();
            if cells == 0 || cells > 2 {
                return Err(MeshBridgeError::NonManifoldFacet { facet: f, cells });
            }
        }
        Ok(())
    }
}
