//! Local mesh refinement by recursive longest-edge bisection.
//!
//! # Algorithm
//! 1. Every marked cell marks its longest edge.
//! 2. Closure: any cell holding a marked edge also marks its own longest
//!    edge, repeated until nothing changes.
//! 3. Every cell holding a marked edge is bisected recursively at its
//!    highest-ranked marked edge `(a, b)`: the child keeping `a` is refined
//!    first, then the child keeping `b`. Unmarked cells are copied as is.
//!
//! Edges rank by squared length, longer first; equal lengths rank the
//! lexicographically smaller vertex pair first. Because the rank is global,
//! two cells sharing a facet split that facet the same way, so the child
//! mesh is conforming (no hanging vertices).
//!
//! # Numbering
//! Child vertices keep the parent numbering; midpoints are appended in the
//! order they are first created. Child cells are emitted parent by parent.
//!
//! The [`RefinedMesh`] carries the cell and facet [`AdaptationMap`]s needed
//! to carry labels from the parent onto the child.

use std::cmp::Ordering;

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshBridgeError;
use crate::topology::adapt::AdaptationMap;
use crate::topology::mesh::SimplexMesh;

/// Sorted pair of parent vertex indices.
type Edge = (usize, usize);

/// Per-cell refine/don't-refine flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellMarkers {
    marks: Vec<bool>,
}

impl CellMarkers {
    /// Every one of `num_cells` cells is marked (uniform refinement).
    pub fn all(num_cells: usize) -> Self {
        Self {
            marks: vec![true; num_cells],
        }
    }

    /// No cell is marked.
    pub fn none(num_cells: usize) -> Self {
        Self {
            marks: vec![false; num_cells],
        }
    }

    /// Marks the listed 0-based cells.
    ///
    /// # Errors
    /// [`MeshBridgeError::IndexOutOfRange`] if a cell is `>= num_cells`
    /// (reported 1-based).
    pub fn from_cells<I>(num_cells: usize, cells: I) -> Result<Self, MeshBridgeError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut markers = Self::none(num_cells);
        for c in cells {
            markers.mark(c)?;
        }
        Ok(markers)
    }

    /// Marks cell `c`.
    ///
    /// # Errors
    /// [`MeshBridgeError::IndexOutOfRange`] if `c` is past the end.
    pub fn mark(&mut self, c: usize) -> Result<(), MeshBridgeError> {
        let len = self.marks.len();
        let slot = self
            .marks
            .get_mut(c)
            .ok_or(MeshBridgeError::IndexOutOfRange {
                what: "cell",
                index: c as i64 + 1,
                len,
            })?;
        *slot = true;
        Ok(())
    }

    pub fn is_marked(&self, c: usize) -> bool {
        self.marks.get(c).copied().unwrap_or(false)
    }

    /// Number of cells the markers cover.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn count_marked(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    /// Marked cells, ascending.
    pub fn iter_marked(&self) -> impl Iterator<Item = usize> + '_ {
        self.marks
            .iter()
            .enumerate()
            .filter_map(|(c, &m)| m.then_some(c))
    }
}

/// Output of [`refine_marked`]: the child mesh plus parent → child maps.
#[derive(Clone, Debug)]
pub struct RefinedMesh {
    /// The refined mesh (fresh [`MeshId`](crate::topology::mesh::MeshId)).
    pub mesh: SimplexMesh,
    /// Parent cell → child cells.
    pub cell_map: AdaptationMap,
    /// Parent facet → child facets lying inside it.
    pub facet_map: AdaptationMap,
}

/// Refine every cell of `mesh`.
pub fn refine_uniform(mesh: &SimplexMesh) -> Result<RefinedMesh, MeshBridgeError> {
    refine_marked(mesh, &CellMarkers::all(mesh.num_cells()))
}

/// Refine the cells flagged in `markers`, plus whatever neighbours must be
/// split to keep the mesh conforming.
///
/// Marking no cell is valid and yields an unchanged copy under a new id.
///
/// # Errors
/// - [`MeshBridgeError::ShapeMismatch`] if `markers` do not cover exactly the
///   cells of `mesh`.
/// - [`MeshBridgeError::NonManifoldFacet`] if a facet of `mesh` bounds more
///   than two cells.
/// - Construction errors of the child mesh (not expected for a valid parent).
pub fn refine_marked(
    mesh: &SimplexMesh,
    markers: &CellMarkers,
) -> Result<RefinedMesh, MeshBridgeError> {
    if markers.len() != mesh.num_cells() {
        return Err(MeshBridgeError::ShapeMismatch {
            what: "cell markers",
            expected: mesh.num_cells(),
            found: markers.len(),
        });
    }
    // bisection assumes every facet bounds at most two cells
    mesh.validate_invariants()?;

    let marked = mark_edges(mesh, markers);
    let mut bisector = Bisector::new(mesh, marked);
    for (c, cell) in mesh.cells().enumerate() {
        bisector.bisect(cell.to_vec(), c);
    }
    let Bisector {
        coordinates,
        midpoint_edges,
        cells,
        cell_parents,
        ..
    } = bisector;

    let child = SimplexMesh::new(mesh.dimension(), coordinates, cells)?;
    child.debug_assert_invariants();

    let mut cell_children = vec![Vec::new(); mesh.num_cells()];
    for (kid, &parent) in cell_parents.iter().enumerate() {
        cell_children[parent].push(kid);
    }
    let facet_children = facet_children(mesh, &child, &cell_parents, &midpoint_edges);

    log::info!(
        "refined mesh {} -> {}: {} marked, {} -> {} cells, {} new vertices",
        mesh.id(),
        child.id(),
        markers.count_marked(),
        mesh.num_cells(),
        child.num_cells(),
        midpoint_edges.len()
    );

    let dim = mesh.dimension();
    Ok(RefinedMesh {
        cell_map: AdaptationMap::new(mesh.id(), child.id(), dim, cell_children),
        facet_map: AdaptationMap::new(mesh.id(), child.id(), dim - 1, facet_children),
        mesh: child,
    })
}

fn rank_edges(mesh: &SimplexMesh, a: Edge, b: Edge) -> Ordering {
    mesh.edge_length_squared(a.0, a.1)
        .total_cmp(&mesh.edge_length_squared(b.0, b.1))
        .then_with(|| b.cmp(&a))
}

fn edges_of(simplex: &[usize]) -> impl Iterator<Item = Edge> + '_ {
    simplex
        .iter()
        .copied()
        .tuple_combinations()
        .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
}

fn longest_edge(mesh: &SimplexMesh, cell: &[usize]) -> Option<Edge> {
    edges_of(cell).max_by(|&a, &b| rank_edges(mesh, a, b))
}

fn mark_edges(mesh: &SimplexMesh, markers: &CellMarkers) -> HashSet<Edge> {
    let mut marked: HashSet<Edge> = markers
        .iter_marked()
        .filter_map(|c| longest_edge(mesh, mesh.cell_vertices(c)))
        .collect();

    loop {
        let mut changed = false;
        for cell in mesh.cells() {
            if edges_of(cell).any(|e| marked.contains(&e)) {
                if let Some(e) = longest_edge(mesh, cell) {
                    changed |= marked.insert(e);
                }
            }
        }
        if !changed {
            break;
        }
    }
    marked
}

struct Bisector<'a> {
    parent: &'a SimplexMesh,
    marked: HashSet<Edge>,
    midpoints: HashMap<Edge, usize>,
    coordinates: Vec<f64>,
    /// Parent edge of each new vertex, in creation order.
    midpoint_edges: Vec<Edge>,
    cells: Vec<usize>,
    cell_parents: Vec<usize>,
}

impl<'a> Bisector<'a> {
    fn new(parent: &'a SimplexMesh, marked: HashSet<Edge>) -> Self {
        Self {
            parent,
            midpoints: HashMap::with_capacity(marked.len()),
            marked,
            coordinates: parent.coordinates().to_vec(),
            midpoint_edges: Vec::new(),
            cells: Vec::with_capacity(parent.num_cells() * (parent.dimension() + 1)),
            cell_parents: Vec::with_capacity(parent.num_cells()),
        }
    }

    fn bisect(&mut self, mut simplex: Vec<usize>, parent_cell: usize) {
        let target = edges_of(&simplex)
            .filter(|e| self.marked.contains(e))
            .max_by(|&a, &b| rank_edges(self.parent, a, b));

        let Some((a, b)) = target else {
            simplex.sort_unstable();
            self.cells.extend_from_slice(&simplex);
            self.cell_parents.push(parent_cell);
            return;
        };

        let m = self.midpoint(a, b);
        log::trace!("cell {parent_cell}: bisecting edge ({a}, {b}) at vertex {m}");
        let keep_a: Vec<usize> = simplex.iter().map(|&v| if v == b { m } else { v }).collect();
        for v in simplex.iter_mut() {
            if *v == a {
                *v = m;
            }
        }
        self.bisect(keep_a, parent_cell);
        self.bisect(simplex, parent_cell);
    }

    fn midpoint(&mut self, a: usize, b: usize) -> usize {
        if let Some(&m) = self.midpoints.get(&(a, b)) {
            return m;
        }
        let dim = self.parent.dimension();
        let m = self.coordinates.len() / dim;
        let (pa, pb) = (
            self.parent.vertex_coordinates(a),
            self.parent.vertex_coordinates(b),
        );
        self.coordinates
            .extend(pa.iter().zip(pb).map(|(x, y)| 0.5 * (x + y)));
        self.midpoint_edges.push((a, b));
        self.midpoints.insert((a, b), m);
        m
    }
}

/// For every parent facet, the child facets lying inside it.
///
/// A child facet lies inside parent facet `F` exactly when every parent
/// vertex supporting it is a vertex of `F`: a parent vertex supports itself,
/// a midpoint is supported by the two ends of its edge.
fn facet_children(
    parent: &SimplexMesh,
    child: &SimplexMesh,
    cell_parents: &[usize],
    midpoint_edges: &[Edge],
) -> Vec<Vec<usize>> {
    let parent_vertices = parent.num_vertices();
    let mut children = vec![Vec::new(); parent.num_facets()];
    let mut support = Vec::with_capacity(2 * parent.dimension());

    for f in 0..child.num_facets() {
        let Some(&kid_cell) = child.facet_cells(f).first() else {
            continue;
        };
        support.clear();
        for &v in child.facet_vertices(f) {
            if v < parent_vertices {
                support.push(v);
            } else {
                let (a, b) = midpoint_edges[v - parent_vertices];
                support.extend([a, b]);
            }
        }

        let parent_cell = cell_parents[kid_cell];
        let host = parent.cell_facets(parent_cell).iter().copied().find(|&pf| {
            let verts = parent.facet_vertices(pf);
            support.iter().all(|v| verts.contains(v))
        });
        if let Some(pf) = host {
            children[pf].push(f);
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit square split along the (0,0)-(1,1) diagonal; vertices
    /// 0=(0,0) 1=(0,1) 2=(1,0) 3=(1,1).
    fn two_triangles() -> SimplexMesh {
        SimplexMesh::new(
            2,
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0],
            vec![0, 2, 3, 0, 1, 3],
        )
        .unwrap()
    }

    #[test]
    fn marking_one_cell_splits_its_neighbour_across_the_shared_edge() {
        let mesh = two_triangles();
        let markers = CellMarkers::from_cells(2, [0]).unwrap();
        let refined = refine_marked(&mesh, &markers).unwrap();

        assert_eq!(refined.mesh.num_vertices(), 5);
        assert_eq!(refined.mesh.vertex_coordinates(4), &[0.5, 0.5]);
        let cells: Vec<_> = refined.mesh.cells().map(<[usize]>::to_vec).collect();
        assert_eq!(
            cells,
            vec![vec![0, 2, 4], vec![2, 3, 4], vec![0, 1, 4], vec![1, 3, 4]]
        );
        assert_eq!(refined.cell_map.children_of(0), &[0, 1]);
        assert_eq!(refined.cell_map.children_of(1), &[2, 3]);
    }

    #[test]
    fn facet_map_follows_split_edges() {
        let mesh = two_triangles();
        let refined = refine_uniform(&mesh).unwrap();
        let child = &refined.mesh;

        // parent facet 1 is the diagonal (0,3); its halves are (0,4) and (3,4)
        assert_eq!(mesh.facet_vertices(1), &[0, 3]);
        let halves: Vec<_> = refined
            .facet_map
            .children_of(1)
            .iter()
            .map(|&f| child.facet_vertices(f).to_vec())
            .collect();
        assert_eq!(halves, vec![vec![0, 4], vec![3, 4]]);

        // unsplit boundary edges map one-to-one
        for pf in mesh.exterior_facets() {
            let kids = refined.facet_map.children_of(pf);
            assert_eq!(kids.len(), 1);
            assert_eq!(child.facet_vertices(kids[0]), mesh.facet_vertices(pf));
        }

        // the new edges (1,4) and (2,4) have no parent
        let mapped: usize = refined.facet_map.iter().map(|(_, k)| k.len()).sum();
        assert_eq!(child.num_facets(), mapped + 2);
    }

    #[test]
    fn empty_marking_copies_the_mesh_under_a_new_id() {
        let mesh = two_triangles();
        let refined = refine_marked(&mesh, &CellMarkers::none(2)).unwrap();
        assert_ne!(refined.mesh.id(), mesh.id());
        assert_eq!(refined.mesh.num_cells(), 2);
        assert_eq!(refined.mesh.coordinates(), mesh.coordinates());
        assert_eq!(refined.cell_map.children_of(1), &[1]);
    }

    #[test]
    fn markers_must_cover_the_mesh() {
        let mesh = two_triangles();
        assert_eq!(
            refine_marked(&mesh, &CellMarkers::all(3)).unwrap_err(),
            MeshBridgeError::ShapeMismatch {
                what: "cell markers",
                expected: 2,
                found: 3
            }
        );
        assert_eq!(
            CellMarkers::from_cells(2, [2]).unwrap_err(),
            MeshBridgeError::IndexOutOfRange {
                what: "cell",
                index: 3,
                len: 2
            }
        );
    }

    #[test]
    fn tetrahedron_is_bisected_at_its_longest_edge() {
        // corner tet: the three edges off the origin have length 1, the other
        // three length sqrt(2); the tie goes to (1,2)
        let mesh = SimplexMesh::new(
            3,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            vec![0, 1, 2, 3],
        )
        .unwrap();
        let refined = refine_uniform(&mesh).unwrap();
        assert_eq!(refined.mesh.num_cells(), 2);
        assert_eq!(refined.mesh.vertex_coordinates(4), &[0.5, 0.5, 0.0]);
        assert_eq!(refined.mesh.cell_vertices(0), &[0, 1, 3, 4]);
        assert_eq!(refined.mesh.cell_vertices(1), &[0, 2, 3, 4]);
        // faces holding edge (1,2) split in two, the others are kept
        for f in 0..mesh.num_facets() {
            let face = mesh.facet_vertices(f);
            let expected = if face.contains(&1) && face.contains(&2) { 2 } else { 1 };
            assert_eq!(refined.facet_map.children_of(f).len(), expected, "face {face:?}");
        }
    }

    #[test]
    fn equal_lengths_rank_the_smaller_pair_first() {
        let mesh = two_triangles();
        // (0,1) and (0,2) both have length 1
        assert_eq!(rank_edges(&mesh, (0, 1), (0, 2)), Ordering::Greater);
        assert_eq!(longest_edge(&mesh, &[0, 1, 2]), Some((1, 2)));
    }
}
