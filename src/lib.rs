#![cfg_attr(docsrs, feature(doc_cfg))]
//! # pet-bridge
//!
//! pet-bridge converts simplicial meshes between the compact PDE-tool array
//! triple `(p, e, t)` and a topological mesh, refines them, and keeps the
//! integer boundary and subdomain labels attached to the right facets and
//! cells throughout.
//!
//! ## Features
//! - [`SimplexMesh`](topology::SimplexMesh): triangle/tetrahedron meshes with
//!   lazily derived facets and incidence
//! - Label resolution from unordered vertex sets, local to each vertex star
//! - Marked longest-edge bisection with parent → child adaptation maps
//! - DOLFIN XML reading and writing (`xml-io` feature, on by default)
//! - A host binding layer over matrix/string/record values
//!
//! ## Usage
//! ```rust
//! # fn try_main() -> Result<(), pet_bridge::mesh_error::MeshBridgeError> {
//! use pet_bridge::prelude::*;
//!
//! let square = structured_mesh_2d(&[0.0, 1.0], &[0.0, 1.0], 1, [1, 2, 3, 4])?;
//! let bridge = MeshBridge::default();
//! let refined = bridge.refine(&square, Some(&[1][..]))?;
//! assert_eq!(refined.num_cells(), 4);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```
//!
//! ## Labels and mesh identity
//! Labels live outside the mesh in [`EntityLabels`](topology::EntityLabels),
//! tagged with the [`MeshId`](topology::MeshId) of the mesh they describe.
//! Every refinement produces a mesh with a new id, so labels of the parent
//! cannot be read through the child by accident.

pub mod algs;
pub mod bridge;
pub mod data;
pub mod debug_invariants;
pub mod host;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used types:
pub mod prelude {
    pub use crate::algs::meshgen::{structured_mesh_2d, structured_mesh_3d};
    pub use crate::bridge::{BridgeConfig, MeshBridge, UnmatchedPolicy};
    pub use crate::data::{CellTable, ColumnMatrix, FacetTable, PetMesh, PointSet};
    pub use crate::host::HostValue;
    pub use crate::io::{LabeledMesh, MeshReader, MeshWriter};
    pub use crate::mesh_error::MeshBridgeError;
    pub use crate::topology::{
        AdaptationMap, CellMarkers, CellType, EntityLabels, Label, MeshId, SimplexMesh,
        refine_marked, refine_uniform,
    };
}
