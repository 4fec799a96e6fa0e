//! Simplicial mesh topology.
//!
//! This module provides the mesh kernel the rest of the crate is built on:
//! - [`SimplexMesh`]: coordinates plus cell → vertex connectivity, with lazily
//!   derived facets and incidence
//! - [`EntityLabels`]: integer labels on facets or cells, bound to one mesh
//! - [`refine`]: marked longest-edge bisection producing [`AdaptationMap`]s

pub mod adapt;
pub mod cell_type;
pub mod labels;
pub mod mesh;
pub mod refine;

pub use adapt::AdaptationMap;
pub use cell_type::CellType;
pub use labels::{EntityLabels, Label};
pub use mesh::{MeshId, SimplexMesh};
pub use refine::{CellMarkers, RefinedMesh, refine_marked, refine_uniform};
