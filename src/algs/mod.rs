//! Mesh algorithms outside the bridge pipeline proper.

pub mod boundary;
pub mod meshgen;

pub use boundary::{BoundaryClassification, classify_facets};
pub use meshgen::{structured_mesh_2d, structured_mesh_3d};
