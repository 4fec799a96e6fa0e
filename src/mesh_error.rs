//! MeshBridgeError: Unified error type for pet-bridge public APIs
//!
//! Every fallible operation in the crate returns this error so that the host
//! binding layer can report a single, structured condition to its caller.

use thiserror::Error;

use crate::topology::mesh::MeshId;

/// Unified error type for pet-bridge operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshBridgeError {
    /// Only triangle (2D) and tetrahedron (3D) meshes are supported.
    #[error("only 2D or 3D meshes are supported (got dimension {dim})")]
    Dimension { dim: usize },
    /// An index (vertex reference or cell selection) lies outside its valid range.
    #[error("{what} index {index} out of range (valid range 1..={len})")]
    IndexOutOfRange {
        what: &'static str,
        index: i64,
        len: usize,
    },
    /// A call received a number of arguments outside its accepted range.
    #[error("wrong number of arguments: expected {min}..={max}, got {found}")]
    ArgumentCount { min: usize, max: usize, found: usize },
    /// An argument could not be read as the expected value.
    #[error("argument `{argument}` cannot be read as {expected}")]
    TypeCoercion {
        argument: String,
        expected: &'static str,
    },
    /// A buffer or table does not have the shape an operation requires.
    #[error("{what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Generator input does not describe a valid grid.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A cell row is not a valid simplex.
    #[error("cell {cell} is invalid: {reason}")]
    InvalidCell { cell: usize, reason: String },
    /// A facet is shared by more than two cells.
    #[error("facet {facet} is shared by {cells} cells (expected 1 or 2)")]
    NonManifoldFacet { facet: usize, cells: usize },
    /// A table column matched no topological entity.
    #[error("column {column} (vertices {vertices:?}) matches no entity of dimension {dimension}")]
    UnmatchedEntity {
        dimension: usize,
        column: usize,
        vertices: Vec<usize>,
    },
    /// Labels were used with a mesh other than the one they were created for.
    #[error("labels belong to mesh {expected} but were used with mesh {found}")]
    StaleLabels { expected: MeshId, found: MeshId },
    /// Labels of one entity dimension were used where another was required.
    #[error("labels are attached to dimension {found}, expected dimension {expected}")]
    LabelDimension { expected: usize, found: usize },
    /// The crate was built without an optional capability.
    #[error("capability `{0}` is not available in this build")]
    CapabilityUnavailable(&'static str),
    /// A mesh file could not be parsed.
    #[error("mesh file parse error: {0}")]
    MeshIoParse(String),
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshBridgeError {
    fn from(err: std::io::Error) -> Self {
        MeshBridgeError::Io(err.to_string())
    }
}
