//! Values crossing the host boundary and their coercions.

use std::collections::BTreeMap;

use crate::data::matrix::ColumnMatrix;
use crate::data::pet::PetMesh;
use crate::mesh_error::MeshBridgeError;

/// A value as the numeric host runtime hands it over: every number is a
/// double-precision matrix, strings are text, records are field maps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HostValue {
    Matrix(ColumnMatrix<f64>),
    Text(String),
    Struct(BTreeMap<String, HostValue>),
}

fn coercion(argument: impl Into<String>, expected: &'static str) -> MeshBridgeError {
    MeshBridgeError::TypeCoercion {
        argument: argument.into(),
        expected,
    }
}

impl HostValue {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            HostValue::Matrix(_) => "matrix",
            HostValue::Text(_) => "text",
            HostValue::Struct(_) => "struct",
        }
    }

    /// A 1×n row vector.
    pub fn row_vector(values: &[f64]) -> Self {
        HostValue::Matrix(ColumnMatrix::from_row(values.to_vec()))
    }

    /// The text of a [`HostValue::Text`].
    ///
    /// # Errors
    /// [`MeshBridgeError::TypeCoercion`] for any other variant.
    pub fn as_text(&self, argument: &str) -> Result<&str, MeshBridgeError> {
        match self {
            HostValue::Text(text) => Ok(text),
            _ => Err(coercion(argument, "a string")),
        }
    }

    /// The matrix of a [`HostValue::Matrix`].
    ///
    /// # Errors
    /// [`MeshBridgeError::TypeCoercion`] for any other variant.
    pub fn as_matrix(&self, argument: &str) -> Result<&ColumnMatrix<f64>, MeshBridgeError> {
        match self {
            HostValue::Matrix(m) => Ok(m),
            _ => Err(coercion(argument, "a numeric matrix")),
        }
    }

    /// The entries of a numeric matrix as integers, in storage order.
    ///
    /// # Errors
    /// [`MeshBridgeError::TypeCoercion`] if this is not a matrix or an entry
    /// is not an integral value inside the `i64` range.
    pub fn as_integers(&self, argument: &str) -> Result<Vec<i64>, MeshBridgeError> {
        Ok(to_integer_matrix(self.as_matrix(argument)?, argument)?.into_vec())
    }
}

fn to_integer_matrix(
    m: &ColumnMatrix<f64>,
    argument: &str,
) -> Result<ColumnMatrix<i64>, MeshBridgeError> {
    if m
        .as_slice()
        .iter()
        .any(|&x| x.fract() != 0.0 || !(i64::MIN as f64..i64::MAX as f64).contains(&x))
    {
        return Err(coercion(argument, "an integer matrix"));
    }
    Ok(m.map(|&x| x as i64))
}

impl TryFrom<&HostValue> for PetMesh {
    type Error = MeshBridgeError;

    /// Reads a record with numeric fields `p`, `e` and `t`.
    fn try_from(value: &HostValue) -> Result<Self, Self::Error> {
        let HostValue::Struct(fields) = value else {
            return Err(coercion("mesh", "a struct with fields p, e, t"));
        };
        let field = |name: &str| {
            fields
                .get(name)
                .ok_or_else(|| coercion(format!("mesh.{name}"), "a numeric matrix"))?
                .as_matrix(&format!("mesh.{name}"))
        };
        let p = field("p")?.clone();
        let e = to_integer_matrix(field("e")?, "mesh.e")?;
        let t = to_integer_matrix(field("t")?, "mesh.t")?;
        Ok(PetMesh::new(p, e, t))
    }
}

impl From<&PetMesh> for HostValue {
    fn from(mesh: &PetMesh) -> Self {
        let fields = [
            ("p", mesh.p.clone()),
            ("e", mesh.e.map(|&v| v as f64)),
            ("t", mesh.t.map(|&v| v as f64)),
        ];
        HostValue::Struct(
            fields
                .into_iter()
                .map(|(name, m)| (name.to_string(), HostValue::Matrix(m)))
                .collect(),
        )
    }
}
