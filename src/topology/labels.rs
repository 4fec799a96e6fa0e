//! Integer labels on mesh entities.
//!
//! An [`EntityLabels`] maps entity indices of one dimension (facets or cells)
//! of one mesh instance to integer tags: boundary segment numbers on facets,
//! subdomain numbers on cells. Labels are not stored in the mesh itself; the
//! label function remembers the [`MeshId`] it was created for and refuses to
//! be read through any other mesh.

use std::collections::BTreeMap;

use crate::mesh_error::MeshBridgeError;
use crate::topology::mesh::{MeshId, SimplexMesh};

/// Integer tag carried by facets and cells.
pub type Label = i64;

/// Labels on the entities of one dimension of one mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityLabels {
    mesh: MeshId,
    dimension: usize,
    values: BTreeMap<usize, Label>,
}

impl EntityLabels {
    /// Creates an empty label function over the `dimension`-entities of `mesh`.
    pub fn new(mesh: &SimplexMesh, dimension: usize) -> Self {
        Self {
            mesh: mesh.id(),
            dimension,
            values: BTreeMap::new(),
        }
    }

    /// Identity of the mesh these labels belong to.
    #[inline]
    pub fn mesh_id(&self) -> MeshId {
        self.mesh
    }

    /// Entity dimension the labels are attached to.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Assigns `value` to `entity`, returning the previous value, if any.
    pub fn set_label(&mut self, entity: usize, value: Label) -> Option<Label> {
        self.values.insert(entity, value)
    }

    /// Returns the label of `entity` without checking which mesh is asking.
    pub fn get_label(&self, entity: usize) -> Option<Label> {
        self.values.get(&entity).copied()
    }

    /// Fails unless these labels were created for `mesh`.
    ///
    /// # Errors
    /// [`MeshBridgeError::StaleLabels`] when `mesh` is a different instance.
    pub fn ensure_bound_to(&self, mesh: &SimplexMesh) -> Result<(), MeshBridgeError> {
        if self.mesh == mesh.id() {
            Ok(())
        } else {
            Err(MeshBridgeError::StaleLabels {
                expected: self.mesh,
                found: mesh.id(),
            })
        }
    }

    /// Like [`ensure_bound_to`](Self::ensure_bound_to), also checking the entity dimension.
    ///
    /// # Errors
    /// [`MeshBridgeError::StaleLabels`] or [`MeshBridgeError::LabelDimension`].
    pub fn ensure_attached(
        &self,
        mesh: &SimplexMesh,
        dimension: usize,
    ) -> Result<(), MeshBridgeError> {
        self.ensure_bound_to(mesh)?;
        if self.dimension != dimension {
            return Err(MeshBridgeError::LabelDimension {
                expected: dimension,
                found: self.dimension,
            });
        }
        Ok(())
    }

    /// Label of `entity` read through `mesh`.
    ///
    /// # Errors
    /// [`MeshBridgeError::StaleLabels`] if `mesh` is not the labelled mesh.
    pub fn label_on(
        &self,
        mesh: &SimplexMesh,
        entity: usize,
    ) -> Result<Option<Label>, MeshBridgeError> {
        self.ensure_bound_to(mesh)?;
        Ok(self.get_label(entity))
    }

    /// Number of labelled entities.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(entity, label)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Label)> + '_ {
        self.values.iter().map(|(&e, &v)| (e, v))
    }

    /// Distinct label values, ascending.
    pub fn stratum_values(&self) -> Vec<Label> {
        let mut values: Vec<Label> = self.values.values().copied().collect();
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Entities carrying `value`, ascending.
    pub fn stratum_entities(&self, value: Label) -> Vec<usize> {
        self.iter()
            .filter_map(|(e, v)| (v == value).then_some(e))
            .collect()
    }
}
