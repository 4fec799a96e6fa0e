//! Parent → child entity correspondence produced by one refinement.

use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::{MeshId, SimplexMesh};

/// Maps every entity of one dimension of a parent mesh to the entities of
/// the child mesh that lie inside it.
///
/// Child entities that are new (e.g. facets cutting through a bisected cell)
/// have no parent and appear in no list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdaptationMap {
    parent: MeshId,
    child: MeshId,
    dimension: usize,
    children: Vec<Vec<usize>>,
}

impl AdaptationMap {
    pub(crate) fn new(
        parent: MeshId,
        child: MeshId,
        dimension: usize,
        children: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            parent,
            child,
            dimension,
            children,
        }
    }

    #[inline]
    pub fn parent_id(&self) -> MeshId {
        self.parent
    }

    #[inline]
    pub fn child_id(&self) -> MeshId {
        self.child
    }

    /// Entity dimension this map relates.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of parent entities.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child entities lying inside parent entity `parent`.
    pub fn children_of(&self, parent: usize) -> &[usize] {
        self.children.get(parent).map_or(&[], Vec::as_slice)
    }

    /// Iterate `(parent, children)` pairs in parent order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.children
            .iter()
            .enumerate()
            .map(|(p, kids)| (p, kids.as_slice()))
    }

    /// Push parent labels onto the child mesh.
    ///
    /// Every child of a labelled parent entity receives the parent's label;
    /// children of unlabelled parents, and new entities, stay unlabelled.
    ///
    /// # Errors
    /// - [`MeshBridgeError::StaleLabels`] if `labels` do not belong to the
    ///   parent mesh, or `child` is not the mesh this map was built for.
    /// - [`MeshBridgeError::LabelDimension`] if `labels` are attached to
    ///   another entity dimension.
    pub fn adapt_labels(
        &self,
        labels: &EntityLabels,
        child: &SimplexMesh,
    ) -> Result<EntityLabels, MeshBridgeError> {
        if labels.mesh_id() != self.parent {
            return Err(MeshBridgeError::StaleLabels {
                expected: self.parent,
                found: labels.mesh_id(),
            });
        }
        if child.id() != self.child {
            return Err(MeshBridgeError::StaleLabels {
                expected: self.child,
                found: child.id(),
            });
        }
        if labels.dimension() != self.dimension {
            return Err(MeshBridgeError::LabelDimension {
                expected: self.dimension,
                found: labels.dimension(),
            });
        }

        let mut adapted = EntityLabels::new(child, self.dimension);
        for (parent, value) in labels.iter() {
            for &kid in self.children_of(parent) {
                adapted.set_label(kid, value);
            }
        }
        log::debug!(
            "adapted {} dim-{} labels from mesh {} onto {} entities of mesh {}",
            labels.len(),
            self.dimension,
            self.parent,
            adapted.len(),
            self.child
        );
        Ok(adapted)
    }
}
