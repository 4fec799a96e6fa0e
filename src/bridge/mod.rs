//! The label-preserving bridge between `(p, e, t)` arrays and
//! [`SimplexMesh`](crate::topology::SimplexMesh).
//!
//! Pipeline of [`MeshBridge::refine`]:
//! 1. [`convert::build_mesh`] builds the mesh from `p` and `t`.
//! 2. [`resolve`] attaches the labels of `e` and `t` to facets and cells.
//! 3. [`marking::build_refine_predicate`] turns the cell list into markers.
//! 4. [`refine::refine_with_labels`] refines and adapts the labels.
//! 5. [`assemble::assemble_pet`] writes the child back as `(p, e, t)`.
//!
//! Every input check runs before the mesh is built, and the output triple is
//! only assembled once refinement has succeeded.

pub mod assemble;
pub mod config;
pub mod convert;
pub mod marking;
pub mod refine;
pub mod resolve;

use std::path::Path;

use crate::data::pet::PetMesh;
use crate::io::{self, LabeledMesh};
use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;

pub use config::{BridgeConfig, UnmatchedPolicy};

/// Entry point bundling the bridge operations with one configuration.
#[derive(Clone, Debug, Default)]
pub struct MeshBridge {
    config: BridgeConfig,
}

impl MeshBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Builds a mesh from `pet` and resolves both label tables onto it.
    ///
    /// # Errors
    /// Shape, range and dimension errors of the triple, mesh construction
    /// errors, and [`MeshBridgeError::UnmatchedEntity`] under the default
    /// policy.
    pub fn import(&self, pet: &PetMesh) -> Result<LabeledMesh, MeshBridgeError> {
        pet.validate()?;
        let mesh = convert::build_mesh(&pet.p, &pet.t)?;
        let facet_labels = resolve::resolve_facet_labels(&mesh, &pet.e, &self.config)?;
        let cell_labels = resolve::resolve_cell_labels(&mesh, &pet.t, &self.config)?;
        Ok(LabeledMesh {
            mesh,
            facet_labels: Some(facet_labels),
            cell_labels: Some(cell_labels),
        })
    }

    /// Writes a labelled mesh as `(p, e, t)`.
    ///
    /// # Errors
    /// Label attachment errors.
    pub fn export(&self, labeled: &LabeledMesh) -> Result<PetMesh, MeshBridgeError> {
        assemble::assemble_pet(
            &labeled.mesh,
            labeled.facet_labels.as_ref(),
            labeled.cell_labels.as_ref(),
            &self.config,
        )
    }

    /// Refines the cells of `pet` listed in `cells` (1-based), or every cell
    /// when `cells` is `None`, carrying facet and cell labels to the result.
    ///
    /// # Errors
    /// Everything [`import`](Self::import) reports, plus
    /// [`MeshBridgeError::IndexOutOfRange`] for a bad cell index.
    pub fn refine(&self, pet: &PetMesh, cells: Option<&[i64]>) -> Result<PetMesh, MeshBridgeError> {
        pet.validate()?;
        if let Some(cells) = cells {
            marking::check_cell_indices(pet.num_cells(), cells)?;
        }

        let LabeledMesh {
            mesh,
            facet_labels,
            cell_labels,
        } = self.import(pet)?;
        let markers = marking::build_refine_predicate(&mesh, cells)?;
        let dim = mesh.dimension();
        let facet_labels = facet_labels.unwrap_or_else(|| EntityLabels::new(&mesh, dim - 1));
        let cell_labels = cell_labels.unwrap_or_else(|| EntityLabels::new(&mesh, dim));

        let outcome = refine::refine_with_labels(mesh, &markers, facet_labels, cell_labels)?;
        assemble::assemble_pet(
            &outcome.mesh,
            Some(&outcome.facet_labels),
            Some(&outcome.cell_labels),
            &self.config,
        )
    }

    /// Reads a mesh file into `(p, e, t)`.
    ///
    /// # Errors
    /// [`MeshBridgeError::CapabilityUnavailable`] without file I/O support;
    /// otherwise I/O and parse errors.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<PetMesh, MeshBridgeError> {
        let labeled = io::load(path)?;
        self.export(&labeled)
    }

    /// Writes `pet` with its labels to a mesh file.
    ///
    /// # Errors
    /// Everything [`import`](Self::import) reports, plus
    /// [`MeshBridgeError::CapabilityUnavailable`] and I/O errors.
    pub fn write<P: AsRef<Path>>(&self, pet: &PetMesh, path: P) -> Result<(), MeshBridgeError> {
        let labeled = self.import(pet)?;
        io::save(path, &labeled)
    }
}
