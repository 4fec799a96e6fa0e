//! Native mesh files: a mesh plus optional facet and cell labels.
//!
//! Readers and writers work over any [`Read`]/[`Write`]; [`load`] and [`save`]
//! add the file handling. The only format is DOLFIN XML, compiled in with
//! the `xml-io` feature; without it both entry points report
//! [`MeshBridgeError::CapabilityUnavailable`].

#[cfg(feature = "xml-io")]
#[cfg_attr(docsrs, doc(cfg(feature = "xml-io")))]
pub mod dolfin;

use std::io::{Read, Write};
use std::path::Path;

use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;

/// Name of the capability gating file I/O.
pub const XML_IO: &str = "xml-io";

/// A mesh with the label functions stored alongside it.
#[derive(Clone, Debug)]
pub struct LabeledMesh {
    pub mesh: SimplexMesh,
    /// Labels on facets (dimension D-1).
    pub facet_labels: Option<EntityLabels>,
    /// Labels on cells (dimension D).
    pub cell_labels: Option<EntityLabels>,
}

impl LabeledMesh {
    /// Bundles `mesh` with its labels, checking that they belong to it.
    ///
    /// # Errors
    /// [`MeshBridgeError::StaleLabels`] or [`MeshBridgeError::LabelDimension`].
    pub fn new(
        mesh: SimplexMesh,
        facet_labels: Option<EntityLabels>,
        cell_labels: Option<EntityLabels>,
    ) -> Result<Self, MeshBridgeError> {
        let labeled = Self {
            mesh,
            facet_labels,
            cell_labels,
        };
        labeled.check_labels()?;
        Ok(labeled)
    }

    /// A mesh without labels.
    pub fn unlabeled(mesh: SimplexMesh) -> Self {
        Self {
            mesh,
            facet_labels: None,
            cell_labels: None,
        }
    }

    /// Fails unless both label functions (when present) belong to `mesh`
    /// and sit on facets and cells respectively.
    pub fn check_labels(&self) -> Result<(), MeshBridgeError> {
        let dim = self.mesh.dimension();
        if let Some(labels) = &self.facet_labels {
            labels.ensure_attached(&self.mesh, dim - 1)?;
        }
        if let Some(labels) = &self.cell_labels {
            labels.ensure_attached(&self.mesh, dim)?;
        }
        Ok(())
    }
}

/// Parses a labelled mesh from a byte stream.
pub trait MeshReader {
    fn read<R: Read>(&self, reader: R) -> Result<LabeledMesh, MeshBridgeError>;
}

/// Serializes a labelled mesh to a byte stream.
pub trait MeshWriter {
    fn write<W: Write>(&self, writer: W, mesh: &LabeledMesh) -> Result<(), MeshBridgeError>;
}

/// Reads a DOLFIN XML mesh file.
///
/// # Errors
/// [`MeshBridgeError::CapabilityUnavailable`] without the `xml-io` feature;
/// otherwise I/O and parse errors.
pub fn load<P: AsRef<Path>>(path: P) -> Result<LabeledMesh, MeshBridgeError> {
    #[cfg(feature = "xml-io")]
    {
        let file = std::fs::File::open(path.as_ref())?;
        let mesh = dolfin::DolfinXmlReader.read(std::io::BufReader::new(file))?;
        log::debug!(
            "loaded {} ({} vertices, {} cells)",
            path.as_ref().display(),
            mesh.mesh.num_vertices(),
            mesh.mesh.num_cells()
        );
        Ok(mesh)
    }
    #[cfg(not(feature = "xml-io"))]
    {
        let _ = path;
        Err(MeshBridgeError::CapabilityUnavailable(XML_IO))
    }
}

/// Writes `mesh` as a DOLFIN XML file, replacing any existing file.
///
/// # Errors
/// [`MeshBridgeError::CapabilityUnavailable`] without the `xml-io` feature;
/// otherwise I/O errors and label attachment errors.
pub fn save<P: AsRef<Path>>(path: P, mesh: &LabeledMesh) -> Result<(), MeshBridgeError> {
    #[cfg(feature = "xml-io")]
    {
        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = std::io::BufWriter::new(file);
        dolfin::DolfinXmlWriter.write(&mut writer, mesh)?;
        writer.flush()?;
        log::debug!("saved {}", path.as_ref().display());
        Ok(())
    }
    #[cfg(not(feature = "xml-io"))]
    {
        let _ = (path, mesh);
        Err(MeshBridgeError::CapabilityUnavailable(XML_IO))
    }
}
