//! DOLFIN XML mesh format.
//!
//! ```xml
//! <dolfin>
//!   <mesh celltype="triangle" dim="2">
//!     <vertices size="3"><vertex index="0" x="0" y="0"/>…</vertices>
//!     <cells size="1"><triangle index="0" v0="0" v1="1" v2="2"/></cells>
//!     <domains>
//!       <mesh_value_collection name="m" type="uint" dim="1" size="3">
//!         <value cell_index="0" local_entity="2" value="4"/>…
//!       </mesh_value_collection>
//!     </domains>
//!   </mesh>
//! </dolfin>
//! ```
//!
//! Labels are keyed by `(cell_index, local_entity)`: for facets the local
//! entity is the facet opposite that local vertex of the cell, for cells it
//! is always 0. Cells are written with sorted vertices so local facet numbers
//! agree on both sides. Coordinates use the shortest representation that
//! parses back to the same `f64`.

use std::io::{Read, Write};

use roxmltree::{Document, Node};

use crate::io::{LabeledMesh, MeshReader, MeshWriter};
use crate::mesh_error::MeshBridgeError;
use crate::topology::cell_type::CellType;
use crate::topology::labels::EntityLabels;
use crate::topology::mesh::SimplexMesh;

const AXES: [&str; 3] = ["x", "y", "z"];

fn parse_error(message: impl Into<String>) -> MeshBridgeError {
    MeshBridgeError::MeshIoParse(message.into())
}

fn required<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, MeshBridgeError> {
    node.attribute(name).ok_or_else(|| {
        parse_error(format!(
            "<{}> is missing attribute `{name}`",
            node.tag_name().name()
        ))
    })
}

fn parse_attr<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Result<T, MeshBridgeError> {
    let raw = required(node, name)?;
    raw.trim().parse().map_err(|_| {
        parse_error(format!(
            "<{}> attribute `{name}` has invalid value {raw:?}",
            node.tag_name().name()
        ))
    })
}

fn child<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Result<Node<'a, 'i>, MeshBridgeError> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .ok_or_else(|| parse_error(format!("<{}> has no <{tag}>", node.tag_name().name())))
}

/// The `size` attribute of `node`, which must equal its number of `tag`
/// children, and the buffer length it implies.
fn declared_size(
    node: Node<'_, '_>,
    tag: &str,
    per_entry: usize,
) -> Result<(usize, usize), MeshBridgeError> {
    let size: usize = parse_attr(node, "size")?;
    let present = node.children().filter(|n| n.has_tag_name(tag)).count();
    if size != present {
        return Err(parse_error(format!(
            "<{}> declares size {size} but holds {present} <{tag}> entries",
            node.tag_name().name()
        )));
    }
    let len = size.checked_mul(per_entry).ok_or_else(|| {
        parse_error(format!("<{}> size {size} is too large", node.tag_name().name()))
    })?;
    Ok((size, len))
}

/// Reader for DOLFIN XML meshes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DolfinXmlReader;

impl DolfinXmlReader {
    fn read_vertices(vertices: Node<'_, '_>, dim: usize) -> Result<Vec<f64>, MeshBridgeError> {
        let (size, len) = declared_size(vertices, "vertex", dim)?;
        let mut coordinates = vec![0.0; len];
        let mut seen = vec![false; size];
        for vertex in vertices.children().filter(|n| n.has_tag_name("vertex")) {
            let index: usize = parse_attr(vertex, "index")?;
            if index >= size || seen[index] {
                return Err(parse_error(format!(
                    "vertex index {index} is repeated or outside 0..{size}"
                )));
            }
            seen[index] = true;
            for (axis, name) in AXES.iter().take(dim).enumerate() {
                coordinates[index * dim + axis] = parse_attr(vertex, name)?;
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(parse_error(format!("vertex {missing} is missing")));
        }
        Ok(coordinates)
    }

    fn read_cells(
        cells: Node<'_, '_>,
        cell_type: CellType,
    ) -> Result<Vec<usize>, MeshBridgeError> {
        let per_cell = cell_type.vertex_count();
        let (size, len) = declared_size(cells, cell_type.dolfin_name(), per_cell)?;
        let mut connectivity = vec![0; len];
        let mut seen = vec![false; size];
        for cell in cells
            .children()
            .filter(|n| n.has_tag_name(cell_type.dolfin_name()))
        {
            let index: usize = parse_attr(cell, "index")?;
            if index >= size || seen[index] {
                return Err(parse_error(format!(
                    "cell index {index} is repeated or outside 0..{size}"
                )));
            }
            seen[index] = true;
            for local in 0..per_cell {
                connectivity[index * per_cell + local] = parse_attr(cell, &format!("v{local}"))?;
            }
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(parse_error(format!("cell {missing} is missing")));
        }
        Ok(connectivity)
    }

    fn read_labels(
        collection: Node<'_, '_>,
        mesh: &SimplexMesh,
        dim: usize,
    ) -> Result<EntityLabels, MeshBridgeError> {
        let mut labels = EntityLabels::new(mesh, dim);
        for value in collection.children().filter(|n| n.has_tag_name("value")) {
            let cell: usize = parse_attr(value, "cell_index")?;
            let local: usize = parse_attr(value, "local_entity")?;
            let label: i64 = parse_attr(value, "value")?;
            if cell >= mesh.num_cells() {
                return Err(parse_error(format!(
                    "label refers to cell {cell} of {}",
                    mesh.num_cells()
                )));
            }
            let entity = if dim == mesh.dimension() {
                (local == 0).then_some(cell)
            } else {
                mesh.cell_facets(cell).get(local).copied()
            };
            let entity = entity.ok_or_else(|| {
                parse_error(format!(
                    "cell {cell} has no local dimension-{dim} entity {local}"
                ))
            })?;
            labels.set_label(entity, label);
        }
        Ok(labels)
    }
}

impl MeshReader for DolfinXmlReader {
    fn read<R: Read>(&self, mut reader: R) -> Result<LabeledMesh, MeshBridgeError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let doc = Document::parse(&input)
            .map_err(|err| parse_error(format!("XML parse error: {err}")))?;

        let mesh_node = doc
            .descendants()
            .find(|n| n.has_tag_name("mesh"))
            .ok_or_else(|| parse_error("missing <mesh>"))?;
        let dim: usize = parse_attr(mesh_node, "dim")?;
        let cell_type = CellType::from_dolfin_name(required(mesh_node, "celltype")?)
            .filter(|ct| ct.dimension() == dim)
            .ok_or_else(|| parse_error(format!("unsupported celltype for dim {dim}")))?;
        CellType::for_mesh_dimension(dim)?;

        let coordinates = Self::read_vertices(child(mesh_node, "vertices")?, dim)?;
        let cells = Self::read_cells(child(mesh_node, "cells")?, cell_type)?;
        let mesh = SimplexMesh::new(dim, coordinates, cells)?;

        let mut facet_labels = None;
        let mut cell_labels = None;
        if let Some(domains) = mesh_node.children().find(|n| n.has_tag_name("domains")) {
            for collection in domains
                .children()
                .filter(|n| n.has_tag_name("mesh_value_collection"))
            {
                let entity_dim: usize = parse_attr(collection, "dim")?;
                let slot = if entity_dim == dim {
                    &mut cell_labels
                } else if entity_dim + 1 == dim {
                    &mut facet_labels
                } else {
                    log::debug!("skipping dimension-{entity_dim} value collection");
                    continue;
                };
                *slot = Some(Self::read_labels(collection, &mesh, entity_dim)?);
            }
        }

        Ok(LabeledMesh {
            mesh,
            facet_labels,
            cell_labels,
        })
    }
}

/// Writer for DOLFIN XML meshes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DolfinXmlWriter;

impl DolfinXmlWriter {
    fn write_labels<W: Write>(
        writer: &mut W,
        dim: usize,
        values: &[(usize, usize, i64)],
    ) -> Result<(), MeshBridgeError> {
        let value_type = if values.iter().any(|&(_, _, v)| v < 0) {
            "int"
        } else {
            "uint"
        };
        writeln!(
            writer,
            "      <mesh_value_collection name=\"m\" type=\"{value_type}\" dim=\"{dim}\" size=\"{}\">",
            values.len()
        )?;
        for &(cell, local, value) in values {
            writeln!(
                writer,
                "        <value cell_index=\"{cell}\" local_entity=\"{local}\" value=\"{value}\" />"
            )?;
        }
        writeln!(writer, "      </mesh_value_collection>")?;
        Ok(())
    }
}

impl MeshWriter for DolfinXmlWriter {
    fn write<W: Write>(&self, mut writer: W, labeled: &LabeledMesh) -> Result<(), MeshBridgeError> {
        labeled.check_labels()?;
        let mesh = &labeled.mesh;
        let dim = mesh.dimension();
        let cell_name = mesh.cell_type().dolfin_name();

        writeln!(writer, "<?xml version=\"1.0\"?>")?;
        writeln!(writer, "<dolfin xmlns:dolfin=\"http://fenicsproject.org\">")?;
        writeln!(writer, "  <mesh celltype=\"{cell_name}\" dim=\"{dim}\">")?;

        writeln!(writer, "    <vertices size=\"{}\">", mesh.num_vertices())?;
        for v in 0..mesh.num_vertices() {
            write!(writer, "      <vertex index=\"{v}\"")?;
            for (name, x) in AXES.iter().zip(mesh.vertex_coordinates(v)) {
                write!(writer, " {name}=\"{x}\"")?;
            }
            writeln!(writer, " />")?;
        }
        writeln!(writer, "    </vertices>")?;

        writeln!(writer, "    <cells size=\"{}\">", mesh.num_cells())?;
        for (c, cell) in mesh.cells().enumerate() {
            write!(writer, "      <{cell_name} index=\"{c}\"")?;
            for (local, v) in cell.iter().enumerate() {
                write!(writer, " v{local}=\"{v}\"")?;
            }
            writeln!(writer, " />")?;
        }
        writeln!(writer, "    </cells>")?;

        if labeled.facet_labels.is_some() || labeled.cell_labels.is_some() {
            writeln!(writer, "    <domains>")?;
            if let Some(labels) = &labeled.facet_labels {
                let mut values = Vec::with_capacity(labels.len());
                for (f, value) in labels.iter() {
                    let Some(&c) = mesh.facet_cells(f).first() else {
                        continue;
                    };
                    if let Some(local) = mesh.cell_facets(c).iter().position(|&g| g == f) {
                        values.push((c, local, value));
                    }
                }
                Self::write_labels(&mut writer, dim - 1, &values)?;
            }
            if let Some(labels) = &labeled.cell_labels {
                let values: Vec<_> = labels.iter().map(|(c, value)| (c, 0, value)).collect();
                Self::write_labels(&mut writer, dim, &values)?;
            }
            writeln!(writer, "    </domains>")?;
        }

        writeln!(writer, "  </mesh>")?;
        writeln!(writer, "</dolfin>")?;
        Ok(())
    }
}
