//! Structured simplex meshes in `(p, e, t)` form.
//!
//! Grids are given by their node coordinates along each axis. Vertices are
//! numbered with y varying fastest, then x, then z. Every generated facet
//! table carries the domain tag 1 on its second-to-last row.

use crate::data::matrix::ColumnMatrix;
use crate::data::pet::{
    PetMesh, cell_label_row, cell_table_rows, facet_domain_row, facet_label_row,
    facet_table_rows,
};
use crate::mesh_error::MeshBridgeError;
use crate::topology::labels::Label;

/// Six tetrahedra per hexahedron, as 0-based local nodes `n1..n8` with
/// `n = 1 + y + 2x + 4z`. All of them share the n3-n6 diagonal, and opposite
/// hexahedron faces are cut along parallel diagonals so neighbours conform.
const HEX_TETS: [[usize; 4]; 6] = [
    [0, 1, 2, 5],
    [2, 4, 5, 6],
    [0, 2, 4, 5],
    [1, 2, 3, 5],
    [2, 5, 6, 7],
    [2, 3, 5, 7],
];

fn invalid_geometry(message: impl Into<String>) -> MeshBridgeError {
    MeshBridgeError::InvalidGeometry(message.into())
}

fn check_axis(name: &str, nodes: &[f64]) -> Result<(), MeshBridgeError> {
    if nodes.len() < 2 {
        return Err(invalid_geometry(format!(
            "{name} needs at least 2 grid nodes, got {}",
            nodes.len()
        )));
    }
    if nodes.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(invalid_geometry(format!(
            "{name} grid nodes must be strictly increasing"
        )));
    }
    Ok(())
}

fn facet_column(dim: usize, vertices: &[usize], label: Label) -> Vec<i64> {
    let mut column = vec![0; facet_table_rows(dim)];
    for (slot, &v) in column.iter_mut().zip(vertices) {
        *slot = v as i64 + 1;
    }
    column[facet_domain_row(dim)] = 1;
    column[facet_label_row(dim)] = label;
    column
}

fn cell_column(dim: usize, vertices: &[usize], label: Label) -> Vec<i64> {
    let mut column: Vec<i64> = vertices.iter().map(|&v| v as i64 + 1).collect();
    column.resize(cell_label_row(dim), 0);
    column.push(label);
    column
}

/// Triangulated rectangle over the grid `xs × ys`.
///
/// Each grid square with corners n1=(i,j), n2=(i,j+1), n3=(i+1,j),
/// n4=(i+1,j+1) becomes the triangles (n1,n3,n4) and (n1,n4,n2); squares are
/// visited with j varying fastest. Every cell gets `region`. Boundary edges
/// are emitted side by side, labelled with `sides = [y_min, x_max, y_max,
/// x_min]`.
///
/// # Errors
/// [`MeshBridgeError::InvalidGeometry`] if an axis has fewer than two nodes or
/// is not strictly increasing.
pub fn structured_mesh_2d(
    xs: &[f64],
    ys: &[f64],
    region: Label,
    sides: [Label; 4],
) -> Result<PetMesh, MeshBridgeError> {
    check_axis("x", xs)?;
    check_axis("y", ys)?;
    let (nx, ny) = (xs.len(), ys.len());
    let node = |i: usize, j: usize| i * ny + j;

    let p = ColumnMatrix::from_columns(
        2,
        xs.iter().flat_map(|&x| ys.iter().map(move |&y| [x, y])),
    )?;

    let mut cells = Vec::with_capacity(2 * (nx - 1) * (ny - 1));
    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            let (n1, n2, n3, n4) = (node(i, j), node(i, j + 1), node(i + 1, j), node(i + 1, j + 1));
            cells.push(cell_column(2, &[n1, n3, n4], region));
            cells.push(cell_column(2, &[n1, n4, n2], region));
        }
    }
    let t = ColumnMatrix::from_columns(cell_table_rows(2), cells)?;

    let [y_min, x_max, y_max, x_min] = sides;
    let mut facets = Vec::with_capacity(2 * (nx + ny - 2));
    for i in 0..nx - 1 {
        facets.push(facet_column(2, &[node(i, 0), node(i + 1, 0)], y_min));
    }
    for j in 0..ny - 1 {
        facets.push(facet_column(2, &[node(nx - 1, j), node(nx - 1, j + 1)], x_max));
    }
    for i in 0..nx - 1 {
        facets.push(facet_column(2, &[node(i, ny - 1), node(i + 1, ny - 1)], y_max));
    }
    for j in 0..ny - 1 {
        facets.push(facet_column(2, &[node(0, j), node(0, j + 1)], x_min));
    }
    let e = ColumnMatrix::from_columns(facet_table_rows(2), facets)?;

    Ok(PetMesh::new(p, e, t))
}

/// Tetrahedralized box over the grid `xs × ys × zs`.
///
/// Each grid hexahedron is split into six tetrahedra; every cell gets
/// `region`. Boundary faces are labelled with `sides = [x_min, x_max, y_min,
/// y_max, z_min, z_max]`.
///
/// # Errors
/// [`MeshBridgeError::InvalidGeometry`] if an axis has fewer than two nodes or
/// is not strictly increasing.
pub fn structured_mesh_3d(
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    region: Label,
    sides: [Label; 6],
) -> Result<PetMesh, MeshBridgeError> {
    check_axis("x", xs)?;
    check_axis("y", ys)?;
    check_axis("z", zs)?;
    let (nx, ny, nz) = (xs.len(), ys.len(), zs.len());
    let node = |i: usize, j: usize, k: usize| k * nx * ny + i * ny + j;

    let p = ColumnMatrix::from_columns(
        3,
        zs.iter().flat_map(|&z| {
            xs.iter()
                .flat_map(move |&x| ys.iter().map(move |&y| [x, y, z]))
        }),
    )?;

    let mut cells = Vec::with_capacity(6 * (nx - 1) * (ny - 1) * (nz - 1));
    let mut facets = Vec::new();
    let [x_min, x_max, y_min, y_max, z_min, z_max] = sides;
    for k in 0..nz - 1 {
        for i in 0..nx - 1 {
            for j in 0..ny - 1 {
                let n: [usize; 8] = std::array::from_fn(|l| {
                    node(i + (l >> 1 & 1), j + (l & 1), k + (l >> 2))
                });
                for tet in HEX_TETS {
                    cells.push(cell_column(3, &tet.map(|l| n[l]), region));
                }

                let mut face = |on_side: bool, tris: [[usize; 3]; 2], label: Label| {
                    if on_side {
                        for tri in tris {
                            facets.push(facet_column(3, &tri.map(|l| n[l]), label));
                        }
                    }
                };
                face(i == 0, [[0, 1, 5], [0, 4, 5]], x_min);
                face(i == nx - 2, [[2, 3, 7], [2, 6, 7]], x_max);
                face(j == 0, [[0, 2, 4], [2, 4, 6]], y_min);
                face(j == ny - 2, [[1, 3, 5], [3, 5, 7]], y_max);
                face(k == 0, [[0, 1, 2], [1, 2, 3]], z_min);
                face(k == nz - 2, [[4, 5, 6], [5, 6, 7]], z_max);
            }
        }
    }
    let t = ColumnMatrix::from_columns(cell_table_rows(3), cells)?;
    let e = ColumnMatrix::from_columns(facet_table_rows(3), facets)?;

    Ok(PetMesh::new(p, e, t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_two_triangles() {
        let mesh = structured_mesh_2d(&[0.0, 1.0], &[0.0, 1.0], 1, [1, 2, 3, 4]).unwrap();
        assert_eq!(mesh.p.as_slice(), &[0., 0., 0., 1., 1., 0., 1., 1.]);
        assert_eq!(mesh.t.as_slice(), &[1, 3, 4, 1, 1, 4, 2, 1]);
        assert_eq!(mesh.e.shape(), (7, 4));
        assert_eq!(mesh.e.row(0).unwrap(), vec![1, 3, 2, 1]);
        assert_eq!(mesh.e.row(1).unwrap(), vec![3, 4, 4, 2]);
        assert_eq!(mesh.e.row(4).unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mesh.e.row(5).unwrap(), vec![1; 4]);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn unit_cube_six_tetrahedra() {
        let mesh =
            structured_mesh_3d(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0], 1, [1, 2, 3, 4, 5, 6])
                .unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.p.column(1), Some(&[0.0, 1.0, 0.0][..]));
        assert_eq!(mesh.p.column(2), Some(&[1.0, 0.0, 0.0][..]));
        assert_eq!(mesh.p.column(4), Some(&[0.0, 0.0, 1.0][..]));
        assert_eq!(mesh.num_cells(), 6);
        assert_eq!(mesh.t.column(0), Some(&[1, 2, 3, 6, 1][..]));
        assert_eq!(mesh.num_facets(), 12);
        assert_eq!(mesh.e.column(0).map(|c| c[..3].to_vec()), Some(vec![1, 2, 6]));
        assert_eq!(
            mesh.e.row(9).unwrap(),
            vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6]
        );
        assert_eq!(mesh.e.row(8).unwrap(), vec![1; 12]);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn axes_must_be_increasing() {
        assert!(matches!(
            structured_mesh_2d(&[0.0], &[0.0, 1.0], 1, [1; 4]),
            Err(MeshBridgeError::InvalidGeometry(_))
        ));
        assert!(matches!(
            structured_mesh_3d(&[0.0, 1.0], &[1.0, 0.0], &[0.0, 1.0], 1, [1; 6]),
            Err(MeshBridgeError::InvalidGeometry(_))
        ));
    }
}
