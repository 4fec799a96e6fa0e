#![allow(dead_code)]
use pet_bridge::data::{ColumnMatrix, PetMesh};

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Clone + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}

/// Columns of a table restricted to the first `rows` entries, each sorted.
pub fn sorted_vertex_columns(table: &ColumnMatrix<i64>, rows: usize) -> Vec<Vec<i64>> {
    table
        .columns()
        .map(|c| {
            let mut v = c[..rows].to_vec();
            v.sort_unstable();
            v
        })
        .collect()
}

/// Coordinates of 1-based vertex `v`.
pub fn point(mesh: &PetMesh, v: i64) -> Vec<f64> {
    mesh.p.column((v - 1) as usize).expect("vertex in range").to_vec()
}

/// Area (2D) or volume (3D) of cell column `c`.
pub fn cell_measure(mesh: &PetMesh, c: usize) -> f64 {
    let dim = mesh.dimension();
    let col = mesh.t.column(c).expect("cell in range");
    let o = point(mesh, col[0]);
    let d: Vec<Vec<f64>> = col[1..=dim]
        .iter()
        .map(|&v| point(mesh, v).iter().zip(&o).map(|(x, y)| x - y).collect())
        .collect();
    if dim == 2 {
        0.5 * (d[0][0] * d[1][1] - d[0][1] * d[1][0]).abs()
    } else {
        let det = d[0][0] * (d[1][1] * d[2][2] - d[1][2] * d[2][1])
            - d[0][1] * (d[1][0] * d[2][2] - d[1][2] * d[2][0])
            + d[0][2] * (d[1][0] * d[2][1] - d[1][1] * d[2][0]);
        det.abs() / 6.0
    }
}

/// Sum of all cell measures.
pub fn total_measure(mesh: &PetMesh) -> f64 {
    (0..mesh.num_cells()).map(|c| cell_measure(mesh, c)).sum()
}

/// Labels stored on the label row of a facet table.
pub fn facet_labels(mesh: &PetMesh) -> Vec<i64> {
    let row = pet_bridge::data::pet::facet_label_row(mesh.dimension());
    mesh.e.row(row).unwrap_or_default()
}

/// Labels stored on the label row of a cell table.
pub fn cell_labels(mesh: &PetMesh) -> Vec<i64> {
    let row = pet_bridge::data::pet::cell_label_row(mesh.dimension());
    mesh.t.row(row).unwrap_or_default()
}

/// Every facet column's vertices satisfy `pred` (applied to coordinates).
pub fn facet_on(mesh: &PetMesh, column: usize, pred: impl Fn(&[f64]) -> bool) -> bool {
    let dim = mesh.dimension();
    let col = mesh.e.column(column).expect("facet in range");
    col[..dim].iter().all(|&v| pred(&point(mesh, v)))
}
