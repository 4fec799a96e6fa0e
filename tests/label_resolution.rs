mod util;

use pet_bridge::bridge::resolve::{resolve_and_label, resolve_facet_labels, TableLayout};
use pet_bridge::data::pet::{cell_label_row, facet_label_row};
use pet_bridge::data::PetMesh;
use pet_bridge::prelude::*;
use proptest::prelude::*;
use util::assert_permutation;

/// 3×3 grid with a distinct label on every boundary edge and every cell.
fn distinct_labels() -> PetMesh {
    let axis = [0.0, 1.0, 2.0, 3.0];
    let mut mesh = structured_mesh_2d(&axis, &axis, 1, [1, 2, 3, 4]).expect("mesh");
    for f in 0..mesh.num_facets() {
        mesh.e
            .set(facet_label_row(2), f, 100 + f as i64)
            .expect("label row");
    }
    for c in 0..mesh.num_cells() {
        mesh.t.set(cell_label_row(2), c, 10 + c as i64).expect("label row");
    }
    mesh
}

/// Rotates the first `n` entries of every column by the matching shift.
fn rotate_vertices(table: &ColumnMatrix<i64>, n: usize, shifts: &[usize]) -> ColumnMatrix<i64> {
    let columns = table.columns().zip(shifts).map(|(column, &shift)| {
        let mut column = column.to_vec();
        column[..n].rotate_left(shift % n);
        column
    });
    ColumnMatrix::from_columns(table.rows(), columns).expect("same shape")
}

fn reorder_columns(table: &ColumnMatrix<i64>, order: &[usize]) -> ColumnMatrix<i64> {
    let columns = order.iter().map(|&c| table.column(c).expect("column").to_vec());
    ColumnMatrix::from_columns(table.rows(), columns).expect("same shape")
}

proptest! {
    #[test]
    fn resolution_ignores_column_and_vertex_order(
        facet_order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle(),
        facet_shifts in proptest::collection::vec(0usize..2, 12),
        cell_shifts in proptest::collection::vec(0usize..3, 18),
    ) {
        let bridge = MeshBridge::default();
        let mesh = distinct_labels();
        let expected = bridge.export(&bridge.import(&mesh).expect("import")).expect("export");

        let shuffled = PetMesh::new(
            mesh.p.clone(),
            rotate_vertices(&reorder_columns(&mesh.e, &facet_order), 2, &facet_shifts),
            rotate_vertices(&mesh.t, 3, &cell_shifts),
        );
        let got = bridge.export(&bridge.import(&shuffled).expect("import")).expect("export");
        prop_assert_eq!(got, expected);
    }
}

#[test]
fn every_label_survives_import_and_export() {
    let bridge = MeshBridge::default();
    let mesh = distinct_labels();
    let back = bridge.export(&bridge.import(&mesh).expect("import")).expect("export");

    assert_permutation(
        &back.e.row(facet_label_row(2)).expect("label row"),
        &(100..112).collect::<Vec<_>>(),
    );
    assert_eq!(
        back.t.row(cell_label_row(2)),
        Some((10..28).collect::<Vec<_>>())
    );
}

fn with_stray_facet() -> PetMesh {
    let mut mesh = distinct_labels();
    // vertices 1 and 16 are opposite corners; no edge joins them
    let mut columns: Vec<Vec<i64>> = mesh.e.columns().map(<[i64]>::to_vec).collect();
    columns.push(vec![1, 16, 0, 0, 99, 1, 0]);
    mesh.e = ColumnMatrix::from_columns(7, columns).expect("shape");
    mesh
}

#[test]
fn unmatched_facets_fail_by_default() {
    let err = MeshBridge::default()
        .import(&with_stray_facet())
        .expect_err("stray facet must be reported");
    assert_eq!(
        err,
        MeshBridgeError::UnmatchedEntity {
            dimension: 1,
            column: 12,
            vertices: vec![1, 16],
        }
    );
}

#[test]
fn unmatched_facets_are_dropped_when_tolerated() {
    for policy in [UnmatchedPolicy::Warn, UnmatchedPolicy::Ignore] {
        let bridge = MeshBridge::new(BridgeConfig::default().with_unmatched(policy));
        let labeled = bridge.import(&with_stray_facet()).expect("import");
        let labels = labeled.facet_labels.as_ref().expect("facet labels");
        assert_eq!(labels.len(), 12);
        assert!(labels.stratum_entities(99).is_empty());
    }
}

#[test]
fn interior_facets_resolve_but_are_not_exported() {
    let mut mesh = distinct_labels();
    // the diagonal of the first grid square, between vertices 1 and 6
    let mut columns: Vec<Vec<i64>> = mesh.e.columns().map(<[i64]>::to_vec).collect();
    columns.push(vec![6, 1, 0, 0, 77, 1, 0]);
    mesh.e = ColumnMatrix::from_columns(7, columns).expect("shape");

    let bridge = MeshBridge::default();
    let labeled = bridge.import(&mesh).expect("import");
    let labels = labeled.facet_labels.as_ref().expect("facet labels");
    let diagonal = labels.stratum_entities(77);
    assert_eq!(diagonal.len(), 1);
    assert!(!labeled.mesh.is_exterior_facet(diagonal[0]));

    let back = bridge.export(&labeled).expect("export");
    assert_eq!(back.num_facets(), 12);
    assert!(!back.e.row(facet_label_row(2)).expect("row").contains(&77));
}

#[test]
fn stale_labels_are_refused() {
    let bridge = MeshBridge::default();
    let mesh = distinct_labels();
    let first = bridge.import(&mesh).expect("import");
    let second = bridge.import(&mesh).expect("import");

    let labels = resolve_facet_labels(&first.mesh, &mesh.e, bridge.config()).expect("resolve");
    let err = labels.ensure_bound_to(&second.mesh).expect_err("different mesh");
    assert!(matches!(err, MeshBridgeError::StaleLabels { .. }));
}

#[test]
fn cell_tables_without_label_rows_use_the_sentinel() {
    let mesh = distinct_labels();
    let labeled = MeshBridge::default().import(&mesh).expect("import");
    let layout = TableLayout {
        label_row: None,
        ..TableLayout::cells(2)
    };
    let cfg = BridgeConfig::default().with_unlabeled(-1);
    let labels = resolve_and_label(&labeled.mesh, &mesh.t, layout, &cfg).expect("resolve");
    assert_eq!(labels.len(), 18);
    assert_eq!(labels.stratum_values(), vec![-1]);
}
