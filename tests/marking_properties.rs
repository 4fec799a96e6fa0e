use pet_bridge::bridge::marking::build_refine_predicate;
use pet_bridge::prelude::*;
use proptest::prelude::*;

fn square() -> PetMesh {
    let axis = [0.0, 0.5, 1.0];
    structured_mesh_2d(&axis, &axis, 1, [1, 2, 3, 4]).expect("mesh")
}

proptest! {
    #[test]
    fn indices_outside_the_mesh_are_rejected(cells in proptest::collection::vec(-3i64..12, 0..6)) {
        let mesh = square();
        let result = MeshBridge::default().refine(&mesh, Some(cells.as_slice()));
        match cells.iter().find(|&&c| c < 1 || c > 8) {
            Some(&bad) => prop_assert_eq!(
                result,
                Err(MeshBridgeError::IndexOutOfRange { what: "cell", index: bad, len: 8 })
            ),
            None => {
                let refined = result.expect("in-range indices refine");
                let mut distinct = cells.clone();
                distinct.sort_unstable();
                distinct.dedup();
                prop_assert!(refined.num_cells() >= mesh.num_cells() + distinct.len());
            }
        }
    }

    #[test]
    fn marking_is_a_set(cells in proptest::collection::vec(1i64..=8, 1..6)) {
        let bridge = MeshBridge::default();
        let mesh = square();
        let mut canonical = cells.clone();
        canonical.sort_unstable();
        canonical.dedup();

        let a = bridge.refine(&mesh, Some(cells.as_slice())).expect("refine");
        let b = bridge.refine(&mesh, Some(canonical.as_slice())).expect("refine");
        prop_assert_eq!(a, b);
    }
}

#[test]
fn no_list_marks_everything_and_an_empty_list_nothing() {
    let bridge = MeshBridge::default();
    let pet = square();
    let mesh = bridge.import(&pet).expect("import").mesh;

    let all = build_refine_predicate(&mesh, None).expect("markers");
    assert_eq!(all.count_marked(), 8);
    let none = build_refine_predicate(&mesh, Some(&[][..])).expect("markers");
    assert_eq!(none.count_marked(), 0);

    let unchanged = bridge.refine(&pet, Some(&[][..])).expect("refine");
    assert_eq!(unchanged.p, pet.p);
    assert_eq!(unchanged.num_cells(), 8);
}

#[test]
fn zero_is_not_a_cell_index() {
    let err = MeshBridge::default()
        .refine(&square(), Some(&[0][..]))
        .expect_err("indices are 1-based");
    assert_eq!(
        err,
        MeshBridgeError::IndexOutOfRange { what: "cell", index: 0, len: 8 }
    );
}
