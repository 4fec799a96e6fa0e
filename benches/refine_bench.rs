use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use pet_bridge::bridge::MeshBridge;
use pet_bridge::data::PetMesh;
use pet_bridge::prelude::{structured_mesh_2d, structured_mesh_3d};
use pet_bridge::topology::refine_uniform;

fn axis(n: usize) -> Vec<f64> {
    (0..=n).map(|i| i as f64 / n as f64).collect()
}

fn square(n: usize) -> PetMesh {
    structured_mesh_2d(&axis(n), &axis(n), 1, [1, 2, 3, 4]).expect("valid grid")
}

fn bench_refine(c: &mut Criterion) {
    let bridge = MeshBridge::default();
    let mut group = c.benchmark_group("refine");

    for &n in &[16usize, 64] {
        let pet = square(n);
        let mesh = bridge.import(&pet).expect("import").mesh;

        group.bench_with_input(BenchmarkId::new("kernel_uniform_2d", n), &n, |b, _| {
            b.iter(|| {
                let out = refine_uniform(&mesh).expect("refine");
                black_box(out);
            });
        });

        group.bench_with_input(BenchmarkId::new("bridge_uniform_2d", n), &n, |b, _| {
            b.iter(|| {
                let out = bridge.refine(&pet, None).expect("refine");
                black_box(out);
            });
        });

        // every cell of the first column of grid squares
        let strip: Vec<i64> = (1..=(2 * n as i64)).collect();
        group.bench_with_input(BenchmarkId::new("bridge_marked_2d", n), &n, |b, _| {
            b.iter(|| {
                let out = bridge.refine(&pet, Some(strip.as_slice())).expect("refine");
                black_box(out);
            });
        });
    }

    let cube = structured_mesh_3d(&axis(8), &axis(8), &axis(8), 1, [1, 2, 3, 4, 5, 6])
        .expect("valid grid");
    group.bench_function("bridge_uniform_3d/8", |b| {
        b.iter(|| {
            let out = bridge.refine(&cube, None).expect("refine");
            black_box(out);
        });
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let bridge = MeshBridge::default();
    let pet = square(64);
    c.bench_function("import_resolve_2d/64", |b| {
        b.iter(|| {
            let labeled = bridge.import(&pet).expect("import");
            black_box(labeled);
        });
    });
}

criterion_group!(benches, bench_refine, bench_resolve);
criterion_main!(benches);
