use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meshgeom::cell::EmbeddingMatrix;
use meshgeom::mesh::Mesh;
use meshgeom::traits::types::CellType;

pub fn embedding_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("embedding");
    group.sample_size(20);

    for cell_type in [CellType::Quad9, CellType::Tet10, CellType::Hex27] {
        group.bench_function(
            format!("Generation of {} embedding matrix", cell_type.label()),
            |b| b.iter(|| black_box(EmbeddingMatrix::new(cell_type).unwrap())),
        );
    }
    group.finish();
}

pub fn refinement_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("refinement");
    group.sample_size(20);

    for levels in 1..4 {
        group.bench_function(format!("{levels} uniform refinements of a hex"), |b| {
            b.iter(|| {
                let mut mesh = Mesh::<f64>::new();
                for z in [0.0, 1.0] {
                    for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                        mesh.add_node([x, y, z]);
                    }
                }
                mesh.add_cell(CellType::Hex8, &[0, 1, 2, 3, 4, 5, 6, 7])
                    .unwrap();
                for _ in 0..levels {
                    mesh.refine_all().unwrap();
                }
                black_box(mesh.node_count())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, embedding_benchmark, refinement_benchmark);
criterion_main!(benches);
