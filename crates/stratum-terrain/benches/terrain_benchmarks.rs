use criterion::{Criterion, black_box, criterion_group, criterion_main};
use stratum_terrain::sizing::square_octaves;
use stratum_terrain::*;

fn bench_evaluate(c: &mut Criterion) {
    let mut ctx = GenerationContext::new(1);
    let (layer, _) = NoiseLayer::generate(9, 9, 8, Neighbors::none(), &mut ctx).unwrap();
    c.bench_function("layer_evaluate", |bencher| {
        bencher.iter(|| black_box(layer.evaluate(black_box(3.3), black_box(5.7))))
    });
}

fn bench_layer_materialize(c: &mut Criterion) {
    let mut ctx = GenerationContext::new(2);
    let (field, _) = VectorField::generate(33, 33, Neighbors::none(), &mut ctx).unwrap();
    c.bench_function("layer_materialize_256", |bencher| {
        bencher.iter(|| black_box(NoiseLayer::new(field.clone(), 8).unwrap()))
    });
}

fn bench_map_generate(c: &mut Criterion) {
    let octaves = square_octaves(&[3, 5, 9], &[1.0, 0.1, 0.01]).unwrap();
    let params = MapParams::new(3, 3, octaves);
    let ctx = GenerationContext::new(3);
    c.bench_function("map_generate_3x3", |bencher| {
        bencher.iter(|| black_box(TileMap::generate(&params, &ctx).unwrap()))
    });
}

fn bench_map_assemble(c: &mut Criterion) {
    let octaves = square_octaves(&[3, 5, 9], &[1.0, 0.1, 0.01]).unwrap();
    let (map, _) =
        TileMap::generate(&MapParams::new(4, 4, octaves), &GenerationContext::new(4)).unwrap();
    c.bench_function("map_assemble_4x4", |bencher| {
        bencher.iter(|| black_box(map.assemble()))
    });
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_layer_materialize,
    bench_map_generate,
    bench_map_assemble,
);
criterion_main!(benches);
