use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use resest_prob::{
    evaluate, ConfidenceLevel, ConfidenceTable, Estimator, EstimatorConfig, Population,
    RunningHistogram,
};

fn skewed_population(len: usize) -> Population {
    let levels = (0..len as i64).map(|i| 1 + (i * i) % 997).collect();
    Population::new(levels).expect("non-empty population")
}

fn bench_evaluate(c: &mut Criterion) {
    let table = ConfidenceTable::builtin(ConfidenceLevel::P90);
    let histogram: RunningHistogram = (0..500).map(|i| 1 + (i * 31) % 250).collect();
    c.bench_function("evaluate_500_samples", |b| {
        b.iter(|| evaluate(black_box(&histogram), 0.15, &table).unwrap())
    });
}

fn bench_trial(c: &mut Criterion) {
    let population = skewed_population(100_000);
    let table = ConfidenceTable::builtin(ConfidenceLevel::P90);
    let estimator = Estimator::new(&population, &table, EstimatorConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    c.bench_function("trial_100k_nodes", |b| {
        b.iter(|| estimator.run_trial(&mut rng, black_box(0)).unwrap())
    });
}

criterion_group!(benches, bench_evaluate, bench_trial);
criterion_main!(benches);
