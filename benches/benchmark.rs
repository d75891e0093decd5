use criterion::BenchmarkId;
use criterion::Throughput;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, SamplingMode};
use hungarian_steps::instance::random_costs;
use hungarian_steps::{Difficulty, HungarianQuestion, Matrix, Mode, Precision, RouteTree, Submission};

fn gen_costs(seed: u64, size: usize, precision: Precision) -> Matrix<i64> {
    random_costs(size, precision, seed).unwrap()
}

fn bench_route_tree_by_size(c: &mut Criterion, max_size: usize, seeds: u64) {
    let mut group = c.benchmark_group("route_tree");
    group.sampling_mode(SamplingMode::Flat);

    for size in 3..=max_size {
        for precision in [Precision::Discrete, Precision::Continuous].iter() {
            let inputs = (0..seeds)
                .map(|seed| gen_costs(seed, size, *precision))
                .collect::<Vec<_>>();
            group.throughput(Throughput::Elements(inputs.len() as u64));
            let benchmark_id = BenchmarkId::new(format!("{:?}", precision), format!("size {}", size));

            group.bench_with_input(benchmark_id, &inputs, |b, inputs| {
                b.iter(|| {
                    inputs
                        .iter()
                        .map(|costs| RouteTree::build(costs).routes.len())
                        .sum::<usize>()
                });
            });
        }
    }
    group.finish();
}

fn bench_question_by_difficulty(c: &mut Criterion, seeds: u64) {
    let mut group = c.benchmark_group("question");
    group.sample_size(10);

    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard].iter() {
        let benchmark_id = BenchmarkId::new("new", format!("{:?}", difficulty));
        group.bench_with_input(benchmark_id, difficulty, |b, difficulty| {
            b.iter(|| {
                for seed in 1..=seeds {
                    HungarianQuestion::new(Some(seed), *difficulty, Mode::Steps).unwrap();
                }
            });
        });

        let questions = (1..=seeds)
            .map(|seed| HungarianQuestion::new(Some(seed), *difficulty, Mode::Steps).unwrap())
            .collect::<Vec<_>>();
        let benchmark_id = BenchmarkId::new("evaluate", format!("{:?}", difficulty));
        group.bench_with_input(benchmark_id, &questions, |b, questions| {
            b.iter_batched(
                Submission::new,
                |input| {
                    questions
                        .iter()
                        .map(|q| q.evaluate(&input).len())
                        .sum::<usize>()
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_route_tree_size_5(c: &mut Criterion) {
    bench_route_tree_by_size(c, 5, 20)
}

fn bench_question_10_seeds(c: &mut Criterion) {
    bench_question_by_difficulty(c, 10)
}

criterion_group!(benches, bench_route_tree_size_5, bench_question_10_seeds);
criterion_main!(benches);
