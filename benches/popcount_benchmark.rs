use bitcaps::PopcountImpl;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::distributions::{Distribution, Uniform};

fn bench_popcount(b: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let sample = Uniform::new(0, u64::MAX);

    let mut group = b.benchmark_group("popcount");
    for implementation in [PopcountImpl::Hardware, PopcountImpl::Generic] {
        group.bench_function(format!("{implementation:?} single word"), |b| {
            b.iter_batched(
                || sample.sample(&mut rng),
                |word| black_box(implementation.count(word)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();

    let mut group = b.benchmark_group("popcount_slice");
    for l in [2 << 8, 2 << 10, 2 << 12, 2 << 14, 2 << 16] {
        let words: Vec<u64> = (0..l).map(|_| sample.sample(&mut rng)).collect();

        for implementation in [PopcountImpl::Hardware, PopcountImpl::Generic] {
            group.bench_with_input(
                format!("{implementation:?} {l} words"),
                &words,
                |b, words| b.iter(|| black_box(implementation.count_slice(words))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_popcount);
criterion_main!(benches);
