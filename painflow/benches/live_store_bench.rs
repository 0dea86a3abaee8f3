//! Benchmarks for the live delta store and stream decoder.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use painflow::live::{LiveDeltaStore, ManualScheduler, StreamDecoder};

fn coalescing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_then_tick");
    for fragments in [16_usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(fragments), &fragments, |b, &n| {
            let scheduler = Arc::new(ManualScheduler::new());
            let store = LiveDeltaStore::new(Arc::clone(&scheduler));
            b.iter(|| {
                store.start("bench", None);
                for _ in 0..n {
                    store.append_delta(black_box("tok "));
                }
                scheduler.tick();
                store.commit();
                black_box(store.get_snapshot());
            });
        });
    }
    group.finish();
}

fn decoder_benchmark(c: &mut Criterion) {
    let body: Vec<u8> = (0..512)
        .map(|i| format!("0:{{\"type\":\"text-delta\",\"text\":\"word{i} \"}}\n"))
        .collect::<String>()
        .into_bytes();

    c.bench_function("decode_512_frames_in_64b_chunks", |b| {
        b.iter(|| {
            let mut decoder = StreamDecoder::new();
            let mut count = 0;
            for chunk in body.chunks(64) {
                count += decoder.push(black_box(chunk)).len();
            }
            black_box(count)
        });
    });
}

criterion_group!(benches, coalescing_benchmark, decoder_benchmark);
criterion_main!(benches);
