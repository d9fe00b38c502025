//! Backend Comparison Benchmark
//!
//! Same 8-buffer EEA3 batch through the portable lanes and the AVX2 kernel.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;
use zuc_mb::{Backend, Capabilities, CipherJob, Engine};

const KEY: [u8; 16] = [0x42; 16];
const IV: [u8; 16] = [0x24; 16];

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("ZUC-MB Backends");
    let caps = Capabilities::detect();

    let mut engines = vec![("Portable", Engine::with_backend(Backend::Portable, caps).unwrap())];
    if let Ok(engine) = Engine::with_backend(Backend::Avx2, caps) {
        engines.push(("AVX2", engine));
    }

    // Short packets are dominated by the 33-round initialization
    for size in [16, 1500, 8188] {
        let mut buffers = vec![vec![0u8; size]; 8];
        group.throughput(Throughput::Bytes((8 * size) as u64));

        for (name, engine) in &engines {
            group.bench_function(format!("{name} - 8x{size} bytes"), |b| {
                b.iter(|| {
                    let mut jobs: Vec<_> =
                        buffers.iter_mut().map(|buf| CipherJob::in_place(&KEY, &IV, buf)).collect();
                    engine.eea3_n(black_box(&mut jobs)).unwrap();
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_backends);
criterion_main!(benches);
