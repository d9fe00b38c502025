//! ZUC-MB Criterion Benchmark
//!
//! Batched vs one-at-a-time throughput for EEA3, EIA3 and the ZUC-256 MAC.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use std::hint::black_box;
use zuc_mb::{Auth256Job, AuthJob, CipherJob, MacTag, TagSize};

const KEY: [u8; 16] = [0x17; 16];
const IV: [u8; 16] = [0x3d; 16];
const KEY256: [u8; 32] = [0x17; 32];
const IV256: [u8; 25] = [0x3d; 25];

/// Packet sizes typical of a radio bearer: tiny control, voice, MTU, max.
const SIZES: [(usize, &str); 4] = [(40, "40B"), (256, "256B"), (1500, "1500B"), (8188, "8188B")];

fn random_buffers(count: usize, size: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|_| {
            let mut buf = vec![0u8; size];
            rand::rng().fill(&mut buf[..]);
            buf
        })
        .collect()
}

// =============================================================================
// BENCHMARK 1: EEA3
// =============================================================================

/// Eight buffers: one N-buffer call vs eight single-buffer calls.
fn bench_eea3(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-EEA3");

    for (size, name) in SIZES {
        let mut buffers = random_buffers(8, size);
        group.throughput(Throughput::Bytes((8 * size) as u64));

        group.bench_function(BenchmarkId::new("8-buffer", name), |b| {
            b.iter(|| {
                let mut jobs: Vec<_> =
                    buffers.iter_mut().map(|buf| CipherJob::in_place(&KEY, &IV, buf)).collect();
                zuc_mb::eea3_n(black_box(&mut jobs)).unwrap();
            });
        });

        group.bench_function(BenchmarkId::new("8x single", name), |b| {
            b.iter(|| {
                for buf in &mut buffers {
                    zuc_mb::eea3_in_place(&KEY, &IV, black_box(buf)).unwrap();
                }
            });
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: MANY BUFFERS
// =============================================================================

/// Dispatcher scaling: full groups, a 4-lane group and single leftovers.
fn bench_eea3_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-EEA3-N");
    let size = 1500;

    for count in [1, 4, 8, 13, 64, 256] {
        let mut buffers = random_buffers(count, size);
        group.throughput(Throughput::Bytes((count * size) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut jobs: Vec<_> =
                    buffers.iter_mut().map(|buf| CipherJob::in_place(&KEY, &IV, buf)).collect();
                zuc_mb::eea3_n(black_box(&mut jobs)).unwrap();
            });
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 3: MAC
// =============================================================================

/// EIA3 and ZUC-256 MAC over eight equal-length messages.
fn bench_mac(c: &mut Criterion) {
    let mut group = c.benchmark_group("3-MAC");

    for (size, name) in SIZES {
        let messages = random_buffers(8, size);
        let bits = (size * 8) as u32;
        group.throughput(Throughput::Bytes((8 * size) as u64));

        group.bench_function(BenchmarkId::new("EIA3 8-buffer", name), |b| {
            let jobs: Vec<_> = messages.iter().map(|m| AuthJob::new(&KEY, &IV, m, bits)).collect();
            let mut tags = [0u32; 8];
            b.iter(|| zuc_mb::eia3_n(black_box(&jobs), &mut tags).unwrap());
        });

        for tag_size in [TagSize::B4, TagSize::B16] {
            let label = format!("ZUC-256 MAC{} 8-buffer", tag_size.bits());
            group.bench_function(BenchmarkId::new(label, name), |b| {
                let jobs: Vec<_> =
                    messages.iter().map(|m| Auth256Job::new(&KEY256, &IV256, m, bits)).collect();
                let mut tags = [MacTag::empty(); 8];
                b.iter(|| zuc_mb::eia3_256_n(black_box(&jobs), tag_size, &mut tags).unwrap());
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_eea3, bench_eea3_n, bench_mac);
criterion_main!(benches);
