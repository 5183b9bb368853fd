//! Throughput benchmarks for the ring log hot path.

use criterion::{Criterion, criterion_group, criterion_main};
use opentablet_device_types::OverflowPolicy;
use opentablet_ringlog::RingLogBuffer;
use std::hint::black_box;

fn bench_append(c: &mut Criterion) {
    let record = b"button 7 pressed\n";
    c.bench_function("append_17b_reset_policy", |b| {
        let mut log = RingLogBuffer::with_capacity(1024, OverflowPolicy::ResetAll);
        b.iter(|| {
            log.append(black_box(record));
        });
    });
}

fn bench_append_drain_cycle(c: &mut Criterion) {
    let record = b"X=120, Y=44, Pressure=30\n";
    c.bench_function("append_drain_cycle", |b| {
        let mut log = RingLogBuffer::with_capacity(4096, OverflowPolicy::ResetAll);
        b.iter(|| {
            log.append(black_box(record));
            black_box(log.drain(64));
        });
    });
}

criterion_group!(benches, bench_append, bench_append_drain_cycle);
criterion_main!(benches);
