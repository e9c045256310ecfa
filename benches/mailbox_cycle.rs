//! Benchmarks for the caption mailbox and the audio relay queues.

use criterion::{Criterion, criterion_group, criterion_main};
use overdub::memory::{SampleQueue, TextMailbox};
use std::hint::black_box;

fn bench_mailbox_cycle(c: &mut Criterion) {
    let mailbox = TextMailbox::new(1).unwrap();

    c.bench_function("mailbox write/read/consume cycle", |b| {
        b.iter(|| {
            mailbox.write(black_box("benchmark caption"));
            black_box(mailbox.read_overlay());
            black_box(mailbox.read_synth());
        })
    });
}

fn bench_queue_append_drain(c: &mut Criterion) {
    let queue = SampleQueue::new();
    let chunk = vec![0.5f32; 1024];

    c.bench_function("queue append 1024 + drain", |b| {
        b.iter(|| {
            queue.append(black_box(&chunk));
            black_box(queue.drain());
        })
    });
}

fn bench_queue_accumulate(c: &mut Criterion) {
    let chunk = vec![0.25f32; 160];

    c.bench_function("queue accumulate 10 frames then drain", |b| {
        b.iter(|| {
            let queue = SampleQueue::new();
            for _ in 0..10 {
                queue.append(black_box(&chunk));
            }
            black_box(queue.drain());
        })
    });
}

criterion_group!(
    benches,
    bench_mailbox_cycle,
    bench_queue_append_drain,
    bench_queue_accumulate
);
criterion_main!(benches);
