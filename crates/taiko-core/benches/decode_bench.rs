//! Criterion benchmarks for the per-frame hot path.
//!
//! The touch panel streams frames continuously, so decoding a payload and
//! applying it to the key-state machine runs once per frame on the reader
//! thread and must stay well under the panel's frame interval.
//!
//! Run with:
//! ```bash
//! cargo bench --package taiko-core --bench decode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taiko_core::{decode_button_payload, decode_touch_payload, KeyStateMachine, SourceUpdate};

// ── Representative payloads ───────────────────────────────────────────────────

const TOUCH_PAYLOADS: &[(&str, &[u8; 7])] = &[
    ("idle", b"@@@@@@@"),
    ("single_zone", b"A@@@@@@"),
    ("both_sides", b"Q@@@@@@"),
    ("all_zones", b"_______"),
];

const BUTTON_PAYLOADS: &[(&str, &[u8])] = &[
    ("idle", b"000000000000"),
    ("right_ka", b"100000000000"),
    ("both_ka", b"100010000000"),
];

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_decode_touch(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_touch_payload");
    for (name, payload) in TOUCH_PAYLOADS {
        group.bench_with_input(BenchmarkId::from_parameter(name), payload, |b, p| {
            b.iter(|| decode_touch_payload(black_box(p)))
        });
    }
    group.finish();
}

fn bench_decode_button(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_button_payload");
    for (name, payload) in BUTTON_PAYLOADS {
        group.bench_with_input(BenchmarkId::from_parameter(name), payload, |b, p| {
            b.iter(|| decode_button_payload(black_box(p)))
        });
    }
    group.finish();
}

fn bench_touch_frame_to_changes(c: &mut Criterion) {
    let machine = KeyStateMachine::new();
    let pressed = decode_touch_payload(b"Q@@@@@@");
    let idle = decode_touch_payload(b"@@@@@@@");

    // Alternates press/release so every iteration produces edges.
    c.bench_function("apply_touch_press_release", |b| {
        b.iter(|| {
            let down = machine.apply(SourceUpdate::Touch(black_box(&pressed)));
            let up = machine.apply(SourceUpdate::Touch(black_box(&idle)));
            (down, up)
        })
    });
}

criterion_group!(
    benches,
    bench_decode_touch,
    bench_decode_button,
    bench_touch_frame_to_changes
);
criterion_main!(benches);
