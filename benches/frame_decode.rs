// Copyright 2026 The OmniCare Project
// SPDX-License-Identifier: Apache-2.0

//! Frame decoding micro-benchmarks.
//!
//! The decoder runs once per upstream line on the streaming hot path,
//! so its cost bounds per-token relay latency.
//!
//! Run: cargo bench --bench frame_decode

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use omnicare_relay::stream::decode_frame;

fn bench_decode_frame(c: &mut Criterion) {
    let token_frame = r#"data: {"token":"The patient should schedule a follow-up"}"#;
    let status_frame = r#"data: {"status": "completed"}"#;
    let malformed_frame = "data: {not valid json}";
    let separator = "";

    c.bench_function("decode_token_frame", |b| {
        b.iter(|| decode_frame(black_box(token_frame)))
    });

    c.bench_function("decode_status_frame", |b| {
        b.iter(|| decode_frame(black_box(status_frame)))
    });

    c.bench_function("decode_malformed_frame", |b| {
        b.iter(|| decode_frame(black_box(malformed_frame)))
    });

    c.bench_function("decode_separator_line", |b| {
        b.iter(|| decode_frame(black_box(separator)))
    });
}

criterion_group!(benches, bench_decode_frame);
criterion_main!(benches);
