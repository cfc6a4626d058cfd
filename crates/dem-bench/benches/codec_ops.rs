//! Criterion micro-benchmarks for demo decoding, encoding and verification.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dem_bench::{reference_capture, reference_game_data, stress_capture};
use dem_codec::{decode, encode, verify_roundtrip, CodecOptions, DemoReader};

/// Benchmark: Encode the 1,000-frame reference capture.
fn bench_encode_reference(c: &mut Criterion) {
    let data = reference_game_data();
    let file = reference_capture(42);

    c.bench_function("encode_reference", |b| {
        b.iter(|| {
            let bytes = encode(&file, &data).unwrap();
            black_box(&bytes);
        });
    });
}

/// Benchmark: Decode the same capture as a whole file.
fn bench_decode_reference(c: &mut Criterion) {
    let data = reference_game_data();
    let bytes = encode(&reference_capture(42), &data).unwrap();

    c.bench_function("decode_reference", |b| {
        b.iter(|| {
            let file = decode(&bytes, &data);
            black_box(&file);
        });
    });
}

/// Benchmark: Decode the 20,000-frame stress capture.
fn bench_decode_stress(c: &mut Criterion) {
    let data = reference_game_data();
    let bytes = encode(&stress_capture(42), &data).unwrap();

    let mut group = c.benchmark_group("stress");
    group.sample_size(10);
    group.bench_function("decode_stress", |b| {
        b.iter(|| {
            let file = decode(&bytes, &data);
            black_box(&file);
        });
    });
    group.finish();
}

/// Benchmark: Stream events one at a time without collecting them.
fn bench_stream_reference(c: &mut Criterion) {
    let data = reference_game_data();
    let bytes = encode(&reference_capture(42), &data).unwrap();

    c.bench_function("stream_reference", |b| {
        b.iter(|| {
            let mut reader = DemoReader::new(bytes.as_slice(), &data, CodecOptions::default());
            while let Some(event) = reader.next_event().unwrap() {
                black_box(&event);
            }
        });
    });
}

/// Benchmark: Decode, re-encode and compare.
fn bench_verify_reference(c: &mut Criterion) {
    let data = reference_game_data();
    let bytes = encode(&reference_capture(42), &data).unwrap();

    c.bench_function("verify_reference", |b| {
        b.iter(|| {
            let report = verify_roundtrip(&bytes, &data, CodecOptions::default()).unwrap();
            black_box(report);
        });
    });
}

criterion_group!(
    benches,
    bench_encode_reference,
    bench_decode_reference,
    bench_decode_stress,
    bench_stream_reference,
    bench_verify_reference
);
criterion_main!(benches);
