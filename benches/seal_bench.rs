use base64::{engine::general_purpose::STANDARD, Engine};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crypto_box::aead::OsRng;
use crypto_box::SecretKey;
use openv::core::cipher::{seal, PublicKeyMaterial};
use openv::core::manifest::Manifest;
use std::time::Duration;

/// Generate a payload of given size.
fn generate_payload(size: usize) -> String {
    "x".repeat(size)
}

fn public_key() -> PublicKeyMaterial {
    let secret = SecretKey::generate(&mut OsRng);
    PublicKeyMaterial::new(STANDARD.encode(secret.public_key().as_bytes()), "bench")
}

/// Benchmark sealing with varying payload sizes.
fn bench_seal(c: &mut Criterion) {
    let mut group = c.benchmark_group("seal");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let key = public_key();
    let sizes = [32, 256, 1024, 4096, 16384];

    for size in sizes {
        let payload = generate_payload(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(
            BenchmarkId::new("value", format!("{}B", size)),
            &payload,
            |b, payload| {
                b.iter(|| {
                    let sealed = seal(black_box(payload), black_box(&key)).unwrap();
                    black_box(sealed);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a full pass worth of sealing (many small values).
fn bench_seal_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("seal_batch");
    group.sample_size(20);

    let key = public_key();
    let counts = [10, 50, 100];

    for count in counts {
        let values: Vec<String> = (0..count).map(|i| format!("value-{:04}", i)).collect();
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("secrets", count), &values, |b, values| {
            b.iter(|| {
                for value in values {
                    black_box(seal(value, &key).unwrap());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark manifest encode and decode.
fn bench_manifest(c: &mut Criterion) {
    let mut group = c.benchmark_group("manifest");

    for count in [10, 100, 1000] {
        let manifest = Manifest::new((0..count).map(|i| format!("KEY_{:04}", i)));
        let encoded = manifest.encode();

        group.bench_with_input(BenchmarkId::new("encode", count), &manifest, |b, m| {
            b.iter(|| black_box(m.encode()));
        });
        group.bench_with_input(BenchmarkId::new("decode", count), &encoded, |b, raw| {
            b.iter(|| black_box(Manifest::decode(raw)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_seal, bench_seal_batch, bench_manifest);
criterion_main!(benches);
