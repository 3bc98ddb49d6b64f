use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dhgen_core::csidh::Csidh512;
use dhgen_core::document::{decode_hex, encode_hex};
use dhgen_core::primitive::{IsogenyDh, PRIVATE_KEY_SIZE};
use dhgen_core::test_utils::{deterministic_array, test_rng};
use dhgen_core::{KeyPairDocument, KeyPairWriter};
use std::time::Duration;

fn bench_csidh(c: &mut Criterion) {
    let mut group = c.benchmark_group("csidh512");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(30));

    let csidh = Csidh512::new();
    let mut rng = test_rng();

    group.bench_function("sample_private_key", |b| {
        b.iter(|| black_box(csidh.sample_private_key(&mut rng).unwrap()))
    });

    let sk = csidh.sample_private_key(&mut rng).unwrap();
    group.bench_function("derive_public_key", |b| {
        b.iter(|| black_box(csidh.derive_public_key(&sk, &mut rng).unwrap()))
    });

    let pk = csidh.derive_public_key(&sk, &mut rng).unwrap();
    group.bench_function("validate_public_key", |b| {
        b.iter(|| black_box(csidh.validate_public_key(&pk, &mut rng)))
    });

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");

    let secret: [u8; PRIVATE_KEY_SIZE] = deterministic_array(1);
    let public: [u8; 64] = deterministic_array(2);

    group.bench_function("encode_hex", |b| {
        b.iter(|| black_box(encode_hex(black_box(&public))))
    });

    let encoded = encode_hex(&public);
    group.bench_function("decode_hex", |b| {
        b.iter(|| black_box(decode_hex::<64>("dhPublic", black_box(&encoded)).unwrap()))
    });

    let doc = KeyPairDocument::from_bytes(&secret, &public);
    let writer = KeyPairWriter::new("unused.json");
    group.bench_function("render", |b| {
        b.iter(|| black_box(writer.render(&doc).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_csidh, bench_encoding);
criterion_main!(benches);
