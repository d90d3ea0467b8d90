//! benches/kdf.rs
//! PBKDF2 cost at the round counts records commonly carry
use adaptcrypt_rs::aliases::PasswordString;
use adaptcrypt_rs::consts::{CBC_KEY_MATERIAL_BITS, GCM_KEY_MATERIAL_BITS, SALT_SIZE};
use adaptcrypt_rs::derive_key;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

fn kdf_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("KDF");
    // Faster runs for slow high-round benches
    group.measurement_time(Duration::from_secs(8));
    group.sample_size(20);

    let pw = PasswordString::new("benchmark-password".to_string());
    let salt = [0x42u8; SALT_SIZE];

    for &rounds in &[1_000, 10_000, 100_000, 250_000] {
        let id = BenchmarkId::new("pbkdf2_gcm_material", rounds);
        group.bench_with_input(id, &rounds, |b, &rounds| {
            b.iter(|| {
                let key = derive_key(
                    black_box(&pw),
                    black_box(&salt),
                    rounds,
                    GCM_KEY_MATERIAL_BITS,
                )
                .unwrap();
                black_box(key);
            });
        });
    }

    // CBC needs twice the output, i.e. two PBKDF2 blocks
    group.bench_function("pbkdf2_cbc_material_10000", |b| {
        b.iter(|| {
            let key = derive_key(
                black_box(&pw),
                black_box(&salt),
                10_000,
                CBC_KEY_MATERIAL_BITS,
            )
            .unwrap();
            black_box(key);
        });
    });

    group.finish();
}

criterion_group!(benches, kdf_benches);
criterion_main!(benches);
