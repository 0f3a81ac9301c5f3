//! benches/kdf.rs
//! PBKDF2-HMAC-SHA1 cost at every selectable iteration preset
use gcmcrypt_rs::aliases::{Aes256Key32, PasswordString};
use gcmcrypt_rs::consts::ITERATION_PRESETS;
use gcmcrypt_rs::derive_pbkdf2_key;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

fn kdf_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("KDF");
    // Faster runs for slow high-iter benches
    group.measurement_time(Duration::from_secs(8));
    group.sample_size(10);

    let pw = PasswordString::new("benchmark-password".to_string());
    let salt = [0x42u8; 32];

    for iters in ITERATION_PRESETS {
        let id = BenchmarkId::new("pbkdf2_sha1", iters);
        group.bench_with_input(id, &iters, |b, &iters| {
            b.iter(|| {
                let mut key = Aes256Key32::new([0u8; 32]);
                derive_pbkdf2_key(black_box(&pw), black_box(&salt), iters, &mut key).unwrap();
                black_box(key);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, kdf_benches);
criterion_main!(benches);
