//! Keystream throughput over table-sized buffers.
//!
//! Run with:
//! ```bash
//! cargo bench -p pakfile-crypto --bench keystream
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pakfile_crypto::{KeystreamCipher, KeystreamParams};
use std::hint::black_box;

const PARAMS: KeystreamParams = KeystreamParams::new(0x1234_5678, 0x9ABC_DEF0, 0x1111_1111);

fn bench_decrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystream_decrypt");

    // 500 records of 32 bytes is the largest table the reader accepts
    for size in [32usize, 1024, 16_000] {
        let data = vec![0xA5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| {
                let mut buf = data.clone();
                KeystreamCipher::new(PARAMS).decrypt(&mut buf);
                black_box(buf)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decrypt);
criterion_main!(benches);
