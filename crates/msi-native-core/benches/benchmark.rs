//! Performance benchmarks for msi-native
//!
//! Run with: cargo bench --package msi-native-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use msi_native_core::{checked::Checked, raw};

const SIZES: [i32; 4] = [1024, 4096, 65536, 1048576];

fn bench_alloc_free(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_free");

    for size in SIZES.iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let h = raw::alloc(black_box(size));
                unsafe { raw::free(h) };
            });
        });
    }
    group.finish();
}

fn bench_write_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_read");

    for size in SIZES.iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let h = raw::alloc(size);
            let data = vec![42u8; size as usize];

            b.iter(|| unsafe {
                raw::write(h, 0, &data);
                let out = raw::read(h, 0, size);
                black_box(out);
            });

            unsafe { raw::free(h) };
        });
    }
    group.finish();
}

fn bench_checked_write_read(c: &mut Criterion) {
    let checked = Checked::new();
    let mut group = c.benchmark_group("checked_write_read");

    for size in SIZES.iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let h = checked.alloc(size).unwrap();
            let data = vec![42u8; size as usize];

            b.iter(|| {
                checked.write(h, 0, &data).unwrap();
                let out = checked.read(h, 0, size).unwrap();
                black_box(out);
            });

            checked.free(h).unwrap();
        });
    }
    group.finish();
}

fn bench_copy_fill(c: &mut Criterion) {
    let size = 1048576;
    let src = raw::alloc(size);
    let dst = raw::alloc(size);

    let mut group = c.benchmark_group("bulk");
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("copy", |b| {
        b.iter(|| unsafe { raw::copy(src, 0, dst, 0, black_box(size)) });
    });

    group.bench_function("fill", |b| {
        b.iter(|| unsafe { raw::fill(dst, 0, black_box(size), 0x5A) });
    });

    group.finish();
    unsafe {
        raw::free(src);
        raw::free(dst);
    }
}

fn bench_floats(c: &mut Criterion) {
    let count = 262144;
    let h = raw::alloc(count * 4);
    let data: Vec<f32> = (0..count).map(|i| i as f32).collect();

    let mut group = c.benchmark_group("floats");
    group.throughput(Throughput::Bytes(count as u64 * 4));

    group.bench_function("write_floats", |b| {
        b.iter(|| unsafe { raw::write_floats(h, 0, black_box(&data)) });
    });

    group.bench_function("read_floats", |b| {
        b.iter(|| {
            let out = unsafe { raw::read_floats(h, 0, count) };
            black_box(out);
        });
    });

    group.finish();
    unsafe { raw::free(h) };
}

criterion_group!(
    benches,
    bench_alloc_free,
    bench_write_read,
    bench_checked_write_read,
    bench_copy_fill,
    bench_floats
);
criterion_main!(benches);
