//! Int buffer benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mmarray_storage::{HeapIntBuffer, IntBuffer, MappedIntBuffer};
use tempfile::TempDir;

const CAPACITY: usize = 1 << 16;

fn values(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

/// Benchmark writes into heap and mapped buffers.
fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_write");

    for len in [16, 256, 4096].iter() {
        group.throughput(Throughput::Bytes((*len * 4) as u64));
        let data = values(*len);

        group.bench_with_input(BenchmarkId::new("heap", len), &data, |b, data| {
            let mut buffer = HeapIntBuffer::new(CAPACITY).unwrap();
            let mut offset = 0;
            b.iter(|| {
                if offset + data.len() > CAPACITY {
                    offset = 0;
                }
                buffer.write(black_box(offset), black_box(data)).unwrap();
                offset += data.len();
            });
        });

        group.bench_with_input(BenchmarkId::new("mapped", len), &data, |b, data| {
            let temp_dir = TempDir::new().unwrap();
            let mut buffer =
                MappedIntBuffer::create(&temp_dir.path().join("bench.buf"), CAPACITY).unwrap();
            let mut offset = 0;
            b.iter(|| {
                if offset + data.len() > CAPACITY {
                    offset = 0;
                }
                buffer.write(black_box(offset), black_box(data)).unwrap();
                offset += data.len();
            });
        });
    }

    group.finish();
}

/// Benchmark reads out of heap and mapped buffers.
fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_read");

    for len in [16, 256, 4096].iter() {
        group.throughput(Throughput::Bytes((*len * 4) as u64));
        let data = values(*len);

        let mut heap = HeapIntBuffer::new(CAPACITY).unwrap();
        heap.write(0, &data).unwrap();

        let temp_dir = TempDir::new().unwrap();
        let mut mapped =
            MappedIntBuffer::create(&temp_dir.path().join("bench.buf"), CAPACITY).unwrap();
        mapped.write(0, &data).unwrap();
        mapped.freeze().unwrap();

        let mut out = vec![0; *len];
        group.bench_with_input(BenchmarkId::new("heap", len), len, |b, _| {
            b.iter(|| {
                heap.read_into(black_box(0), &mut out).unwrap();
                black_box(&out);
            });
        });

        group.bench_with_input(BenchmarkId::new("mapped_frozen", len), len, |b, _| {
            b.iter(|| {
                mapped.read_into(black_box(0), &mut out).unwrap();
                black_box(&out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
