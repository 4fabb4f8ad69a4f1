//! Benchmarks for container walks and summary rendering.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use binscope_core::ArchiveExplorer;
use binscope_core::ExploreInput;
use binscope_core::ExplorerConfig;
use binscope_core::test_utils::TarTestBuilder;
use binscope_core::test_utils::ZipTestBuilder;
use binscope_core::test_utils::gzip;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use std::hint::black_box;
use std::path::Path;

fn many_files_tar(count: usize) -> Vec<u8> {
    (0..count)
        .fold(TarTestBuilder::new(), |builder, i| {
            builder.add_file(&format!("dir{}/file_{i:05}.txt", i % 16), b"payload")
        })
        .build()
}

fn many_files_zip(count: usize) -> Vec<u8> {
    (0..count)
        .fold(ZipTestBuilder::new(), |builder, i| {
            builder.file(&format!("dir{}/file_{i:05}.rs", i % 16), b"fn main() {}")
        })
        .build()
}

fn benchmark_tar_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("tar_walk");
    let explorer = ArchiveExplorer::default();

    for count in [100, 1000, 5000] {
        let tar = many_files_tar(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("entries", count), &tar, |b, data| {
            b.iter(|| {
                let input = ExploreInput::new(Path::new("bench.tar"), data);
                black_box(explorer.summarize(&input));
            });
        });
    }

    group.finish();
}

fn benchmark_nested_gzip(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_gzip");
    let explorer = ArchiveExplorer::default();
    let compressed = gzip(&many_files_tar(1000));

    group.throughput(Throughput::Bytes(compressed.len() as u64));
    group.bench_function("standalone_gz", |b| {
        b.iter(|| {
            let input = ExploreInput::new(Path::new("bench.gz"), &compressed);
            black_box(explorer.summarize(&input));
        });
    });

    group.finish();
}

fn benchmark_zip_central_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("zip_central_directory");

    for (label, config) in [
        ("parity", ExplorerConfig::default()),
        ("enhancement", ExplorerConfig::enhancement()),
    ] {
        let explorer = ArchiveExplorer::new(config);
        let zip = many_files_zip(2000);
        group.bench_with_input(BenchmarkId::new("profile", label), &zip, |b, data| {
            b.iter(|| {
                let input = ExploreInput::new(Path::new("bench.zip"), data);
                black_box(explorer.summarize(&input));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tar_walk,
    benchmark_nested_gzip,
    benchmark_zip_central_directory
);
criterion_main!(benches);
