#![allow(unused)]
extern crate udlg;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::{fs, hint::black_box, path::PathBuf};
use udlg::{parse_patch_block, Document, Udlg};

fn sample(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/samples")
        .join(name);
    fs::read(&path).expect("Failed to read sample")
}

/// Decode and encode a complete dialog file, envelope included.
fn bench_dialog_file(c: &mut Criterion) {
    let data = sample("dialog.udlg");

    let mut group = c.benchmark_group("udlg");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse", |b| {
        b.iter(|| {
            let parsed = Udlg::parse(black_box(&data)).unwrap();
            black_box(parsed)
        });
    });

    let dialog = Udlg::parse(&data).unwrap();
    group.bench_function("to_bytes", |b| {
        b.iter(|| black_box(dialog.to_bytes().unwrap()));
    });
    group.finish();
}

/// Bare stream with a long primitive array, dominated by the primitive codec.
fn bench_primitive_array(c: &mut Criterion) {
    let data = sample("uint32_array.dat");

    let mut group = c.benchmark_group("document");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse_uint32_array", |b| {
        b.iter(|| black_box(Document::parse(black_box(&data)).unwrap()));
    });
    group.finish();
}

/// Parse a patch block and apply it to a fresh copy of the document.
fn bench_patch(c: &mut Criterion) {
    let document = Document::parse(&sample("dialog.dat")).unwrap();
    let block = sample("dialog.txt");

    c.bench_function("patch_apply", |b| {
        b.iter(|| {
            let patches = parse_patch_block(black_box(&block)).unwrap();
            let mut copy = document.clone();
            copy.apply_patch(&patches).unwrap();
            black_box(copy)
        });
    });
}

criterion_group!(
    benches,
    bench_dialog_file,
    bench_primitive_array,
    bench_patch
);
criterion_main!(benches);
