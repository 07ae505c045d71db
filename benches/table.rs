use compressed_sheets::{ReaderOptions, RowCodec, TableReader, TableWriter, WriterOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn sample_row(i: usize) -> Vec<String> {
    vec![
        i.to_string(),
        format!("user{}@example.com", i),
        "plain text without reserved characters".to_string(),
        "commas, backslashes \\ and\nnewlines".to_string(),
    ]
}

fn benchmark_encode_row(c: &mut Criterion) {
    let codec = RowCodec::default();
    let row = sample_row(42);

    c.bench_function("encode_row", |b| b.iter(|| codec.encode_row(black_box(&row))));
}

fn benchmark_decode_row(c: &mut Criterion) {
    let codec = RowCodec::default();
    let line = codec.encode_row(sample_row(42));

    c.bench_function("decode_row", |b| b.iter(|| codec.decode_row(black_box(&line))));
}

fn write_table(rows: usize) -> Vec<u8> {
    let fieldnames = ["id", "email", "plain", "escaped"];
    let mut writer =
        TableWriter::new(Vec::new(), fieldnames, WriterOptions::new().with_header(true)).unwrap();
    for i in 0..rows {
        writer.write_values(sample_row(i)).unwrap();
    }
    writer.finish().unwrap()
}

fn benchmark_write_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_table");

    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| write_table(black_box(size)))
        });
    }

    group.finish();
}

fn benchmark_read_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_table");

    for size in [100, 1_000, 10_000].iter() {
        let bytes = write_table(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| {
                TableReader::new(black_box(bytes.as_slice()), ReaderOptions::new())
                    .unwrap()
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_row,
    benchmark_decode_row,
    benchmark_write_table,
    benchmark_read_table
);
criterion_main!(benches);
