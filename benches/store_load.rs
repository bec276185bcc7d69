use std::fs::File;
use std::hint::black_box;
use std::io::{BufWriter, Write};

use brag::models::Application;
use brag::storage::ApplicationStore;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tempfile::TempDir;

/// Generate a synthetic applications.jsonl with N records
fn generate_workspace(num_records: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let file = File::create(dir.path().join("applications.jsonl")).unwrap();
    let mut writer = BufWriter::new(file);

    for i in 0..num_records {
        let line = format!(
            r#"{{"id":"app-{:08x}","company":"Company {}","role":"Engineer {}","status":"applied","date_applied":"2025-01-{:02}","notes":"Follow up in a week","created_at":"2025-01-15T10:00:00Z","updated_at":"2025-01-15T10:00:00Z"}}"#,
            i,
            i,
            i,
            (i % 28) + 1
        );
        writeln!(writer, "{}", line).unwrap();
    }

    writer.flush().unwrap();
    dir
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("application_store_load");

    for size in [100, 1_000, 10_000].iter() {
        let dir = generate_workspace(*size);
        let store = ApplicationStore::in_dir(dir.path());

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(store.load().unwrap()));
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("application_store_update");

    for size in [100, 1_000].iter() {
        let dir = generate_workspace(*size);
        let store = ApplicationStore::in_dir(dir.path());
        let target = format!("app-{:08x}", size / 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                store
                    .update(black_box(&target), |app: &mut Application| {
                        app.notes = Some("Second round scheduled".to_string())
                    })
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_update);
criterion_main!(benches);
