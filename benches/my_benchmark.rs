use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use dfquery::{Column, Options, Scope, Table, TableQuery, Value};
use std::hint::black_box;
use std::sync::Arc;

fn users(n: usize) -> Table {
    Table::from_columns(vec![
        Column::from_values("id", (0..n).map(|i| i as i64)),
        Column::from_values(
            "name",
            (0..n).map(|i| Value::Text(Arc::from(format!("user{i}").as_str()))),
        ),
        Column::from_values("age", (0..n).map(|i| (i % 100) as i64)),
        Column::from_values("active", (0..n).map(|i| i % 2 == 0)),
    ])
    .unwrap()
}

fn bench_read_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Read_Where_Performance");
    let dir = tempfile::TempDir::new().unwrap();

    for n in [1000, 10000].iter() {
        let mut scope = Scope::new();
        let table = scope.bind("users", users(*n));
        let client = TableQuery::with_options(&scope, Options::new().store_dir(dir.path()));

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let res = client
                    .read(&table, "SELECT * FROM users WHERE age = 42", &[])
                    .unwrap();
                black_box(res);
            });
        });
        client.close().unwrap();
    }
    group.finish();
}

fn bench_update_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update_Performance");
    let dir = tempfile::TempDir::new().unwrap();

    for n in [1000, 10000].iter() {
        let mut scope = Scope::new();
        let table = scope.bind("users", users(*n));
        let client = TableQuery::with_options(&scope, Options::new().store_dir(dir.path()));

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let res = client
                    .update(&table, "UPDATE users SET age = 99 WHERE active = 1", &[])
                    .unwrap();
                black_box(res);
            });
        });
        client.close().unwrap();
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_update_with_subquery", |b| {
        b.iter(|| {
            dfquery::classify(
                black_box("update DT set AGE = 60 where ID = (select ID from IT)"),
                dfquery::StatementKind::Update,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_read_scaling,
    bench_update_performance,
    bench_classify
);
criterion_main!(benches);
