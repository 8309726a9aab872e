use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_profile::profile::ProfileAccumulator;

fn generate_rows(count: usize) -> Vec<Vec<(String, String)>> {
    (0..count)
        .map(|i| {
            vec![
                ("id".to_string(), i.to_string()),
                ("amount".to_string(), format!("{}.{:02}", i % 500, i % 100)),
                ("active".to_string(), (i % 2 == 0).to_string()),
                ("label".to_string(), format!("label-{}", i % 37)),
            ]
        })
        .collect()
}

fn ingest(rows: &[Vec<(String, String)>]) -> ProfileAccumulator {
    let mut profile = ProfileAccumulator::default();
    for row in rows {
        profile
            .ingest_row(row.iter().map(|(f, v)| (f.as_str(), v.as_str())))
            .expect("ingest row");
    }
    profile
}

fn bench_ingest(c: &mut Criterion) {
    let rows = generate_rows(10_000);
    c.bench_function("ingest_10k_rows", |b| {
        b.iter(|| ingest(&rows));
    });
}

fn bench_merge(c: &mut Criterion) {
    let rows = generate_rows(10_000);
    let (left_rows, right_rows) = rows.split_at(rows.len() / 2);
    let left = ingest(left_rows);
    let right = ingest(right_rows);
    c.bench_function("merge_two_5k_shards", |b| {
        b.iter_batched(
            || (left.clone(), right.clone()),
            |(mut a, b)| {
                a.merge(b).expect("merge shards");
                a
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_ingest, bench_merge);
criterion_main!(benches);
