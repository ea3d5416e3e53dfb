use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rainbow_lookup::{
    Algorithm, AllowList, BatchQuery, DEFAULT_MAX_HASHES, Entry, TableName, validate,
};

const WORDS: &[&str] = &[
    "123456",
    "password",
    "qwerty123",
    "iloveyou",
    "01KFC4WS41FAJ3ACEJXTF8HV44",
    "correct horse battery staple",
];

fn bench_digests(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    for alg in Algorithm::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(alg), &alg, |b, alg| {
            b.iter(|| {
                for word in WORDS {
                    black_box(alg.digest_hex(black_box(word)));
                }
            })
        });
    }
    group.finish();
}

fn bench_entry(c: &mut Criterion) {
    c.bench_function("entry_compute_all_to_json", |b| {
        b.iter(|| {
            for word in WORDS {
                let entry = Entry::compute(*word, &Algorithm::ALL);
                black_box(entry.to_json_line().unwrap());
            }
        })
    });
}

fn bench_build_query(c: &mut Criterion) {
    let table = TableName::new("rainbow").unwrap();
    let allowed = AllowList::default();
    let mut group = c.benchmark_group("build_query");
    for n in [1usize, 100, 10_000] {
        let hashes: Vec<String> = (0..n).map(|i| Algorithm::Md5.digest_hex(&i.to_string())).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &hashes, |b, hashes| {
            b.iter(|| {
                let query = validate("md5", hashes, &allowed, DEFAULT_MAX_HASHES).unwrap();
                black_box(BatchQuery::build(&table, &query));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_digests, bench_entry, bench_build_query);
criterion_main!(benches);
