use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chronicle::{
    build_location_report, Entity, EntityType, LocationOccurrence, LocationReportOptions, NameIndex, NameResolver,
    Provenance, ResolutionCache, ResolverConfig,
};

const SYLLABLES: &[&str] = &["ka", "ro", "wis", "mar", "ta", "ni", "gor", "el", "du", "brz"];

/// Deterministic pseudo-names: `n` maps to a fixed syllable sequence.
fn name(mut n: usize) -> String {
    let mut out = String::new();
    for _ in 0..3 {
        out.push_str(SYLLABLES[n % SYLLABLES.len()]);
        n /= SYLLABLES.len();
    }
    let mut chars = out.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn entities(count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let entity_type = EntityType::ALL[i % EntityType::ALL.len()];
            Entity::new(name(i), entity_type)
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");
    for size in [100usize, 1000] {
        let set = entities(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &set, |b, set| {
            b.iter(|| NameIndex::from_entities(set.clone()).unwrap());
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let index = NameIndex::from_entities(entities(1000)).unwrap();
    let resolver = NameResolver::new(&index, &ResolverConfig::default());
    let queries: Vec<String> = (0..200).map(|i| format!("{}x", name(i * 3))).collect();

    c.bench_function("resolve_fuzzy_uncached", |b| {
        b.iter(|| {
            let mut cache = ResolutionCache::new();
            for q in &queries {
                let _ = resolver.resolve(q, None, &mut cache);
            }
        });
    });
}

fn bench_location_report(c: &mut Criterion) {
    let provenance = Provenance {
        file_path: PathBuf::from("sesje.md"),
        session_date: None,
        header: "## Sesja".to_string(),
    };
    let occurrences: Vec<LocationOccurrence> = (0..500)
        .map(|i| LocationOccurrence::new(format!("{} -> {}/{}", name(i % 50), name(i % 7), name(i % 40)), provenance.clone()))
        .collect();
    let options = LocationReportOptions::default();

    c.bench_function("location_report_500", |b| {
        b.iter(|| build_location_report(&occurrences, &options));
    });
}

criterion_group!(benches, bench_index_build, bench_resolve, bench_location_report);
criterion_main!(benches);
