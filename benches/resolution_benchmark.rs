//! Resolution hot paths: catalog parsing, candidate generation and a full
//! probe over an in-memory existence check.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tokio::runtime::Runtime;

use artframe::domain::{AssetCandidate, Environment, ProbeMode};
use artframe::infrastructure::{AssetExistence, AssetProbe, CatalogParser, IdentifierResolver, ProbeOptions, TextParser};

struct InMemoryAssets(HashSet<String>);

#[async_trait]
impl AssetExistence for InMemoryAssets {
    async fn exists(&self, candidate: &AssetCandidate) -> bool {
        self.0.contains(candidate.path())
    }
}

fn catalog_text(rows: usize) -> String {
    let mut text = String::from("Tilda UID,SKU,Название,Описание\n");
    for row in 0..rows {
        text.push_str(&format!("{},P-{:04},Картина {row},\"Описание {row}\"\n", 780_000_000_000u64 + row as u64, row));
    }
    text
}

fn parsing(c: &mut Criterion) {
    let parser = CatalogParser::new();
    let mut group = c.benchmark_group("catalog_parse");
    for rows in [100, 1_000, 10_000] {
        let text = catalog_text(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &text, |b, text| {
            b.iter(|| parser.parse(black_box(text)));
        });
    }
    group.finish();
}

fn identifiers(c: &mut Criterion) {
    let resolver = IdentifierResolver::new();
    let env = Environment::parse(
        "https://widget.example/frame",
        Some("https://shop.example/catalog?item=782957961992&ref=mail"),
    )
    .unwrap_or_else(|e| panic!("bench url: {e}"));

    c.bench_function("identifier_from_referrer_digits", |b| {
        b.iter(|| resolver.resolve(black_box(&env)));
    });
}

fn probing(c: &mut Criterion) {
    let rt = Runtime::new().unwrap_or_else(|e| panic!("runtime: {e}"));
    let options = ProbeOptions::thumbnail();
    let last = options.candidates("45").pop().map(|c| c.path().to_string());
    let probe = AssetProbe::new(Arc::new(InMemoryAssets(last.into_iter().collect())));

    c.bench_function("candidates_thumbnail", |b| {
        b.iter(|| options.candidates(black_box("45")));
    });

    let mut group = c.benchmark_group("probe_worst_case");
    for mode in [ProbeMode::Sequential, ProbeMode::Parallel] {
        let options = options.clone().with_mode(mode);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{mode:?}")), &options, |b, options| {
            b.iter(|| rt.block_on(probe.probe("45", options)));
        });
    }
    group.finish();
}

criterion_group!(benches, parsing, identifiers, probing);
criterion_main!(benches);
