use criterion::{criterion_group, criterion_main, Criterion};
use rankdex_core::ranking::SearchIndex;
use rankdex_core::tokenizer::{tokenize, Tokenizer};
use rankdex_core::Document;

const TEXT: &str = "After the medication, headache and nausea were reported by the patient. \
    The patient reported nausea and dizziness caused by the medication. \
    Headache and dizziness are common effects of this medication.";

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_paragraph", |b| b.iter(|| tokenize(TEXT)));
}

fn bench_build(c: &mut Criterion) {
    let docs: Vec<Document> = (0..200)
        .map(|i| Document { id: i, content: format!("{TEXT} document number {i}") })
        .collect();
    c.bench_function("build_200_docs", |b| {
        b.iter(|| SearchIndex::build(&docs, Tokenizer::default(), 1).unwrap())
    });
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
