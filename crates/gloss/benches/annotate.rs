//! Benchmarks for scanning, editing and rendering.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gloss::Session;

/// Generate markup with the given number of paragraphs.
fn generate_markup(paragraphs: usize) -> String {
    let mut markup = String::with_capacity(paragraphs * 120);
    markup.push_str("<article>");
    for i in 0..paragraphs {
        markup.push_str(&format!(
            "<p>Paragraph {i} has <b>bold</b> and <i>italic <em>nested</em> words</i>.</p>"
        ));
    }
    markup.push_str("</article>");
    markup
}

fn bench_from_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("from_markup");

    for paragraphs in [10, 100, 1000] {
        let markup = generate_markup(paragraphs);
        group.throughput(Throughput::Bytes(markup.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(paragraphs),
            &markup,
            |b, markup| b.iter(|| Session::from_markup(markup)),
        );
    }

    group.finish();
}

fn bench_wrap_in_across_boundaries(c: &mut Criterion) {
    let session = Session::from_markup(&generate_markup(100)).unwrap();

    c.bench_function("wrap_in_crossing_tags", |b| {
        b.iter(|| {
            let mut session = session.clone();
            for i in 0..20 {
                let target = format!("bold and italic nested words.Paragraph {}", i + 1);
                session.wrap_in("<mark>", &target).unwrap();
            }
            session
        });
    });
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for paragraphs in [10, 100, 1000] {
        let mut session = Session::from_markup(&generate_markup(paragraphs)).unwrap();
        for occurrence in 1..=paragraphs {
            session
                .replace_nth("strong", "bold", occurrence)
                .unwrap();
            session
                .wrap_in_nth("<u>", "nested words", occurrence)
                .unwrap();
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(paragraphs),
            &session,
            |b, session| b.iter(|| session.apply()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_from_markup,
    bench_wrap_in_across_boundaries,
    bench_apply
);
criterion_main!(benches);
