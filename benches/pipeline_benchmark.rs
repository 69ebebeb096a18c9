//! Benchmarks for the text pipeline.
//!
//! Run with: cargo bench
//!
//! These benchmarks run each stage over a synthetic multi-page report.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagefix::{
    Directives, Document, FieldExtractor, FixedTextInserter, LineFilter, LineRule, Pipeline,
    PipelineConfig, RemovalRules, TextSource,
};

/// Creates a synthetic report with the given number of pages.
fn create_test_report(page_count: usize) -> Vec<String> {
    (0..page_count)
        .map(|i| {
            let mut lines = vec![
                "Company header".to_string(),
                format!("Page {} of {}", i + 1, page_count),
            ];
            match i {
                0 => lines.extend(["Personal report".into(), "Dana Levi".into(), "15 January 2024".into()]),
                1 => lines.push("Your reported type is ENFP".into()),
                2 => lines.push("EXTRAVERSION | 11 INTUITION | 9 THINKING | 4 PERCEIVING | 11".into()),
                _ => {}
            }
            for j in 0..40 {
                lines.push(format!(
                    "Paragraph line {} on page {} with benchmark text for measurement.",
                    j,
                    i + 1
                ));
            }
            lines.push("Confidential - do not distribute".to_string());
            lines.join("\n")
        })
        .collect()
}

fn rules(page_count: usize) -> RemovalRules {
    let mut rules = RemovalRules::new().with_rule(0, LineRule::SkipAll);
    for page in 1..page_count {
        let rule = if page % 2 == 0 {
            LineRule::indices([0, 1])
        } else {
            LineRule::containing(["Confidential", "Page "])
        };
        rules.insert(page, rule);
    }
    rules
}

fn directives(page_count: usize) -> Directives {
    let mut directives = Directives::new();
    for page in 0..page_count {
        directives = directives
            .with_insert(page, 1, "Type: {category}")
            .with_delete(page, 5);
    }
    directives
}

/// Benchmark each stage at various sizes.
fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");

    for page_count in [5, 20, 100].iter() {
        let doc = Document::from_page_texts(create_test_report(*page_count));
        let rules = rules(*page_count);
        let filtered = LineFilter::new().filter(&doc, &rules);
        let directives = directives(*page_count);

        group.bench_function(format!("filter_{}_pages", page_count), |b| {
            b.iter(|| LineFilter::new().filter(black_box(&doc), black_box(&rules)));
        });

        group.bench_function(format!("fields_{}_pages", page_count), |b| {
            b.iter(|| FieldExtractor::new().extract(black_box(&filtered)));
        });

        group.bench_function(format!("insert_{}_pages", page_count), |b| {
            b.iter(|| FixedTextInserter::new().apply(black_box(&filtered), black_box(&directives)));
        });
    }

    group.finish();
}

/// Benchmark a full run without translation.
fn bench_full_pipeline(c: &mut Criterion) {
    let pages = create_test_report(20);
    let config = PipelineConfig::new()
        .with_rules(rules(20))
        .with_directives(directives(20));
    let pipeline = Pipeline::new(config);

    c.bench_function("pipeline_20_pages", |b| {
        b.iter(|| {
            let source = TextSource::from_pages(pages.iter().cloned());
            pipeline.run_untranslated(black_box(source)).unwrap()
        });
    });
}

/// Benchmark configuration parsing.
fn bench_config_parsing(c: &mut Criterion) {
    let json = r#"{
        "rules": {"0": "ALL", "1": [0, 1, 2], "2": ["Confidential", "Page "]},
        "directives": {"2": {"1": "{name}", "5": "DELETE"}, "3": {"2": "{scores}"}}
    }"#;

    c.bench_function("config_from_json", |b| {
        b.iter(|| PipelineConfig::from_json(black_box(json)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_stages,
    bench_full_pipeline,
    bench_config_parsing,
);
criterion_main!(benches);
