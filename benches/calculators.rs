//! Benchmarks for the work done on each click: parsing a function,
//! sampling it across the canvas and summarising a data set.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use loancalc::plot::{plot, segments, tabulate};
use loancalc::{CalcSpecs, CompiledFunction, PlotDomain, compute_stats, evaluate};

const FUNCTION: &str = "sin(x) * x^2 / (1 + abs(x)) - ln(x^2 + 1)";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_function", |b| {
        b.iter(|| CompiledFunction::new(black_box(FUNCTION)))
    });
}

fn bench_evaluate_text(c: &mut Criterion) {
    c.bench_function("evaluate_text", |b| {
        b.iter(|| evaluate(black_box(1.5), black_box(FUNCTION)))
    });
}

fn bench_plot(c: &mut Criterion) {
    let function = CompiledFunction::new(FUNCTION).expect("Failed to parse benchmark function");
    let domain = PlotDomain::default();

    c.bench_function("plot_800", |b| {
        b.iter(|| segments(plot(black_box(&function), &domain, 800)))
    });
    c.bench_function("tabulate_20", |b| {
        b.iter(|| tabulate(black_box(&function), &domain, 20))
    });
}

fn bench_stats(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| ((i * 7919) % 1000) as f64).collect();

    c.bench_function("compute_stats_10k", |b| {
        b.iter(|| compute_stats(black_box(&values)))
    });
}

fn bench_settings(c: &mut Criterion) {
    let xml = CalcSpecs::default()
        .to_xml()
        .expect("Failed to serialize settings");

    c.bench_function("parse_settings", |b| {
        b.iter(|| CalcSpecs::from_xml_str(black_box(&xml)))
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_evaluate_text,
    bench_plot,
    bench_stats,
    bench_settings
);
criterion_main!(benches);
