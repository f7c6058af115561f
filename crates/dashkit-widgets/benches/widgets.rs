//! Benchmark tests for widget operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dashkit_core::{Rect, Widget};
use dashkit_widgets::{
    format_value, positioning_offset, to_fixed, FlyoutDirection, FlyoutMenu, Geometry,
    RenderableValue, Text,
};

fn bench_format_number(c: &mut Criterion) {
    let value = RenderableValue::Number(2_500_000.0);

    c.bench_function("format_value_number", |b| {
        b.iter(|| format_value(black_box(&value), black_box(1)).text().map(str::len))
    });
}

fn bench_format_bool(c: &mut Criterion) {
    let value = RenderableValue::Bool(true);

    c.bench_function("format_value_bool", |b| {
        b.iter(|| format_value(black_box(&value), black_box(3)).is_capitalized())
    });
}

fn bench_to_fixed_tie(c: &mut Criterion) {
    c.bench_function("to_fixed_tie", |b| {
        b.iter(|| to_fixed(black_box(1.005), black_box(2)))
    });
}

fn bench_positioning_offset(c: &mut Criterion) {
    let geometry = Geometry::new(100.0, 200.0, 80.0);

    c.bench_function("positioning_offset_all_directions", |b| {
        b.iter(|| {
            FlyoutDirection::ALL
                .iter()
                .map(|&d| positioning_offset(black_box(d), black_box(geometry)).top)
                .sum::<f32>()
        })
    });
}

fn bench_flyout_layout(c: &mut Criterion) {
    let mut menu = FlyoutMenu::builder()
        .default_open(true)
        .transactional(true)
        .child(Text::new("Filter options"))
        .on_cancel(|| {})
        .on_apply(|| {})
        .build()
        .expect("callbacks supplied");
    let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);

    c.bench_function("flyout_layout_open", |b| {
        b.iter(|| menu.layout(black_box(viewport)))
    });
}

criterion_group!(
    benches,
    bench_format_number,
    bench_format_bool,
    bench_to_fixed_tie,
    bench_positioning_offset,
    bench_flyout_layout,
);
criterion_main!(benches);
