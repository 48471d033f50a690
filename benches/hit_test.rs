//! Hit-test performance benchmarks.
//!
//! Hit-testing is constant time in the item count: the slot under the
//! pointer is computed arithmetically from the layout, never by scanning.
//!
//! Run with: cargo bench --bench hit_test

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use storystrip::model::StripStyle;
use storystrip::view_state::{compute_layout, hit_test, Layout, LayoutContext};

/// Layout of `items_count` items at `ratio`, scrolled halfway.
fn layout_for(items_count: usize, ratio: f64) -> Layout {
    let style = StripStyle::default();
    let context = LayoutContext {
        width: 1_200,
        items_count,
        first_skip_small: false,
        scroll_left: (items_count as i32 * 65) / 2,
        expanded_ratio: ratio,
        shift: None,
    };
    compute_layout(&context, &style.small, &style.full, 1.0)
}

/// Benchmark hit_test with varying item counts to verify constant cost.
fn benchmark_hit_test_scaling(c: &mut Criterion) {
    let style = StripStyle::default();
    let mut group = c.benchmark_group("hit_test_scaling");

    for items_count in [10, 1_000, 100_000] {
        let layout = layout_for(items_count, 1.0);

        group.bench_with_input(BenchmarkId::new("hit_test", items_count), &layout, |b, layout| {
            b.iter(|| {
                for x in (0..1_200).step_by(97) {
                    let _result = hit_test(black_box(layout), &style.small, false, black_box(x));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark hit_test while the strip is halfway between its shapes.
fn benchmark_hit_test_blended(c: &mut Criterion) {
    let style = StripStyle::default();
    let layout = layout_for(50, 0.5);

    c.bench_function("hit_test_blended", |b| {
        b.iter(|| {
            for x in 0..400 {
                let _result = hit_test(black_box(&layout), &style.small, true, black_box(x));
            }
        });
    });
}

criterion_group!(benches, benchmark_hit_test_scaling, benchmark_hit_test_blended);
criterion_main!(benches);
