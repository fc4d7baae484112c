// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for rendering and paginating a paper.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use pariksha_core::model::{Document, Group, Item};
use pariksha_core::types::{GroupKind, PageSetup, Script};
use pariksha_typeset::{MetricMeasure, paginate, paginate_blocks, render_document, render_to_markup};

/// Forty sections of twelve items, every third item carrying an inline
/// fraction.
fn sample_paper() -> Document {
    let mut doc = Document::with_script(Script::Bengali);
    doc.groups = (0..40)
        .map(|g| {
            let items = (0..12)
                .map(|i| {
                    let text = if i % 3 == 0 {
                        format!("সরল কর: {i}//{} + ১//২", i + 1)
                    } else {
                        format!("প্রশ্ন {g}-{i}: নিচের অনুচ্ছেদটি পড়ে উত্তর দাও")
                    };
                    Item::new(format!("q{g}-{i}"), text)
                })
                .collect();
            Group::new(format!("g{g}"), format!("বিভাগ {g}"), GroupKind::SingleLine)
                .with_items(items)
        })
        .collect();
    doc
}

fn bench_render(c: &mut Criterion) {
    let doc = sample_paper();
    c.bench_function("render_document (40x12)", |b| {
        b.iter(|| black_box(render_document(black_box(&doc))));
    });
    c.bench_function("render_to_markup (40x12)", |b| {
        b.iter(|| black_box(render_to_markup(black_box(&doc))));
    });
}

fn bench_paginate(c: &mut Criterion) {
    let doc = sample_paper();
    let paper = render_document(&doc);
    let setup = PageSetup::default();
    let measure = MetricMeasure::new(&setup);

    c.bench_function("paginate_blocks metric (40 blocks)", |b| {
        b.iter(|| black_box(paginate_blocks(&paper, &measure, setup.content_height_pt())));
    });

    let heights: Vec<f32> = (0..10_000).map(|i| (i % 17) as f32 * 40.0).collect();
    c.bench_function("paginate heights (10k)", |b| {
        b.iter(|| black_box(paginate(black_box(&heights), 760.0)));
    });
}

criterion_group!(benches, bench_render, bench_paginate);
criterion_main!(benches);
