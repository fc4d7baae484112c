// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Saved paper → presentation tree → pages → HTML.

use pariksha_core::model::Document;
use pariksha_core::types::PageSetup;
use pariksha_typeset::numbering::{self, Family, NumberingStyle, Wrapper};
use pariksha_typeset::render::BlockBody;
use pariksha_typeset::{
    FixedMeasure, MarkupSink, MetricMeasure, PrintJob, PrintSink, paginate_blocks, render_document,
};
use proptest::prelude::*;

const SAVED: &str = r#"[
    {"id":"settings","type":"settings","isRTL":false,"script":"bn","secondarySources":[]},
    {"id":"g1","name":"সংক্ষিপ্ত প্রশ্ন","type":"single-line","quantityMode":"custom_bn",
     "quantitySelector":"5","mark":"2",
     "questions":[
        {"id":"q1","questionText":"৩//৪ এর মান কত?"},
        {"id":"q2","questionText":"দ্বিতীয় প্রশ্ন"},
        {"id":"q3","questionText":"তৃতীয় প্রশ্ন"},
        {"id":"q4","questionText":"চতুর্থ প্রশ্ন"},
        {"id":"q5","questionText":"পঞ্চম প্রশ্ন"},
        {"id":"q6","questionText":"ষষ্ঠ প্রশ্ন"}]},
    {"id":"brk","name":"বোর্ড ২০২৩","type":"section-break","questions":[]},
    {"id":"g2","name":"অনুচ্ছেদ","type":"passage-based","passage":"একটি গল্প।",
     "questions":[
        {"id":"c1","name":"বহুনির্বাচনি","type":"objective","questions":[
            {"id":"q7","questionText":"সঠিক উত্তর?",
             "options":[{"id":"o1","label":"হ্যাঁ"},{"id":"o2","label":"না"}]}]},
        {"id":"c2","name":"শূন্যস্থান","type":"fill-gap","numberingStyle":"bn-num-dot","questions":[
            {"id":"q8","questionText":"___ পূরণ কর"}]}]}
]"#;

#[test]
fn saved_bengali_paper_renders_headers() {
    let doc = Document::from_wire_json(SAVED).unwrap();
    let paper = render_document(&doc);
    assert_eq!(paper.blocks.len(), 3);

    let first = &paper.blocks[0].header;
    assert_eq!(first.title_text(), "১. সংক্ষিপ্ত প্রশ্ন");
    assert_eq!(first.quantity.as_deref(), Some("যেকোনো ৫টি"));
    assert_eq!(first.marks.as_deref(), Some("৫ × ২ = ১০"));

    assert_eq!(paper.blocks[1].header.ordinal, None);
    assert_eq!(paper.blocks[2].header.ordinal.as_deref(), Some("২."));

    let BlockBody::Passage { contexts, .. } = &paper.blocks[2].body else {
        panic!("expected passage body");
    };
    assert_eq!(contexts[0].ordinal, "ক)");
    assert_eq!(contexts[0].list.items[0].label, "i)");
    assert_eq!(contexts[0].list.items[0].options[1].label, "খ)");
    assert_eq!(contexts[1].list.items[0].label, "১.");
}

#[test]
fn pages_become_html_pages() {
    let doc = Document::from_wire_json(SAVED).unwrap();
    let paper = render_document(&doc);
    let measure = FixedMeasure::uniform(100.0).with("g1", 500.0);
    let pagination = paginate_blocks(&paper, &measure, 550.0);
    assert_eq!(pagination.pages, vec![vec![0], vec![1, 2]]);
    let json = serde_json::to_value(&pagination).unwrap();
    assert_eq!(json["pages"][1][1], 2);

    let setup = PageSetup::default();
    let html = MarkupSink
        .render(&PrintJob {
            title: "পরীক্ষা",
            paper: &paper,
            pagination: &pagination,
            setup: &setup,
        })
        .unwrap();
    let html = String::from_utf8(html).unwrap();
    assert_eq!(html.matches("class=\"page\"").count(), 2);
    assert!(html.contains("lang=\"bn\""));
}

#[test]
fn metric_pagination_fits_pages() {
    let doc = Document::from_wire_json(SAVED).unwrap();
    let paper = render_document(&doc);
    let setup = PageSetup::default();
    let pagination =
        paginate_blocks(&paper, &MetricMeasure::new(&setup), setup.content_height_pt());
    assert_eq!(pagination.page_count(), 1);
    assert!(pagination.overflowing.is_empty());
}

fn families() -> impl Strategy<Value = Family> {
    prop::sample::select(vec![
        Family::BengaliLetters,
        Family::BengaliDigits,
        Family::LatinLower,
        Family::LatinUpper,
        Family::LatinDigits,
        Family::ArabicLetters,
        Family::ArabicAbjad,
        Family::ArabicDigits,
        Family::RomanLower,
        Family::RomanUpper,
        Family::Circled,
    ])
}

fn wrappers() -> impl Strategy<Value = Wrapper> {
    prop::sample::select(vec![
        Wrapper::Paren,
        Wrapper::Dot,
        Wrapper::Bar,
        Wrapper::Enclosed,
        Wrapper::Plain,
    ])
}

proptest! {
    #[test]
    fn labels_distinct_within_one_cycle(
        family in families(),
        wrapper in wrappers(),
        a in 0usize..100,
        b in 0usize..100,
    ) {
        let style = NumberingStyle::new(family, wrapper);
        let cycle = family.cycle_len().unwrap_or(100);
        prop_assume!(a != b && a < cycle && b < cycle);
        prop_assert_ne!(style.format(a), style.format(b));
    }

    #[test]
    fn format_is_pure(family in families(), wrapper in wrappers(), index in 0usize..500) {
        let token = NumberingStyle::new(family, wrapper).to_string();
        prop_assert_eq!(numbering::format(index, &token), numbering::format(index, &token));
    }
}
