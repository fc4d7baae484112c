// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTML markup for rendered papers.
//
// Every element that can change direction carries an explicit `dir`
// attribute. Header title and trailing text sit in a flex row, so mirroring
// follows from the paper's direction alone.

use std::fmt::Write;

use pariksha_core::model::Document;
use pariksha_core::types::{CategoryType, GroupKind};

use crate::fraction::{InlineSegment, StackedFraction, StackedLine};

use super::{BlockBody, ItemContent, ItemList, RenderedBlock, RenderedPaper, render_document};

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline(segments: &[InlineSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            InlineSegment::Text(text) => escape(text),
            InlineSegment::Fraction {
                numerator,
                denominator,
            } => format!(
                r#"<span class="frac"><span class="num">{}</span><span class="den">{}</span></span>"#,
                escape(numerator),
                escape(denominator)
            ),
        })
        .collect()
}

fn stacked_part<'a>(lines: impl Iterator<Item = StackedLine<'a>>) -> String {
    lines
        .map(|line| match line {
            StackedLine::Text(text) => format!(r#"<div class="line">{}</div>"#, escape(text)),
            StackedLine::Slot => r#"<div class="line slot"></div>"#.to_owned(),
        })
        .collect()
}

fn stacked(fraction: &StackedFraction) -> String {
    format!(
        r#"<div class="stacked"><div class="num">{}</div><div class="den">{}</div></div>"#,
        stacked_part(fraction.numerator_lines()),
        stacked_part(fraction.denominator_lines())
    )
}

fn item_list(list: &ItemList, out: &mut String) {
    let _ = write!(out, r#"<ol class="items {}">"#, list.layout.as_class());
    for item in &list.items {
        let _ = write!(
            out,
            r#"<li data-id="{}"><span class="label">{}</span>"#,
            escape(&item.id),
            escape(&item.label)
        );
        match &item.content {
            ItemContent::Inline(segments) => {
                let _ = write!(out, r#"<span class="text">{}</span>"#, inline(segments));
            }
            ItemContent::Stacked(fraction) => out.push_str(&stacked(fraction)),
        }
        if item.answer_slot {
            out.push_str(r#"<span class="answer-box"></span>"#);
        }
        // Table markup is authored HTML and passes through untouched.
        if let Some(table) = &item.table_markup {
            let _ = write!(out, r#"<div class="table">{table}</div>"#);
        }
        if !item.options.is_empty() {
            out.push_str(r#"<ul class="options">"#);
            for option in &item.options {
                let _ = write!(
                    out,
                    r#"<li><span class="label">{}</span>{}</li>"#,
                    escape(&option.label),
                    inline(&option.text)
                );
            }
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }
    out.push_str("</ol>");
}

/// Markup of one block: the unit the paginator places on a page.
pub fn render_block_markup(block: &RenderedBlock) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<section class="group {}" data-group="{}" dir="{}">"#,
        block.kind.as_class(),
        escape(&block.group_id),
        block.direction.as_attr()
    );

    let _ = write!(
        out,
        r#"<header class="group-header" dir="{}"><span class="title">{}</span>"#,
        block.header.direction.as_attr(),
        escape(&block.header.title_text())
    );
    if let Some(trailing) = block.header.trailing_text() {
        let _ = write!(out, r#"<span class="marks">{}</span>"#, escape(&trailing));
    }
    out.push_str("</header>");

    match &block.body {
        BlockBody::Break => {}
        BlockBody::Items(list) => item_list(list, &mut out),
        BlockBody::Passage { passage, contexts } => {
            if let Some(passage) = passage {
                let _ = write!(out, r#"<div class="passage">{}</div>"#, inline(passage));
            }
            for context in contexts {
                let _ = write!(
                    out,
                    r#"<div class="context" data-context="{}" dir="{}"><h4><span class="label">{}</span> {}</h4>"#,
                    escape(&context.id),
                    context.direction.as_attr(),
                    escape(&context.ordinal),
                    escape(&context.title)
                );
                item_list(&context.list, &mut out);
                out.push_str("</div>");
            }
        }
    }

    out.push_str("</section>");
    out
}

/// All blocks in one container, without page boundaries.
pub fn render_paper_markup(paper: &RenderedPaper) -> String {
    let mut out = format!(
        r#"<article class="paper" dir="{}" lang="{}">"#,
        paper.direction.as_attr(),
        paper.script.code()
    );
    for block in &paper.blocks {
        out.push_str(&render_block_markup(block));
    }
    out.push_str("</article>");
    out
}

/// `renderToMarkup(document)`: the markup handed to a print sink.
pub fn render_to_markup(document: &Document) -> String {
    render_paper_markup(&render_document(document))
}

/// CSS class names for kinds and layouts.
trait CssClass {
    fn as_class(&self) -> &'static str;
}

impl CssClass for GroupKind {
    fn as_class(&self) -> &'static str {
        match self {
            GroupKind::WordList => "word-list",
            GroupKind::SingleLine => "single-line",
            GroupKind::FillGap => "fill-gap",
            GroupKind::TrueFalse => "true-false",
            GroupKind::Table => "table",
            GroupKind::Objective => "objective",
            GroupKind::StackedFraction => "stacked-fraction",
            GroupKind::FreeText => "free-text",
            GroupKind::PassageBased => "passage-based",
            GroupKind::SectionBreak => "section-break",
        }
    }
}

impl CssClass for CategoryType {
    fn as_class(&self) -> &'static str {
        GroupKind::from_category(*self).as_class()
    }
}
