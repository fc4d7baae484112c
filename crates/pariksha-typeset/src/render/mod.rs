// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Section/numbering renderer: turns a `Document` into a presentation tree.
//
// Each top-level block corresponds to one group and is the unit the paginator
// never splits. Group bodies are produced by a lookup table keyed by group
// kind, and item content by a second table keyed by category type, so a new
// kind is one table entry.

pub mod lines;
pub mod markup;

use pariksha_core::model::{Context, Document, Group, Item, Payload};
use pariksha_core::types::{
    CategoryType, Direction, GroupKind, QuantityMode, QuantitySelector, Script, parse_mark,
};
use tracing::{debug, instrument, warn};

use crate::fraction::{self, InlineSegment, StackedFraction};
use crate::numbering::{self, NumberingStyle, resolve_style};

pub use lines::LayoutLine;
pub use markup::{render_block_markup, render_paper_markup, render_to_markup};

/// The whole paper, ready for markup or measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPaper {
    pub direction: Direction,
    pub script: Script,
    pub blocks: Vec<RenderedBlock>,
}

/// One group: the atomic unit of pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub group_id: String,
    pub kind: GroupKind,
    pub direction: Direction,
    pub header: SectionHeader,
    pub body: BlockBody,
}

/// Title on the start side, quantity and marks on the end side.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    pub ordinal: Option<String>,
    pub title: String,
    pub quantity: Option<String>,
    pub marks: Option<String>,
    /// Paper direction; the title sits at its start edge.
    pub direction: Direction,
}

impl SectionHeader {
    /// `"১. Title"`, or the bare title for unnumbered groups.
    pub fn title_text(&self) -> String {
        match &self.ordinal {
            Some(ordinal) => format!("{ordinal} {}", self.title),
            None => self.title.clone(),
        }
    }

    /// Quantity phrase and mark equation joined for the end side.
    pub fn trailing_text(&self) -> Option<String> {
        match (&self.quantity, &self.marks) {
            (Some(q), Some(m)) => Some(format!("{q}  {m}")),
            (Some(q), None) => Some(q.clone()),
            (None, Some(m)) => Some(m.clone()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockBody {
    /// Section break: the header is the whole block.
    Break,
    Items(ItemList),
    Passage {
        passage: Option<Vec<InlineSegment>>,
        contexts: Vec<RenderedContext>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemList {
    pub layout: CategoryType,
    pub items: Vec<RenderedItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContext {
    pub id: String,
    pub ordinal: String,
    pub title: String,
    pub direction: Direction,
    pub list: ItemList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedItem {
    pub id: String,
    pub label: String,
    pub content: ItemContent,
    pub table_markup: Option<String>,
    pub options: Vec<RenderedOption>,
    /// True/false items get an answer box.
    pub answer_slot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemContent {
    Inline(Vec<InlineSegment>),
    Stacked(StackedFraction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOption {
    pub label: String,
    pub text: Vec<InlineSegment>,
}

// ---------------------------------------------------------------------------
// Dispatch tables
// ---------------------------------------------------------------------------

/// Numbering resolved for one list of items.
struct ListStyle {
    items: NumberingStyle,
    options: NumberingStyle,
}

type ItemRenderer = fn(&Item, String, &ListStyle) -> RenderedItem;

type GroupRenderer = fn(&Group, &RenderContext) -> BlockBody;

const ITEM_RENDERERS: &[(CategoryType, ItemRenderer)] = &[
    (CategoryType::WordList, render_text_item),
    (CategoryType::SingleLine, render_text_item),
    (CategoryType::FillGap, render_text_item),
    (CategoryType::FreeText, render_text_item),
    (CategoryType::TrueFalse, render_true_false_item),
    (CategoryType::Table, render_table_item),
    (CategoryType::Objective, render_objective_item),
    (CategoryType::StackedFraction, render_stacked_item),
];

const GROUP_RENDERERS: &[(GroupKind, GroupRenderer)] = &[
    (GroupKind::WordList, render_flat_group),
    (GroupKind::SingleLine, render_flat_group),
    (GroupKind::FillGap, render_flat_group),
    (GroupKind::TrueFalse, render_flat_group),
    (GroupKind::Table, render_flat_group),
    (GroupKind::Objective, render_flat_group),
    (GroupKind::StackedFraction, render_flat_group),
    (GroupKind::FreeText, render_flat_group),
    (GroupKind::PassageBased, render_passage_group),
    (GroupKind::SectionBreak, render_break_group),
];

fn item_renderer(category: CategoryType) -> ItemRenderer {
    ITEM_RENDERERS
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(render_text_item as ItemRenderer, |(_, r)| *r)
}

fn group_renderer(kind: GroupKind) -> GroupRenderer {
    GROUP_RENDERERS
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(render_flat_group as GroupRenderer, |(_, r)| *r)
}

// ---------------------------------------------------------------------------
// Item renderers
// ---------------------------------------------------------------------------

fn base_item(item: &Item, label: String) -> RenderedItem {
    RenderedItem {
        id: item.id.clone(),
        label,
        content: ItemContent::Inline(fraction::parse_inline(&item.question_text)),
        table_markup: None,
        options: Vec::new(),
        answer_slot: false,
    }
}

fn render_text_item(item: &Item, label: String, _style: &ListStyle) -> RenderedItem {
    base_item(item, label)
}

fn render_true_false_item(item: &Item, label: String, _style: &ListStyle) -> RenderedItem {
    RenderedItem {
        answer_slot: true,
        ..base_item(item, label)
    }
}

fn render_table_item(item: &Item, label: String, _style: &ListStyle) -> RenderedItem {
    RenderedItem {
        table_markup: item.table_markup.clone(),
        ..base_item(item, label)
    }
}

fn render_objective_item(item: &Item, label: String, style: &ListStyle) -> RenderedItem {
    let options = item
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| RenderedOption {
            label: style.options.format(i),
            text: fraction::parse_inline(&option.label),
        })
        .collect();
    RenderedItem {
        options,
        ..base_item(item, label)
    }
}

fn render_stacked_item(item: &Item, label: String, style: &ListStyle) -> RenderedItem {
    match fraction::parse_stacked(&item.question_text) {
        Some(stacked) => RenderedItem {
            content: ItemContent::Stacked(stacked),
            ..base_item(item, label)
        },
        None => {
            debug!(item = %item.id, "no stacked separator, rendering as text");
            render_text_item(item, label, style)
        }
    }
}

fn render_list(items: &[Item], layout: CategoryType, style: &ListStyle) -> ItemList {
    let render = item_renderer(layout);
    ItemList {
        layout,
        items: items
            .iter()
            .enumerate()
            .map(|(i, item)| render(item, style.items.format(i), style))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Group renderers
// ---------------------------------------------------------------------------

/// Paper-wide values every group renderer needs.
pub struct RenderContext {
    pub script: Script,
    pub direction: Direction,
}

fn group_list_style(group: &Group, script: Script) -> ListStyle {
    ListStyle {
        items: resolve_style(
            &[group.numbering_style.as_deref()],
            NumberingStyle::items_for(script),
        ),
        options: resolve_style(
            &[group.option_numbering_style.as_deref()],
            NumberingStyle::options_for(script),
        ),
    }
}

fn render_flat_group(group: &Group, ctx: &RenderContext) -> BlockBody {
    let items = match &group.payload {
        Payload::Flat(items) => items.as_slice(),
        _ => &[],
    };
    let layout = group.kind.category_type().unwrap_or_default();
    BlockBody::Items(render_list(items, layout, &group_list_style(group, ctx.script)))
}

fn render_context(
    context: &Context,
    index: usize,
    group: &Group,
    ctx: &RenderContext,
) -> RenderedContext {
    let items = resolve_style(
        &[
            context.numbering_style.as_deref(),
            group.numbering_style.as_deref(),
        ],
        NumberingStyle::roman(),
    );
    let options = resolve_style(
        &[group.option_numbering_style.as_deref()],
        NumberingStyle::options_for(ctx.script),
    );
    RenderedContext {
        id: context.id.clone(),
        ordinal: NumberingStyle::contexts_for(ctx.script).format(index),
        title: context.display_name.clone(),
        direction: context.direction(group.is_right_to_left),
        list: render_list(
            &context.items,
            context.category_type,
            &ListStyle { items, options },
        ),
    }
}

fn render_passage_group(group: &Group, ctx: &RenderContext) -> BlockBody {
    let contexts = match &group.payload {
        Payload::Nested(contexts) => contexts.as_slice(),
        _ => &[],
    };
    BlockBody::Passage {
        passage: group
            .passage
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(fraction::parse_inline),
        contexts: contexts
            .iter()
            .enumerate()
            .map(|(i, context)| render_context(context, i, group, ctx))
            .collect(),
    }
}

fn render_break_group(_group: &Group, _ctx: &RenderContext) -> BlockBody {
    BlockBody::Break
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Quantity phrase and mark equation for a group header.
///
/// `All` resolves to the group's item count at render time; the equation's
/// digits follow the quantity mode's script, else the paper's.
pub fn header_quantities(group: &Group, paper_script: Script) -> (Option<String>, Option<String>) {
    let item_count = group.leaf_count();
    let count = group
        .quantity_selector
        .map_or(item_count, |selector| selector.resolve(item_count));

    let quantity = group.quantity_selector.map(|selector| {
        let mode = group.quantity_mode.unwrap_or(match selector {
            QuantitySelector::All => QuantityMode::All(paper_script),
            QuantitySelector::Count(_) => QuantityMode::Custom(paper_script),
        });
        numbering::quantity_label(mode, count)
    });

    let marks = group.mark_per_item.as_deref().and_then(|raw| match parse_mark(raw) {
        Ok(Some(mark)) => {
            let script = group.quantity_mode.map_or(paper_script, |m| m.script());
            Some(numbering::mark_equation(count, raw, mark, script))
        }
        Ok(None) => None,
        Err(_) => {
            warn!(group = %group.id, mark = raw, "unparseable mark, omitting equation");
            None
        }
    });

    (quantity, marks)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Walk groups in order, numbering every group except section breaks.
#[instrument(skip_all, fields(groups = document.groups.len()))]
pub fn render_document(document: &Document) -> RenderedPaper {
    let ctx = RenderContext {
        script: document.settings.script,
        direction: document.settings.direction(),
    };
    let ordinal_style = NumberingStyle::groups_for(ctx.script);
    let mut ordinal = 0usize;

    let blocks = document
        .groups
        .iter()
        .map(|group| {
            let numbered = group.kind.is_numbered();
            let header_ordinal = numbered.then(|| {
                let label = ordinal_style.format(ordinal);
                ordinal += 1;
                label
            });
            let (quantity, marks) = if numbered {
                header_quantities(group, ctx.script)
            } else {
                (None, None)
            };

            RenderedBlock {
                group_id: group.id.clone(),
                kind: group.kind,
                direction: group.direction(),
                header: SectionHeader {
                    ordinal: header_ordinal,
                    title: group.display_name.clone(),
                    quantity,
                    marks,
                    direction: ctx.direction,
                },
                body: group_renderer(group.kind)(group, &ctx),
            }
        })
        .collect();

    debug!(numbered = ordinal, "document rendered");
    RenderedPaper {
        direction: ctx.direction,
        script: ctx.script,
        blocks,
    }
}
