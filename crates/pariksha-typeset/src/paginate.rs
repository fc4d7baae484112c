// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block paginator.
//
// Pagination works on whole groups: a block is never split across pages.
// Heights come from a `Measure` implementation configured with the same
// `PageSetup` the print sink uses.

use std::collections::HashMap;

use pariksha_core::types::PageSetup;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::render::{LayoutLine, RenderedBlock, RenderedPaper};

/// Capability that reports how tall a rendered block is, in points.
///
/// A UI host answers from its live layout; tests use [`FixedMeasure`].
pub trait Measure {
    fn measure(&self, block: &RenderedBlock) -> f32;
}

/// Greedy first-fit partition of block heights into pages.
///
/// Every index appears exactly once, in order. A block taller than the page
/// is placed alone on its own page and overflows it.
pub fn paginate(heights: &[f32], page_content_height: f32) -> Vec<Vec<usize>> {
    let mut pages = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut current_height = 0.0_f32;

    for (index, raw) in heights.iter().enumerate() {
        let height = raw.max(0.0);
        if current_height + height > page_content_height && !current.is_empty() {
            pages.push(std::mem::take(&mut current));
            current_height = 0.0;
        }
        current.push(index);
        current_height += height;
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// Result of paginating a rendered paper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    /// Block indices per page.
    pub pages: Vec<Vec<usize>>,
    /// Measured height of every block, in points.
    pub heights: Vec<f32>,
    /// Blocks taller than one page.
    pub overflowing: Vec<usize>,
    pub page_content_height: f32,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Summed block heights of one page.
    pub fn page_height(&self, page: usize) -> f32 {
        self.pages
            .get(page)
            .map(|indices| indices.iter().map(|&i| self.heights[i].max(0.0)).sum())
            .unwrap_or(0.0)
    }
}

/// Measure every block and partition them into pages.
#[instrument(
    skip_all,
    fields(blocks = paper.blocks.len(), page_content_height = page_content_height)
)]
pub fn paginate_blocks(
    paper: &RenderedPaper,
    measure: &dyn Measure,
    page_content_height: f32,
) -> Pagination {
    let heights: Vec<f32> = paper.blocks.iter().map(|b| measure.measure(b)).collect();

    let overflowing: Vec<usize> = heights
        .iter()
        .enumerate()
        .filter(|(_, h)| **h > page_content_height)
        .map(|(i, _)| i)
        .collect();
    for &index in &overflowing {
        warn!(
            group = %paper.blocks[index].group_id,
            height = heights[index],
            page_content_height,
            "block taller than one page, it will overflow its page"
        );
    }

    let pages = paginate(&heights, page_content_height);
    info!(pages = pages.len(), overflowing = overflowing.len(), "pagination computed");

    Pagination {
        pages,
        heights,
        overflowing,
        page_content_height,
    }
}

// ---------------------------------------------------------------------------
// Measurers
// ---------------------------------------------------------------------------

/// Average glyph advance as a fraction of the font size.
pub const AVG_GLYPH_EM: f32 = 0.5;

/// Horizontal step per indent level, in points.
pub const INDENT_PT: f32 = 18.0;

/// Deterministic estimate from font metrics in a `PageSetup`.
///
/// Each layout line wraps at the average glyph width; the block adds half a
/// line of spacing after itself.
#[derive(Debug, Clone)]
pub struct MetricMeasure {
    pub line_height_pt: f32,
    pub font_size_pt: f32,
    pub content_width_pt: f32,
}

impl MetricMeasure {
    pub fn new(setup: &PageSetup) -> Self {
        Self {
            line_height_pt: setup.line_height_pt,
            font_size_pt: setup.font_size_pt,
            content_width_pt: setup.content_width_pt(),
        }
    }

    /// Characters that fit on one row at an indent level.
    pub fn chars_per_row(&self, indent: u8) -> usize {
        let width = (self.content_width_pt - f32::from(indent) * INDENT_PT).max(self.font_size_pt);
        ((width / (self.font_size_pt * AVG_GLYPH_EM)).floor() as usize).max(1)
    }

    fn rows(&self, line: &LayoutLine) -> usize {
        line.row_count(self.chars_per_row(line.indent))
    }

    /// Space left below every block.
    pub fn block_gap_pt(&self) -> f32 {
        self.line_height_pt * 0.5
    }
}

impl Measure for MetricMeasure {
    fn measure(&self, block: &RenderedBlock) -> f32 {
        let rows: usize = block.layout_lines().iter().map(|l| self.rows(l)).sum();
        rows as f32 * self.line_height_pt + self.block_gap_pt()
    }
}

/// Explicit per-group heights.
#[derive(Debug, Clone, Default)]
pub struct FixedMeasure {
    pub heights: HashMap<String, f32>,
    /// Height of blocks with no explicit entry.
    pub default_height: f32,
}

impl FixedMeasure {
    pub fn uniform(height: f32) -> Self {
        Self {
            heights: HashMap::new(),
            default_height: height,
        }
    }

    pub fn with(mut self, group_id: impl Into<String>, height: f32) -> Self {
        self.heights.insert(group_id.into(), height);
        self
    }
}

impl Measure for FixedMeasure {
    fn measure(&self, block: &RenderedBlock) -> f32 {
        self.heights
            .get(&block.group_id)
            .copied()
            .unwrap_or(self.default_height)
    }
}
