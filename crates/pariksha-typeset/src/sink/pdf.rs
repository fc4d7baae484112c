// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Proof PDF sink using `printpdf` 0.8.
//
// Pages are built as `Vec<Op>` lists with the built-in Helvetica font, one
// PDF page per computed page, using the same line wrapping the metric
// measurer counted. Helvetica has no Bengali or Arabic glyphs, so this is a
// layout proof for those scripts, not final output.

use pariksha_core::error::{ParikshaError, Result};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use tracing::{debug, info, instrument};

use super::{PrintJob, PrintSink};
use crate::paginate::{AVG_GLYPH_EM, INDENT_PT, MetricMeasure};

/// Writes one PDF page per computed page.
#[derive(Debug, Clone, Default)]
pub struct PdfSink;

/// Text-positioning ops for one run of text at a baseline.
fn text_ops(text: String, x: f32, y: f32, size: f32) -> [Op; 5] {
    [
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font: BuiltinFont::Helvetica,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text)],
            font: BuiltinFont::Helvetica,
        },
        Op::EndTextSection,
    ]
}

/// Horizontal frame of the printable area, mirrored for right-to-left papers.
struct Frame {
    left: f32,
    width: f32,
    glyph: f32,
    rtl: bool,
}

impl Frame {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.glyph
    }

    /// x of a run at the start edge, after `indent` steps.
    fn start(&self, text: &str, indent: u8) -> f32 {
        let offset = f32::from(indent) * INDENT_PT;
        if self.rtl {
            (self.left + self.width - offset - self.text_width(text)).max(self.left)
        } else {
            self.left + offset
        }
    }

    /// x of a run pinned to the end edge.
    fn end(&self, text: &str) -> f32 {
        if self.rtl {
            self.left
        } else {
            (self.left + self.width - self.text_width(text)).max(self.left)
        }
    }
}

impl PrintSink for PdfSink {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    #[instrument(skip_all, fields(pages = job.pagination.page_count(), title = job.title))]
    fn render(&self, job: &PrintJob<'_>) -> Result<Vec<u8>> {
        let setup = job.setup;
        let metrics = MetricMeasure::new(setup);
        let (page_w_mm, page_h_mm) = setup.page_mm();
        let page_h_pt = Mm(page_h_mm).into_pt().0;
        let top_pt = Mm(setup.margins.top).into_pt().0;
        let frame = Frame {
            left: Mm(setup.margins.left).into_pt().0,
            width: setup.content_width_pt(),
            glyph: setup.font_size_pt * AVG_GLYPH_EM,
            rtl: job.paper.direction.is_rtl(),
        };

        info!(paper = ?setup.paper_size, "creating proof PDF");

        let mut pages: Vec<PdfPage> = Vec::with_capacity(job.pagination.page_count());
        for (number, indices) in job.pagination.pages.iter().enumerate() {
            let mut ops: Vec<Op> = Vec::new();
            let mut y = page_h_pt - top_pt;

            for &index in indices {
                let block = job.paper.blocks.get(index).ok_or_else(|| {
                    let page = number + 1;
                    ParikshaError::Sink(format!("page {page} refers to missing block {index}"))
                })?;

                for line in block.layout_lines() {
                    let rows = line.wrapped(metrics.chars_per_row(line.indent));
                    for (row_index, row) in rows.into_iter().enumerate() {
                        y -= metrics.line_height_pt;
                        if row_index == 0 {
                            if let Some(trailing) = &line.trailing {
                                let x = frame.end(trailing);
                                ops.extend(text_ops(trailing.clone(), x, y, setup.font_size_pt));
                            }
                        }
                        let x = frame.start(&row, line.indent);
                        ops.extend(text_ops(row, x, y, setup.font_size_pt));
                    }
                    y -= line.rows.saturating_sub(1) as f32 * metrics.line_height_pt;
                }
                y -= metrics.block_gap_pt();
            }

            pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops));
        }

        if pages.is_empty() {
            pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), Vec::new()));
        }

        let mut doc = PdfDocument::new(job.title);
        doc.with_pages(pages);
        debug!(pages = doc.pages.len(), "proof layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::{FixedMeasure, paginate_blocks};
    use crate::render::render_document;
    use pariksha_core::model::{Document, Group, Item};
    use pariksha_core::types::{GroupKind, PageSetup};

    #[test]
    fn frame_mirrors_for_rtl() {
        let ltr = Frame {
            left: 40.0,
            width: 500.0,
            glyph: 6.0,
            rtl: false,
        };
        let rtl = Frame { rtl: true, ..ltr };
        assert_eq!(ltr.start("abc", 1), 40.0 + INDENT_PT);
        assert_eq!(rtl.start("abc", 0), 40.0 + 500.0 - 18.0);
        assert_eq!(rtl.end("abc"), 40.0);
        assert_eq!(ltr.end("abc"), 540.0 - 18.0);
    }

    #[test]
    fn produces_pdf_bytes() {
        let doc = Document {
            groups: vec![
                Group::new("a", "Short answers", GroupKind::SingleLine)
                    .with_items(vec![Item::new("q1", "Name the capital of France.")]),
                Group::section_break("b", "Part B"),
            ],
            ..Document::new()
        };
        let paper = render_document(&doc);
        let pagination = paginate_blocks(&paper, &FixedMeasure::uniform(400.0), 700.0);
        let setup = PageSetup::default();
        let bytes = PdfSink
            .render(&PrintJob {
                title: "Proof",
                paper: &paper,
                pagination: &pagination,
                setup: &setup,
            })
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
