// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Self-contained HTML output, one `.page` element per computed page.

use std::fmt::Write;

use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::types::PageSetup;
use tracing::{debug, instrument};

use super::{PrintJob, PrintSink};
use crate::paginate::INDENT_PT;
use crate::render::markup::escape;
use crate::render::render_block_markup;

/// Writes HTML whose `@page` rule matches the page setup, so the browser's
/// print dialog reproduces the computed page breaks.
#[derive(Debug, Clone, Default)]
pub struct MarkupSink;

fn stylesheet(setup: &PageSetup) -> String {
    let (width_mm, height_mm) = setup.page_mm();
    let m = &setup.margins;
    format!(
        "@page {{ size: {width_mm}mm {height_mm}mm; margin: {}mm {}mm {}mm {}mm; }}\n\
         body {{ margin: 0; font-size: {}pt; line-height: {}pt; }}\n\
         .page {{ break-after: page; box-sizing: border-box; }}\n\
         .page:last-child {{ break-after: auto; }}\n\
         .group-header {{ display: flex; justify-content: space-between; font-weight: bold; }}\n\
         .items, .options {{ list-style: none; padding-inline-start: {INDENT_PT}pt; margin: 0; }}\n\
         .label {{ margin-inline-end: 0.4em; }}\n\
         .frac {{ display: inline-flex; flex-direction: column; vertical-align: middle; \
                  text-align: center; }}\n\
         .frac .num {{ border-bottom: 1px solid; }}\n\
         .stacked {{ display: inline-block; text-align: center; }}\n\
         .stacked .num {{ border-bottom: 1px solid; }}\n\
         .stacked .line {{ min-height: 1em; }}\n\
         .line.slot {{ min-height: 1em; min-width: 2em; border: 1px dotted; }}\n\
         .answer-box {{ display: inline-block; width: 2.5em; height: 1em; border: 1px solid; \
                        margin-inline-start: 1em; }}\n",
        m.top, m.right, m.bottom, m.left, setup.font_size_pt, setup.line_height_pt,
    )
}

impl PrintSink for MarkupSink {
    fn extension(&self) -> &'static str {
        "html"
    }

    #[instrument(skip_all, fields(pages = job.pagination.page_count()))]
    fn render(&self, job: &PrintJob<'_>) -> Result<Vec<u8>> {
        let paper = job.paper;
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
            paper.script.code(),
            paper.direction.as_attr(),
            escape(job.title),
            stylesheet(job.setup)
        );

        for (number, indices) in job.pagination.pages.iter().enumerate() {
            let _ = write!(
                html,
                "<div class=\"page\" data-page=\"{}\" dir=\"{}\">",
                number + 1,
                paper.direction.as_attr()
            );
            for &index in indices {
                let block = paper.blocks.get(index).ok_or_else(|| {
                    let page = number + 1;
                    ParikshaError::Sink(format!("page {page} refers to missing block {index}"))
                })?;
                html.push_str(&render_block_markup(block));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        debug!(bytes = html.len(), "markup rendered");
        Ok(html.into_bytes())
    }
}
