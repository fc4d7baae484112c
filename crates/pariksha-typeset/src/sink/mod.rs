// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print sinks: turn a paginated paper into a deliverable file.

pub mod markup;
pub mod pdf;

use std::path::Path;

use pariksha_core::error::Result;
use pariksha_core::types::PageSetup;
use tracing::info;

use crate::paginate::Pagination;
use crate::render::RenderedPaper;

pub use markup::MarkupSink;
pub use pdf::PdfSink;

/// Everything a sink needs to lay out one paper.
#[derive(Debug, Clone, Copy)]
pub struct PrintJob<'a> {
    pub title: &'a str,
    pub paper: &'a RenderedPaper,
    pub pagination: &'a Pagination,
    /// Must be the setup the pagination was measured against.
    pub setup: &'a PageSetup,
}

/// Output format that accepts a paginated paper and returns file bytes.
pub trait PrintSink: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, job: &PrintJob<'_>) -> Result<Vec<u8>>;
}

/// Render with `sink` and write the bytes to `path`.
pub fn write_to_file(
    sink: &dyn PrintSink,
    job: &PrintJob<'_>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = sink.render(job)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!(
        path = %path.as_ref().display(),
        bytes = bytes.len(),
        format = sink.extension(),
        "paper written"
    );
    Ok(())
}
