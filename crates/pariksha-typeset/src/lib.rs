// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pariksha Typeset: numbering, fraction notation, section rendering,
// pagination and print sinks.

pub mod fraction;
pub mod numbering;
pub mod paginate;
pub mod render;
pub mod sink;

pub use numbering::NumberingStyle;
pub use paginate::{FixedMeasure, Measure, MetricMeasure, Pagination, paginate, paginate_blocks};
pub use render::{RenderedBlock, RenderedPaper, render_document, render_to_markup};
pub use sink::{MarkupSink, PdfSink, PrintJob, PrintSink};
