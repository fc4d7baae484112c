// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "pariksha",
    version,
    about = "Compose, paginate and print exam papers",
    long_about = "Compose exam papers from a question pool, then paginate and print them.\n\n\
                  Papers are read and written in the saved JSON array format."
)]
pub struct Cli {
    /// Application config (JSON). Defaults apply when the file is missing.
    #[arg(long, global = true, value_name = "PATH", default_value = "pariksha.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a paper to HTML markup.
    Render(RenderArgs),

    /// Compute page breaks with the configured page and print them as JSON.
    Paginate(PaperArgs),

    /// Write a paginated paper as an HTML or PDF file.
    Print(PrintArgs),

    /// Add a pool category to a paper, or remove it if already present.
    Toggle(ToggleArgs),

    /// Apply one direct edit given as JSON, e.g. `{"op":"set_mark","group":"g1","mark":"2"}`.
    Edit(EditArgs),

    /// List pool items by chapter and lesson.
    Pool(PoolArgs),
}

#[derive(Debug, Args)]
pub struct PaperArgs {
    /// Saved paper (JSON).
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,

    /// Write the markup here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintFormat {
    Html,
    Pdf,
}

#[derive(Debug, Args)]
pub struct PrintArgs {
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,

    #[arg(long, value_enum, default_value = "html")]
    pub format: PrintFormat,

    /// Output file.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Document title (default: the paper's file name).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Paper to update. A missing file starts a new paper.
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,

    /// Pool file (JSON).
    #[arg(long, value_name = "PATH")]
    pub pool: PathBuf,

    /// Category id in the pool.
    #[arg(long)]
    pub category: String,

    /// Secondary source id; omit for the primary pool.
    #[arg(long)]
    pub source: Option<String>,

    /// Display name recorded for a new secondary source.
    #[arg(long, requires = "source")]
    pub source_name: Option<String>,

    /// Write the result here instead of updating PAPER.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(value_name = "PAPER")]
    pub paper: PathBuf,

    /// The edit, as JSON.
    #[arg(long)]
    pub op: String,

    /// Write the result here instead of updating PAPER.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PoolArgs {
    /// Pool file (JSON).
    #[arg(long, value_name = "PATH")]
    pub pool: PathBuf,

    /// Free-text search over question text.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub chapter: Option<String>,

    #[arg(long)]
    pub lesson: Option<String>,

    #[arg(long)]
    pub source: Option<String>,
}
