// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Each returns the text to print on stdout.

use std::path::Path;

use pariksha_bridge::{Category, JsonFilePool, PoolFilter, PoolQuery};
use pariksha_compose::{Edit, apply_candidate, bucket_items};
use pariksha_core::AppConfig;
use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::model::{Document, Item, SourceCollection};
use pariksha_core::types::Script;
use pariksha_typeset::sink::write_to_file;
use pariksha_typeset::{
    MarkupSink, MetricMeasure, Pagination, PdfSink, PrintJob, PrintSink, RenderedPaper,
    paginate_blocks, render_document, render_to_markup,
};
use tracing::{debug, info};

use crate::cli::{
    Cli, Command, EditArgs, PaperArgs, PoolArgs, PrintArgs, PrintFormat, RenderArgs, ToggleArgs,
};

/// Load the config and run the selected command.
pub fn run(cli: &Cli) -> Result<String> {
    let config = AppConfig::load(&cli.config)?;
    match &cli.command {
        Command::Render(args) => run_render(args),
        Command::Paginate(args) => run_paginate(args, &config),
        Command::Print(args) => run_print(args, &config),
        Command::Toggle(args) => run_toggle(args, &config),
        Command::Edit(args) => run_edit(args),
        Command::Pool(args) => run_pool(args),
    }
}

// ---------------------------------------------------------------------------
// Paper files
// ---------------------------------------------------------------------------

pub fn load_paper(path: &Path) -> Result<Document> {
    let json = std::fs::read_to_string(path)?;
    let document = Document::from_wire_json(&json)?;
    debug!(path = %path.display(), groups = document.groups.len(), "paper loaded");
    Ok(document)
}

/// Load a paper, or start an empty one in `script` if the file is missing.
pub fn load_or_new(path: &Path, script: Script) -> Result<Document> {
    if path.exists() {
        load_paper(path)
    } else {
        info!(path = %path.display(), "starting a new paper");
        Ok(Document::with_script(script))
    }
}

pub fn write_paper(document: &Document, path: &Path) -> Result<()> {
    std::fs::write(path, document.to_wire_json_pretty()?)?;
    info!(path = %path.display(), "paper written");
    Ok(())
}

/// Render and paginate against the configured page.
pub fn layout(document: &Document, config: &AppConfig) -> (RenderedPaper, Pagination) {
    let paper = render_document(document);
    let measure = MetricMeasure::new(&config.page);
    let pagination = paginate_blocks(&paper, &measure, config.page.content_height_pt());
    (paper, pagination)
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn run_render(args: &RenderArgs) -> Result<String> {
    let markup = render_to_markup(&load_paper(&args.paper)?);
    match &args.out {
        Some(out) => {
            std::fs::write(out, markup)?;
            Ok(format!("markup written to {}", out.display()))
        }
        None => Ok(markup),
    }
}

pub fn run_paginate(args: &PaperArgs, config: &AppConfig) -> Result<String> {
    let (_, pagination) = layout(&load_paper(&args.paper)?, config);
    Ok(serde_json::to_string_pretty(&pagination)?)
}

impl PrintFormat {
    fn sink(self) -> Box<dyn PrintSink> {
        match self {
            Self::Html => Box::new(MarkupSink),
            Self::Pdf => Box::new(PdfSink),
        }
    }
}

pub fn run_print(args: &PrintArgs, config: &AppConfig) -> Result<String> {
    let document = load_paper(&args.paper)?;
    let (paper, pagination) = layout(&document, config);
    let stem = args
        .paper
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "paper".to_owned());
    let title = args.title.as_deref().unwrap_or(&stem);

    let job = PrintJob {
        title,
        paper: &paper,
        pagination: &pagination,
        setup: &config.page,
    };
    write_to_file(args.format.sink().as_ref(), &job, &args.out)?;
    Ok(format!(
        "{} page(s) written to {}",
        pagination.page_count(),
        args.out.display()
    ))
}

/// Source collection for `id`, recording it in the paper settings if new.
fn resolve_source(document: &mut Document, id: &str, name: Option<&str>) -> SourceCollection {
    let sources = &mut document.settings.secondary_sources;
    if let Some(known) = sources.iter().find(|s| s.id == id) {
        return known.clone();
    }
    let source = SourceCollection {
        id: id.to_owned(),
        name: name.unwrap_or(id).to_owned(),
    };
    sources.push(source.clone());
    source
}

fn find_category(pool: &dyn PoolQuery, filter: &PoolFilter, id: &str) -> Result<Category> {
    pool.query(filter)?
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| ParikshaError::Pool(format!("no category `{id}` in pool")))
}

pub fn run_toggle(args: &ToggleArgs, config: &AppConfig) -> Result<String> {
    let mut document = load_or_new(&args.paper, config.default_script)?;
    let pool = JsonFilePool::open(&args.pool)?;
    let filter = PoolFilter {
        source_id: args.source.clone(),
        ..PoolFilter::default()
    };
    let candidate = find_category(&pool, &filter, &args.category)?;

    let source = args
        .source
        .as_deref()
        .map(|id| resolve_source(&mut document, id, args.source_name.as_deref()));
    let (document, action) = apply_candidate(&document, &candidate, source.as_ref());

    write_paper(&document, args.out.as_deref().unwrap_or(&args.paper))?;
    Ok(serde_json::to_string_pretty(&action)?)
}

pub fn run_edit(args: &EditArgs) -> Result<String> {
    let edit: Edit = serde_json::from_str(&args.op)?;
    let document = edit.apply(&load_paper(&args.paper)?)?;
    let out = args.out.as_deref().unwrap_or(&args.paper);
    write_paper(&document, out)?;
    Ok(format!("edit applied, {} group(s) in paper", document.groups.len()))
}

pub fn run_pool(args: &PoolArgs) -> Result<String> {
    let pool = JsonFilePool::open(&args.pool)?;
    let filter = PoolFilter {
        search: args.search.clone(),
        chapter_id: args.chapter.clone(),
        lesson_id: args.lesson.clone(),
        source_id: args.source.clone(),
    };
    let items: Vec<Item> = pool
        .query(&filter)?
        .iter()
        .flat_map(|c| c.payload.leaves().cloned())
        .collect();
    let buckets = bucket_items(&items, &pool.chapters()?);
    Ok(serde_json::to_string_pretty(&buckets)?)
}
