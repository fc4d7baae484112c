// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pariksha: exam paper composer.
//
// Entry point. Initialises logging, parses arguments, and runs one command.

use clap::Parser;
use pariksha_cli::cli::Cli;
use pariksha_cli::commands;
use pariksha_core::human_errors::humanize_error;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match commands::run(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            let human = humanize_error(&e);
            eprintln!("error: {}\n  {}", human.message, human.suggestion);
            1
        }
    };
    std::process::exit(exit_code);
}
