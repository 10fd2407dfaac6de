//! flatten-repo - Export a project tree for LLM ingestion
//!
//! flatten-repo provides:
//! - Git-aware file enumeration with a directory-walk fallback
//! - Scope, glob and preset based selection with key files first
//! - Binary detection, truncation and optional docstring stripping
//! - Markdown document or chunked JSONL output

use clap::Parser;
use std::process::ExitCode;

mod backends;
mod cli;
mod core;
mod filter;
mod flows;

use crate::core::error::ExportError;

/// Configuration errors exit with 2, every other failure with 1
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ExportError>() {
        Some(e) if e.is_config() => 2,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Err(err) = core::logging::init(&cli.log_config()) {
        eprintln!("Error: {:#}", err);
        return ExitCode::from(1);
    }

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
