//! Export flow - Enumerate, filter, transform and assemble
//!
//! Configuration is validated before the root is touched, the candidate list
//! is complete before filtering, and every record is written before the next
//! file is read.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::backends::{enumerate, resolve_root};
use crate::core::docstrings::DocstringRegistry;
use crate::core::processors::ProcessorRegistry;
use crate::core::error::{ExportError, Result};
use crate::core::file_reader::{materialize, TransformConfig, MIN_MAX_BYTES};
use crate::core::model::{DocstringOutcome, FileRecord, RunSummary};
use crate::core::paths::{make_relative, root_name};
use crate::core::render::{RenderConfig, Renderer};
use crate::core::tokenizer::{count_tokens, TokenModel};
use crate::filter::{select, FilterContext, FilterOptions};

/// Fully resolved settings for one export run
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub root: PathBuf,
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
    pub use_git: bool,
    pub filter: FilterOptions,
    pub transform: TransformConfig,
    pub render: RenderConfig,
    /// Estimate tokens of the rendered content with this model
    pub token_model: Option<TokenModel>,
}

impl ExportConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: None,
            use_git: true,
            filter: FilterOptions::default(),
            transform: TransformConfig::default(),
            render: RenderConfig::default(),
            token_model: None,
        }
    }

    /// Check numeric limits
    pub fn validate(&self) -> Result<()> {
        if self.transform.max_bytes < MIN_MAX_BYTES {
            return Err(ExportError::config(format!(
                "--max-bytes must be at least {} (got {})",
                MIN_MAX_BYTES, self.transform.max_bytes
            )));
        }
        if self.render.chunk_chars == 0 {
            return Err(ExportError::config("--chunk-chars must be positive"));
        }
        Ok(())
    }
}

/// Path of the output file relative to `root`, if it lives under it
fn output_under_root(root: &Path, output: &Path) -> Option<String> {
    let absolute = if output.is_absolute() {
        output.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(output)
    };
    let parent = absolute.parent()?.canonicalize().ok()?;
    let resolved = parent.join(absolute.file_name()?);
    make_relative(&resolved, root).filter(|rel| !rel.is_empty())
}

fn open_sink(output: Option<&Path>) -> Result<(Box<dyn Write>, String)> {
    match output {
        Some(path) => {
            let destination = path.display().to_string();
            let file = File::create(path).map_err(|source| ExportError::Output {
                destination: destination.clone(),
                source,
            })?;
            Ok((Box::new(BufWriter::new(file)), destination))
        }
        None => Ok((
            Box::new(BufWriter::new(io::stdout().lock())),
            "<stdout>".to_string(),
        )),
    }
}

fn log_record(record: &FileRecord) {
    if record.is_binary() {
        debug!("{}: binary, {} bytes replaced by placeholder", record.path, record.size);
    }
    if let Some(processor) = record.processor {
        debug!("{}: content summarized by {}", record.path, processor);
    }
    if let Some(t) = &record.truncation {
        info!("{}: truncated, {} bytes omitted", record.path, t.omitted_bytes);
    }
    match record.docstrings {
        DocstringOutcome::Stripped { count } => {
            debug!("{}: stripped {} docstrings", record.path, count)
        }
        DocstringOutcome::NonePresent => debug!("{}: no documentation present", record.path),
        DocstringOutcome::Unparsable => {
            info!("{}: unparsable source, content left unmodified", record.path)
        }
        DocstringOutcome::SkippedTruncated => {
            debug!("{}: truncated, docstrings left in place", record.path)
        }
        DocstringOutcome::NotApplicable => {}
    }
}

/// Run the export
pub fn run_export(config: &ExportConfig) -> Result<RunSummary> {
    config.validate()?;
    let mut ctx = FilterContext::new(config.filter.clone())?;

    let root = resolve_root(&config.root)?;
    if let Some(output) = &config.output {
        ctx.output_path = output_under_root(&root, output);
    }

    let listing = enumerate(&root, config.use_git)?;
    let selected = select(&listing.paths, &ctx);
    info!(
        "{} candidates from {}, {} selected",
        listing.paths.len(),
        listing.source,
        selected.len()
    );

    let mut summary = RunSummary {
        source: listing.source.to_string(),
        candidates: listing.paths.len(),
        selected: selected.len(),
        estimated_tokens: config.token_model.map(|_| 0),
        ..Default::default()
    };

    let registry = DocstringRegistry::default();
    let processors = ProcessorRegistry::default();
    let (sink, destination) = open_sink(config.output.as_deref())?;
    let mut renderer = Renderer::new(config.render.clone(), sink, destination);
    renderer.begin(&root_name(&root), &selected)?;

    for path in &selected {
        match materialize(&root, path, &config.transform, &registry, &processors) {
            Ok(record) => {
                log_record(&record);
                if let (Some(model), Some(tokens)) =
                    (config.token_model, summary.estimated_tokens.as_mut())
                {
                    *tokens += count_tokens(&record.content, model);
                }
                renderer.write_record(&record)?;
                summary.record(&record);
            }
            Err(skipped) => {
                warn!(
                    "skipped {} file {}: {}",
                    skipped.reason.as_str(),
                    skipped.path,
                    skipped.message
                );
                summary.skip(&skipped);
            }
        }
    }

    renderer.finish()?;
    Ok(summary)
}
