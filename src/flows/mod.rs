//! Flows module - Operations combining the pipeline stages
//!
//! Provides:
//! - export: enumerate, filter, transform and assemble one export
//! - stats: run summary printed with `--stats`

pub mod export;
pub mod stats;
