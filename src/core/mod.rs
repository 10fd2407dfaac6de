//! Core module - Data model and the content/assembly stages
//!
//! This module provides:
//! - Export data model and error type
//! - Content transformation (binary sniffing, summaries, truncation, docstrings)
//! - Output assembly (document tree, chunked records)
//! - Path, hashing and token-estimation utilities
//! - Logging setup

pub mod chunk;
pub mod docstrings;
pub mod error;
pub mod file_reader;
pub mod language;
pub mod logging;
pub mod model;
pub mod paths;
pub mod processors;
pub mod render;
pub mod tokenizer;
pub mod tree;
pub mod util;
