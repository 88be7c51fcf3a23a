//! flakedoc core library.
//!
//! Runs flake8 over Python sources (or reads its saved output) and renders
//! one Markdown lint report per source file, plus a summary of the batch.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `collect`: Target file discovery from glob patterns.
//! - `runner`: flake8 invocation, one process per file.
//! - `parse`: flake8 text output parser.
//! - `report`: Report building, truncation and batch aggregation.
//! - `render`: Markdown rendering for reports and the summary.
//! - `pipeline`: `run`/`ingest` flows and report writing.
//! - `models`: Data models and the flake8 code catalog.
//! - `output`: Human/JSON console printers.
//! - `error`, `logging`, `utils`: Supporting pieces.
pub mod cli;
pub mod collect;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod runner;
pub mod utils;
