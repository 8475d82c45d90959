//! re1 Processor Library
//!
//! Parses VERES `.re1` motion transfer function files and derives tidy
//! tables, peak responses and formatted workbooks from them.
//!
//! This library provides tools for:
//! - Parsing the free-form header and both RAO block layouts
//! - Converting complex RAOs to amplitude/phase records as polars DataFrames
//! - Optional viewer-style phase zeroing, smoothing and peak finding
//! - Exporting headings to xlsx sheets and tables to CSV/Parquet
//! - Discovering and loading folders of studies concurrently

pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod processor;
pub mod study;

pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use config::{ExportConfig, LoaderConfig, PhaseZeroingConfig, TidyOptions};
pub use error::{Re1Error, Result};
pub use models::{RaoLayout, RaoTable, RaoValue, Re1Data, Re1Header, SpeedBlock, TidyRecord};
pub use parser::{parse_re1_file, parse_re1_str};
pub use processor::StudyLoader;
pub use study::Study;
