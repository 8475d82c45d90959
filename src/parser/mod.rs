//! VERES .re1 motion transfer function parser
//!
//! Turns the free-form text of a `.re1` file into an immutable [`Re1Data`].
//! The file is decoded as Latin-1 so stray bytes from legacy tools never
//! stop a parse.
//!
//! ## Architecture
//!
//! - [`tokenizer`] - Float/integer extraction with Fortran `D` exponents
//! - [`cursor`] - Blank-line aware line cursor
//! - [`header`] - Banner, identifier lines and numeric header
//! - [`speed_block`] - Per-speed headings and RAO data in either layout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use re1_processor::parser::parse_re1_file;
//!
//! # fn example() -> re1_processor::Result<()> {
//! let data = parse_re1_file(std::path::Path::new("run.re1"))?;
//! println!(
//!     "{} speeds, {} headings, {} frequencies",
//!     data.header.novel, data.header.nohead, data.header.nofreq
//! );
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod header;
pub mod speed_block;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

pub use header::{LineClass, classify};
pub use tokenizer::{normalize_exponents, parse_floats, parse_ints};

use crate::error::{Re1Error, Result};
use crate::models::Re1Data;
use cursor::LineCursor;
use std::path::Path;
use tracing::debug;

/// Parse a .re1 file from disk
pub fn parse_re1_file(path: &Path) -> Result<Re1Data> {
    if !path.exists() {
        return Err(Re1Error::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    let text = decode_latin1(&bytes);

    let data = parse_re1_str(&text).map_err(|e| Re1Error::in_file(path, e))?;
    debug!(
        "Parsed {}: {} speed blocks",
        path.display(),
        data.speeds.len()
    );
    Ok(data)
}

/// Parse the decoded text of a .re1 file
pub fn parse_re1_str(text: &str) -> Result<Re1Data> {
    let lines: Vec<&str> = text.lines().collect();
    let mut cursor = LineCursor::new(&lines);

    let header = header::parse_header(&mut cursor)?;
    header::check_run_size_fits(&header, &cursor)?;

    let mut speeds = Vec::new();
    for speed_index in 0..header.novel {
        speeds.push(speed_block::parse_speed_block(
            &mut cursor,
            &header,
            speed_index,
        )?);
    }

    Ok(Re1Data { header, speeds })
}

/// Decode bytes as Latin-1; every byte maps to exactly one char
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
