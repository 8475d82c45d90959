//! Error handling for .re1 parsing, analysis and export.
//!
//! Structural errors are fatal to the file being parsed. Frequency
//! consistency errors only surface when both RAO layouts were rejected, in
//! which case they arrive wrapped in [`Re1Error::LayoutUnrecognized`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Re1Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Source not found at path: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Structural parse error at line {line} ({field}): {reason}")]
    Structural {
        field: &'static str,
        line: usize,
        reason: String,
    },

    #[error(
        "Inconsistent frequency at heading {heading_index}, frequency {freq_index}: {found} vs {expected}"
    )]
    FrequencyConsistency {
        heading_index: usize,
        freq_index: usize,
        found: f64,
        expected: f64,
    },

    #[error(
        "Speed block {speed_index}: RAO data matches neither layout (interleaved: {interleaved}; table-first: {table_first})"
    )]
    LayoutUnrecognized {
        speed_index: usize,
        interleaved: Box<Re1Error>,
        table_first: Box<Re1Error>,
    },

    #[error("{what} index {index} out of bounds (0..{len})")]
    OutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Failed to parse file: {path} - {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Re1Error>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Parse task for {path} failed: {reason}")]
    TaskFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl Re1Error {
    /// Create a structural error for a header or data field. `line` is 1-based.
    pub fn structural(field: &'static str, line: usize, reason: impl Into<String>) -> Self {
        Self::Structural {
            field,
            line,
            reason: reason.into(),
        }
    }

    /// Create a bounds error for a speed/heading lookup
    pub fn out_of_bounds(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfBounds { what, index, len }
    }

    /// Attach the offending file path to a parse error
    pub fn in_file(path: impl Into<PathBuf>, source: Re1Error) -> Self {
        Self::InFile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// True for errors raised while reading the file layout
    pub fn is_structural(&self) -> bool {
        match self {
            Re1Error::Structural { .. } | Re1Error::LayoutUnrecognized { .. } => true,
            Re1Error::InFile { source, .. } => source.is_structural(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Re1Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_display_names_field() {
        let err = Re1Error::structural("NOVEL NOHEAD NOFREQ [NDOF]", 9, "Expected 3 or 4 integers");
        let message = err.to_string();
        assert!(message.contains("NOVEL NOHEAD NOFREQ [NDOF]"));
        assert!(message.contains("line 9"));
        assert!(err.is_structural());
    }

    #[test]
    fn test_layout_error_reports_both_causes() {
        let err = Re1Error::LayoutUnrecognized {
            speed_index: 0,
            interleaved: Box::new(Re1Error::FrequencyConsistency {
                heading_index: 1,
                freq_index: 1,
                found: 0.7,
                expected: 0.6,
            }),
            table_first: Box::new(Re1Error::structural("RAO", 40, "Unexpected end of file")),
        };
        let message = err.to_string();
        assert!(message.contains("Inconsistent frequency"));
        assert!(message.contains("Unexpected end of file"));
    }

    #[test]
    fn test_in_file_keeps_structural_classification() {
        let err = Re1Error::in_file("a.re1", Re1Error::structural("banner", 1, "missing"));
        assert!(err.is_structural());
        assert!(!Re1Error::out_of_bounds("speed", 3, 1).is_structural());
    }
}
