//! CSV and Parquet output for tidy tables

use crate::error::{Re1Error, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Output format chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") | Some("pq") => Ok(Self::Parquet),
            _ => Err(Re1Error::Configuration {
                message: format!(
                    "Unsupported table extension for {} (expected .csv or .parquet)",
                    path.display()
                ),
            }),
        }
    }
}

/// Write a frame to `.csv` or `.parquet` depending on the extension
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<TableFormat> {
    let format = TableFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    match format {
        TableFormat::Csv => {
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Snappy)
                .with_statistics(StatisticsOptions::full())
                .finish(df)?;
        }
    }

    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(format)
}
