//! Centered rolling mean over metric columns

use crate::constants::SMOOTHING_WINDOW;
use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Centered rolling mean with `min_periods = 1`
///
/// NaN entries do not contribute; a window without finite values stays NaN.
pub fn centered_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let before = (window - 1) / 2;
    let after = window - 1 - before;

    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(before);
            let end = (i + after + 1).min(values.len());
            let (sum, count) = values[start..end]
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 { f64::NAN } else { sum / count as f64 }
        })
        .collect()
}

/// Three-point centered mean
pub fn three_point_mean(values: &[f64]) -> Vec<f64> {
    centered_mean(values, SMOOTHING_WINDOW)
}

/// Smooth the named columns of a frame, leaving row order untouched
///
/// Columns that are missing are skipped. Nulls are treated as NaN.
pub fn smooth_columns(df: &DataFrame, names: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    if out.height() == 0 {
        return Ok(out);
    }

    for &name in names {
        let Ok(column) = df.column(name) else {
            debug!("Skipping smoothing of missing column {}", name);
            continue;
        };
        let column = column.cast(&DataType::Float64)?;
        let values: Vec<f64> = column
            .as_materialized_series()
            .f64()?
            .iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        out.with_column(Series::new(name.into(), three_point_mean(&values)))?;
    }
    Ok(out)
}
