//! Peak amplitude extraction within a period window

use crate::constants::columns::{AMPLITUDE, PERIOD_S};
use polars::prelude::*;
use tracing::debug;

/// Inclusive period window [s]
pub type PeriodWindow = (f64, f64);

/// Peak amplitude and the period it occurs at
pub type Peak = (Option<f64>, Option<f64>);

/// First maximum of `amplitudes` among rows whose period lies in `window`
///
/// Rows with NaN amplitude are ignored. Returns `(amplitude, period)`.
pub fn peak_in_window(periods: &[f64], amplitudes: &[f64], window: Option<PeriodWindow>) -> Peak {
    let mut best: Option<(f64, f64)> = None;

    for (&period, &amplitude) in periods.iter().zip(amplitudes) {
        if let Some((lo, hi)) = window {
            if !(period >= lo && period <= hi) {
                continue;
            }
        }
        if amplitude.is_nan() {
            continue;
        }
        match best {
            Some((top, _)) if amplitude <= top => {}
            _ => best = Some((amplitude, period)),
        }
    }

    match best {
        Some((amplitude, period)) => (Some(amplitude), Some(period)),
        None => (None, None),
    }
}

fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column
        .as_materialized_series()
        .f64()?
        .iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn windowed(df: &DataFrame, window: Option<PeriodWindow>) -> PolarsResult<DataFrame> {
    match window {
        Some((lo, hi)) => df
            .clone()
            .lazy()
            .filter(col(PERIOD_S).gt_eq(lit(lo)).and(col(PERIOD_S).lt_eq(lit(hi))))
            .collect(),
        None => Ok(df.clone()),
    }
}

/// Peak of the `amplitude` column over `period_s` for a tidy-shaped frame
///
/// Degrades to `(None, None)` for empty frames, windows that exclude every
/// row, or frames without the expected columns.
pub fn peak_amplitude(df: &DataFrame, window: Option<PeriodWindow>) -> Peak {
    let extracted = windowed(df, window).and_then(|frame| {
        Ok((float_values(&frame, PERIOD_S)?, float_values(&frame, AMPLITUDE)?))
    });

    match extracted {
        Ok((periods, amplitudes)) => peak_in_window(&periods, &amplitudes, None),
        Err(e) => {
            debug!("No peak available: {}", e);
            (None, None)
        }
    }
}
