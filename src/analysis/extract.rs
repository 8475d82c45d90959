//! Curve and range extraction across loaded studies

use crate::constants::columns::{AMPLITUDE, DOF, HEADING_DEG, PERIOD_S, PHASE_DEG};
use crate::constants::{HEADING_TOLERANCE_DEG, PERIOD_WINDOW_DEFAULT};
use crate::error::Result;
use crate::study::Study;
use polars::prelude::*;

/// Sorted union of the headings present in every study
pub fn all_headings<'a>(studies: impl IntoIterator<Item = &'a Study>) -> Vec<f64> {
    let mut headings: Vec<f64> = studies
        .into_iter()
        .flat_map(|study| study.headings.iter().copied())
        .collect();
    headings.sort_by(f64::total_cmp);
    headings.dedup();
    headings
}

/// Period, amplitude and phase for one DOF near one heading, sorted by period
pub fn curve_for(study: &Study, dof: &str, heading: f64, tol: f64) -> Result<DataFrame> {
    let curve = study
        .table
        .clone()
        .lazy()
        .filter(
            col(DOF)
                .eq(lit(dof))
                .and(col(HEADING_DEG).gt_eq(lit(heading - tol)))
                .and(col(HEADING_DEG).lt_eq(lit(heading + tol))),
        )
        .select([col(PERIOD_S), col(AMPLITUDE), col(PHASE_DEG)])
        .sort_by_exprs([col(PERIOD_S)], SortMultipleOptions::default())
        .collect()?;
    Ok(curve)
}

/// [`curve_for`] with the default heading tolerance
pub fn curve_near(study: &Study, dof: &str, heading: f64) -> Result<DataFrame> {
    curve_for(study, dof, heading, HEADING_TOLERANCE_DEG)
}

/// Finite period range for one DOF across studies, `(3.0, 60.0)` when none
pub fn period_bounds_for<'a>(studies: impl IntoIterator<Item = &'a Study>, dof: &str) -> (f64, f64) {
    let mut bounds: Option<(f64, f64)> = None;

    for study in studies {
        let (Ok(dofs), Ok(periods)) = (study.table.column(DOF), study.table.column(PERIOD_S)) else {
            continue;
        };
        let (Ok(dofs), Ok(periods)) = (
            dofs.as_materialized_series().str(),
            periods.as_materialized_series().f64(),
        ) else {
            continue;
        };

        for (name, period) in dofs.into_iter().zip(periods) {
            let (Some(name), Some(period)) = (name, period) else {
                continue;
            };
            if name != dof || !period.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(period), hi.max(period)),
                None => (period, period),
            });
        }
    }

    bounds.unwrap_or(PERIOD_WINDOW_DEFAULT)
}
