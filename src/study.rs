//! Named, tidy studies built from .re1 files or synthetic demo curves

use crate::analysis::tidy::{records_to_dataframe, tidy_records};
use crate::config::TidyOptions;
use crate::constants::{DEMO_CURVE_SAMPLES, DOF_NAMES, columns};
use crate::error::Result;
use crate::models::{Re1Data, TidyRecord, period_and_hz};
use crate::parser::parse_re1_file;
use polars::prelude::*;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A labelled tidy table with its provenance
#[derive(Debug, Clone)]
pub struct Study {
    pub name: String,
    /// Source file, `None` for synthetic studies
    pub source: Option<PathBuf>,
    /// Tidy table with a leading `study` column
    pub table: DataFrame,
    /// Sorted distinct headings [deg]
    pub headings: Vec<f64>,
    /// DOF names in first-seen order
    pub dof_names: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Study {
    /// Build a study from tidy records
    pub fn from_records(
        name: impl Into<String>,
        source: Option<PathBuf>,
        records: &[TidyRecord],
    ) -> Result<Self> {
        let name = name.into();
        let mut table = records_to_dataframe(records)?;
        table.insert_column(0, study_column(&name, table.height()))?;

        let mut headings: Vec<f64> = records.iter().map(|r| r.heading_deg).collect();
        headings.sort_by(f64::total_cmp);
        headings.dedup();

        let mut dof_names: Vec<String> = Vec::new();
        for record in records {
            if !dof_names.contains(&record.dof_name) {
                dof_names.push(record.dof_name.clone());
            }
        }

        Ok(Self {
            name,
            source,
            table,
            headings,
            dof_names,
            warnings: Vec::new(),
            errors: Vec::new(),
        })
    }

    /// Build a study from one speed of a parsed file
    pub fn from_re1(
        name: impl Into<String>,
        source: Option<PathBuf>,
        data: &Re1Data,
        speed_index: usize,
        options: &TidyOptions,
    ) -> Result<Self> {
        let records = tidy_records(data, speed_index, options)?;
        let mut study = Self::from_records(name, source, &records)?;
        if data.speeds.len() > 1 {
            study.warnings.push(format!(
                "{}: {} speeds present, showing speed {} ({:.2} kn)",
                study.name,
                data.speeds.len(),
                speed_index + 1,
                data.speeds[speed_index].speed_knots()
            ));
        }
        Ok(study)
    }

    /// Parse a .re1 file and build its study
    pub fn load(
        name: impl Into<String>,
        path: &Path,
        speed_index: usize,
        options: &TidyOptions,
    ) -> Result<Self> {
        let data = parse_re1_file(path)?;
        Self::from_re1(name, Some(path.to_path_buf()), &data, speed_index, options)
    }

    /// Relabel the study, including its `study` column
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = name.into();
        let column = study_column(&self.name, self.table.height());
        self.table.with_column(column)?;
        Ok(())
    }

    /// Synthetic roll curves used when a file cannot be read
    pub fn demo(name: impl Into<String>, headings: &[f64]) -> Result<Self> {
        let name = name.into();
        let records = demo_records(headings);
        let mut study = Self::from_records(name, None, &records)?;
        study
            .warnings
            .push(format!("{}: using synthetic demo data", study.name));
        debug!("Generated {} demo rows for {}", records.len(), study.name);
        Ok(study)
    }

    pub fn is_synthetic(&self) -> bool {
        self.source.is_none()
    }
}

fn study_column(name: &str, height: usize) -> Series {
    Series::new(columns::STUDY.into(), vec![name; height])
}

/// Demo roll response: a Gaussian hump whose position and width vary with heading
fn demo_records(headings: &[f64]) -> Vec<TidyRecord> {
    let roll = DOF_NAMES[3];
    let (t0, t1) = (4.0, 20.0);
    let step = (t1 - t0) / (DEMO_CURVE_SAMPLES - 1) as f64;

    let mut records = Vec::with_capacity(headings.len() * DEMO_CURVE_SAMPLES);
    for &heading in headings {
        let h = heading.to_radians();
        let peak = 9.0 + 2.0 * h.cos();
        let width = 1.6 + 0.4 * h.sin();
        let scale = 0.9 + 0.3 * h.cos();

        for i in 0..DEMO_CURVE_SAMPLES {
            let period = t0 + step * i as f64;
            let omega = 2.0 * PI / period;
            let (period_s, freq_hz) = period_and_hz(omega);
            let z = (period - peak) / width;
            records.push(TidyRecord {
                heading_deg: heading,
                dof_index: 3,
                dof_name: roll.to_string(),
                omega_rad_s: omega,
                freq_hz,
                period_s,
                amplitude: 0.1 + scale * (-0.5 * z * z).exp(),
                phase_deg: 20.0 + 30.0 * (period / 3.0 + h / 2.0).sin(),
            });
        }
    }
    records
}
