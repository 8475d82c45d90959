//! Conversion of parsed RAOs into tidy per-(heading, dof, frequency) rows.

use super::phase_zeroing::maybe_zero_phase;
use crate::config::TidyOptions;
use crate::constants::{RAD_TO_DEG, columns, is_rotational};
use crate::error::Result;
use crate::models::{Re1Data, SpeedBlock, TidyRecord, period_and_hz};
use polars::prelude::*;

/// Amplitude and phase for one DOF after unit conversion
pub fn dof_amplitude_phase(
    dof_index: usize,
    value: crate::models::RaoValue,
    convert_rot_to_deg_per_m: bool,
) -> (f64, f64) {
    let mut amplitude = value.amplitude();
    if convert_rot_to_deg_per_m && is_rotational(dof_index) {
        amplitude *= RAD_TO_DEG;
    }
    (amplitude, value.phase_deg())
}

/// Tidy rows for one speed block, ordered by heading, frequency, then dof
pub fn speed_block_records(speed: &SpeedBlock, options: &TidyOptions) -> Vec<TidyRecord> {
    let ndof = speed.rao.ndof();
    let dof_names = options.dof_names.take(ndof);
    let mut records = Vec::with_capacity(speed.heads.len() * speed.freqs.len() * ndof);

    for (ih, &heading) in speed.heads.iter().enumerate() {
        for (ifr, &omega) in speed.freqs.iter().enumerate() {
            let (period_s, freq_hz) = period_and_hz(omega);
            let Some(values) = speed.rao.dofs(ih, ifr) else {
                continue;
            };
            for (dof, &value) in values.iter().enumerate() {
                let (amplitude, mut phase_deg) =
                    dof_amplitude_phase(dof, value, options.convert_rot_to_deg_per_m);
                if let Some(config) = &options.phase_zeroing {
                    phase_deg = maybe_zero_phase(
                        dof,
                        amplitude,
                        phase_deg,
                        config,
                        options.convert_rot_to_deg_per_m,
                    );
                }
                records.push(TidyRecord {
                    heading_deg: heading,
                    dof_index: dof,
                    dof_name: dof_names[dof].clone(),
                    omega_rad_s: omega,
                    freq_hz,
                    period_s,
                    amplitude,
                    phase_deg,
                });
            }
        }
    }
    records
}

/// Tidy rows for a chosen speed of a parsed file
pub fn tidy_records(data: &Re1Data, speed_index: usize, options: &TidyOptions) -> Result<Vec<TidyRecord>> {
    Ok(speed_block_records(data.speed(speed_index)?, options))
}

/// Build the tidy DataFrame (`heading_deg, dof, omega_rad_s, freq_hz, period_s, amplitude, phase_deg`)
pub fn records_to_dataframe(records: &[TidyRecord]) -> Result<DataFrame> {
    let df = df!(
        columns::HEADING_DEG => records.iter().map(|r| r.heading_deg).collect::<Vec<f64>>(),
        columns::DOF => records.iter().map(|r| r.dof_name.as_str()).collect::<Vec<&str>>(),
        columns::OMEGA_RAD_S => records.iter().map(|r| r.omega_rad_s).collect::<Vec<f64>>(),
        columns::FREQ_HZ => records.iter().map(|r| r.freq_hz).collect::<Vec<f64>>(),
        columns::PERIOD_S => records.iter().map(|r| r.period_s).collect::<Vec<f64>>(),
        columns::AMPLITUDE => records.iter().map(|r| r.amplitude).collect::<Vec<f64>>(),
        columns::PHASE_DEG => records.iter().map(|r| r.phase_deg).collect::<Vec<f64>>(),
    )?;
    Ok(df)
}

/// Tidy DataFrame for a chosen speed of a parsed file
pub fn tidy_dataframe(data: &Re1Data, speed_index: usize, options: &TidyOptions) -> Result<DataFrame> {
    records_to_dataframe(&tidy_records(data, speed_index, options)?)
}
