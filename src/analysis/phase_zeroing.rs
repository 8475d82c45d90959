//! Viewer-style phase suppression at negligible amplitude
//!
//! The VERES viewer reports a phase of zero where the amplitude is too
//! small for atan2 to mean anything. This reproduces that for display
//! fidelity; amplitudes are never touched.

use crate::config::PhaseZeroingConfig;
use crate::constants::DEG_TO_RAD;

/// Return the phase to report for one DOF value
///
/// `rotational_in_deg_per_m` states the unit the rotational amplitude is
/// carried in; thresholds are configured in deg/m and scaled to rad/m when
/// it is false.
pub fn maybe_zero_phase(
    dof_index: usize,
    amplitude: f64,
    phase_deg: f64,
    config: &PhaseZeroingConfig,
    rotational_in_deg_per_m: bool,
) -> f64 {
    if !config.enable {
        return phase_deg;
    }

    let amplitude = amplitude.abs();
    let rot_scale = if rotational_in_deg_per_m { 1.0 } else { DEG_TO_RAD };

    let zero = match dof_index {
        0 => config.force_surge_zero || amplitude < config.trans_thresh,
        1 | 2 => amplitude < config.trans_thresh,
        3 => amplitude < config.roll_thresh * rot_scale,
        4 => amplitude < config.pitch_thresh * rot_scale,
        5 => amplitude < config.yaw_thresh * rot_scale,
        _ => false,
    };

    if zero { 0.0 } else { phase_deg }
}
