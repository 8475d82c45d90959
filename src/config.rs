//! Configuration for conversion, phase zeroing, export and batch loading.
//!
//! Thresholds, DOF names and worker counts are plain values passed in by
//! callers; nothing is read from global state.

use crate::constants::{DEMO_HEADINGS, DOF_NAMES};
use serde::{Deserialize, Serialize};

/// Phase suppression thresholds mimicking the VERES viewer
///
/// Rotational thresholds are expressed in deg/m.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseZeroingConfig {
    /// Master switch
    pub enable: bool,

    /// Surge, sway and heave threshold [m/m]
    pub trans_thresh: f64,

    /// Roll threshold [deg/m]
    pub roll_thresh: f64,

    /// Pitch threshold [deg/m]
    pub pitch_thresh: f64,

    /// Yaw threshold [deg/m]
    pub yaw_thresh: f64,

    /// Always report surge phase as zero
    pub force_surge_zero: bool,
}

impl Default for PhaseZeroingConfig {
    fn default() -> Self {
        Self {
            enable: true,
            trans_thresh: 1e-7,
            // Roll stays at zero while pitch/yaw are set; matches the viewer.
            roll_thresh: 0.0,
            pitch_thresh: 0.0030,
            yaw_thresh: 0.0040,
            force_surge_zero: false,
        }
    }
}

impl PhaseZeroingConfig {
    /// A config that never alters a phase
    pub fn disabled() -> Self {
        Self {
            enable: false,
            ..Self::default()
        }
    }

    pub fn with_trans_thresh(mut self, thresh: f64) -> Self {
        self.trans_thresh = thresh;
        self
    }

    pub fn with_rotational_thresholds(mut self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.roll_thresh = roll;
        self.pitch_thresh = pitch;
        self.yaw_thresh = yaw;
        self
    }

    pub fn with_force_surge_zero(mut self) -> Self {
        self.force_surge_zero = true;
        self
    }
}

/// Display names for DOF indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DofNames(pub Vec<String>);

impl Default for DofNames {
    fn default() -> Self {
        Self(DOF_NAMES.iter().map(|name| name.to_string()).collect())
    }
}

impl DofNames {
    /// Name for a DOF index, `DOF{n}` when no name is configured
    pub fn name(&self, index: usize) -> String {
        self.0
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("DOF{}", index + 1))
    }

    /// Names for the first `ndof` indices
    pub fn take(&self, ndof: usize) -> Vec<String> {
        (0..ndof).map(|i| self.name(i)).collect()
    }
}

/// Options for the tidy conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyOptions {
    /// Convert roll/pitch/yaw amplitudes from rad/m to deg/m
    pub convert_rot_to_deg_per_m: bool,

    /// Optional phase zeroing applied to each record
    pub phase_zeroing: Option<PhaseZeroingConfig>,

    pub dof_names: DofNames,
}

impl Default for TidyOptions {
    fn default() -> Self {
        Self {
            convert_rot_to_deg_per_m: true,
            phase_zeroing: None,
            dof_names: DofNames::default(),
        }
    }
}

impl TidyOptions {
    pub fn with_phase_zeroing(mut self, config: PhaseZeroingConfig) -> Self {
        self.phase_zeroing = Some(config);
        self
    }

    /// Keep rotational amplitudes in rad/m
    pub fn in_rad_per_m(mut self) -> Self {
        self.convert_rot_to_deg_per_m = false;
        self
    }
}

/// Options for workbook export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Convert roll/pitch/yaw amplitudes from rad/m to deg/m
    pub convert_rot_to_deg_per_m: bool,

    /// Phase zeroing, on by default to match the viewer output
    pub phase_zeroing: Option<PhaseZeroingConfig>,

    pub dof_names: DofNames,

    /// Prepended to every sheet name as `{prefix}_H{heading}`
    pub sheet_name_prefix: Option<String>,

    /// Run name used when the file carries no identifier lines
    pub fallback_run_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            convert_rot_to_deg_per_m: true,
            phase_zeroing: Some(PhaseZeroingConfig::default()),
            dof_names: DofNames::default(),
            sheet_name_prefix: None,
            fallback_run_name: "unnamed run".to_string(),
        }
    }
}

impl ExportConfig {
    /// Keep the exact atan2 phase everywhere
    pub fn without_phase_zeroing(mut self) -> Self {
        self.phase_zeroing = None;
        self
    }

    pub fn with_phase_zeroing(mut self, config: PhaseZeroingConfig) -> Self {
        self.phase_zeroing = Some(config);
        self
    }

    pub fn with_sheet_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sheet_name_prefix = Some(prefix.into());
        self
    }

    pub fn with_fallback_run_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_run_name = name.into();
        self
    }
}

/// Configuration for loading a folder of .re1 files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Number of files parsed concurrently
    pub workers: usize,

    /// Speed block converted into each study's tidy table
    pub speed_index: usize,

    /// Headings of the placeholder study substituted for unreadable files
    pub demo_headings: Vec<f64>,

    /// Show a progress bar while loading
    pub show_progress: bool,

    pub tidy: TidyOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            speed_index: 0,
            demo_headings: DEMO_HEADINGS.to_vec(),
            show_progress: false,
            tidy: TidyOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_speed_index(mut self, speed_index: usize) -> Self {
        self.speed_index = speed_index;
        self
    }

    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    pub fn with_tidy_options(mut self, tidy: TidyOptions) -> Self {
        self.tidy = tidy;
        self
    }
}
