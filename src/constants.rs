//! Application constants for the .re1 processor
//!
//! Format markers, tolerances, unit factors, column names and default
//! values shared by the parser, the analysis helpers and the exporters.

use std::f64::consts::PI;

// =============================================================================
// File Format Markers
// =============================================================================

/// Banner that opens the motion transfer function section (matched case-insensitively)
pub const BANNER_TEXT: &str = "MOTION TRANSFER FUNCTIONS";

/// Marker on interleaved frequency lines (matched case-insensitively)
pub const FREQ_MARKER: &str = "FREQ";

/// File extensions recognised during discovery
pub const RE1_EXTENSIONS: &[&str] = &["re1", "RE1"];

/// Default DOF count when the run-size line carries only three integers
pub const DEFAULT_NDOF: usize = 6;

/// Largest DOF count a .re1 file may declare
pub const MAX_NDOF: usize = 6;

/// Maximum deviation between a heading's frequencies and the first heading's
pub const FREQ_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Units and Conventions
// =============================================================================

/// Rotational RAO conversion rad/m -> deg/m
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Threshold conversion deg/m -> rad/m
pub const DEG_TO_RAD: f64 = PI / 180.0;

/// Metres per second to knots
pub const KNOTS_PER_MS: f64 = 1.943_844_492_440_6;

/// Index of the first rotational DOF (roll)
pub const FIRST_ROTATIONAL_DOF: usize = 3;

/// Conventional DOF names in file order
pub const DOF_NAMES: &[&str] = &["Surge", "Sway", "Heave", "Roll", "Pitch", "Yaw"];

// =============================================================================
// Column Name Constants
// =============================================================================

/// Tidy table column names
pub mod columns {
    pub const STUDY: &str = "study";
    pub const HEADING_DEG: &str = "heading_deg";
    pub const DOF: &str = "dof";
    pub const OMEGA_RAD_S: &str = "omega_rad_s";
    pub const FREQ_HZ: &str = "freq_hz";
    pub const PERIOD_S: &str = "period_s";
    pub const AMPLITUDE: &str = "amplitude";
    pub const PHASE_DEG: &str = "phase_deg";

    /// Tidy schema in output order (without the study column)
    pub const TIDY: &[&str] = &[
        HEADING_DEG,
        DOF,
        OMEGA_RAD_S,
        FREQ_HZ,
        PERIOD_S,
        AMPLITUDE,
        PHASE_DEG,
    ];
}

// =============================================================================
// Analysis Defaults
// =============================================================================

/// Rolling mean window used by the smoother
pub const SMOOTHING_WINDOW: usize = 3;

/// Heading match tolerance when extracting a single curve [deg]
pub const HEADING_TOLERANCE_DEG: f64 = 0.01;

/// Period window used when no study provides finite periods [s]
pub const PERIOD_WINDOW_DEFAULT: (f64, f64) = (3.0, 60.0);

/// Headings used for synthetic placeholder studies [deg]
pub const DEMO_HEADINGS: &[f64] = &[0.0, 45.0, 90.0, 135.0, 180.0];

/// Number of samples in a synthetic placeholder curve
pub const DEMO_CURVE_SAMPLES: usize = 120;

// =============================================================================
// Workbook Export
// =============================================================================

/// Longest sheet name accepted by spreadsheet applications
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Number format applied to every numeric data cell
pub const DATA_NUMBER_FORMAT: &str = "0.000000";

/// DOF column groups always laid out in an exported sheet
pub const EXPORT_DOF_SLOTS: usize = 6;

// =============================================================================
// Discovery
// =============================================================================

/// Folder names recognised as a parameter study root (case-insensitive)
pub const PARAM_STUDY_DIR_HINTS: &[&str] = &[
    "ParameterStudy",
    "Parameter Study",
    "Parameter_Study",
    "ParameterStudies",
    "ParamStudy",
    "Param_Study",
];

/// Run folder names such as `0-20251111144055` or `run-20251111...`
pub const RUN_DIR_PATTERN: &str = r"(?i)^(?:0-|run-)?\d{8,}$";

/// Check whether a DOF index is rotational (roll, pitch, yaw)
pub fn is_rotational(dof_index: usize) -> bool {
    dof_index >= FIRST_ROTATIONAL_DOF
}
