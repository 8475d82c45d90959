//! Derived analytics on parsed RAO data.
//!
//! Tidy conversion, optional phase zeroing, smoothing, peak finding and
//! study-level extraction helpers.

pub mod extract;
pub mod peaks;
pub mod phase_zeroing;
pub mod smoothing;
pub mod tidy;

pub use extract::{all_headings, curve_for, curve_near, period_bounds_for};
pub use peaks::{Peak, PeriodWindow, peak_amplitude, peak_in_window};
pub use phase_zeroing::maybe_zero_phase;
pub use smoothing::{centered_mean, smooth_columns, three_point_mean};
pub use tidy::{records_to_dataframe, speed_block_records, tidy_dataframe, tidy_records};
