//! Core data structures for parsed .re1 files.
//!
//! Defines the run header, per-speed RAO blocks with their flat
//! `[heading][frequency][dof]` storage, and the derived tidy record.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Run header read from the prologue of a .re1 file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Re1Header {
    /// Free-text identifier lines between the banner and the numeric header
    pub cardids: Vec<String>,
    pub rho_sw: f64,
    pub grav: f64,
    pub lpp: f64,
    pub breadth: f64,
    pub draught: f64,
    pub lcg: f64,
    pub vcg: f64,
    pub novel: usize,
    pub nohead: usize,
    pub nofreq: usize,
    pub ndof: usize,
}

impl Re1Header {
    /// Run name shown in reports: the identifier lines joined by spaces
    pub fn run_name(&self) -> String {
        self.cardids.join(" ").trim().to_string()
    }
}

/// Complex RAO value for one (heading, frequency, dof) cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RaoValue {
    pub re: f64,
    pub im: f64,
}

impl RaoValue {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Modulus of the complex value
    pub fn amplitude(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Argument in degrees, normalised into (-180, 180]
    pub fn phase_deg(&self) -> f64 {
        normalize_phase_deg(self.im.atan2(self.re).to_degrees())
    }
}

/// Wrap a phase angle with `((phase + 180) mod 360) - 180`, reporting -180 as 180
pub fn normalize_phase_deg(phase: f64) -> f64 {
    let wrapped = (phase + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Dense RAO table stored row-major over heading, frequency, then dof
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaoTable {
    nohead: usize,
    nofreq: usize,
    ndof: usize,
    values: Vec<RaoValue>,
}

impl RaoTable {
    /// Build a table from a flat buffer; the length must equal `nohead * nofreq * ndof`
    pub fn from_flat(
        nohead: usize,
        nofreq: usize,
        ndof: usize,
        values: Vec<RaoValue>,
    ) -> Option<Self> {
        let cells = nohead.checked_mul(nofreq)?.checked_mul(ndof)?;
        if values.len() != cells {
            return None;
        }
        Some(Self {
            nohead,
            nofreq,
            ndof,
            values,
        })
    }

    pub fn nohead(&self) -> usize {
        self.nohead
    }

    pub fn nofreq(&self) -> usize {
        self.nofreq
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    fn offset(&self, head: usize, freq: usize, dof: usize) -> Option<usize> {
        (head < self.nohead && freq < self.nofreq && dof < self.ndof)
            .then(|| (head * self.nofreq + freq) * self.ndof + dof)
    }

    /// Get one cell, `None` when any index is out of range
    pub fn get(&self, head: usize, freq: usize, dof: usize) -> Option<RaoValue> {
        self.offset(head, freq, dof).map(|i| self.values[i])
    }

    /// All DOF values for one (heading, frequency) pair
    pub fn dofs(&self, head: usize, freq: usize) -> Option<&[RaoValue]> {
        self.offset(head, freq, 0)
            .map(|start| &self.values[start..start + self.ndof])
    }

    pub fn as_flat(&self) -> &[RaoValue] {
        &self.values
    }
}

/// Which of the two on-disk layouts a speed block was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaoLayout {
    /// A frequency line precedes every block of DOF lines
    Interleaved,
    /// All frequencies are listed once before the DOF blocks
    TableFirst,
}

impl std::fmt::Display for RaoLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RaoLayout::Interleaved => write!(f, "interleaved"),
            RaoLayout::TableFirst => write!(f, "table-first"),
        }
    }
}

/// Motion reference point, present only in newer .re1 files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionReference {
    pub xmtn: f64,
    pub zmtn: f64,
}

/// RAOs for one vessel speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedBlock {
    pub vel: f64,
    pub sink: f64,
    pub trim: f64,
    pub motion_reference: Option<MotionReference>,
    pub heads: Vec<f64>,
    /// Circular wave frequencies [rad/s], shared by every heading
    pub freqs: Vec<f64>,
    pub rao: RaoTable,
    pub layout: RaoLayout,
}

impl SpeedBlock {
    pub fn xmtn(&self) -> Option<f64> {
        self.motion_reference.map(|m| m.xmtn)
    }

    pub fn zmtn(&self) -> Option<f64> {
        self.motion_reference.map(|m| m.zmtn)
    }

    /// Vessel speed in knots
    pub fn speed_knots(&self) -> f64 {
        self.vel * crate::constants::KNOTS_PER_MS
    }
}

/// A fully parsed .re1 file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Re1Data {
    pub header: Re1Header,
    pub speeds: Vec<SpeedBlock>,
}

impl Re1Data {
    /// Get a speed block, failing with a bounds error for unknown indices
    pub fn speed(&self, index: usize) -> crate::error::Result<&SpeedBlock> {
        self.speeds
            .get(index)
            .ok_or_else(|| crate::error::Re1Error::out_of_bounds("speed", index, self.speeds.len()))
    }
}

/// One row of the tidy table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
    pub heading_deg: f64,
    pub dof_index: usize,
    pub dof_name: String,
    pub omega_rad_s: f64,
    pub freq_hz: f64,
    pub period_s: f64,
    pub amplitude: f64,
    pub phase_deg: f64,
}

/// Period [s] and frequency [Hz] for a circular frequency, NaN at zero
pub fn period_and_hz(omega_rad_s: f64) -> (f64, f64) {
    if omega_rad_s == 0.0 {
        (f64::NAN, f64::NAN)
    } else {
        (2.0 * PI / omega_rad_s, omega_rad_s / (2.0 * PI))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RaoTable {
        let values = (0..12).map(|i| RaoValue::new(i as f64, 0.0)).collect();
        RaoTable::from_flat(2, 3, 2, values).unwrap()
    }

    #[test]
    fn test_rao_table_row_major_indexing() {
        let table = table();
        assert_eq!(table.get(0, 0, 1).unwrap().re, 1.0);
        assert_eq!(table.get(1, 0, 0).unwrap().re, 6.0);
        assert_eq!(table.get(1, 2, 1).unwrap().re, 11.0);
        assert!(table.get(2, 0, 0).is_none());
        assert_eq!(table.dofs(0, 1).unwrap().len(), 2);
    }

    #[test]
    fn test_rao_table_rejects_wrong_length() {
        assert!(RaoTable::from_flat(2, 2, 6, vec![RaoValue::default(); 23]).is_none());
        assert!(RaoTable::from_flat(usize::MAX, 2, 6, Vec::new()).is_none());
    }

    #[test]
    fn test_phase_normalisation_range() {
        assert_eq!(RaoValue::new(-1.0, 0.0).phase_deg(), 180.0);
        assert!((RaoValue::new(0.0, 1.0).phase_deg() - 90.0).abs() < 1e-12);
        assert!((RaoValue::new(0.0, -1.0).phase_deg() + 90.0).abs() < 1e-12);
        assert_eq!(normalize_phase_deg(540.0), 180.0);
        assert!((normalize_phase_deg(-190.0) - 170.0).abs() < 1e-12);
    }

    #[test]
    fn test_period_and_hz_at_zero() {
        let (period, hz) = period_and_hz(0.0);
        assert!(period.is_nan());
        assert!(hz.is_nan());

        let (period, hz) = period_and_hz(2.0 * PI);
        assert!((period - 1.0).abs() < 1e-12);
        assert!((hz - 1.0).abs() < 1e-12);
    }
}
