//! Worksheet layout for one (speed, heading) pair.
//!
//! The layout is independent of any workbook library: metadata text cells,
//! the two header rows and the numeric data block are computed here and
//! rendered by [`super::workbook`].

use crate::analysis::phase_zeroing::maybe_zero_phase;
use crate::analysis::tidy::dof_amplitude_phase;
use crate::config::ExportConfig;
use crate::constants::{EXPORT_DOF_SLOTS, MAX_SHEET_NAME_LEN, is_rotational};
use crate::error::{Re1Error, Result};
use crate::models::Re1Data;
use std::collections::HashSet;

/// First header row (zero-based, worksheet row 25)
pub const HEADER_ROW: u32 = 24;

/// Second header row (worksheet row 26)
pub const UNIT_ROW: u32 = 25;

/// First data row (worksheet row 28)
pub const DATA_START_ROW: u32 = 27;

/// Column of the first DOF group; column 0 holds the wave frequency
pub const FIRST_DOF_COL: u16 = 1;

/// A text cell in the metadata block
#[derive(Debug, Clone, PartialEq)]
pub struct TextCell {
    pub row: u32,
    pub col: u16,
    pub text: String,
}

impl TextCell {
    fn new(row: u32, col: u16, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            text: text.into(),
        }
    }
}

/// Header group for one DOF slot
#[derive(Debug, Clone, PartialEq)]
pub struct DofGroup {
    pub name: String,
    pub amplitude_unit: &'static str,
}

/// One frequency row: omega then amplitude/phase per DOF slot
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub omega: f64,
    /// `None` for slots beyond the file's ndof
    pub values: Vec<Option<(f64, f64)>>,
}

/// Everything needed to render one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    pub metadata: Vec<TextCell>,
    pub groups: Vec<DofGroup>,
    pub rows: Vec<DataRow>,
}

/// Position relative to the aft perpendicular, e.g. `52.500 m in front of AP`
pub fn format_pos_ap(x_from_ap: f64) -> String {
    let side = if x_from_ap >= 0.0 {
        "in front of AP"
    } else {
        "aft of AP"
    };
    format!("{:.3} m {}", x_from_ap.abs(), side)
}

/// Heading label for sheet names: integral headings drop the decimals
pub fn heading_label(heading: f64) -> String {
    if heading.fract() == 0.0 && heading.abs() < 1e15 {
        format!("{}", heading as i64)
    } else {
        format!("{}", heading)
    }
}

/// `H{heading}` or `{prefix}_H{heading}`
pub fn sheet_base_name(heading: f64, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}_H{}", prefix, heading_label(heading)),
        None => format!("H{}", heading_label(heading)),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Allocates unique, workbook-safe sheet names
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Truncate to the sheet name limit and append `_2`, `_3`, ... on clashes
    ///
    /// The suffix always survives: the base is shortened to make room.
    pub fn unique(&mut self, base: &str) -> String {
        let base: String = base
            .chars()
            .map(|c| match c {
                '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
                c => c,
            })
            .collect();

        let mut name = truncate_chars(&base, MAX_SHEET_NAME_LEN);
        let mut n = 1;
        while self.used.contains(&name.to_lowercase()) {
            n += 1;
            let suffix = format!("_{}", n);
            let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            name = format!("{}{}", truncate_chars(&base, room), suffix);
        }
        self.used.insert(name.to_lowercase());
        name
    }
}

/// Build the layout of one sheet
pub fn build_sheet_layout(
    data: &Re1Data,
    speed_index: usize,
    heading_index: usize,
    config: &ExportConfig,
    name: String,
) -> Result<SheetLayout> {
    let speed = data.speed(speed_index)?;
    let heading = *speed
        .heads
        .get(heading_index)
        .ok_or_else(|| Re1Error::out_of_bounds("heading", heading_index, speed.heads.len()))?;
    let header = &data.header;
    let ndof = speed.rao.ndof();

    let run_name = match header.run_name() {
        name if name.is_empty() => config.fallback_run_name.clone(),
        name => name,
    };

    let mut metadata = vec![
        TextCell::new(0, 0, format!("Transfer functions (RAOs) for Run name:  {}", run_name)),
        TextCell::new(
            2,
            0,
            format!("LPP = {:.3} m, B = {:.3} m", header.lpp, header.breadth),
        ),
        TextCell::new(
            3,
            0,
            format!(
                "COG at {}, 0.000 m from centerline, {:.3} m from baseline",
                format_pos_ap(header.lpp / 2.0 + header.lcg),
                header.vcg
            ),
        ),
    ];
    metadata.push(match speed.motion_reference {
        Some(mtn) => TextCell::new(
            4,
            0,
            format!(
                "MTN at {}, 0.000 m from centerline, {:.3} m from baseline",
                format_pos_ap(header.lpp / 2.0 + mtn.xmtn),
                mtn.zmtn
            ),
        ),
        None => TextCell::new(
            4,
            0,
            "MTN position not available in this .re1 file (old format; no XMTN/ZMTN).",
        ),
    });

    let rotation_note = if config.convert_rot_to_deg_per_m {
        "ROTATIONS are divided by wave amplitude (rad/m); amplitudes shown here are converted to deg/m."
    } else {
        "ROTATIONS are divided by wave amplitude (rad/m)."
    };
    metadata.extend([
        TextCell::new(5, 0, format!("Draught {:.3} m", header.draught)),
        TextCell::new(7, 0, "RAOs are presented for COG position"),
        TextCell::new(9, 0, "Data in VERES format conventions:"),
        TextCell::new(10, 0, "Positive SURGE is aft, SWAY is to starboard, HEAVE is up."),
        TextCell::new(
            11,
            0,
            "Positive ROLL is port down, PITCH is bow up and YAW is bow to starboard side.",
        ),
        TextCell::new(12, 0, "PHASE ANGLES are positive in degrees lead to wave amplitude."),
        TextCell::new(13, 0, rotation_note),
        TextCell::new(
            19,
            0,
            "270 degrees are waves from starboard (starboard bow to aft, positive clockwise heading).",
        ),
        TextCell::new(21, 0, "Vessel speed"),
        TextCell::new(21, 1, format!("{:.2}", speed.speed_knots())),
        TextCell::new(21, 2, "[knots]"),
        TextCell::new(22, 0, "Heading"),
        TextCell::new(22, 1, format!("{:.1}", heading)),
        TextCell::new(22, 2, "[deg] off bow"),
    ]);

    let rotational_unit = if config.convert_rot_to_deg_per_m {
        "RAO (deg/m)"
    } else {
        "RAO (rad/m)"
    };
    let groups = (0..EXPORT_DOF_SLOTS)
        .map(|i| DofGroup {
            name: config.dof_names.name(i),
            amplitude_unit: if is_rotational(i) {
                rotational_unit
            } else {
                "RAO (m/m)"
            },
        })
        .collect();

    let rows = speed
        .freqs
        .iter()
        .enumerate()
        .map(|(ifr, &omega)| {
            let values = (0..EXPORT_DOF_SLOTS)
                .map(|dof| {
                    if dof >= ndof {
                        return None;
                    }
                    let value = speed.rao.get(heading_index, ifr, dof)?;
                    let (amplitude, phase) =
                        dof_amplitude_phase(dof, value, config.convert_rot_to_deg_per_m);
                    let phase = match &config.phase_zeroing {
                        Some(zeroing) => maybe_zero_phase(
                            dof,
                            amplitude,
                            phase,
                            zeroing,
                            config.convert_rot_to_deg_per_m,
                        ),
                        None => phase,
                    };
                    Some((amplitude, phase))
                })
                .collect();
            DataRow { omega, values }
        })
        .collect();

    Ok(SheetLayout {
        name,
        metadata,
        groups,
        rows,
    })
}
