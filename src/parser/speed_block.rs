//! Speed block parsing with layout detection.
//!
//! Each speed block starts with a condition line and `NOHEAD` heading lines.
//! The RAO data that follows comes in one of two layouts:
//!
//! ```text
//! interleaved                 table-first
//! ----------------------      ----------------------
//! 0.30          (freq 1)      0.30          (freq 1)
//! 1  re  im     (dof 1)       0.40          (freq 2)
//! ...           (ndof lines)  1  re  im     (head 1, freq 1, dof 1)
//! 0.40          (freq 2)      ...
//! 1  re  im                   1  re  im     (head 1, freq 2, dof 1)
//! ...                         ...
//! ```
//!
//! Interleaved is tried first. Every strategy works on its own copy of the
//! cursor and reports a [`StrategyOutcome`]; the orchestrator only commits
//! the cursor of a strategy that parsed the whole block.

use super::cursor::LineCursor;
use super::tokenizer::parse_floats;
use crate::constants::{FREQ_MARKER, FREQ_TOLERANCE};
use crate::error::{Re1Error, Result};
use crate::models::{MotionReference, RaoLayout, RaoTable, RaoValue, Re1Header, SpeedBlock};
use tracing::{debug, warn};

/// Table dimensions shared by both layouts
#[derive(Debug, Clone, Copy)]
struct Dimensions {
    nohead: usize,
    nofreq: usize,
    ndof: usize,
}

impl Dimensions {
    /// Number of RAO cells, `None` on overflow
    fn cells(&self) -> Option<usize> {
        self.nohead
            .checked_mul(self.nofreq)
            .and_then(|n| n.checked_mul(self.ndof))
    }

    /// Buffer size to reserve, never more than the lines left to read
    fn capacity_hint(&self, cursor: &LineCursor<'_>) -> usize {
        self.cells()
            .unwrap_or(0)
            .min(cursor.remaining_non_empty())
    }
}

/// RAO section produced by a successful strategy
#[derive(Debug)]
struct RaoSection<'a> {
    cursor: LineCursor<'a>,
    freqs: Vec<f64>,
    rao: RaoTable,
}

/// Result of running one layout strategy
#[derive(Debug)]
enum StrategyOutcome<'a> {
    Parsed(RaoSection<'a>),
    Rejected(Re1Error),
}

/// Parse one speed block and advance the cursor past it
pub fn parse_speed_block(
    cursor: &mut LineCursor<'_>,
    header: &Re1Header,
    speed_index: usize,
) -> Result<SpeedBlock> {
    let (vel, sink, trim, motion_reference) = parse_condition_line(cursor)?;
    let heads = parse_headings(cursor, header.nohead)?;

    let dims = Dimensions {
        nohead: header.nohead,
        nofreq: header.nofreq,
        ndof: header.ndof,
    };
    let start = *cursor;

    let (section, layout) = match run_strategy(RaoLayout::Interleaved, start, dims) {
        StrategyOutcome::Parsed(section) => (section, RaoLayout::Interleaved),
        StrategyOutcome::Rejected(interleaved) => {
            debug!(
                "Speed block {}: interleaved layout rejected ({}), trying table-first",
                speed_index, interleaved
            );
            match run_strategy(RaoLayout::TableFirst, start, dims) {
                StrategyOutcome::Parsed(section) => (section, RaoLayout::TableFirst),
                StrategyOutcome::Rejected(table_first) => {
                    warn!(
                        "Speed block {}: RAO data matches neither layout",
                        speed_index
                    );
                    return Err(Re1Error::LayoutUnrecognized {
                        speed_index,
                        interleaved: Box::new(interleaved),
                        table_first: Box::new(table_first),
                    });
                }
            }
        }
    };

    debug!(
        "Speed block {}: vel={} m/s, {} headings x {} frequencies ({} layout)",
        speed_index,
        vel,
        heads.len(),
        section.freqs.len(),
        layout
    );

    *cursor = section.cursor;
    Ok(SpeedBlock {
        vel,
        sink,
        trim,
        motion_reference,
        heads,
        freqs: section.freqs,
        rao: section.rao,
        layout,
    })
}

/// `VEL SINK TRIM [XMTN ZMTN]`
fn parse_condition_line(
    cursor: &mut LineCursor<'_>,
) -> Result<(f64, f64, f64, Option<MotionReference>)> {
    const FIELD: &str = "VEL SINK TRIM";

    let line = cursor.next_non_empty(FIELD)?;
    let values = parse_floats(line);
    match values.as_slice() {
        &[vel, sink, trim, xmtn, zmtn, ..] => {
            Ok((vel, sink, trim, Some(MotionReference { xmtn, zmtn })))
        }
        &[vel, sink, trim, ..] => Ok((vel, sink, trim, None)),
        _ => Err(cursor.error_at_previous(
            FIELD,
            format!(
                "Expected at least three floats for {}, found {}",
                FIELD,
                values.len()
            ),
        )),
    }
}

/// `NOHEAD` lines, the heading being the last number on each line
fn parse_headings(cursor: &mut LineCursor<'_>, nohead: usize) -> Result<Vec<f64>> {
    const FIELD: &str = "HEAD";

    let mut heads = Vec::new();
    for _ in 0..nohead {
        let line = cursor.next_non_empty(FIELD)?;
        let heading = parse_floats(line).last().copied().ok_or_else(|| {
            cursor.error_at_previous(FIELD, format!("HEAD line contained no float: '{}'", line))
        })?;
        heads.push(heading);
    }
    Ok(heads)
}

fn run_strategy<'a>(
    layout: RaoLayout,
    cursor: LineCursor<'a>,
    dims: Dimensions,
) -> StrategyOutcome<'a> {
    let result = match layout {
        RaoLayout::Interleaved => parse_interleaved(cursor, dims),
        RaoLayout::TableFirst => parse_table_first(cursor, dims),
    };
    match result {
        Ok(section) => StrategyOutcome::Parsed(section),
        Err(error) => StrategyOutcome::Rejected(error),
    }
}

/// Frequency announced on an interleaved marker line
///
/// Either the only number on the line, or the last number of a line
/// mentioning FREQ.
fn parse_frequency_marker(line: &str) -> Option<f64> {
    let values = parse_floats(line);
    if line.to_uppercase().contains(FREQ_MARKER) {
        if let Some(&last) = values.last() {
            return Some(last);
        }
    }
    match values.as_slice() {
        &[only] => Some(only),
        _ => None,
    }
}

fn parse_interleaved<'a>(mut cursor: LineCursor<'a>, dims: Dimensions) -> Result<RaoSection<'a>> {
    const FIELD: &str = "FREQ";

    let mut freqs: Vec<f64> = Vec::new();
    let mut values = Vec::with_capacity(dims.capacity_hint(&cursor));

    for ih in 0..dims.nohead {
        for ifr in 0..dims.nofreq {
            let line = cursor.next_non_empty(FIELD)?;
            let freq = parse_frequency_marker(line).ok_or_else(|| {
                cursor.error_at_previous(FIELD, format!("Expected FREQ line, got: '{}'", line))
            })?;

            if ih == 0 {
                freqs.push(freq);
            } else if (freq - freqs[ifr]).abs() > FREQ_TOLERANCE {
                return Err(Re1Error::FrequencyConsistency {
                    heading_index: ih,
                    freq_index: ifr,
                    found: freq,
                    expected: freqs[ifr],
                });
            }

            read_dof_block(&mut cursor, dims.ndof, &mut values)?;
        }
    }

    finish_section(cursor, dims, freqs, values)
}

fn parse_table_first<'a>(mut cursor: LineCursor<'a>, dims: Dimensions) -> Result<RaoSection<'a>> {
    const FIELD: &str = "FREQLIST";

    let mut freqs = Vec::new();
    for _ in 0..dims.nofreq {
        let line = cursor.next_non_empty(FIELD)?;
        let freq = parse_floats(line).last().copied().ok_or_else(|| {
            cursor.error_at_previous(
                FIELD,
                format!("Frequency line contained no number: '{}'", line),
            )
        })?;
        freqs.push(freq);
    }

    let mut values = Vec::with_capacity(dims.capacity_hint(&cursor));
    let blocks = dims.nohead.checked_mul(dims.nofreq).ok_or_else(|| {
        cursor.error_at_previous(FIELD, "NOHEAD x NOFREQ overflows")
    })?;
    for _ in 0..blocks {
        read_dof_block(&mut cursor, dims.ndof, &mut values)?;
    }

    finish_section(cursor, dims, freqs, values)
}

/// Read `ndof` lines whose last two numbers are the real and imaginary parts
fn read_dof_block(
    cursor: &mut LineCursor<'_>,
    ndof: usize,
    values: &mut Vec<RaoValue>,
) -> Result<()> {
    const FIELD: &str = "RAO";

    for _ in 0..ndof {
        let line = cursor.next_non_empty(FIELD)?;
        let floats = parse_floats(line);
        match floats.as_slice() {
            &[.., re, im] => values.push(RaoValue::new(re, im)),
            _ => {
                return Err(cursor.error_at_previous(
                    FIELD,
                    format!("Could not parse real/imag on RAO line: '{}'", line),
                ));
            }
        }
    }
    Ok(())
}

fn finish_section<'a>(
    cursor: LineCursor<'a>,
    dims: Dimensions,
    freqs: Vec<f64>,
    values: Vec<RaoValue>,
) -> Result<RaoSection<'a>> {
    let rao = RaoTable::from_flat(dims.nohead, dims.nofreq, dims.ndof, values).ok_or_else(|| {
        cursor.error_at_previous("RAO", "RAO table size does not match NOHEAD x NOFREQ x NDOF")
    })?;
    Ok(RaoSection { cursor, freqs, rao })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_marker_forms() {
        assert_eq!(parse_frequency_marker("0.35"), Some(0.35));
        assert_eq!(parse_frequency_marker("  FREQ NO 3 =  0.35"), Some(0.35));
        assert_eq!(parse_frequency_marker("freq 0.35"), Some(0.35));
        assert_eq!(parse_frequency_marker("1  0.35"), None);
        assert_eq!(parse_frequency_marker("FREQUENCY"), None);
    }
}
