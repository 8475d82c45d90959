//! .re1 prologue parsing.
//!
//! After the banner come a variable number of free-text identifier lines,
//! then the numeric header. Nothing marks the end of the text, so the
//! boundary is found by [`classify`]: the first line with at least two floats
//! whose next non-blank line has at least three floats (`RHOSW GRAV` followed
//! by `LPP BREADTH DRAUGHT`).

use super::cursor::LineCursor;
use super::tokenizer::{parse_floats, parse_ints};
use crate::constants::{BANNER_TEXT, DEFAULT_NDOF, MAX_NDOF};
use crate::error::{Re1Error, Result};
use crate::models::Re1Header;
use tracing::debug;

const RUN_SIZE_FIELD: &str = "NOVEL NOHEAD NOFREQ [NDOF]";

/// Role of a line in the identifier section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Free text describing the run
    Identifier,
    /// The `RHOSW GRAV` line that starts the numeric header
    HeaderBoundary,
}

/// Classify a line given the next non-blank line after it
pub fn classify(line: &str, next_line: Option<&str>) -> LineClass {
    if parse_floats(line).len() < 2 {
        return LineClass::Identifier;
    }
    match next_line {
        Some(next) if parse_floats(next).len() >= 3 => LineClass::HeaderBoundary,
        _ => LineClass::Identifier,
    }
}

/// Parse the banner, identifiers, geometry and run-size integers
pub fn parse_header(cursor: &mut LineCursor<'_>) -> Result<Re1Header> {
    if cursor.seek_past(BANNER_TEXT).is_none() {
        return Err(Re1Error::structural(
            "banner",
            cursor.line_number(),
            format!("Could not find '{}' banner in file", BANNER_TEXT),
        ));
    }

    let mut cardids = Vec::new();
    loop {
        let Some(line) = cursor.peek_non_empty() else {
            return Err(Re1Error::structural(
                "RHOSW GRAV",
                cursor.line_number(),
                "Unexpected end of file while searching for RHOSW/GRAV line",
            ));
        };
        match classify(line, cursor.peek_following_non_empty()) {
            LineClass::HeaderBoundary => break,
            LineClass::Identifier => {
                cardids.push(line.trim().to_string());
                cursor.advance();
            }
        }
    }
    debug!("Collected {} identifier lines", cardids.len());

    let [rho_sw, grav] = take_floats::<2>(cursor, "RHOSW GRAV")?;
    let [lpp, breadth, draught] = take_floats::<3>(cursor, "LPP BREADTH DRAUGHT")?;
    let [lcg, vcg] = take_floats::<2>(cursor, "LCG VCG")?;
    let (novel, nohead, nofreq, ndof) = parse_run_size(cursor)?;

    debug!(
        "Header: novel={}, nohead={}, nofreq={}, ndof={}",
        novel, nohead, nofreq, ndof
    );

    Ok(Re1Header {
        cardids,
        rho_sw,
        grav,
        lpp,
        breadth,
        draught,
        lcg,
        vcg,
        novel,
        nohead,
        nofreq,
        ndof,
    })
}

/// Read the first `N` floats from the next non-blank line
fn take_floats<const N: usize>(
    cursor: &mut LineCursor<'_>,
    field: &'static str,
) -> Result<[f64; N]> {
    let line = cursor.next_non_empty(field)?;
    let values = parse_floats(line);
    if values.len() < N {
        return Err(cursor.error_at_previous(
            field,
            format!("Expected {} floats for {}, found {}", N, field, values.len()),
        ));
    }
    let mut out = [0.0; N];
    out.copy_from_slice(&values[..N]);
    Ok(out)
}

/// `NOVEL NOHEAD NOFREQ [NDOF]`, NDOF defaulting to 6
fn parse_run_size(cursor: &mut LineCursor<'_>) -> Result<(usize, usize, usize, usize)> {
    const FIELD: &str = RUN_SIZE_FIELD;

    let line = cursor.next_non_empty(FIELD)?;
    let ints = parse_ints(line);
    let (novel, nohead, nofreq, ndof) = match ints.as_slice() {
        &[novel, nohead, nofreq, ndof] => (novel, nohead, nofreq, ndof),
        &[novel, nohead, nofreq] => (novel, nohead, nofreq, DEFAULT_NDOF as i64),
        other => {
            return Err(cursor.error_at_previous(
                FIELD,
                format!(
                    "Expected 3 or 4 integers for {}, found {}",
                    FIELD,
                    other.len()
                ),
            ));
        }
    };

    let count = |name: &str, value: i64| -> Result<usize> {
        usize::try_from(value)
            .ok()
            .filter(|&v| v >= 1)
            .ok_or_else(|| {
                cursor.error_at_previous(FIELD, format!("{} must be at least 1, found {}", name, value))
            })
    };
    let novel = count("NOVEL", novel)?;
    let nohead = count("NOHEAD", nohead)?;
    let nofreq = count("NOFREQ", nofreq)?;
    let ndof = count("NDOF", ndof)?;
    if ndof > MAX_NDOF {
        return Err(cursor.error_at_previous(
            FIELD,
            format!("NDOF must be at most {}, found {}", MAX_NDOF, ndof),
        ));
    }

    Ok((novel, nohead, nofreq, ndof))
}

/// Reject run sizes whose RAO lines cannot all be present in the rest of the input
///
/// Every (speed, heading, frequency, dof) cell needs one line of its own, so
/// a header promising more cells than there are lines left is corrupt. Call
/// with the cursor positioned right after the header.
pub fn check_run_size_fits(header: &Re1Header, cursor: &LineCursor<'_>) -> Result<()> {
    let available = cursor.remaining_non_empty();
    let cells = header
        .novel
        .checked_mul(header.nohead)
        .and_then(|n| n.checked_mul(header.nofreq))
        .and_then(|n| n.checked_mul(header.ndof));

    match cells {
        Some(cells) if cells <= available => Ok(()),
        Some(cells) => Err(cursor.error_at_previous(
            RUN_SIZE_FIELD,
            format!(
                "Run size declares {} RAO values but only {} lines remain",
                cells, available
            ),
        )),
        None => Err(cursor.error_at_previous(
            RUN_SIZE_FIELD,
            format!(
                "Run size {} x {} x {} x {} overflows",
                header.novel, header.nohead, header.nofreq, header.ndof
            ),
        )),
    }
}
