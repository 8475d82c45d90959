//! Numeric token extraction for free-form .re1 lines
//!
//! Lines mix labels, index columns and values separated by arbitrary
//! whitespace. Callers decide per line whether they expect integers or
//! floats; nothing here ever fails, an unparseable line just yields no tokens.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static FORTRAN_EXPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9.])[dD]([+-]?[0-9]+)").expect("valid exponent pattern"));

static FLOAT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[EeDd][-+]?[0-9]+)?")
        .expect("valid float pattern")
});

static INT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]+").expect("valid integer pattern"));

/// Rewrite Fortran `D` exponents (`1.5D+02`) to `E` so standard parsing accepts them
pub fn normalize_exponents(line: &str) -> Cow<'_, str> {
    FORTRAN_EXPONENT.replace_all(line, "${1}E${2}")
}

/// Extract every float on a line, accepting `E`, `e`, `D` and `d` exponents
pub fn parse_floats(line: &str) -> Vec<f64> {
    let normalized = normalize_exponents(line);
    FLOAT_TOKEN
        .find_iter(&normalized)
        .filter_map(|m| {
            let token = m.as_str();
            if token.contains(['D', 'd']) {
                token.replace(['D', 'd'], "E").parse::<f64>().ok()
            } else {
                token.parse::<f64>().ok()
            }
        })
        .collect()
}

/// Extract every integer on a line
pub fn parse_ints(line: &str) -> Vec<i64> {
    INT_TOKEN
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<i64>().ok())
        .collect()
}
