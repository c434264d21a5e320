//! Output sanitation for laser-cutter consumers.
//!
//! The control software that loads exported SVG tolerates neither `NaN` nor
//! `Infinity` tokens nor non-ASCII bytes in path data, and external path
//! sources (the raster-trace endpoint, uploaded logos) are untrusted.
//! Everything written into an export or accepted into the document as path
//! data passes through here. Sanitization is a fixed point: clean input
//! comes back unchanged.

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod sanitize_test;

use crate::consts::INFINITY_SENTINEL;

/// Characters allowed in externally sourced path data: the SVG path command
/// letters plus number syntax and separators. Anything else (markup, script,
/// `NaN`/`Infinity` spellings) fails the check by omission.
const PATH_ALLOWED: &str = "MmLlHhVvCcSsQqTtAaZz0123456789.,+-eE \t\n\r";

/// Render a number for path output: `NaN` becomes `0`, infinities become a
/// large finite sentinel, and finite values are trimmed to at most three
/// decimals.
#[must_use]
pub fn sanitize_number(value: f64) -> String {
    if value.is_nan() {
        return "0".to_owned();
    }
    if value.is_infinite() {
        let sentinel = if value > 0.0 { INFINITY_SENTINEL } else { -INFINITY_SENTINEL };
        return trim_decimal(sentinel);
    }
    trim_decimal(value)
}

/// Scrub a path-data string: strip non-ASCII characters and replace literal
/// `NaN` / `Infinity` tokens with safe finite spellings.
#[must_use]
pub fn sanitize_path_data(d: &str) -> String {
    let ascii: String = d.chars().filter(char::is_ascii).collect();
    ascii
        .replace("-Infinity", &trim_decimal(-INFINITY_SENTINEL))
        .replace("Infinity", &trim_decimal(INFINITY_SENTINEL))
        .replace("NaN", "0")
}

/// Vet path data from an external source (trace endpoint, upload) before it
/// becomes an element. Rejects empty input and any character outside the
/// path-data alphabet — which also excludes markup and `NaN`/`Infinity`.
#[must_use]
pub fn is_safe_external_path(d: &str) -> bool {
    !d.trim().is_empty() && d.chars().all(|ch| PATH_ALLOWED.contains(ch))
}

/// Format with up to three decimals, trailing zeros trimmed; `-0` folds to
/// `0`.
fn trim_decimal(value: f64) -> String {
    let mut s = format!("{value:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_owned() } else { s }
}
