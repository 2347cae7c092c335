//! Shared helpers for parsing and formatting table values.

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Separator between entries of the `Mechanics` and `Domains` lists.
pub const LIST_SEPARATOR: &str = ", ";

/// Parse a raw cell as a decimal number.
///
/// Surrounding whitespace is ignored. Empty cells and anything that is not a
/// plain decimal literal yield `f64::NAN`; no thousands separators or units
/// are stripped.
///
/// # Example
///
/// ```rust
/// use tabletop_story::utils::parse_decimal;
///
/// assert_eq!(parse_decimal(" 1980 "), 1980.0);
/// assert!(parse_decimal("n/a").is_nan());
/// assert!(parse_decimal("").is_nan());
/// ```
pub fn parse_decimal(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Split a comma-separated list cell into trimmed, non-empty entries.
pub fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Format a number the way labels and keys show it: integers without a
/// fractional part, everything else with its shortest representation.
pub fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Defined (non-NaN) values of a slice.
pub(crate) fn defined(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// `[min, max]` over defined values, `None` if there are none.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    defined(values).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
