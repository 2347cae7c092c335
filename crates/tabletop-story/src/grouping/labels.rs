//! Human-readable forms of bin labels.

use once_cell::sync::Lazy;
use regex::Regex;

// Matches "[min, max)" and the singleton "[v)"
static BIN_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\[\(]\s*(-?\d+(?:\.\d+)?)\s*(?:,\s*(-?\d+(?:\.\d+)?)\s*)?[\]\)]$")
        .expect("Invalid regex: bin label")
});

/// Turn `"[1970, 1990)"` into `"1970 - 1990"` and `"[1990)"` into `"1990"`.
///
/// Labels that are not interval-shaped are returned unchanged.
pub fn display_label(label: &str) -> String {
    match BIN_LABEL.captures(label.trim()) {
        Some(caps) => {
            let bounds: Vec<&str> = caps
                .iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .collect();
            bounds.join(" - ")
        }
        None => label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_label() {
        assert_eq!(display_label("[1970, 1990)"), "1970 - 1990");
        assert_eq!(display_label("[-3500, 0)"), "-3500 - 0");
    }

    #[test]
    fn test_singleton_label() {
        assert_eq!(display_label("[1990)"), "1990");
    }

    #[test]
    fn test_other_labels_unchanged() {
        assert_eq!(display_label("Ancient"), "Ancient");
        assert_eq!(display_label(""), "");
    }
}
