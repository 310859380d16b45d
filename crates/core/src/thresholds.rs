//! Threshold evaluation for biometric readings.
//!
//! Pure logic: no state, no I/O. Each [`MetricKind`] has one fixed
//! [`ThresholdRule`]; a reading outside the rule's safe range is a warning.

use serde::Serialize;

use crate::metric::MetricKind;

/// Safe range for one metric. A reading strictly below `min` or strictly
/// above `max` is a warning; bounds themselves are safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRule {
    pub kind: MetricKind,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ThresholdRule {
    /// Whether a parsed reading breaches this rule. NaN never breaches.
    pub fn breached_by(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.min.is_some_and(|min| value < min) || self.max.is_some_and(|max| value > max)
    }
}

/// The rule for `kind`.
pub fn rule(kind: MetricKind) -> ThresholdRule {
    match kind {
        MetricKind::Ecg => ThresholdRule {
            kind,
            min: Some(60.0),
            max: Some(100.0),
        },
        MetricKind::HeartRateOrOxygen => ThresholdRule {
            kind,
            min: Some(95.0),
            max: None,
        },
        MetricKind::Fall => ThresholdRule {
            kind,
            min: Some(1.5),
            max: None,
        },
    }
}

/// Whether `value` is a warning for `kind`.
///
/// Empty (or whitespace-only) input reads as `0`. Input with no numeric
/// prefix is never a warning.
pub fn is_warning(kind: MetricKind, value: &str) -> bool {
    match parse_reading(value) {
        Some(v) => rule(kind).breached_by(v),
        None => false,
    }
}

/// [`is_warning`] for a field that may be missing entirely; `None` reads
/// as `0`, same as an empty string.
pub fn is_warning_opt(kind: MetricKind, value: Option<&str>) -> bool {
    is_warning(kind, value.unwrap_or(""))
}

/// Parse a raw reading leniently.
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"72 bpm"` reads as `72.0`. Empty input reads as `0.0`. Returns
/// `None` when there is no numeric prefix.
pub fn parse_reading(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let prefix = numeric_prefix(trimmed);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok()
}

/// Longest prefix of `s` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        i = j;
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts if at least one digit follows it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    &s[..i]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecg_boundaries() {
        assert!(!is_warning(MetricKind::Ecg, "60"));
        assert!(!is_warning(MetricKind::Ecg, "100"));
        assert!(!is_warning(MetricKind::Ecg, "80"));
        assert!(is_warning(MetricKind::Ecg, "59.9"));
        assert!(is_warning(MetricKind::Ecg, "100.1"));
        assert!(is_warning(MetricKind::Ecg, "150"));
    }

    #[test]
    fn heart_rate_oxygen_boundaries() {
        assert!(!is_warning(MetricKind::HeartRateOrOxygen, "95"));
        assert!(!is_warning(MetricKind::HeartRateOrOxygen, "100"));
        assert!(is_warning(MetricKind::HeartRateOrOxygen, "94.99"));
        assert!(is_warning(MetricKind::HeartRateOrOxygen, "80"));
    }

    #[test]
    fn fall_boundaries() {
        assert!(!is_warning(MetricKind::Fall, "1.5"));
        assert!(!is_warning(MetricKind::Fall, "2.0"));
        assert!(is_warning(MetricKind::Fall, "1.49"));
        assert!(is_warning(MetricKind::Fall, "-1"));
    }

    #[test]
    fn missing_or_empty_reads_as_zero() {
        assert!(is_warning(MetricKind::Fall, ""));
        assert!(is_warning(MetricKind::Fall, "   "));
        assert!(is_warning_opt(MetricKind::Fall, None));
        assert!(is_warning_opt(MetricKind::Ecg, None));
        assert!(is_warning_opt(MetricKind::HeartRateOrOxygen, None));
    }

    #[test]
    fn unparsable_is_never_a_warning() {
        for kind in MetricKind::ALL {
            assert!(!is_warning(kind, "abc"), "{kind} should not warn on abc");
            assert!(!is_warning(kind, "-"), "{kind} should not warn on the placeholder");
            assert!(!is_warning(kind, "."));
        }
    }

    #[test]
    fn lenient_prefix_parsing() {
        assert_eq!(parse_reading("72bpm"), Some(72.0));
        assert_eq!(parse_reading("  98.5 % "), Some(98.5));
        assert_eq!(parse_reading("-.5"), Some(-0.5));
        assert_eq!(parse_reading("1e2"), Some(100.0));
        assert_eq!(parse_reading("3e"), Some(3.0));
        assert_eq!(parse_reading("x1"), None);
        assert!(is_warning(MetricKind::Ecg, "120 bpm"));
    }

    #[test]
    fn nan_rule_input_is_safe() {
        assert!(!rule(MetricKind::Ecg).breached_by(f64::NAN));
    }

    #[test]
    fn rules_expose_safe_range() {
        let ecg = rule(MetricKind::Ecg);
        assert_eq!(ecg.min, Some(60.0));
        assert_eq!(ecg.max, Some(100.0));
        assert_eq!(rule(MetricKind::Fall).max, None);
    }
}
