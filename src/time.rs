//! Duration values
//!
//! Durations in a device description are either given directly or as text
//! with a unit suffix: `us`, `ms`, `s`, `min` or `h`. A bare number is read
//! in the field's default unit.
//!
//! ```
//! use core::time::Duration;
//! use epaper_binder::time::parse_duration;
//!
//! assert_eq!(parse_duration("200ms", Duration::from_millis(1)), Some(Duration::from_millis(200)));
//! assert_eq!(parse_duration("1.5s", Duration::from_millis(1)), Some(Duration::from_millis(1500)));
//! assert_eq!(parse_duration("10", Duration::from_millis(1)), Some(Duration::from_millis(10)));
//! ```

use alloc::string::String;
use core::time::Duration;

/// Duration as written in a device description
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawDuration {
    /// Already-typed duration
    #[cfg_attr(feature = "serde", serde(skip))]
    Value(Duration),
    /// Number in the field's default unit
    Number(u64),
    /// Text such as `"500ms"` or `"never"`
    Text(String),
}

impl From<Duration> for RawDuration {
    fn from(value: Duration) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for RawDuration {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl From<u64> for RawDuration {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

/// Parse a duration with an optional unit suffix
///
/// Returns `None` for empty, negative or otherwise malformed input.
/// Well-formed values too large to represent saturate at [`Duration::MAX`].
pub fn parse_duration(text: &str, default_unit: Duration) -> Option<Duration> {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    if number.is_empty() {
        return None;
    }

    let unit = match unit.trim() {
        "" => default_unit,
        "us" => Duration::from_micros(1),
        "ms" => Duration::from_millis(1),
        "s" => Duration::from_secs(1),
        "min" => Duration::from_secs(60),
        "h" => Duration::from_secs(3600),
        _ => return None,
    };

    let (whole, frac) = match number.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (number, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    // Only digits remain, so a failed parse is an overflow
    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().unwrap_or(u64::MAX)
    };
    let mut total = saturating_scale(unit, whole);

    // Fractional part, one decimal digit at a time
    let mut scale = unit;
    for digit in frac.chars() {
        let digit = digit.to_digit(10)?;
        scale /= 10;
        total = total.saturating_add(scale.saturating_mul(digit));
    }

    Some(total)
}

/// `unit * count`, clamped to [`Duration::MAX`]
fn saturating_scale(unit: Duration, count: u64) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let nanos = unit.as_nanos().saturating_mul(u128::from(count));
    match u64::try_from(nanos / NANOS_PER_SEC) {
        Ok(secs) => Duration::from_secs(secs).saturating_add(Duration::from_nanos(
            u64::try_from(nanos % NANOS_PER_SEC).unwrap_or_default(),
        )),
        Err(_) => Duration::MAX,
    }
}

/// Resolve a raw duration
///
/// `None` means the text did not parse. Values too large to represent
/// saturate at [`Duration::MAX`].
pub fn resolve(raw: &RawDuration, default_unit: Duration) -> Option<Duration> {
    match raw {
        RawDuration::Value(value) => Some(*value),
        RawDuration::Number(n) => Some(saturating_scale(default_unit, *n)),
        RawDuration::Text(text) => parse_duration(text, default_unit),
    }
}

/// Polling interval of the display component
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateInterval {
    /// Redraw periodically
    Every(Duration),
    /// Only redraw on request
    Never,
}

impl Default for UpdateInterval {
    fn default() -> Self {
        Self::Every(Duration::from_secs(1))
    }
}

impl UpdateInterval {
    /// Resolve an interval, accepting `"never"`
    ///
    /// Bare numbers are read as milliseconds.
    pub fn resolve(raw: &RawDuration) -> Option<Self> {
        if let RawDuration::Text(text) = raw {
            if text.trim().eq_ignore_ascii_case("never") {
                return Some(Self::Never);
            }
        }
        resolve(raw, Duration::from_millis(1)).map(Self::Every)
    }

    /// Period between updates, if any
    pub const fn period(&self) -> Option<Duration> {
        match self {
            Self::Every(period) => Some(*period),
            Self::Never => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_duration("500us", MS), Some(Duration::from_micros(500)));
        assert_eq!(parse_duration("500ms", MS), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2s", MS), Some(Duration::from_secs(2)));
        assert_eq!(parse_duration("1min", MS), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("1h", MS), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_duration("0.5s", MS), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration(".25s", MS), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_bare_number_uses_default_unit() {
        assert_eq!(parse_duration("42", MS), Some(Duration::from_millis(42)));
        assert_eq!(
            parse_duration("42", Duration::from_secs(1)),
            Some(Duration::from_secs(42))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_duration("", MS), None);
        assert_eq!(parse_duration("ms", MS), None);
        assert_eq!(parse_duration("-5ms", MS), None);
        assert_eq!(parse_duration("5 fortnights", MS), None);
        assert_eq!(parse_duration(".", MS), None);
    }

    #[test]
    fn test_parse_saturates_on_overflow() {
        assert_eq!(
            parse_duration("5000000000ms", MS),
            Some(Duration::from_millis(5_000_000_000))
        );
        assert_eq!(
            parse_duration("99999999999999999999999h", MS),
            Some(Duration::MAX)
        );
        assert_eq!(
            resolve(&RawDuration::Number(u64::MAX), Duration::from_secs(3600)),
            Some(Duration::MAX)
        );
    }

    #[test]
    fn test_update_interval_never() {
        assert_eq!(
            UpdateInterval::resolve(&RawDuration::from("never")),
            Some(UpdateInterval::Never)
        );
        assert_eq!(UpdateInterval::Never.period(), None);
    }

    #[test]
    fn test_update_interval_default_is_one_second() {
        assert_eq!(
            UpdateInterval::default().period(),
            Some(Duration::from_secs(1))
        );
    }
}
