//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::{ItineraryId, SegmentId};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Validate an itinerary ID.
///
/// Delegates to [`ItineraryId::parse`] so the CLI and storage agree on the rules.
pub fn validate_itinerary_id(s: &str) -> Result<ItineraryId, String> {
    ItineraryId::parse(s)
}

/// Validate a segment ID.
///
/// Segment IDs are free-form, but must be non-empty and may not contain
/// whitespace or control characters.
pub fn validate_segment_id(s: &str) -> Result<SegmentId, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Segment ID cannot be empty".to_string());
    }

    if let Some(c) = s.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!(
            "Segment ID cannot contain whitespace or control characters (found {c:?})"
        ));
    }

    Ok(SegmentId::new(s))
}

/// Parse a signed duration like `+2h`, `-30m`, `1h30m`, `90s` or `1500ms`.
///
/// Units are `d`, `h`, `m`, `s` and `ms`; each number needs one. A missing
/// sign means forward. Returns milliseconds.
pub fn parse_delta(s: &str) -> Result<i64, String> {
    let s = s.trim();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    if body.is_empty() {
        return Err("Delta cannot be empty (expected e.g. +2h, -30m, 1h30m)".to_string());
    }

    let overflow = || format!("Delta '{s}' is too large");
    let mut total: i64 = 0;
    let mut rest = body;

    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("Expected a number in delta '{s}'"));
        }
        let amount: i64 = rest[..digits].parse().map_err(|_| overflow())?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let scale = match unit {
            "d" => MS_PER_DAY,
            "h" => MS_PER_HOUR,
            "m" => MS_PER_MINUTE,
            "s" => MS_PER_SECOND,
            "ms" => 1,
            "" => return Err(format!("Missing unit in delta '{s}' (use d, h, m, s or ms)")),
            other => {
                return Err(format!(
                    "Unknown unit '{other}' in delta '{s}' (use d, h, m, s or ms)"
                ));
            }
        };

        total = amount
            .checked_mul(scale)
            .and_then(|ms| total.checked_add(ms))
            .ok_or_else(overflow)?;
    }

    Ok(if negative { -total } else { total })
}
