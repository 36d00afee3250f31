//! NTFS creation-time codec.
//!
//! NTFS stores creation times as FILETIME values: unsigned 64-bit counts of
//! 100-nanosecond ticks since 1601-01-01T00:00:00 UTC. Depending on the
//! driver that exposed the attribute, the on-disk bytes are either the raw
//! 8-byte little-endian integer or ASCII hexadecimal text with an optional
//! `0x` prefix. This module decodes both encodings, normalizes them to one
//! canonical form, and renders calendar strings for display.

use chrono::{DateTime, Datelike, Duration, Local, Timelike, Utc};

/// 100 ns ticks per second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// FILETIME epoch (1601-01-01T00:00:00Z) expressed in Unix seconds.
const FILETIME_EPOCH_UNIX_SECS: i64 = -11_644_473_600;

/// A decoded creation-time attribute, normalized to canonical form.
///
/// Built once per source file and never mutated. `raw` and `hex` are the two
/// canonical serializations of `ticks`; `readable` is the long display
/// format in the local time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRecord {
    /// Tick count (100 ns units since the FILETIME epoch)
    pub ticks: u64,

    /// Canonical 8-byte little-endian serialization
    pub raw: [u8; 8],

    /// Canonical lowercase `0x`-prefixed hex string, zero-padded to 16 digits
    pub hex: String,

    /// Long human-readable form, e.g. "11th January 2020 at 08:00"
    pub readable: String,
}

impl TimestampRecord {
    /// Build a record from a tick count.
    ///
    /// Returns `None` if the tick count falls outside the representable
    /// calendar range (treated as a codec failure, not an error).
    pub fn from_ticks(ticks: u64) -> Option<Self> {
        let dt = ticks_to_datetime(ticks)?;
        Some(TimestampRecord {
            ticks,
            raw: ticks.to_le_bytes(),
            hex: format!("{:#018x}", ticks),
            readable: format_long(dt),
        })
    }
}

/// Decode a raw attribute value into a timestamp record.
///
/// Two decode strategies are tried in a fixed, documented order; the first
/// success wins:
///
/// 1. exactly 8 bytes: unsigned little-endian 64-bit tick count;
/// 2. ASCII text: trimmed, optional `0x`/`0X` prefix stripped, remainder
///    parsed as hexadecimal.
///
/// A hex-text source is normalized: the returned record carries the
/// canonical 8-byte little-endian form for writing to the destination.
/// Any parse failure at any stage yields `None`, never an error.
pub fn decode_raw_attribute(raw: &[u8]) -> Option<TimestampRecord> {
    decode_binary(raw).or_else(|| decode_hex_text(raw))
}

fn decode_binary(raw: &[u8]) -> Option<TimestampRecord> {
    let bytes: [u8; 8] = raw.try_into().ok()?;
    TimestampRecord::from_ticks(u64::from_le_bytes(bytes))
}

fn decode_hex_text(raw: &[u8]) -> Option<TimestampRecord> {
    let text = std::str::from_utf8(raw).ok()?.trim();
    if !text.is_ascii() {
        return None;
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let ticks = u64::from_str_radix(digits, 16).ok()?;
    TimestampRecord::from_ticks(ticks)
}

/// Convert a tick count to calendar time in UTC.
///
/// Sub-second precision is integer microseconds: the sub-microsecond
/// remainder is truncated, not rounded. Returns `None` when the result is
/// outside chrono's representable range.
pub fn ticks_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    let seconds = (ticks / TICKS_PER_SECOND) as i64;
    let microseconds = ((ticks % TICKS_PER_SECOND) / 10) as i64;
    DateTime::from_timestamp(FILETIME_EPOCH_UNIX_SECS, 0)?
        .checked_add_signed(Duration::seconds(seconds))?
        .checked_add_signed(Duration::microseconds(microseconds))
}

/// Render a UTC time in the local time zone as
/// `"<day><suffix> <full month name> <year> at <HH:MM>"` (24-hour).
pub fn format_long(dt_utc: DateTime<Utc>) -> String {
    let local = dt_utc.with_timezone(&Local);
    format!(
        "{} {} {} at {:02}:{:02}",
        day_with_suffix(local.day()),
        local.format("%B"),
        local.year(),
        local.hour(),
        local.minute()
    )
}

/// Render a UTC time in the local time zone as
/// `"<3-letter weekday> <2-digit day> <3-letter month> <HH:MM:SS>"` (24-hour).
///
/// Used by attribute-reading consumers (file-manager columns), not by the
/// copy pipeline itself; it lives here because it shares the codec.
pub fn format_short(dt_utc: DateTime<Utc>) -> String {
    dt_utc
        .with_timezone(&Local)
        .format("%a %d %b %H:%M:%S")
        .to_string()
}

/// Append the English ordinal suffix to a day of the month.
///
/// Days whose value modulo 100 is 11-13 always take "th"; otherwise the
/// last digit decides (1 "st", 2 "nd", 3 "rd", everything else "th").
pub fn day_with_suffix(day: u32) -> String {
    let suffix = match day % 100 {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{}{}", day, suffix)
}
