//! Record timestamps
//!
//! Timestamps keep the UTC offset they were written with, so rewriting a file leaves
//! untouched records byte-for-byte the same. They are written in RFC 3339 with the
//! fractional seconds trimmed of trailing zeros (`2025-01-15T10:00:00.5+02:00`,
//! `2025-01-15T10:00:00Z`).

use chrono::{DateTime, FixedOffset, Local, NaiveDate, SecondsFormat};
use serde::{Deserialize, Deserializer, Serializer};

pub type Timestamp = DateTime<FixedOffset>;

/// Current local time with its offset
pub fn now() -> Timestamp {
    Local::now().fixed_offset()
}

/// Value for a timestamp missing from a record: `0001-01-01T00:00:00Z`
pub fn unset() -> Timestamp {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .unwrap_or_default()
}

/// Format as RFC 3339 with the shortest exact fraction
pub fn format(ts: &Timestamp) -> String {
    let full = ts.to_rfc3339_opts(SecondsFormat::Nanos, true);
    let Some(dot) = full.find('.') else {
        return full;
    };
    let offset_start =
        full[dot + 1..].find(|c: char| !c.is_ascii_digit()).map_or(full.len(), |i| dot + 1 + i);

    let fraction = full[dot + 1..offset_start].trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}{}", &full[..dot], &full[offset_start..])
    } else {
        format!("{}.{}{}", &full[..dot], fraction, &full[offset_start..])
    }
}

pub fn serialize<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

/// Custom deserializer: `null` reads as [`unset`]
pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Timestamp>::deserialize(deserializer)?.unwrap_or_else(unset))
}
