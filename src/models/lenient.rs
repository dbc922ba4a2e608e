//! Lenient field decoders for backend records.
//!
//! The backend stores whatever the old forms submitted, so numbers arrive as
//! JSON numbers or as numeric strings, strings arrive as `null`, and enum
//! fields may hold values this console does not know. These helpers accept
//! all of that and fall back to "absent" instead of rejecting the record.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<serde_json::Value>),
}

/// `null` or missing becomes an empty string.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Empty strings become `None`.
pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.filter(|s| !s.trim().is_empty()))
}

pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<NumberLike>::deserialize(d)?;
    Ok(raw
        .and_then(|raw| match raw {
            NumberLike::Number(n) => Some(n),
            NumberLike::Text(s) => s.trim().parse::<f64>().ok(),
        })
        .filter(|n| n.is_finite()))
}

pub fn opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    Ok(opt_f64(d)?.filter(|n| *n >= 0.0).map(|n| n.round() as u64))
}

pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(opt_u64(d)?.and_then(|n| u32::try_from(n).ok()))
}

/// Unknown or empty choices become `None`.
pub fn opt_choice<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    Ok(Option::<String>::deserialize(d)?.and_then(|s| s.trim().parse::<T>().ok()))
}

/// Unknown or empty choices fall back to the type's default.
pub fn choice_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    Ok(opt_choice(d)?.unwrap_or_default())
}

pub fn active_default() -> bool {
    true
}

/// Records without an explicit flag are active.
pub fn active_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(true))
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC);
/// anything else is treated as absent.
pub fn opt_datetime<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.and_then(|s| parse_timestamp(s.trim())))
}

/// Like [`opt_datetime`], but keeps the offset the backend stored so the
/// calendar date is the one that was written.
pub fn opt_offset_datetime<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.and_then(|s| parse_with_offset(s.trim())))
}

fn parse_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_with_offset(s).map(|dt| dt.with_timezone(&Utc))
}

/// A single reference, a list of references, or populated documents.
///
/// Populated documents contribute their `courseName`, or their `_id` when
/// they have no name.
pub fn references<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let raw = Option::<OneOrMany>::deserialize(d)?;
    Ok(match raw {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(values)) => values.iter().filter_map(reference_name).collect(),
    })
}

fn reference_name(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Object(map) => map
            .get("courseName")
            .or_else(|| map.get("_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "text")]
        name: String,
        #[serde(default, deserialize_with = "opt_u32")]
        duration: Option<u32>,
        #[serde(default, deserialize_with = "opt_f64")]
        fee: Option<f64>,
        #[serde(default = "active_default", deserialize_with = "active_flag")]
        active: bool,
        #[serde(default, deserialize_with = "opt_datetime")]
        created: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "references")]
        courses: Vec<String>,
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.name, "");
        assert_eq!(probe.duration, None);
        assert_eq!(probe.fee, None);
        assert!(probe.active);
        assert!(probe.created.is_none());
        assert!(probe.courses.is_empty());
    }

    #[test]
    fn test_numbers_accept_numeric_strings() {
        let probe: Probe =
            serde_json::from_value(json!({ "duration": "3", "fee": "9000.5" })).unwrap();
        assert_eq!(probe.duration, Some(3));
        assert_eq!(probe.fee, Some(9000.5));
    }

    #[test]
    fn test_garbage_numbers_become_none() {
        let probe: Probe =
            serde_json::from_value(json!({ "duration": "three", "fee": "" })).unwrap();
        assert_eq!(probe.duration, None);
        assert_eq!(probe.fee, None);
    }

    #[test]
    fn test_nulls_are_tolerated() {
        let probe: Probe = serde_json::from_value(json!({
            "name": null,
            "active": null,
            "created": null,
            "courses": null
        }))
        .unwrap();
        assert_eq!(probe.name, "");
        assert!(probe.active);
        assert!(probe.created.is_none());
    }

    #[test]
    fn test_datetime_parses_backend_format() {
        let probe: Probe =
            serde_json::from_value(json!({ "created": "2024-03-09T10:15:00.000Z" })).unwrap();
        let created = probe.created.unwrap();
        assert_eq!(created.format("%d/%m/%Y").to_string(), "09/03/2024");
    }

    #[test]
    fn test_datetime_accepts_bare_date() {
        let probe: Probe = serde_json::from_value(json!({ "created": "2025-06-01" })).unwrap();
        assert_eq!(probe.created.unwrap().format("%Y-%m-%d").to_string(), "2025-06-01");

        let junk: Probe = serde_json::from_value(json!({ "created": "yesterday" })).unwrap();
        assert!(junk.created.is_none());
    }

    #[test]
    fn test_references_accept_all_shapes() {
        let single: Probe = serde_json::from_value(json!({ "courses": "abc123" })).unwrap();
        assert_eq!(single.courses, vec!["abc123"]);

        let many: Probe = serde_json::from_value(json!({
            "courses": ["a1", { "_id": "b2" }, { "_id": "c3", "courseName": "Office Basics" }]
        }))
        .unwrap();
        assert_eq!(many.courses, vec!["a1", "b2", "Office Basics"]);
    }
}
