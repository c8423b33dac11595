//! Timestamp conversion at the REST boundary.
//!
//! Outbound timestamps are written as ISO-8601 UTC with millisecond
//! precision (`2024-05-01T10:00:00.000Z`). Inbound text may be any
//! RFC 3339 value and is normalized to UTC.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|ts| ts.with_timezone(&Utc))
}

/// `#[serde(with = "crate::wire::iso8601_opt")]` for `Option<DateTime<Utc>>`.
pub mod iso8601_opt {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&super::format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => super::parse_timestamp(s).map(Some).map_err(de::Error::custom),
        }
    }
}
