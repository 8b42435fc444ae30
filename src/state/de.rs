use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// `null` decodes the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Date field exactly as the backend sent it. Anything that is neither
/// epoch milliseconds nor text lands in `Other` instead of failing the
/// surrounding payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Millis(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawDate {
    /// Epoch milliseconds, or None when the value is not a date.
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            RawDate::Millis(ms) => Some(*ms),
            RawDate::Text(text) => parse_timestamp_ms(text),
            RawDate::Other(_) => None,
        }
    }
}

/// Parse a timestamp to epoch milliseconds.
///
/// RFC 3339 first, then zone-less date-times and bare dates read as UTC.
pub fn parse_timestamp_ms(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).timestamp_millis());
    }

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDNIGHT_2030: i64 = 1_893_456_000_000;

    #[test]
    fn test_parse_rfc3339_and_fallbacks() {
        assert_eq!(parse_timestamp_ms("2030-01-01T00:00:00Z"), Some(MIDNIGHT_2030));
        assert_eq!(parse_timestamp_ms("2030-01-01T01:00:00+01:00"), Some(MIDNIGHT_2030));
        assert_eq!(parse_timestamp_ms("2030-01-01T00:00:00.000"), Some(MIDNIGHT_2030));
        assert_eq!(parse_timestamp_ms("2030-01-01 00:00:00"), Some(MIDNIGHT_2030));
        assert_eq!(parse_timestamp_ms(" 2030-01-01 "), Some(MIDNIGHT_2030));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp_ms("next tuesday"), None);
        assert_eq!(parse_timestamp_ms("2030-13-01"), None);
        assert_eq!(parse_timestamp_ms(""), None);
    }

    #[test]
    fn test_raw_date_variants() {
        let millis: RawDate = serde_json::from_str("1893456000000").unwrap();
        assert_eq!(millis, RawDate::Millis(MIDNIGHT_2030));
        assert_eq!(millis.to_millis(), Some(MIDNIGHT_2030));

        let text: RawDate = serde_json::from_str(r#""2030-01-01""#).unwrap();
        assert_eq!(text.to_millis(), Some(MIDNIGHT_2030));

        let other: RawDate = serde_json::from_str(r#"{"$date": 5}"#).unwrap();
        assert!(matches!(other, RawDate::Other(_)));
        assert_eq!(other.to_millis(), None);

        let flag: RawDate = serde_json::from_str("true").unwrap();
        assert_eq!(flag.to_millis(), None);
    }

    #[derive(Debug, Deserialize)]
    struct Labelled {
        #[serde(default, deserialize_with = "null_as_default")]
        label: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn test_null_as_default() {
        let l: Labelled = serde_json::from_str(r#"{"label": null, "tags": null}"#).unwrap();
        assert_eq!(l.label, "");
        assert!(l.tags.is_empty());

        let l: Labelled = serde_json::from_str(r#"{"label": "x"}"#).unwrap();
        assert_eq!(l.label, "x");
    }
}
