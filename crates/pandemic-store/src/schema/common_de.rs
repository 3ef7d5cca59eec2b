use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Format of the timeline dates, e.g., `March 11, 2020`.
pub const LONG_DATE: &str = "%B %d, %Y";

/// Calendar date from any of the shapes found in the store:
///
/// ```text
///     "2020-03-16"
///     "2020-03-16T04:00:00Z"
///     "2020-03-16T04:00:00"   (also space separated, or without seconds)
///     "March 16, 2020"
///     1584331200              (unix seconds)
///     { "$date": ... }        (MongoDB extended JSON, as exported)
/// ```
///
/// Timestamps keep their own calendar date; no timezone conversion is applied.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(num) => num
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.date_naive()),
        Value::Object(map) => match map.get("$date")? {
            Value::String(s) => parse_date_str(s),
            Value::Number(num) => num.as_i64().and_then(from_millis),
            Value::Object(inner) => inner
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|ms| ms.parse::<i64>().ok())
                .and_then(from_millis),
            _ => None,
        },
        _ => None,
    }
}

fn from_millis(ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

/// ISO 8601 datetimes without an offset, `T` or space separated, with or without seconds.
const NAIVE_DATETIMES: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NAIVE_DATETIMES
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(s, LONG_DATE).ok())
}

/// Deserialize a date with [`parse_date`].
pub fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    parse_date(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised date: {value}")))
}

/// The timeline's `news` field: a list of strings, or `None` for anything else
/// (missing, `null`, a bare string, a list holding non-strings).
pub fn de_news<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    let news = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => None,
    };
    Ok(news)
}

/// A number, or `None` for `null`, missing, non-numeric or non-finite values.
pub fn de_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    let number = match value {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn dates_in_every_stored_shape() {
        assert_eq!(parse_date(&json!("2020-03-16")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("2020-03-16T04:00:00Z")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("2020-03-16T04:00:00-04:00")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("2020-03-16T04:00:00")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("2020-03-16 04:00:00.5")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("2020-03-16T04:00")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!("March 16, 2020")), Some(day("2020-03-16")));
        assert_eq!(parse_date(&json!(1584331200)), Some(day("2020-03-16")));
        assert_eq!(
            parse_date(&json!({ "$date": "2020-03-16T04:00:00Z" })),
            Some(day("2020-03-16"))
        );
        assert_eq!(
            parse_date(&json!({ "$date": { "$numberLong": "1584331200000" } })),
            Some(day("2020-03-16"))
        );
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(parse_date(&json!("16/03/2020")), None);
        assert_eq!(parse_date(&json!(null)), None);
        assert_eq!(parse_date(&json!({ "$oid": "5e6f1a2b3c4d5e6f7a8b9c0d" })), None);
    }
}
