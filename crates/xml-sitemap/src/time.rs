//! Last-modified values: caller input, validation and rendering.

use crate::error::{Result, SitemapError};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};
use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// ISO 8601 profile: calendar, week and ordinal dates, optional time of day
/// with fractions, optional `Z` or numeric offset. Group 3 and group 17 are
/// back-referenced to keep separators consistent.
static ISO8601_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^([\+-]?\d{4}(?!\d{2}\b))",
        r"((-?)((0[1-9]|1[0-2])(\3([12]\d|0[1-9]|3[01]))?|W([0-4]\d|5[0-2])(-?[1-7])?",
        r"|(00[1-9]|0[1-9]\d|[12]\d{2}|3([0-5]\d|6[1-6])))",
        r"([T\s]((([01]\d|2[0-3])((:?)[0-5]\d)?|24:?00)([\.,]\d+(?!:))?)?",
        r"(\17[0-5]\d([\.,]\d+)?)?([zZ]|([\+-])([01]\d|2[0-3]):?([0-5]\d)?)?)?)?$",
    ))
    .unwrap()
});

/// Check a string against the ISO 8601 profile used for `lastmod` values.
pub fn is_iso8601(value: &str) -> bool {
    ISO8601_RE.is_match(value).unwrap_or(false)
}

/// A last-modified value as supplied by the caller.
///
/// `Other` only shows up when options are deserialized from untyped input
/// (a JSON number, say) and is always rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
    Text(String),
    Time(DateTime<Utc>),
    Date(NaiveDate),
    Other(serde_json::Value),
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(value: DateTime<Utc>) -> Self {
        TimeInput::Time(value)
    }
}

impl From<DateTime<FixedOffset>> for TimeInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        TimeInput::Time(value.with_timezone(&Utc))
    }
}

impl From<NaiveDate> for TimeInput {
    fn from(value: NaiveDate) -> Self {
        TimeInput::Date(value)
    }
}

impl From<&str> for TimeInput {
    fn from(value: &str) -> Self {
        TimeInput::Text(value.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(value: String) -> Self {
        TimeInput::Text(value)
    }
}

/// A validated last-modified value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Timestamp {
    /// A point in time, rendered in UTC.
    At(DateTime<Utc>),
    /// A caller-formatted string, rendered exactly as given.
    Verbatim(String),
}

impl Timestamp {
    /// Validate caller input for the named field.
    ///
    /// Dates become midnight UTC. Strings are kept verbatim; when `validate`
    /// is set they must match the ISO 8601 profile first.
    pub fn parse(input: TimeInput, validate: bool, field: &'static str) -> Result<Self> {
        match input {
            TimeInput::Time(at) => Ok(Timestamp::At(at)),
            TimeInput::Date(date) => Ok(Timestamp::At(date.and_time(NaiveTime::MIN).and_utc())),
            TimeInput::Text(text) => {
                if validate && !is_iso8601(&text) {
                    return Err(SitemapError::InvalidTimeFormat { field, value: text });
                }
                Ok(Timestamp::Verbatim(text))
            }
            TimeInput::Other(_) => Err(SitemapError::InvalidTimeType { field }),
        }
    }

    /// Text used inside `lastmod` and the video date elements.
    pub fn lastmod_value(&self) -> Cow<'_, str> {
        match self {
            Timestamp::At(at) => Cow::Owned(format_utc(at)),
            Timestamp::Verbatim(text) => Cow::Borrowed(text),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lastmod_value())
    }
}

/// Format a point in time as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_utc(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso8601_accepts_profile() {
        for value in [
            "2011",
            "2011-06",
            "2011-06-01",
            "20110601",
            "2011-06-01T00:00:01Z",
            "2011-06-01T10:20:30.5+02:00",
            "2011-06-01 10:20",
            "2011-W05",
            "2011-W05-3",
            "2011-152",
            "+2011-06-01",
        ] {
            assert!(is_iso8601(value), "{value} should be accepted");
        }
    }

    #[test]
    fn test_iso8601_rejects_garbage() {
        for value in [
            "",
            "June 1st 2011",
            "2011-13-01",
            "2011-06-32",
            "2011/06/01",
            "2011-06-01T25:00",
            "11-06-01",
        ] {
            assert!(!is_iso8601(value), "{value} should be rejected");
        }
    }

    #[test]
    fn test_parse_time_renders_utc() {
        let at = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2011, 6, 1, 2, 0, 1)
            .unwrap();
        let ts = Timestamp::parse(at.into(), true, "updated").unwrap();
        assert_eq!(ts.lastmod_value(), "2011-06-01T00:00:01Z");
    }

    #[test]
    fn test_parse_date_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2011, 6, 1).unwrap();
        let ts = Timestamp::parse(date.into(), true, "updated").unwrap();
        assert_eq!(
            ts,
            Timestamp::At(Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(ts.to_string(), "2011-06-01T00:00:00Z");
    }

    #[test]
    fn test_parse_string_kept_verbatim() {
        let ts = Timestamp::parse("2011-06-01T00:00:01+02:00".into(), true, "updated").unwrap();
        assert_eq!(ts.lastmod_value(), "2011-06-01T00:00:01+02:00");
    }

    #[test]
    fn test_parse_invalid_string() {
        let err = Timestamp::parse("yesterday".into(), true, "updated").unwrap_err();
        assert!(matches!(
            err,
            SitemapError::InvalidTimeFormat { field: "updated", ref value } if value == "yesterday"
        ));
    }

    #[test]
    fn test_parse_without_validation_passes_through() {
        let ts = Timestamp::parse("last tuesday".into(), false, "updated").unwrap();
        assert_eq!(ts, Timestamp::Verbatim("last tuesday".into()));
    }

    #[test]
    fn test_parse_other_is_type_error() {
        let input: TimeInput = serde_json::from_str("1306886401").unwrap();
        let err = Timestamp::parse(input, false, "updated").unwrap_err();
        assert!(matches!(err, SitemapError::InvalidTimeType { field: "updated" }));
    }
}
