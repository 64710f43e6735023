//! Leaf converters: raw element text to typed values.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::data::Data;
use crate::error::BuildError;

/// A single port, a `from:to`/`from-to` range, or a named service/alias.
static PORT_STRING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:[:-]\d+)?|[A-Za-z0-9_]+)$").expect("port pattern is valid")
});

/// How a leaf element's text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Verbatim text.
    Text,
    /// Base-10 integer.
    Integer,
    /// Unix epoch seconds, fractions allowed.
    Timestamp,
    /// Integer where zero reads as absent and anything else as `true`.
    Flag,
    /// Validated port or port range, resolved against aliases on read.
    Port,
    /// Content is discarded; only the element's presence counts (`<any/>`).
    Presence,
    /// Text resolved against the alias collection on read.
    AliasRef,
    /// Text resolved against interface slots, then aliases, on read.
    InterfaceRef,
    /// Comma-separated interface names, each resolved against interface slots.
    InterfaceList,
}

/// Converted leaf content.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
    Flag(bool),
}

/// Which conversion rejected the text; [`ScalarError::at`] adds the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarError {
    Integer,
    Timestamp,
    Port,
}

impl ScalarError {
    pub fn at(self, path: &str, value: &str) -> BuildError {
        let path = path.to_string();
        let value = value.to_string();
        match self {
            ScalarError::Integer => BuildError::InvalidInteger { path, value },
            ScalarError::Timestamp => BuildError::InvalidTimestamp { path, value },
            ScalarError::Port => BuildError::InvalidPort { path, value },
        }
    }
}

impl ScalarKind {
    /// Convert element text. `Ok(None)` means the kind keeps no value.
    pub fn convert(self, text: &str) -> Result<Option<ScalarValue>, ScalarError> {
        let value = match self {
            ScalarKind::Text
            | ScalarKind::AliasRef
            | ScalarKind::InterfaceRef
            | ScalarKind::InterfaceList => ScalarValue::Text(text.to_string()),
            ScalarKind::Integer => ScalarValue::Integer(parse_integer(text)?),
            ScalarKind::Timestamp => ScalarValue::Timestamp(parse_timestamp(text)?),
            ScalarKind::Flag => ScalarValue::Flag(parse_integer(text)? != 0),
            ScalarKind::Port => {
                if !PORT_STRING.is_match(text) {
                    return Err(ScalarError::Port);
                }
                ScalarValue::Text(text.to_string())
            }
            ScalarKind::Presence => return Ok(None),
        };
        Ok(Some(value))
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Text => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Flag => "flag",
            ScalarKind::Port => "port",
            ScalarKind::Presence => "presence",
            ScalarKind::AliasRef => "alias-ref",
            ScalarKind::InterfaceRef => "interface-ref",
            ScalarKind::InterfaceList => "interface-list",
        }
    }
}

impl ScalarValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ScalarValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Projection without any reference lookup.
    pub fn data(&self) -> Data {
        match self {
            ScalarValue::Text(text) => Data::Text(text.clone()),
            ScalarValue::Integer(value) => Data::Integer(*value),
            ScalarValue::Timestamp(value) => Data::Timestamp(*value),
            ScalarValue::Flag(true) => Data::Bool(true),
            ScalarValue::Flag(false) => Data::Absent,
        }
    }
}

fn parse_integer(text: &str) -> Result<i64, ScalarError> {
    text.trim().parse().map_err(|_| ScalarError::Integer)
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, ScalarError> {
    let seconds: f64 = text.trim().parse().map_err(|_| ScalarError::Timestamp)?;
    if !seconds.is_finite() {
        return Err(ScalarError::Timestamp);
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).ok_or(ScalarError::Timestamp)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ScalarError, ScalarKind, ScalarValue};
    use crate::data::Data;

    fn convert(kind: ScalarKind, text: &str) -> Result<Option<ScalarValue>, ScalarError> {
        kind.convert(text)
    }

    #[test]
    fn integers_parse_base_ten() {
        for (text, expected) in [("0", 0), ("42", 42), ("-7", -7), (" 7200 ", 7200)] {
            assert_eq!(
                convert(ScalarKind::Integer, text),
                Ok(Some(ScalarValue::Integer(expected)))
            );
        }
        assert_eq!(convert(ScalarKind::Integer, "12a"), Err(ScalarError::Integer));
        assert_eq!(convert(ScalarKind::Integer, "1.5"), Err(ScalarError::Integer));
    }

    #[test]
    fn zero_timestamp_is_epoch() {
        let value = convert(ScalarKind::Timestamp, "0").expect("convert");
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).single().expect("epoch");
        assert_eq!(value, Some(ScalarValue::Timestamp(epoch)));
    }

    #[test]
    fn fractional_timestamp_keeps_subseconds() {
        let Some(ScalarValue::Timestamp(at)) =
            convert(ScalarKind::Timestamp, "1700000000.25").expect("convert")
        else {
            panic!("expected timestamp");
        };
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_millis(), 250);
        assert_eq!(
            convert(ScalarKind::Timestamp, "yesterday"),
            Err(ScalarError::Timestamp)
        );
        assert_eq!(convert(ScalarKind::Timestamp, "inf"), Err(ScalarError::Timestamp));
    }

    #[test]
    fn flag_zero_is_absent_and_nonzero_is_true() {
        let off = convert(ScalarKind::Flag, "0").expect("convert").expect("value");
        assert_eq!(off.data(), Data::Absent);
        for text in ["1", "2", "-1"] {
            let on = convert(ScalarKind::Flag, text).expect("convert").expect("value");
            assert_eq!(on.data(), Data::Bool(true));
        }
        assert_eq!(convert(ScalarKind::Flag, "yes"), Err(ScalarError::Integer));
    }

    #[test]
    fn port_strings_validate() {
        for text in ["80", "80:443", "80-443", "http", "WEB_PORTS"] {
            assert!(convert(ScalarKind::Port, text).is_ok(), "{text} should be valid");
        }
        for text in ["80;443", "80:", ":443", "80 443", ""] {
            assert_eq!(convert(ScalarKind::Port, text), Err(ScalarError::Port), "{text}");
        }
    }

    #[test]
    fn presence_discards_content() {
        assert_eq!(convert(ScalarKind::Presence, "1"), Ok(None));
    }

    #[test]
    fn error_carries_path_and_value() {
        let err = ScalarError::Port.at("opnsense.filter.rule[0].source.port", "80;443");
        assert_eq!(err.path(), "opnsense.filter.rule[0].source.port");
        assert_eq!(err.value(), "80;443");
        assert!(err.to_string().contains("80;443"));
    }
}
