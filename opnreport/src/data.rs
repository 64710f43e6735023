//! Plain values produced by the data projection.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Read-only projection of a typed node.
///
/// Serializes as plain JSON: `Absent` becomes `null`, timestamps RFC 3339.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Data {
    #[default]
    Absent,
    Bool(bool),
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<Data>),
    Map(BTreeMap<String, Data>),
}

impl Data {
    pub fn text(value: impl Into<String>) -> Self {
        Data::Text(value.into())
    }

    /// Single-entry mapping, the shape resolvers use (`{alias: ...}`).
    pub fn tagged(key: &str, value: Data) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key.to_string(), value);
        Data::Map(map)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Data::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Data::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Data]> {
        match self {
            Data::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Data>> {
        match self {
            Data::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mapping lookup; `Absent` for non-mappings and missing keys.
    pub fn get(&self, key: &str) -> &Data {
        const ABSENT: &Data = &Data::Absent;
        self.as_map().and_then(|map| map.get(key)).unwrap_or(ABSENT)
    }

    /// Short human name of a value.
    ///
    /// Resolved references answer with the name they were resolved from, a
    /// rule location with its label, everything else with its display form.
    pub fn label(&self) -> String {
        if let Some(name) = self.get("alias").get("name").as_str() {
            return name.to_string();
        }
        if let Some(name) = self.get("interface").get("name").as_str() {
            return name.to_string();
        }
        if let Some(label) = self.get("location").as_str() {
            return label.to_string();
        }
        self.to_string()
    }
}

impl Display for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Data::Absent => Ok(()),
            Data::Bool(value) => write!(f, "{value}"),
            Data::Integer(value) => write!(f, "{value}"),
            Data::Text(value) => f.write_str(value),
            Data::Timestamp(value) => {
                f.write_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Data::List(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Data::Map(map) => {
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::Data;

    #[test]
    fn absent_serializes_as_null() {
        let value = Data::List(vec![Data::Absent, Data::Bool(true), Data::text("x")]);
        assert_eq!(
            serde_json::to_string(&value).expect("json"),
            r#"[null,true,"x"]"#
        );
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let epoch = Utc.timestamp_opt(0, 0).single().expect("epoch");
        let json = serde_json::to_string(&Data::Timestamp(epoch)).expect("json");
        assert_eq!(json, r#""1970-01-01T00:00:00Z""#);
        assert_eq!(Data::Timestamp(epoch).to_string(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn label_prefers_resolved_names() {
        let alias = Data::tagged(
            "alias",
            Data::tagged("name", Data::text("LAN_NET")),
        );
        assert_eq!(alias.label(), "LAN_NET");
        assert_eq!(Data::text("10.0.0.1").label(), "10.0.0.1");
        assert_eq!(Data::Absent.label(), "");
    }

    #[test]
    fn get_on_non_map_is_absent() {
        assert!(Data::text("x").get("alias").is_absent());
    }
}
