use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Ordered list of report sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportLayout {
    #[serde(rename = "section", default)]
    pub sections: Vec<SectionSpec>,
}

/// One `##` section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    /// Dotted member path below `<opnsense>`.
    pub path: String,
    pub layout: SectionLayout,
    /// Link target emitted above the heading, e.g. `aliases` for `#aliases`.
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(rename = "column", default)]
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLayout {
    /// One row per element of the repeated member at `path`.
    Table,
    /// `Option | Value` rows for the fields of the node at `path`.
    Options,
    /// One row per slot of the slot container at `path`.
    Slots,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    pub header: String,
}

impl SectionSpec {
    pub fn fields(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.field.as_str()).collect()
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }
}

/// Errors returned when loading a layout file.
#[derive(Debug, Error)]
pub enum ReportConfigError {
    #[error("failed to read report layout {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse report layout {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a report layout from a TOML file.
pub fn load_report_layout(path: &Path) -> Result<ReportLayout, ReportConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ReportConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_layout(&raw, path.display().to_string())
}

/// Layout compiled into the binary.
pub fn default_report_layout() -> ReportLayout {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/report/sections.toml"));
    match parse_layout(embedded, "embedded layout".to_string()) {
        Ok(layout) if !layout.sections.is_empty() => layout,
        _ => fallback_report_layout(),
    }
}

fn parse_layout(raw: &str, path: String) -> Result<ReportLayout, ReportConfigError> {
    toml::from_str(raw).map_err(|source| ReportConfigError::Parse { path, source })
}

fn columns(pairs: &[(&str, &str)]) -> Vec<ColumnSpec> {
    pairs
        .iter()
        .map(|(field, header)| ColumnSpec {
            field: field.to_string(),
            header: header.to_string(),
        })
        .collect()
}

fn fallback_report_layout() -> ReportLayout {
    ReportLayout {
        sections: vec![
            SectionSpec {
                title: "System".to_string(),
                path: "system".to_string(),
                layout: SectionLayout::Options,
                anchor: None,
                columns: columns(&[("hostname", "Hostname"), ("domain", "Domain")]),
            },
            SectionSpec {
                title: "Filter rules".to_string(),
                path: "filter.rule".to_string(),
                layout: SectionLayout::Table,
                anchor: None,
                columns: columns(&[
                    ("disabled", "Disabled"),
                    ("interface", "Interface"),
                    ("source", "Source"),
                    ("destination", "Destination"),
                    ("descr", "Description"),
                ]),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{default_report_layout, load_report_layout, ReportConfigError, SectionLayout};

    #[test]
    fn embedded_layout_parses() {
        let layout = default_report_layout();
        let titles: Vec<&str> = layout.sections.iter().map(|s| s.title.as_str()).collect();
        assert!(titles.contains(&"Interfaces"));
        assert!(titles.contains(&"Filter rules"));
        let filter = layout
            .sections
            .iter()
            .find(|s| s.path == "filter.rule")
            .expect("filter section");
        assert_eq!(filter.layout, SectionLayout::Table);
        assert_eq!(filter.fields()[0], "disabled");
        assert_eq!(filter.anchor, None);
        let aliases = layout
            .sections
            .iter()
            .find(|s| s.title == "Aliases")
            .expect("alias section");
        assert_eq!(aliases.anchor.as_deref(), Some("aliases"));
    }

    #[test]
    fn loads_layout_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"
[[section]]
title = "Tunables"
path = "sysctl.item"
layout = "table"
anchor = "tunables"
column = [{{ field = "tunable", header = "Tunable" }}]
"#
        )
        .expect("write");
        let layout = load_report_layout(file.path()).expect("load");
        assert_eq!(layout.sections.len(), 1);
        assert_eq!(layout.sections[0].headers(), vec!["Tunable"]);
        assert_eq!(layout.sections[0].anchor.as_deref(), Some("tunables"));
    }

    #[test]
    fn rejects_unknown_layout_kind() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            "[[section]]\ntitle = \"X\"\npath = \"system\"\nlayout = \"grid\"\n"
        )
        .expect("write");
        let err = load_report_layout(file.path()).expect_err("bad layout");
        assert!(matches!(err, ReportConfigError::Parse { .. }));
    }
}
