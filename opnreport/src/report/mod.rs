//! Markdown report rendering over the data projection.

pub mod layout;
pub mod markdown;

pub use layout::{
    default_report_layout, load_report_layout, ColumnSpec, ReportConfigError, ReportLayout,
    SectionLayout, SectionSpec,
};
pub use markdown::{format_cell, markdown_table, render_markdown};
