//! Typed, cross-referenced model of OPNsense configuration backups.
//!
//! A backup is parsed into an untyped element tree by `xml-tree-core` and then
//! built into a typed document by a schema-driven builder. The typed tree is
//! read-only; its [`Data`] projection resolves interface and alias names
//! against the rest of the document on every read and is what reports are
//! rendered from.
//!
//! # Architecture
//!
//! - [`scalar`] — Leaf converters (string, integer, timestamp, flag, port)
//! - [`schema`] — Registry of node types and the child tags they accept
//! - `build` — Generic builder from untyped elements to typed nodes
//! - [`model`] — Node arena, parent links, navigation and path probes
//! - [`resolve`] — Alias, interface and rule-location resolution
//! - [`project`] — Data projection and row conversion helpers
//! - [`report`] — Markdown report rendering and its TOML layout
//! - [`tree_view`] — Typed tree dump for debugging schemas
//!
//! # Examples
//!
//! ```ignore
//! use opnreport::{Document, report};
//! use xml_tree_core::parse_file;
//!
//! let xml = parse_file("config.xml".as_ref())?;
//! let doc = Document::from_xml(&xml)?;
//! if doc.root().has_path("opnsense.dhcpd") {
//!     println!("{}", doc.root().get("opnsense.dhcpd").unwrap().data());
//! }
//! print!("{}", report::render_markdown(&doc, &report::default_report_layout()));
//! ```

mod build;
pub mod data;
pub mod error;
pub mod model;
pub mod project;
pub mod report;
pub mod resolve;
pub mod scalar;
pub mod schema;
pub mod tree_view;

pub use data::Data;
pub use error::BuildError;
pub use model::{Document, NodeId, NodeRef};
pub use project::{fields_to_list, fields_to_map};
pub use resolve::{Location, LocationTarget};
