//! Untyped element trees for configuration backups.
//!
//! The parser keeps tags, attributes, child order and non-whitespace text and
//! nothing else; typing and validation are left to the consumer.

pub mod parser;
pub mod tree;

pub use parser::{parse, parse_file, ParseError};
pub use tree::XmlNode;
