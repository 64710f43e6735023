use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::XmlNode;

/// Errors raised while turning a document into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The tokenizer rejected the input.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Tag, attribute or CDATA bytes were not UTF-8.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// An entity or escape sequence could not be decoded.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// The input file could not be read.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// The element structure is broken.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Parse a document held in memory.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut assembler = Assembler::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => assembler.open(element(&e, &reader)?),
            Event::Empty(e) => assembler.attach(element(&e, &reader)?)?,
            Event::End(_) => assembler.close()?,
            Event::Text(e) => assembler.push_text(&e.unescape()?),
            Event::CData(e) => assembler.push_text(std::str::from_utf8(e.as_ref())?),
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
        }
        buf.clear();
    }

    assembler.finish()
}

/// Parse a document from `path`.
pub fn parse_file(path: &Path) -> Result<XmlNode, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Stack of open elements; closed elements are attached to whatever is below them.
#[derive(Default)]
struct Assembler {
    open: Vec<XmlNode>,
    root: Option<XmlNode>,
}

impl Assembler {
    fn open(&mut self, node: XmlNode) {
        self.open.push(node);
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let node = self.open.pop().ok_or_else(|| {
            ParseError::Malformed("closing tag without matching open tag".to_string())
        })?;
        self.attach(node)
    }

    fn attach(&mut self, node: XmlNode) -> Result<(), ParseError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match &self.root {
            None => {
                self.root = Some(node);
                Ok(())
            }
            Some(root) => Err(ParseError::Malformed(format!(
                "second top-level element <{}> after <{}>",
                node.tag, root.tag
            ))),
        }
    }

    // Whitespace between elements is formatting, not content.
    fn push_text(&mut self, text: &str) {
        let Some(current) = self.open.last_mut() else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        match &mut current.text {
            Some(existing) => existing.push_str(text),
            None => current.text = Some(text.to_string()),
        }
    }

    fn finish(self) -> Result<XmlNode, ParseError> {
        if !self.open.is_empty() {
            let path: Vec<&str> = self.open.iter().map(|n| n.tag.as_str()).collect();
            return Err(ParseError::Malformed(format!(
                "unclosed element(s) at end of document: {}",
                path.join(".")
            )));
        }
        self.root
            .ok_or_else(|| ParseError::Malformed("no root element found".to_string()))
    }
}

fn element(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(qname(start.name())?);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(qname(attr.key)?, value);
    }

    Ok(node)
}

fn qname(name: QName<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(name.as_ref())?.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};

    #[test]
    fn keeps_text_and_attributes() {
        let root = parse(
            br#"<opnsense><system version="1"><hostname>fw</hostname></system></opnsense>"#,
        )
        .expect("parse");
        let system = root.get_child("system").expect("system");
        assert_eq!(system.attributes.get("version").map(String::as_str), Some("1"));
        assert_eq!(system.get_text(&["hostname"]), Some("fw"));
    }

    #[test]
    fn ignores_whitespace_between_elements() {
        let root = parse(b"<a>\n  <b>x</b>\n</a>").expect("parse");
        assert_eq!(root.text, None);
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn reads_cdata_as_text() {
        let root = parse(b"<a><descr><![CDATA[x < y]]></descr></a>").expect("parse");
        assert_eq!(root.get_text(&["descr"]), Some("x < y"));
    }

    #[test]
    fn rejects_second_root() {
        let err = parse(b"<a/><b/>").expect_err("two roots");
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn rejects_unclosed_elements() {
        assert!(parse(b"<a><b>").is_err());
    }
}
