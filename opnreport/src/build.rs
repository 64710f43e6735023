//! Generic tree builder driven by the schema registry.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};
use xml_tree_core::XmlNode;

use crate::error::BuildError;
use crate::model::{Content, Document, Member, NodeEntry, NodeId};
use crate::schema::{CompositeKind, NodeKind};

/// Accumulates arena entries while walking the untyped tree once, top-down.
#[derive(Default)]
pub(crate) struct Builder {
    nodes: Vec<NodeEntry>,
}

impl Builder {
    /// The document root is a synthetic node; the parsed root element is its
    /// only child, looked up like any other tag.
    pub(crate) fn document(mut self, root: &XmlNode) -> Result<Document, BuildError> {
        let id = self.push(
            String::new(),
            NodeKind::Composite(CompositeKind::Document),
            None,
            Content::Composite(BTreeMap::new()),
        );
        if CompositeKind::Document.schema().field(&root.tag).is_none() {
            warn!(root = %root.tag, "document root is not an OPNsense configuration");
        }
        self.fill(id, CompositeKind::Document, std::slice::from_ref(root), "")?;
        Ok(self.finish(&root.tag))
    }

    pub(crate) fn standalone(
        mut self,
        kind: CompositeKind,
        node: &XmlNode,
    ) -> Result<Document, BuildError> {
        self.build(NodeKind::Composite(kind), node, None, &node.tag)?;
        Ok(self.finish(&node.tag))
    }

    fn finish(self, root_tag: &str) -> Document {
        debug!(root = %root_tag, nodes = self.nodes.len(), "built typed tree");
        Document::from_nodes(self.nodes)
    }

    /// Instantiate `kind` under `parent` and convert or recurse into `node`.
    fn build(
        &mut self,
        kind: NodeKind,
        node: &XmlNode,
        parent: Option<NodeId>,
        path: &str,
    ) -> Result<NodeId, BuildError> {
        match kind {
            NodeKind::Scalar(scalar) => {
                let value = match node.text.as_deref() {
                    Some(text) => scalar.convert(text).map_err(|err| err.at(path, text))?,
                    None => None,
                };
                Ok(self.push(node.tag.clone(), kind, parent, Content::Scalar(value)))
            }
            NodeKind::Composite(composite) => {
                let id = self.push(
                    node.tag.clone(),
                    kind,
                    parent,
                    Content::Composite(BTreeMap::new()),
                );
                self.fill(id, composite, &node.children, path)?;
                Ok(id)
            }
        }
    }

    fn fill(
        &mut self,
        id: NodeId,
        kind: CompositeKind,
        children: &[XmlNode],
        path: &str,
    ) -> Result<(), BuildError> {
        let schema = kind.schema();
        for child in children {
            let Some(field) = schema.field(&child.tag) else {
                trace!(tag = %child.tag, parent = %path, "dropping unregistered tag");
                continue;
            };
            let child_path = if field.is_list() {
                let index = self.list_len(id, &child.tag);
                join(path, &format!("{}[{index}]", child.tag))
            } else {
                join(path, &child.tag)
            };
            let child_id = self.build(field.node_kind(), child, Some(id), &child_path)?;
            self.attach(id, &child.tag, child_id, field.is_list());
        }
        Ok(())
    }

    fn push(
        &mut self,
        tag: String,
        kind: NodeKind,
        parent: Option<NodeId>,
        content: Content,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            tag,
            kind,
            parent,
            content,
        });
        id
    }

    fn list_len(&self, id: NodeId, tag: &str) -> usize {
        match &self.nodes[id.0].content {
            Content::Composite(members) => match members.get(tag) {
                Some(Member::Many(ids)) => ids.len(),
                _ => 0,
            },
            Content::Scalar(_) => 0,
        }
    }

    // Single-valued members: last write wins.
    fn attach(&mut self, parent: NodeId, tag: &str, child: NodeId, list: bool) {
        let Content::Composite(members) = &mut self.nodes[parent.0].content else {
            return;
        };
        if !list {
            members.insert(tag.to_string(), Member::One(child));
            return;
        }
        match members
            .entry(tag.to_string())
            .or_insert_with(|| Member::Many(Vec::new()))
        {
            Member::Many(ids) => ids.push(child),
            Member::One(_) => {}
        }
    }
}

fn join(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}
