//! The typed document: an arena of nodes with parent back-links.
//!
//! Nodes own their children through the arena; the parent link is only an
//! index and exists for upward lookups during reference resolution.

use std::collections::BTreeMap;

use xml_tree_core::XmlNode;

use crate::build::Builder;
use crate::error::BuildError;
use crate::scalar::ScalarValue;
use crate::schema::{CompositeKind, NodeKind};

/// Position of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug)]
pub(crate) enum Member {
    One(NodeId),
    Many(Vec<NodeId>),
}

#[derive(Debug)]
pub(crate) enum Content {
    /// `None` until text is assigned, and always for presence markers.
    Scalar(Option<ScalarValue>),
    Composite(BTreeMap<String, Member>),
}

#[derive(Debug)]
pub(crate) struct NodeEntry {
    pub(crate) tag: String,
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) content: Content,
}

/// A fully built, read-only configuration tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeEntry>,
}

impl Document {
    /// Build the typed tree for a parsed backup whose root element is `<opnsense>`.
    pub fn from_xml(root: &XmlNode) -> Result<Self, BuildError> {
        Builder::default().document(root)
    }

    /// Build a standalone tree of `kind` from `node`, which becomes the root.
    pub fn build(kind: CompositeKind, node: &XmlNode) -> Result<Self, BuildError> {
        Builder::default().standalone(kind, node)
    }

    pub(crate) fn from_nodes(nodes: Vec<NodeEntry>) -> Self {
        Self { nodes }
    }

    /// The root node; its only child is the `opnsense` configuration.
    pub fn root(&self) -> NodeRef<'_> {
        self.node(NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    /// The `<opnsense>` section, if the input had one.
    pub fn config(&self) -> Option<NodeRef<'_>> {
        self.root().child("opnsense")
    }

    /// Document version declared by the backup.
    pub fn version(&self) -> Option<&str> {
        self.root().get("opnsense.version").and_then(|n| n.text())
    }

    /// Number of nodes in the arena, replaced duplicates included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }
}

/// Borrowed handle to one node of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Element tag this node was built from.
    pub fn tag(&self) -> &'a str {
        &self.doc.entry(self.id).tag
    }

    pub fn kind(&self) -> NodeKind {
        self.doc.entry(self.id).kind
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.entry(self.id).parent.map(|id| self.doc.node(id))
    }

    /// Parents from the nearest up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> {
        std::iter::successors(self.parent(), NodeRef::parent)
    }

    /// The document root, reached by walking parent links.
    pub fn root(&self) -> NodeRef<'a> {
        self.ancestors().last().unwrap_or(*self)
    }

    /// Converted leaf value, if this is an assigned scalar.
    pub fn value(&self) -> Option<&'a ScalarValue> {
        match &self.doc.entry(self.id).content {
            Content::Scalar(value) => value.as_ref(),
            Content::Composite(_) => None,
        }
    }

    /// Raw text of a text-valued scalar (strings, ports and references).
    pub fn text(&self) -> Option<&'a str> {
        self.value().and_then(ScalarValue::as_text)
    }

    pub(crate) fn members(&self) -> Option<&'a BTreeMap<String, Member>> {
        match &self.doc.entry(self.id).content {
            Content::Composite(members) => Some(members),
            Content::Scalar(_) => None,
        }
    }

    /// Single-valued child or slot named `name`; for a list, its first element.
    pub fn child(&self, name: &str) -> Option<NodeRef<'a>> {
        let id = match self.members()?.get(name)? {
            Member::One(id) => *id,
            Member::Many(ids) => *ids.first()?,
        };
        Some(self.doc.node(id))
    }

    /// All children stored under `name`, in document order.
    pub fn children(&self, name: &str) -> Vec<NodeRef<'a>> {
        match self.members().and_then(|members| members.get(name)) {
            Some(Member::One(id)) => vec![self.doc.node(*id)],
            Some(Member::Many(ids)) => ids.iter().map(|id| self.doc.node(*id)).collect(),
            None => Vec::new(),
        }
    }

    /// Single-valued members keyed by tag, sorted by key.
    ///
    /// On slot containers this lists the fixed slots together with every
    /// family slot.
    pub fn slots(&self) -> impl Iterator<Item = (&'a str, NodeRef<'a>)> {
        let doc = self.doc;
        self.members()
            .into_iter()
            .flatten()
            .filter_map(move |(key, member)| match member {
                Member::One(id) => Some((key.as_str(), doc.node(*id))),
                Member::Many(_) => None,
            })
    }

    /// Member keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.members()
            .into_iter()
            .flatten()
            .map(|(key, _)| key.as_str())
    }

    /// True when `name` holds a repeated member.
    pub fn is_list(&self, name: &str) -> bool {
        matches!(
            self.members().and_then(|members| members.get(name)),
            Some(Member::Many(_))
        )
    }

    /// Follow a dotted path of member names; lists continue through their
    /// first element.
    pub fn get(&self, path: &str) -> Option<NodeRef<'a>> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(*self, |node, segment| node.child(segment))
    }

    /// True when every segment of `path` is present. Never fails.
    pub fn has_path(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}
