//! Reference resolution against the alias collection and interface slots.
//!
//! Every lookup starts from the node being read, walks up to the document
//! root and scans a collection at a fixed path. Nothing is cached and nothing
//! is written; a name that matches nothing is returned as raw text.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use tracing::debug;

use crate::data::Data;
use crate::model::NodeRef;

/// Container of the `alias` entries, relative to the document root.
pub const ALIAS_COLLECTION: &str = "opnsense.OPNsense.Firewall.Alias.aliases";

/// Interface slot container, relative to the document root.
pub const INTERFACE_COLLECTION: &str = "opnsense.interfaces";

/// Shorthand suffix for "the address of interface X" (`wanip`, `opt1ip`).
pub const INTERFACE_IP_SUFFIX: &str = "ip";

/// Marker label of an unrestricted rule location.
pub const ANY: &str = "any";

/// Alias entry named `name`, searched from any node of the tree.
pub fn find_alias<'a>(from: NodeRef<'a>, name: &str) -> Option<NodeRef<'a>> {
    from.root()
        .get(ALIAS_COLLECTION)?
        .children("alias")
        .into_iter()
        .find(|alias| alias.child("name").and_then(|n| n.text()) == Some(name))
}

/// Interface slot keyed `name`, fixed or family.
pub fn find_interface<'a>(from: NodeRef<'a>, name: &str) -> Option<NodeRef<'a>> {
    from.root()
        .get(INTERFACE_COLLECTION)?
        .slots()
        .find(|(key, _)| *key == name)
        .map(|(_, slot)| slot)
}

/// `{alias: <entry>}` for a known alias name, the raw text otherwise.
///
/// Only one level is resolved: fields of the matched alias are not looked up
/// again.
pub fn alias(node: NodeRef<'_>) -> Data {
    let Some(name) = node.text() else {
        return Data::Absent;
    };
    match find_alias(node, name) {
        Some(alias) => Data::tagged("alias", alias.data()),
        None => {
            debug!(name, "no alias matches, keeping raw text");
            Data::text(name)
        }
    }
}

/// Interface slot (with the `ip` shorthand stripped), then alias, then raw text.
pub fn interface(node: NodeRef<'_>) -> Data {
    let Some(name) = node.text() else {
        return Data::Absent;
    };
    let slot_name = name.strip_suffix(INTERFACE_IP_SUFFIX).unwrap_or(name);
    if let Some(slot) = find_interface(node, slot_name) {
        return interface_data(slot_name, slot);
    }
    alias(node)
}

/// Comma-separated interface names; unmatched tokens stay raw, order kept.
pub fn interfaces(node: NodeRef<'_>) -> Data {
    let Some(names) = node.text() else {
        return Data::Absent;
    };
    let items = names
        .split(',')
        .map(|name| match find_interface(node, name) {
            Some(slot) => interface_data(name, slot),
            None => {
                debug!(name, "no interface slot matches, keeping raw text");
                Data::text(name)
            }
        })
        .collect();
    Data::List(items)
}

// The slot projection annotated with its own key.
fn interface_data(key: &str, slot: NodeRef<'_>) -> Data {
    let mut data = slot.data();
    if let Data::Map(map) = &mut data {
        map.insert("name".to_string(), Data::text(key));
    }
    Data::tagged("interface", data)
}

/// Which facet of a rule location was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationTarget {
    Any,
    Address(Data),
    Network(Data),
}

/// Resolved source or destination clause of a rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Location {
    /// `None` when the clause names neither `any`, an address nor a network.
    pub target: Option<LocationTarget>,
    pub port: Option<String>,
    pub negated: bool,
}

/// Resolve a rule location: `any` wins, then `address`, then `network`.
///
/// Mutual exclusivity is not checked.
pub fn location(node: NodeRef<'_>) -> Location {
    let target = if node.child("any").is_some() {
        Some(LocationTarget::Any)
    } else if let Some(address) = node.child("address") {
        Some(LocationTarget::Address(address.data()))
    } else {
        node.child("network")
            .map(|network| LocationTarget::Network(network.data()))
    };
    Location {
        target,
        port: node.child("port").and_then(|p| p.text()).map(str::to_string),
        negated: node.child("not").is_some_and(|n| n.data() == Data::Bool(true)),
    }
}

impl Location {
    /// Display name of the chosen facet followed by `:port`, without negation.
    pub fn label(&self) -> String {
        let mut label = match &self.target {
            Some(LocationTarget::Any) => ANY.to_string(),
            Some(LocationTarget::Address(data) | LocationTarget::Network(data)) => data.label(),
            None => String::new(),
        };
        if let Some(port) = &self.port {
            label.push(':');
            label.push_str(port);
        }
        label
    }

    /// `{location, target, port, not}`; absent parts are left out.
    pub fn data(&self) -> Data {
        let mut map = BTreeMap::new();
        map.insert("location".to_string(), Data::text(self.label()));
        if let Some(LocationTarget::Address(target) | LocationTarget::Network(target)) =
            &self.target
        {
            map.insert("target".to_string(), target.clone());
        }
        if let Some(port) = &self.port {
            map.insert("port".to_string(), Data::text(port));
        }
        if self.negated {
            map.insert("not".to_string(), Data::Bool(true));
        }
        Data::Map(map)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(&self.label())
    }
}
