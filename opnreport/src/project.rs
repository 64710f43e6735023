//! Data projection and the conversion helpers renderers use.

use std::collections::BTreeMap;

use crate::data::Data;
use crate::model::{Member, NodeRef};
use crate::resolve;
use crate::scalar::ScalarKind;
use crate::schema::{CompositeKind, NodeKind};

impl<'a> NodeRef<'a> {
    /// Plain-value projection of this subtree, recomputed on every call.
    ///
    /// References are resolved against the rest of the document; composites
    /// become mappings that leave out absent members.
    pub fn data(&self) -> Data {
        match self.kind() {
            NodeKind::Scalar(ScalarKind::AliasRef | ScalarKind::Port) => resolve::alias(*self),
            NodeKind::Scalar(ScalarKind::InterfaceRef) => resolve::interface(*self),
            NodeKind::Scalar(ScalarKind::InterfaceList) => resolve::interfaces(*self),
            NodeKind::Scalar(ScalarKind::Presence) => Data::Bool(true),
            NodeKind::Scalar(_) => self.value().map(|v| v.data()).unwrap_or_default(),
            NodeKind::Composite(CompositeKind::RuleLocation) => resolve::location(*self).data(),
            NodeKind::Composite(_) => self.members_data(),
        }
    }

    /// Projection of the member stored under `name`: one value, a list, or absent.
    pub fn member_data(&self, name: &str) -> Data {
        match self.members().and_then(|members| members.get(name)) {
            Some(member) => self.project_member(member),
            None => Data::Absent,
        }
    }

    fn members_data(&self) -> Data {
        let mut map = BTreeMap::new();
        for (key, member) in self.members().into_iter().flatten() {
            let value = self.project_member(member);
            if !value.is_absent() {
                map.insert(key.clone(), value);
            }
        }
        Data::Map(map)
    }

    fn project_member(&self, member: &Member) -> Data {
        let doc = self.document();
        match member {
            Member::One(id) => doc.node(*id).data(),
            Member::Many(ids) => Data::List(ids.iter().map(|id| doc.node(*id).data()).collect()),
        }
    }
}

/// Projections of the named members of `node`, in the order asked for.
///
/// Missing or absent members become an empty string so rows keep their width.
pub fn fields_to_list(node: NodeRef<'_>, names: &[&str]) -> Vec<Data> {
    names
        .iter()
        .map(|name| placeholder(node.member_data(name)))
        .collect()
}

/// Like [`fields_to_list`], paired with the member names.
pub fn fields_to_map(node: NodeRef<'_>, names: &[&str]) -> Vec<(String, Data)> {
    names
        .iter()
        .map(|name| (name.to_string(), placeholder(node.member_data(name))))
        .collect()
}

fn placeholder(data: Data) -> Data {
    if data.is_absent() {
        Data::text("")
    } else {
        data
    }
}
