use colored::Colorize;

use crate::model::NodeRef;
use crate::schema::NodeKind;

/// Render the typed tree below `node`, one `tag [kind] = value` line per node.
pub fn render_typed_tree(node: NodeRef<'_>, max_depth: usize) -> String {
    let mut out = String::new();
    render_node(node, node.tag(), 0, max_depth, &mut out);
    out
}

fn render_node(node: NodeRef<'_>, key: &str, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let kind = match node.kind() {
        NodeKind::Scalar(kind) => kind.name().cyan(),
        NodeKind::Composite(kind) => format!("{kind:?}").green(),
    };
    match node.value() {
        Some(value) => out.push_str(&format!("{indent}{key} [{kind}] = {}\n", value.data())),
        None => out.push_str(&format!("{indent}{key} [{kind}]\n")),
    }

    if depth >= max_depth {
        return;
    }

    for (child_key, child) in children(node) {
        render_node(child, &child_key, depth + 1, max_depth, out);
    }
}

// Lists are numbered; single members keep their key.
fn children<'a>(node: NodeRef<'a>) -> Vec<(String, NodeRef<'a>)> {
    let mut out = Vec::new();
    for key in node.keys() {
        let list = node.is_list(key);
        for (idx, child) in node.children(key).into_iter().enumerate() {
            let label = if list {
                format!("{key}[{idx}]")
            } else {
                key.to_string()
            };
            out.push((label, child));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use xml_tree_core::parse;

    use super::render_typed_tree;
    use crate::model::Document;

    #[test]
    fn renders_kinds_values_and_list_positions() {
        colored::control::set_override(false);
        let xml = parse(
            b"<opnsense><sysctl><item><tunable>a</tunable></item><item><tunable>b</tunable></item></sysctl></opnsense>",
        )
        .expect("parse");
        let doc = Document::from_xml(&xml).expect("build");
        let config = doc.config().expect("config");
        let out = render_typed_tree(config, 5);
        assert!(out.starts_with("opnsense [Config]\n"));
        assert!(out.contains("  sysctl [SysCtl]\n"));
        assert!(out.contains("    item[1] [SysCtlItem]\n"));
        assert!(out.contains("      tunable [string] = b\n"));
    }

    #[test]
    fn stops_at_max_depth() {
        colored::control::set_override(false);
        let xml = parse(b"<opnsense><system><hostname>fw</hostname></system></opnsense>")
            .expect("parse");
        let doc = Document::from_xml(&xml).expect("build");
        let out = render_typed_tree(doc.config().expect("config"), 1);
        assert!(out.contains("system"));
        assert!(!out.contains("hostname"));
    }
}
