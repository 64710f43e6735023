use crate::data::Data;
use crate::model::{Document, NodeRef};
use crate::project::{fields_to_list, fields_to_map};

use super::layout::{ReportLayout, SectionLayout, SectionSpec};

/// Render the Markdown report; sections missing from the document are skipped.
pub fn render_markdown(doc: &Document, layout: &ReportLayout) -> String {
    let mut out = String::from("# OPNsense\n");
    if let Some(version) = doc.version() {
        out.push_str(&format!("Version {version}\n"));
    }
    out.push('\n');

    let Some(config) = doc.config() else {
        return out;
    };

    for section in &layout.sections {
        if !config.has_path(&section.path) {
            continue;
        }
        if let Some(anchor) = &section.anchor {
            out.push_str(&format!("<a id=\"{anchor}\"></a>\n"));
        }
        out.push_str(&format!("## {}\n", section.title));
        out.push_str(&render_section(config, section));
        out.push('\n');
    }
    out
}

fn render_section(config: NodeRef<'_>, section: &SectionSpec) -> String {
    let fields = section.fields();
    match section.layout {
        SectionLayout::Options => {
            let Some(node) = config.get(&section.path) else {
                return String::new();
            };
            let headers = section.headers();
            let rows = fields_to_map(node, &fields)
                .into_iter()
                .zip(&headers)
                .map(|((_, value), header)| vec![Data::text(*header), value])
                .collect::<Vec<_>>();
            markdown_table(&["Option", "Value"], &rows)
        }
        SectionLayout::Slots => {
            let Some(node) = config.get(&section.path) else {
                return String::new();
            };
            let mut headers = vec!["Name"];
            headers.extend(section.headers());
            let rows = node
                .slots()
                .map(|(key, slot)| {
                    let mut row = vec![Data::text(key)];
                    row.extend(fields_to_list(slot, &fields));
                    row
                })
                .collect::<Vec<_>>();
            markdown_table(&headers, &rows)
        }
        SectionLayout::Table => {
            let (container, member) = match section.path.rsplit_once('.') {
                Some((prefix, member)) => (config.get(prefix), member),
                None => (Some(config), section.path.as_str()),
            };
            let rows = container
                .map(|c| c.children(member))
                .unwrap_or_default()
                .into_iter()
                .map(|row| fields_to_list(row, &fields))
                .collect::<Vec<_>>();
            markdown_table(&section.headers(), &rows)
        }
    }
}

/// Pipe table with a dash separator as wide as each header.
pub fn markdown_table(headers: &[&str], rows: &[Vec<Data>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", headers.join(" | ")));
    let separator: Vec<String> = headers.iter().map(|h| "-".repeat(h.len())).collect();
    out.push_str(&format!("| {} |\n", separator.join(" | ")));
    for row in rows {
        let cells: Vec<String> = row.iter().map(format_cell).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// One table cell: resolved references become links, `true` becomes `x`.
pub fn format_cell(data: &Data) -> String {
    escape(&format_value(data))
}

fn format_value(data: &Data) -> String {
    match data {
        Data::Bool(true) => "x".to_string(),
        Data::Bool(false) | Data::Absent => String::new(),
        Data::List(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Data::Map(_) => format_map(data),
        other => other.to_string(),
    }
}

fn format_map(data: &Data) -> String {
    let alias = data.get("alias");
    if !alias.is_absent() {
        return link(alias, "aliases", &["address", "content"]);
    }
    let interface = data.get("interface");
    if !interface.is_absent() {
        return link(interface, "interfaces", &["descr"]);
    }
    if let Some(label) = data.get("location").as_str() {
        let mut out = String::new();
        if data.get("not") == &Data::Bool(true) {
            out.push('!');
        }
        let target = data.get("target");
        if target.is_absent() {
            out.push_str(label);
        } else {
            out.push_str(&format_value(target));
            if let Some(port) = data.get("port").as_str() {
                out.push(':');
                out.push_str(port);
            }
        }
        return out;
    }
    if let (Some(from), Some(to)) = (data.get("from").as_str(), data.get("to").as_str()) {
        return format!("{from} - {to}");
    }
    data.to_string()
}

// `[name](#anchor "title")` titled by the first non-empty field, or the bare
// name.
fn link(entry: &Data, anchor: &str, title_fields: &[&str]) -> String {
    let name = entry.get("name").to_string();
    let title = title_fields
        .iter()
        .filter_map(|field| entry.get(field).as_str())
        .find(|title| !title.is_empty());
    match title {
        Some(title) => format!("[{name}](#{anchor} \"{title}\")"),
        None => name,
    }
}

fn escape(cell: &str) -> String {
    cell.replace(['\r', '\n'], " ").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xml_tree_core::parse;

    use super::{format_cell, markdown_table, render_markdown};
    use crate::data::Data;
    use crate::model::Document;
    use crate::report::layout::default_report_layout;

    fn doc(xml: &[u8]) -> Document {
        Document::from_xml(&parse(xml).expect("parse")).expect("build")
    }

    #[test]
    fn table_has_header_separator_and_rows() {
        let out = markdown_table(
            &["Name", "IP"],
            &[vec![Data::text("nas"), Data::text("192.168.1.20")]],
        );
        assert_eq!(out, "| Name | IP |\n| ---- | -- |\n| nas | 192.168.1.20 |\n");
    }

    #[test]
    fn cells_escape_pipes_and_mark_flags() {
        assert_eq!(format_cell(&Data::text("a | b")), "a \\| b");
        assert_eq!(format_cell(&Data::Bool(true)), "x");
        assert_eq!(format_cell(&Data::Absent), "");
        assert_eq!(
            format_cell(&Data::List(vec![Data::text("lan"), Data::text("opt9")])),
            "lan, opt9"
        );
    }

    #[test]
    fn renders_links_for_resolved_references() {
        let doc = doc(
            b"<opnsense><version>24.7</version>\
              <interfaces><lan><if>em1</if><descr>LAN</descr></lan></interfaces>\
              <OPNsense><Firewall><Alias><aliases><alias><name>LAN_NET</name><content>10.0.0.0/24</content></alias></aliases></Alias></Firewall></OPNsense>\
              <filter><rule><interface>lan</interface><source><address>LAN_NET</address></source><destination><any/><port>443</port></destination></rule></filter>\
              </opnsense>",
        );
        let out = render_markdown(&doc, &default_report_layout());
        assert!(out.starts_with("# OPNsense\nVersion 24.7\n"));
        assert!(out.contains("## Filter rules\n"));
        assert!(out.contains(
            "|  | [lan](#interfaces \"LAN\") |  |  |  | [LAN_NET](#aliases \"10.0.0.0/24\") | any:443 |  |"
        ));
    }

    #[test]
    fn alias_links_prefer_address_and_sections_carry_anchors() {
        let doc = doc(
            b"<opnsense>\
              <OPNsense><Firewall><Alias><aliases><alias><name>LAN_NET</name><address>10.0.0.0/24</address><content>stale</content></alias></aliases></Alias></Firewall></OPNsense>\
              <filter><rule><source><network>LAN_NET</network></source></rule></filter>\
              </opnsense>",
        );
        let out = render_markdown(&doc, &default_report_layout());
        assert!(out.contains("[LAN_NET](#aliases \"10.0.0.0/24\")"));
        assert!(out.contains("<a id=\"aliases\"></a>\n## Aliases\n"));
        assert!(out.contains("| LAN_NET |  | 10.0.0.0/24 | stale |  |  |"));
        assert!(!out.contains("<a id=\"filter"));
    }

    #[test]
    fn skips_missing_sections() {
        let doc = doc(b"<opnsense><system><hostname>fw</hostname></system></opnsense>");
        let out = render_markdown(&doc, &default_report_layout());
        assert!(out.contains("## System\n"));
        assert!(out.contains("| Hostname | fw |"));
        assert!(out.contains("| Domain |  |"));
        assert!(!out.contains("## DHCP"));
        assert!(!out.contains("## Filter rules"));
    }

    #[test]
    fn slots_layout_lists_each_slot() {
        let doc = doc(
            b"<opnsense><dhcpd><lan><enable>1</enable><range><from>10.0.0.10</from><to>10.0.0.20</to></range></lan><opt4/></dhcpd></opnsense>",
        );
        let out = render_markdown(&doc, &default_report_layout());
        assert!(out.contains("## DHCP\n| Name | Enabled | Ranges | Default lease | Max lease |\n"));
        assert!(out.contains("| lan | x | 10.0.0.10 - 10.0.0.20 |  |  |"));
        assert!(out.contains("| opt4 |  |  |  |  |"));
    }

    #[test]
    fn foreign_document_renders_header_only() {
        let doc = doc(b"<pfsense><system><hostname>fw</hostname></system></pfsense>");
        assert_eq!(render_markdown(&doc, &default_report_layout()), "# OPNsense\n\n");
    }
}
