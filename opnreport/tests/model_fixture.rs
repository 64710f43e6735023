use std::path::PathBuf;

use opnreport::resolve::location;
use opnreport::{fields_to_list, Data, Document, LocationTarget};
use pretty_assertions::assert_eq;
use xml_tree_core::parse_file;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn sample() -> Document {
    let xml = parse_file(&fixture("fixtures/opnsense-sample.xml")).expect("parse");
    Document::from_xml(&xml).expect("build")
}

#[test]
fn probes_optional_sections() {
    let doc = sample();
    let root = doc.root();
    assert!(root.has_path("opnsense.dhcpd.lan.range"));
    assert!(root.has_path("opnsense.OPNsense.Firewall.Alias.aliases.alias"));
    assert!(!root.has_path("opnsense.openvpn.openvpn-client"));
    assert!(!root.has_path("opnsense.ipsec.phase1"));
}

#[test]
fn outbound_target_stays_raw_text() {
    let doc = sample();
    let target = doc
        .root()
        .get("opnsense.nat.outbound.rule.target")
        .expect("target")
        .data();
    assert_eq!(target, Data::text("wanip"));
}

#[test]
fn filter_rule_rows() {
    let doc = sample();
    let rules = doc.root().get("opnsense.filter").expect("filter").children("rule");
    assert_eq!(rules.len(), 3);

    let row = fields_to_list(rules[1], &["disabled", "type", "descr"]);
    assert_eq!(
        row,
        vec![Data::text(""), Data::text("pass"), Data::text("HTTPS to DMZ")]
    );

    let source = location(rules[1].child("source").expect("source"));
    let Some(LocationTarget::Address(alias)) = &source.target else {
        panic!("expected address target");
    };
    assert_eq!(alias.get("alias").get("content"), &Data::text("10.0.0.0/24"));
    assert_eq!(
        location(rules[1].child("destination").expect("destination")).to_string(),
        "10.0.50.10:443"
    );
}

#[test]
fn projection_is_stable_across_reads() {
    let doc = sample();
    assert_eq!(doc.root().data(), doc.root().data());
}

#[test]
fn gateway_interface_and_flags() {
    let doc = sample();
    let gateway = doc
        .root()
        .get("opnsense.gateways.gateway_item")
        .expect("gateway");
    assert_eq!(gateway.member_data("defaultgw"), Data::Bool(true));
    assert_eq!(gateway.member_data("weight"), Data::Integer(1));
    let interfaces = gateway.member_data("interface");
    assert_eq!(interfaces.as_list().map(<[Data]>::len), Some(1));
}
