use std::fs;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn markdown_renders_default_sections() {
    Command::new(assert_cmd::cargo::cargo_bin!("opnreport"))
        .arg("markdown")
        .arg(fixture("fixtures/opnsense-sample.xml"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# OPNsense\nVersion 24.7\n"))
        .stdout(predicate::str::contains("## Interfaces\n"))
        .stdout(predicate::str::contains("| opt1 |  | DMZ | em2 | 10.0.50.1 | 24 |"))
        .stdout(predicate::str::contains(
            "| x | [opt1](#interfaces \"DMZ\") | block | inet |  | opt1 | !lan | Isolate DMZ \\| legacy |",
        ))
        .stdout(predicate::str::contains(
            "| [lan](#interfaces \"LAN\"), [opt1](#interfaces \"DMZ\") |",
        ))
        .stdout(predicate::str::contains("## Tunables\n"));
}

#[test]
fn markdown_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("report.md");
    Command::new(assert_cmd::cargo::cargo_bin!("opnreport"))
        .arg("markdown")
        .arg(fixture("fixtures/opnsense-sample.xml"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(&out).expect("read report");
    assert!(report.contains("## NAT rules\n"));
    assert!(report.contains("[WEB_SERVERS](#aliases \"10.0.50.10\")"));
}

#[test]
fn markdown_uses_custom_layout() {
    let mut layout = tempfile::NamedTempFile::new().expect("tempfile");
    layout
        .write_all(
            br#"
[[section]]
title = "Routes"
path = "staticroutes.route"
layout = "table"
column = [
  { field = "network", header = "Network" },
  { field = "gateway", header = "Gateway" },
]
"#,
        )
        .expect("write");

    Command::new(assert_cmd::cargo::cargo_bin!("opnreport"))
        .arg("markdown")
        .arg(fixture("fixtures/opnsense-sample.xml"))
        .arg("--sections-file")
        .arg(layout.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "## Routes\n| Network | Gateway |\n| ------- | ------- |\n| 172.16.0.0/16 | WAN_DHCP |\n",
        ))
        .stdout(predicate::str::contains("## Filter rules").not());
}

#[test]
fn markdown_rejects_broken_layout() {
    let mut layout = tempfile::NamedTempFile::new().expect("tempfile");
    layout.write_all(b"[[section]]\ntitle = 1\n").expect("write");

    Command::new(assert_cmd::cargo::cargo_bin!("opnreport"))
        .arg("markdown")
        .arg(fixture("fixtures/opnsense-sample.xml"))
        .arg("--sections-file")
        .arg(layout.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse report layout"));
}
