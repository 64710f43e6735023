use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use opnreport::report::{default_report_layout, load_report_layout, render_markdown};
use opnreport::tree_view::render_typed_tree;
use opnreport::Document;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xml_tree_core::parse_file;

mod cli;

use cli::{Cli, Command, DataArgs, MarkdownArgs, TreeArgs};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Data(args) => run_data(args),
        Command::Markdown(args) => run_markdown(args),
        Command::Tree(args) => run_tree(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(path: &Path) -> Result<Document> {
    let xml = parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        file = %path.display(),
        version = xml.get_text(&["version"]).unwrap_or("unknown"),
        "parsed configuration backup"
    );
    let doc = Document::from_xml(&xml)
        .with_context(|| format!("failed to build configuration model from {}", path.display()))?;
    if doc.config().is_none() {
        bail!(
            "{} is not an OPNsense configuration (root element <{}>)",
            path.display(),
            xml.tag
        );
    }
    Ok(doc)
}

fn run_data(args: DataArgs) -> Result<()> {
    let doc = load_document(&args.file)?;
    let node = match &args.path {
        Some(path) => doc
            .root()
            .get(path)
            .with_context(|| format!("path '{path}' not found"))?,
        None => doc.root(),
    };
    println!("{}", serde_json::to_string_pretty(&node.data())?);
    Ok(())
}

fn run_markdown(args: MarkdownArgs) -> Result<()> {
    let doc = load_document(&args.file)?;
    let layout = match &args.sections_file {
        Some(path) => load_report_layout(path)?,
        None => default_report_layout(),
    };
    let report = render_markdown(&doc, &layout);

    match args.output {
        Some(out_path) => fs::write(&out_path, report)
            .with_context(|| format!("failed to write report {}", out_path.display()))?,
        None => print!("{report}"),
    }
    Ok(())
}

fn run_tree(args: TreeArgs) -> Result<()> {
    let doc = load_document(&args.file)?;
    let config = doc.config().context("document has no configuration section")?;
    print!("{}", render_typed_tree(config, args.depth));
    Ok(())
}
