use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "opnreport")]
#[command(about = "Build a typed model of an OPNsense backup and report on it")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Print the resolved data projection as JSON.
    Data(DataArgs),
    /// Render a Markdown report.
    Markdown(MarkdownArgs),
    /// Show the typed tree the schema kept.
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
pub struct DataArgs {
    /// Configuration backup to read.
    pub file: PathBuf,
    /// Dotted path below the document root (for example opnsense.filter.rule).
    #[arg(long)]
    pub path: Option<String>,
}

#[derive(Parser, Debug)]
pub struct MarkdownArgs {
    /// Configuration backup to read.
    pub file: PathBuf,
    /// Report layout TOML file. Defaults to the embedded layout.
    #[arg(long)]
    pub sections_file: Option<PathBuf>,
    /// Write the report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TreeArgs {
    /// Configuration backup to read.
    pub file: PathBuf,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}
