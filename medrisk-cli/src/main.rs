//! MedRisk CLI: register medical imaging datasets and render their risk cards.

mod commands;
mod form;

use clap::Parser;
use medrisk_core::{Modality, Region, ReportFormat};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// MedRisk: risk cards for medical imaging datasets
#[derive(Parser, Debug)]
#[command(name = "medrisk", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dataset store document (overrides config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List registered datasets with their risk scores
    List {
        /// Keep running and re-render whenever the store changes
        #[arg(long)]
        watch: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
    /// Show the risk card for one dataset
    Show {
        /// Dataset id
        id: String,

        /// Output format: markdown, html, json, text (defaults to config)
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Register a new dataset
    Add(AddArgs),
    /// List checklist rows applicable to a declared scope
    Catalog {
        /// Declared modality (repeatable)
        #[arg(short, long)]
        modality: Vec<Modality>,

        /// Declared jurisdiction (repeatable)
        #[arg(short, long)]
        region: Vec<Region>,

        /// List every row regardless of scope
        #[arg(long)]
        all: bool,
    },
    /// Append datasets from an exported JSON document
    Import {
        /// Exported JSON file (array or `{ "datasets": [...] }`)
        file: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ListFormat {
    Text,
    Markdown,
    Json,
}

#[derive(clap::Args, Debug, Default)]
struct AddArgs {
    /// Dataset name
    #[arg(long)]
    name: Option<String>,

    /// Dataset source URL
    #[arg(long)]
    source: Option<String>,

    /// Short description
    #[arg(long)]
    description: Option<String>,

    /// Modality the dataset contains (repeatable)
    #[arg(short, long)]
    modality: Vec<Modality>,

    /// Jurisdiction the dataset is subject to (repeatable)
    #[arg(short, long)]
    region: Vec<Region>,

    /// Answer a checklist row: ITEM=VALUE (repeatable)
    #[arg(long = "answer", value_parser = commands::parse_assignment)]
    answers: Vec<(String, String)>,

    /// Check a mitigation: ITEM=LABEL (repeatable)
    #[arg(long = "mitigate", value_parser = commands::parse_assignment)]
    mitigations: Vec<(String, String)>,

    /// Notes for a row: ITEM=TEXT (repeatable)
    #[arg(long = "note", value_parser = commands::parse_assignment)]
    notes: Vec<(String, String)>,

    /// Prompt for every applicable row
    #[arg(short, long)]
    interactive: bool,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "medrisk", "medrisk")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "medrisk.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    // Resolve workspace
    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let settings = commands::Settings {
        config_file: cli.config,
        store: cli.store,
    };
    commands::handle_command(cli.command, &workspace, &settings).await
}
