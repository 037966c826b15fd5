//! CLI subcommand handlers.

use crate::AddArgs;
use crate::Commands;
use crate::ConfigAction;
use crate::ListFormat;
use anyhow::Context as _;
use medrisk_core::config::{ConfigOverrides, StoreOverrides, WORKSPACE_DIR, workspace_config_path};
use medrisk_core::report::list::{summaries_to_markdown, summaries_to_text};
use medrisk_core::store::{import_into, parse_export};
use medrisk_core::{
    Catalog, DatasetDraft, DatasetReport, DatasetStore, DatasetSummary, JsonFileStore,
    MedRiskConfig, Modality, Region, RenderOptions, ReportFormat, Scope, StoreError,
    applicable_items, load_config, summarize,
};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Global options that shape how every subcommand loads its context.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    pub config_file: Option<PathBuf>,
    pub store: Option<PathBuf>,
}

impl Settings {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            store: self.store.as_ref().map(|path| StoreOverrides {
                path: Some(path.clone()),
            }),
            ..Default::default()
        }
    }
}

/// Loaded configuration, catalog, and store for one invocation.
struct Context {
    config: MedRiskConfig,
    catalog: Cow<'static, Catalog>,
    store: Arc<JsonFileStore>,
}

impl Context {
    fn load(workspace: &Path, settings: &Settings) -> anyhow::Result<Self> {
        let config = load_config(
            Some(workspace),
            settings.config_file.as_deref(),
            Some(&settings.overrides()),
        )
        .context("Failed to load config")?;
        let catalog = config
            .load_catalog(workspace)
            .context("Failed to load checklist catalog")?;
        let store_path = config.store_path(workspace);
        let store = JsonFileStore::open(&store_path)
            .with_context(|| format!("Failed to open dataset store {}", store_path.display()))?;
        Ok(Self {
            config,
            catalog,
            store: Arc::new(store),
        })
    }

    fn render_options(&self) -> RenderOptions {
        self.config.report.render_options()
    }
}

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    settings: &Settings,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace, settings),
        Commands::Catalog {
            modality,
            region,
            all,
        } => handle_catalog(workspace, settings, modality, region, all),
        Commands::List { watch, format } => {
            let ctx = Context::load(workspace, settings)?;
            if watch {
                watch_list(&ctx, format).await
            } else {
                let summaries = summarize(&ctx.store.list()?, &ctx.catalog);
                print!("{}", render_list(&summaries, format, &ctx.render_options())?);
                Ok(())
            }
        }
        Commands::Show { id, format, output } => {
            let ctx = Context::load(workspace, settings)?;
            let format = format.unwrap_or(ctx.config.report.format);
            let rendered = render_show(&ctx, &id, format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {format} report to {}", path.display());
                }
                None => print!("{rendered}"),
            }
            Ok(())
        }
        Commands::Add(args) => {
            let ctx = Context::load(workspace, settings)?;
            handle_add(&ctx, args)
        }
        Commands::Import { file } => {
            let ctx = Context::load(workspace, settings)?;
            let source = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let datasets = parse_export(&source)
                .with_context(|| format!("{} is not a dataset export", file.display()))?;
            let created = import_into(ctx.store.as_ref(), &ctx.catalog, datasets)?;
            println!(
                "Imported {} dataset(s) into {}",
                created.len(),
                ctx.store.path().display()
            );
            Ok(())
        }
    }
}

/// Parse an `ITEM=VALUE` pair. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ITEM=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing checklist item id in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn render_list(
    summaries: &[DatasetSummary],
    format: ListFormat,
    options: &RenderOptions,
) -> anyhow::Result<String> {
    Ok(match format {
        ListFormat::Text => summaries_to_text(summaries, options),
        ListFormat::Markdown => summaries_to_markdown(summaries, options),
        ListFormat::Json => format!("{}\n", serde_json::to_string_pretty(summaries)?),
    })
}

async fn watch_list(ctx: &Context, format: ListFormat) -> anyhow::Result<()> {
    let options = ctx.render_options();
    let mut feed = ctx.store.subscribe();
    let poller = ctx.store.spawn_poller(ctx.config.store.poll_interval());

    print!("{}", render_list(&feed.scored(&ctx.catalog), format, &options)?);
    loop {
        tokio::select! {
            snapshot = feed.next() => {
                let Some(snapshot) = snapshot else { break };
                tracing::debug!(datasets = snapshot.len(), "Snapshot received");
                let summaries = summarize(&snapshot, &ctx.catalog);
                println!();
                print!("{}", render_list(&summaries, format, &options)?);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    poller.stop().await;
    Ok(())
}

fn render_show(ctx: &Context, id: &str, format: ReportFormat) -> anyhow::Result<String> {
    let dataset = ctx
        .store
        .get(id)?
        .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
    let report = DatasetReport::build(&dataset, &ctx.catalog);
    Ok(report.render(format, &ctx.render_options())?)
}

fn handle_add(ctx: &Context, args: AddArgs) -> anyhow::Result<()> {
    let catalog: &Catalog = &ctx.catalog;
    let interactive = args.interactive;
    let mut draft = draft_from_args(catalog, args)?;

    if interactive {
        crate::form::fill_interactively(&mut draft, catalog)?;
    } else {
        print!("{}", crate::form::describe(&draft, catalog));
    }

    let preview = draft.preview_score(catalog);
    let new = draft.into_new_dataset(catalog)?;
    let dataset = ctx.store.create(new)?;
    println!(
        "Created dataset {} ({}) with risk score {}",
        dataset.name,
        dataset.id,
        medrisk_core::report::format_score(preview, &ctx.render_options())
    );
    Ok(())
}

/// Build a draft from command-line flags, validating every row reference.
fn draft_from_args(catalog: &Catalog, args: AddArgs) -> anyhow::Result<DatasetDraft> {
    let mut draft = DatasetDraft::new(catalog)
        .with_name(args.name.unwrap_or_default())
        .with_source(args.source.unwrap_or_default())
        .with_description(args.description.unwrap_or_default());

    for modality in dedup(args.modality) {
        draft.toggle_modality(modality);
    }
    for region in dedup(args.region) {
        draft.toggle_region(region);
    }
    for (item, value) in &args.answers {
        draft.set_answer(catalog, item, value)?;
    }
    for (item, label) in dedup(args.mitigations) {
        draft.toggle_mitigation(catalog, &item, &label)?;
    }
    for (item, text) in &args.notes {
        draft.set_notes(catalog, item, text.clone())?;
    }
    Ok(draft)
}

fn dedup<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

fn handle_catalog(
    workspace: &Path,
    settings: &Settings,
    modalities: Vec<Modality>,
    regions: Vec<Region>,
    all: bool,
) -> anyhow::Result<()> {
    let config = load_config(
        Some(workspace),
        settings.config_file.as_deref(),
        Some(&settings.overrides()),
    )
    .context("Failed to load config")?;
    let catalog = config.load_catalog(workspace)?;
    print!("{}", render_catalog(&catalog, &Scope::new(modalities, regions), all));
    Ok(())
}

fn render_catalog(catalog: &Catalog, scope: &Scope, all: bool) -> String {
    let items = if all {
        catalog.iter().collect()
    } else {
        applicable_items(scope, catalog)
    };

    let mut out = format!("{} of {} checklist rows\n\n", items.len(), catalog.len());
    for item in items {
        out.push_str(&format!(
            "{:<26} {:<13} {:<9} {:<11} {}\n",
            item.id,
            item.modality,
            item.region,
            item.severity,
            item.question
        ));
    }
    out
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    settings: &Settings,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_dir = workspace.join(WORKSPACE_DIR);
            std::fs::create_dir_all(&config_dir)?;

            let config_path = workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let default_config = MedRiskConfig::default();
            let toml_str = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_config(
                Some(workspace),
                settings.config_file.as_deref(),
                Some(&settings.overrides()),
            )
            .context("Failed to load config")?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
            if !medrisk_core::config::config_exists(Some(workspace)) {
                println!("# (defaults; run `medrisk config init` to create a config file)");
            }
            Ok(())
        }
    }
}
