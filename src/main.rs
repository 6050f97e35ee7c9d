//! contentscope CLI
//!
//! Lists the content assets that ship with a build, their size on disk, and
//! which assets reference them.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};

use contentscope_core::{AssetKind, ContentRow, ContentTable};
use contentscope_export::json::row_value;
use contentscope_export::{ExportFormat, TableExporter};
use contentscope_hub::{EventArg, EventBus};
use contentscope_index::logging::{TracingConfig, init_with_config, timed};
use contentscope_index::{ContentsExplorer, DependencyIndexBuilder, RowQuery, SortKey, sort_rows};
use contentscope_store::path::normalize_asset_path;
use contentscope_store::sanitize::{apply_renames, plan_renames};
use contentscope_store::{
    ContentFs, DependencyStore, FilesystemRoot, Manifest, ManifestStore, ProjectStore,
};

use crate::config::ProjectConfig;

/// Published after every successful refresh with `[asset_count, total_bytes]`
const CONTENTS_REFRESHED: &str = "contents.refreshed";

type Explorer = ContentsExplorer<Box<dyn DependencyStore>, Box<dyn ContentFs>>;

/// contentscope - build contents explorer
#[derive(Parser)]
#[command(name = "contentscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ./contentscope.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project root, overriding the config file
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Root scene (repeatable), overriding the config file's scene list
    #[arg(long = "scene", global = true)]
    scenes: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and print the build contents table
    Scan(ScanArgs),

    /// Show which assets reference one asset
    Refs(RefsArgs),

    /// Resolve a file name to an asset path
    Locate(LocateArgs),

    /// List (or perform) file name sanitization renames
    Sanitize(SanitizeArgs),
}

#[derive(Args)]
struct ScanArgs {
    /// Output format: text, json, csv
    #[arg(short, long, default_value = "text")]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Filter rows by full path pattern (glob-style, case-insensitive)
    #[arg(short, long)]
    pattern: Option<String>,

    /// Sort by: discovery, name, size, refs
    #[arg(long, default_value = "discovery")]
    sort: SortKey,

    /// Show only assets nothing references
    #[arg(long)]
    unreferenced: bool,
}

#[derive(Args)]
struct RefsArgs {
    /// Full asset path or file name
    asset: String,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct LocateArgs {
    /// File name, e.g. `rock.png`
    name: String,
}

#[derive(Args)]
struct SanitizeArgs {
    /// Perform the renames instead of listing them
    #[arg(long)]
    apply: bool,
}

fn setup_logging(verbosity: u8) {
    init_with_config(TracingConfig::from_verbosity(verbosity));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = ProjectConfig::discover(cli.config.as_deref())?;
    if let Some(ref project) = cli.project {
        config.project_root = project.clone();
    }

    let events = EventBus::new();
    events.subscribe_with_args(CONTENTS_REFRESHED, |args: &[EventArg]| {
        debug!(?args, "Contents refreshed");
    });

    match cli.command {
        Commands::Scan(args) => cmd_scan(args, &config, &cli.scenes, &events),
        Commands::Refs(args) => cmd_refs(args, &config, &cli.scenes, &events),
        Commands::Locate(args) => cmd_locate(args, &config),
        Commands::Sanitize(args) => cmd_sanitize(args, &config),
    }
}

/// Store and filesystem oracles for the configured project
fn open_oracles(config: &ProjectConfig) -> Result<(Box<dyn DependencyStore>, Box<dyn ContentFs>)> {
    if let Some(ref path) = config.manifest {
        info!("Loading manifest: {:?}", path);
        let manifest = Manifest::load(path).context("Failed to load dependency manifest")?;
        let store = ManifestStore::from_manifest(&manifest);

        let fs: Box<dyn ContentFs> = match manifest.memory_fs() {
            Some(fs) => Box::new(fs),
            None => Box::new(
                FilesystemRoot::new(&config.project_root).context("Failed to open project root")?,
            ),
        };
        return Ok((Box::new(store), fs));
    }

    info!("Scanning project: {:?}", config.project_root);
    let store = timed("scan_project", || {
        ProjectStore::open_with_content_dir(&config.project_root, &config.content_dir)
    })
    .context("Failed to scan project")?;
    let fs = FilesystemRoot::new(&config.project_root).context("Failed to open project root")?;

    Ok((Box::new(store), Box::new(fs)))
}

/// CLI scenes, else enabled config scenes, else every scene the store knows
fn resolve_roots(config: &ProjectConfig, cli_scenes: &[String], store: &dyn DependencyStore) -> Vec<String> {
    if !cli_scenes.is_empty() {
        return cli_scenes.to_vec();
    }

    let configured = config.enabled_scenes();
    if !configured.is_empty() {
        return configured;
    }

    let scenes: Vec<String> = store
        .asset_paths()
        .into_iter()
        .filter(|p| config.exclusions.classify(p) == AssetKind::Scene)
        .collect();
    warn!(count = scenes.len(), "No scenes configured, using every scene in the project");
    scenes
}

fn open_explorer(config: &ProjectConfig, cli_scenes: &[String]) -> Result<Explorer> {
    let (store, fs) = open_oracles(config)?;
    let roots = resolve_roots(config, cli_scenes, store.as_ref());
    if roots.is_empty() {
        bail!("No scenes to scan; list them in the config file or pass --scene");
    }

    let builder = DependencyIndexBuilder::new(config.exclusions.clone());
    Ok(ContentsExplorer::new(store, fs, roots).with_builder(builder))
}

fn refresh(explorer: &mut Explorer, events: &EventBus) -> Result<()> {
    let count = explorer.refresh().context("Failed to build contents table")?;
    events.publish_with(
        CONTENTS_REFRESHED,
        &[EventArg::from(count), EventArg::from(explorer.total_size_bytes())],
    );
    Ok(())
}

fn cmd_scan(args: ScanArgs, config: &ProjectConfig, scenes: &[String], events: &EventBus) -> Result<()> {
    let mut explorer = open_explorer(config, scenes)?;
    refresh(&mut explorer, events)?;

    let mut query = RowQuery::new();
    if let Some(pattern) = args.pattern {
        query = query.with_pattern(pattern);
    }
    if args.unreferenced {
        query = query.unreferenced();
    }

    let mut rows: Vec<_> = explorer.search(&query).into_iter().cloned().collect();
    sort_rows(&mut rows, args.sort);
    let table = ContentTable::new(rows);

    let exporter = TableExporter::new(args.format);
    match args.output {
        Some(path) => {
            exporter
                .export_to_file(&table, &path)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Wrote {} assets to {:?}", table.len(), path);
        }
        None => print!("{}", exporter.render(&table)?),
    }

    Ok(())
}

fn cmd_refs(args: RefsArgs, config: &ProjectConfig, scenes: &[String], events: &EventBus) -> Result<()> {
    let mut explorer = open_explorer(config, scenes)?;
    refresh(&mut explorer, events)?;

    let row = find_row(explorer.table(), &args.asset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&row_value(row))?);
        return Ok(());
    }

    println!("{} ({})", row.path, format_size(row.size_bytes));
    if row.referenced_by.is_empty() {
        println!("  Not referenced by any build asset");
    } else {
        for name in &row.referenced_by {
            println!("  <- {}", name);
        }
    }

    Ok(())
}

/// Row for a full path (any separator style) or, failing that, a file name
fn find_row<'a>(table: &'a ContentTable, asset: &'a str) -> Result<&'a ContentRow> {
    if let Some(row) = table.get(&normalize_asset_path(asset)) {
        return Ok(row);
    }

    let mut matches = table.find_by_name(asset);
    let Some(first) = matches.next() else {
        bail!("'{}' is not part of the build", asset);
    };
    if matches.next().is_some() {
        warn!(name = %asset, "Several assets share this name, showing the first");
    }
    Ok(first)
}

/// Resolve a file name against the whole store; no roots or refresh needed
fn locate(config: &ProjectConfig, name: &str) -> Result<Option<String>> {
    let (store, fs) = open_oracles(config)?;
    let mut explorer: Explorer = ContentsExplorer::new(store, fs, Vec::new());
    Ok(explorer.navigate(name))
}

fn cmd_locate(args: LocateArgs, config: &ProjectConfig) -> Result<()> {
    match locate(config, &args.name)? {
        Some(path) => {
            println!("{}", path);
            Ok(())
        }
        None => bail!("No asset named '{}'", args.name),
    }
}

fn cmd_sanitize(args: SanitizeArgs, config: &ProjectConfig) -> Result<()> {
    let plans = plan_renames(&config.project_root, &config.content_dir)
        .context("Failed to plan renames")?;

    if plans.is_empty() {
        println!("All file names are clean");
        return Ok(());
    }

    for plan in &plans {
        println!("  {} -> {}", plan.from, plan.to);
    }

    if args.apply {
        let renamed = apply_renames(&config.project_root, &plans).context("Failed to rename files")?;
        println!("\nRenamed {} files", renamed);
    } else {
        println!("\n{} files would be renamed (pass --apply to rename)", plans.len());
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
