//! MetaView CLI - Metadata snapshot inspector
//!
//! Loads a metadata snapshot into a read-only storage view and answers
//! listings and lookups against it, implicit directories included.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metaview_cache::DirectoryListCache;
use metaview_common::{ItemInfo, ResourceId, ViewConfig};
use metaview_storage::{MetadataReadOnlyStorage, snapshot};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "metaview-cli")]
#[command(about = "MetaView metadata snapshot inspector")]
#[command(version)]
struct Args {
    /// Metadata snapshot (JSON array of item infos)
    #[arg(short, long, env = "METAVIEW_SNAPSHOT")]
    snapshot: PathBuf,

    /// View configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List objects in a bucket
    Ls {
        /// Bucket name
        bucket: String,

        /// Only list names starting with this prefix
        #[arg(short, long)]
        prefix: Option<String>,

        /// Group names by this delimiter
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Show size, creation time and directory markers
        #[arg(short, long)]
        long: bool,
    },
    /// Show metadata for buckets or objects (`bucket` or `bucket/object`)
    Stat {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Show object counts and bucket names
    Summary,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config(args.config.as_deref())?;
    let infos = snapshot::load_item_infos(&args.snapshot)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;
    info!("Loaded {} item infos", infos.len());
    let view = MetadataReadOnlyStorage::with_config(&config, infos)?;

    match args.command {
        Commands::Ls {
            bucket,
            prefix,
            delimiter,
            long,
        } => {
            let mut infos =
                view.list_object_info(&bucket, prefix.as_deref(), delimiter.as_deref())?;
            if infos.is_empty() {
                println!("No objects found");
            } else {
                infos.sort_by(|a, b| a.object_name().cmp(&b.object_name()));
                if long {
                    println!("{:>10}  {:>13}  {:<8}  {}", "SIZE", "CREATED", "TYPE", "NAME");
                    println!("{}", "-".repeat(60));
                }
                for info in &infos {
                    println!("{}", format_entry(info, long));
                }
            }
        }
        Commands::Stat { paths } => {
            for path in &paths {
                let resource_id = parse_path(path)?;
                let info = view.get_item_info(&resource_id)?;
                println!("{}", format_info(&info));
            }
        }
        Commands::Summary => {
            let cache = view.cache();
            println!("Snapshot: {}", args.snapshot.display());
            println!("Buckets:  {}", cache.num_buckets());
            println!("Objects:  {}", cache.num_objects());
            for bucket in cache.bucket_names() {
                println!("  {bucket}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ViewConfig> {
    let Some(path) = path else {
        return Ok(ViewConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Parse `bucket` or `bucket/object`
fn parse_path(path: &str) -> Result<ResourceId> {
    let (bucket, object) = match path.split_once('/') {
        Some((bucket, object)) => (bucket, Some(object)),
        None => (path, None),
    };
    if bucket.is_empty() {
        anyhow::bail!("Invalid path '{path}': missing bucket name");
    }
    Ok(ResourceId::new(bucket, object)?)
}

fn entry_marker(info: &ItemInfo) -> &'static str {
    if info.is_implicit_directory() {
        "implicit"
    } else if info.is_directory() {
        "dir"
    } else {
        ""
    }
}

fn format_entry(info: &ItemInfo, long: bool) -> String {
    let name = info.object_name().unwrap_or_else(|| info.bucket_name());
    if !long {
        return name.to_owned();
    }
    format!(
        "{:>10}  {:>13}  {:<8}  {}",
        format_size(info.size()),
        info.creation_time(),
        entry_marker(info),
        name
    )
}

fn format_info(info: &ItemInfo) -> String {
    if !info.exists() {
        return format!("{}: not found", info.resource_id());
    }
    let mut out = format!("{}\n", info.resource_id());
    out.push_str(&format!("  Kind:          {}\n", info.kind()));
    out.push_str(&format!("  Size:          {}\n", format_size(info.size())));
    out.push_str(&format!("  Created:       {}\n", info.creation_time()));
    out.push_str(&format!("  Location:      {}\n", info.location().unwrap_or("-")));
    out.push_str(&format!("  Storage class: {}", info.storage_class().unwrap_or("-")));
    out
}

/// Format bytes as a human-readable size string.
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
