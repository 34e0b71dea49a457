use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dynwire_tools::{
    decode_with_schema, inspect_bytes, pool_from_json, InspectLimits, MessageTree,
};
use glob::Pattern;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dynwire-tools",
    version,
    about = "dynwire inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the wire structure of encoded messages without a schema.
    Inspect {
        /// Path to a message file, or a directory of them.
        path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected files.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected files (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// How deep length-delimited payloads are tried as nested messages.
        #[arg(long, default_value_t = InspectLimits::default().max_depth)]
        max_depth: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Decode a message against a schema and print its fields.
    Decode {
        /// Path to the message bytes.
        path: PathBuf,
        /// Schema JSON: an array of message definitions.
        #[arg(long)]
        schema: PathBuf,
        /// Full name of the top-level message type.
        #[arg(long)]
        message: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect {
            path,
            glob,
            sort,
            limit,
            max_depth,
            format,
        } => {
            let limits = InspectLimits { max_depth };
            if path.is_dir() {
                let entries = collect_entries(&path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    if format == OutputFormat::Text {
                        println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    }
                    inspect_file(&entry.path, &limits, format)?;
                }
            } else {
                inspect_file(&path, &limits, format)?;
            }
        }
        Command::Decode {
            path,
            schema,
            message,
        } => {
            let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            let contents = fs::read_to_string(&schema)
                .with_context(|| format!("read schema {}", schema.display()))?;
            let pool = pool_from_json(&contents)?;
            debug!(messages = pool.len(), "schema loaded");
            let decoded = decode_with_schema(&bytes, &pool, &message)
                .with_context(|| format!("decode {} as {message}", path.display()))?;
            print!("{}", MessageTree(&decoded));
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn inspect_file(path: &Path, limits: &InspectLimits, format: OutputFormat) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let report =
        inspect_bytes(&bytes, limits).with_context(|| format!("inspect {}", path.display()))?;
    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": path.display().to_string(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&json).context("serialize json")?);
        }
    }
    Ok(())
}

struct FileEntry {
    path: PathBuf,
    size: u64,
}

fn collect_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(FileEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(mut entries: Vec<FileEntry>, sort: Option<InspectSort>) -> Vec<FileEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}
