use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use lfs_store::{DiskStore, ObjectStore, StoreConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let store = open_store(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&store, cli.command, cli.format, &mut out)
}

/// Build the store from `--config` and `--root`, the latter taking precedence.
fn open_store(cli: &Cli) -> anyhow::Result<DiskStore> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match &cli.root {
            Some(root) => StoreConfig::new(root),
            None => bail!("no storage root: pass --root or --config"),
        },
    };
    if let Some(root) = &cli.root {
        config.root = root.clone();
    }
    Ok(DiskStore::with_config(config)?)
}

fn read_payload(data: Option<String>) -> anyhow::Result<Vec<u8>> {
    match data {
        Some(data) => Ok(data.into_bytes()),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

pub fn execute<S: ObjectStore, W: Write>(
    store: &S,
    command: Command,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::Upload(args) => {
            store.upload_from_path(&args.source, &args.key)?;
            done(out, format, "uploaded", &args.key)
        }
        Command::Put(args) => {
            let payload = read_payload(args.data)?;
            store.upload_buffer(&payload, &args.key)?;
            done(out, format, "stored", &args.key)
        }
        Command::Append(args) => {
            let payload = read_payload(args.data)?;
            store.append_buffer(&payload, &args.key)?;
            done(out, format, "appended", &args.key)
        }
        Command::Cat(args) => {
            let mut handle = store.open_for_read(&args.key)?;
            io::copy(&mut handle, out)?;
            Ok(())
        }
        Command::Get(args) => {
            store.download_to_path(&args.key, &args.dest)?;
            done(out, format, "downloaded", &args.key)
        }
        Command::Rm(args) => {
            store.remove(&args.key)?;
            done(out, format, "removed", &args.key)
        }
        Command::Ls(args) => {
            let mut entries = store.list(&args.prefix)?;
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&entries)?)?,
                OutputFormat::Text => {
                    for entry in &entries {
                        if entry.is_dir {
                            writeln!(out, "{}/", entry.name.blue().bold())?;
                        } else {
                            writeln!(out, "{}", entry.name)?;
                        }
                    }
                }
            }
            Ok(())
        }
        Command::Exists(args) => {
            let exists = store.exists(&args.key)?;
            match format {
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    serde_json::json!({ "key": args.key, "exists": exists })
                )?,
                OutputFormat::Text if exists => writeln!(out, "{} {}", "✓".green(), args.key)?,
                OutputFormat::Text => writeln!(out, "{} {}", "✗".red(), args.key)?,
            }
            Ok(())
        }
    }
}

fn done<W: Write>(out: &mut W, format: OutputFormat, action: &str, key: &str) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => writeln!(
            out,
            "{}",
            serde_json::json!({ "action": action, "key": key })
        )?,
        OutputFormat::Text => writeln!(out, "{} {} {}", "✓".green().bold(), action, key.yellow())?,
    }
    Ok(())
}
