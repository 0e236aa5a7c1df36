use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lfs",
    about = "Local-disk object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage root; overrides `root` from the config file
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML store configuration
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a local file under a key
    Upload(UploadArgs),
    /// Store a buffer (from --data or stdin) under a key
    Put(PutArgs),
    /// Append a buffer (from --data or stdin) to a key
    Append(PutArgs),
    /// Stream an object to stdout
    Cat(KeyArgs),
    /// Download an object to a local file
    Get(GetArgs),
    /// Remove an object
    Rm(KeyArgs),
    /// List the direct children of a prefix
    Ls(LsArgs),
    /// Check whether a key exists
    Exists(KeyArgs),
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    pub source: PathBuf,
    pub key: String,
}

#[derive(Args, Debug)]
pub struct PutArgs {
    pub key: String,
    #[arg(short, long)]
    pub data: Option<String>,
}

#[derive(Args, Debug)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub key: String,
    pub dest: PathBuf,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    #[arg(default_value = "")]
    pub prefix: String,
}
