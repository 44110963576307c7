use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use bomtrace::application::dto::OutputFormat;
use bomtrace::cataloging::policies::{CatalogerConfig, OwnershipTiePolicy};

use crate::config::ConfigFile;

/// Catalog installed software in a filesystem tree
#[derive(Parser, Debug)]
#[command(name = "bomtrace")]
#[command(version)]
#[command(
    about = "Catalog installed software in a filesystem tree and emit a reproducible bill of materials",
    long_about = None
)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory and print its inventory
    Scan(ScanArgs),
    /// Re-encode an inventory document in another format
    Convert(ConvertArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    pub path: PathBuf,

    /// Output format: json or table
    #[arg(short, long)]
    pub output: Option<OutputFormat>,

    /// Write the inventory to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Catalogers to run, by name (e.g. "ruby,apkdb"); "all" runs every one
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub catalogers: Vec<String>,

    /// Maximum number of catalogers running at once
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub parallelism: Option<u64>,

    /// What to do when several packages own the same files equally: surface-all or skip
    #[arg(long, value_name = "POLICY", value_parser = parse_tie_policy)]
    pub ownership_ties: Option<OwnershipTiePolicy>,

    /// Path to config file (defaults to bomtrace.config.yml in the current directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct ConvertArgs {
    /// Inventory document to convert
    pub input: PathBuf,

    /// Output format: json or table
    #[arg(short, long, default_value = "json")]
    pub output: OutputFormat,

    /// Write the result to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

fn parse_tie_policy(raw: &str) -> Result<OwnershipTiePolicy, String> {
    OwnershipTiePolicy::parse(raw)
        .ok_or_else(|| format!("Invalid policy: {}. Please specify 'surface-all' or 'skip'", raw))
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl ScanArgs {
    /// Merges flags over the config file: CLI > config file > defaults.
    pub fn resolve(&self, config: Option<&ConfigFile>) -> (CatalogerConfig, OutputFormat) {
        let catalogers = if self.catalogers.is_empty() {
            config
                .and_then(|c| c.catalogers.clone())
                .unwrap_or_default()
        } else {
            self.catalogers.clone()
        };
        let parallelism = self
            .parallelism
            .map(|n| n as usize)
            .or_else(|| config.and_then(|c| c.parallelism));
        let ownership_ties = self
            .ownership_ties
            .or_else(|| config.and_then(ConfigFile::ownership_tie_policy))
            .unwrap_or_default();
        let output = self
            .output
            .or_else(|| config.and_then(ConfigFile::output_format))
            .unwrap_or_default();

        let cataloger_config = CatalogerConfig::default()
            .with_catalogers(catalogers)
            .with_parallelism(parallelism)
            .with_ownership_ties(ownership_ties);
        (cataloger_config, output)
    }
}
