pub mod process;
pub mod tasks;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{self, ExtractConfig};
use crate::error::Result;

/// Detect personally identifiable information in text documents.
#[derive(Debug, Parser)]
#[command(name = "pii-extract", version, about)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process a document and write the detected PII instances.
    Process(process::ProcessArgs),
    /// List the detectors available for a language and countries.
    Tasks(tasks::TasksArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Process(args) => process::run(&args),
            Commands::Tasks(args) => tasks::run(&args),
        }
    }
}

/// Load the config file (explicit path or the global default) and apply
/// the language and country overrides shared by every subcommand.
pub(crate) fn load_config(
    path: Option<&Path>,
    lang: Option<&str>,
    country: &[String],
) -> Result<ExtractConfig> {
    let path: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(config::default_path);
    let mut cfg = ExtractConfig::load_from(&path)?;
    if let Some(lang) = lang {
        cfg.lang = lang.to_string();
    }
    if !country.is_empty() {
        cfg.country = Some(country.to_vec());
    }
    Ok(cfg)
}
