use std::path::PathBuf;

use clap::Args;

use crate::definition::DefinitionStore;
use crate::error::Result;
use crate::resolver::Resolver;

#[derive(Debug, Args)]
pub struct TasksArgs {
    /// Language to list detectors for.
    #[arg(long)]
    pub lang: Option<String>,

    /// Countries (`all` for every one).
    #[arg(long, value_delimiter = ',')]
    pub country: Vec<String>,

    /// Extra definition batch file(s) to include.
    #[arg(long = "taskfile")]
    pub taskfiles: Vec<PathBuf>,

    /// Config file (default: ~/.config/pii-extract/config.yml).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Print one line per resolvable definition to stdout.
pub fn run(args: &TasksArgs) -> Result<()> {
    let mut cfg = super::load_config(args.config.as_deref(), args.lang.as_deref(), &args.country)?;
    cfg.taskfiles.extend(args.taskfiles.iter().cloned());

    let mut store = DefinitionStore::builtin();
    for path in &cfg.taskfiles {
        let batch = crate::definition::read_taskfile(path)?;
        store.merge_batch(&batch)?;
    }

    let lang = cfg.lang.to_lowercase();
    let countries: Option<Vec<String>> = cfg
        .country
        .map(|list| list.iter().map(|c| c.to_lowercase()).collect());
    let defs = Resolver::new(&store).resolve_all(&lang, countries.as_deref());
    if defs.is_empty() {
        eprintln!("pii-extract: no detectors for language '{}'", lang);
        return Ok(());
    }
    for def in defs {
        println!(
            "{:<16} {:<3} {:<3} {:<10} {}: {}",
            def.category.name(),
            def.lang,
            def.country.as_deref().unwrap_or("-"),
            def.implementation.kind().to_string(),
            def.name,
            def.doc
        );
    }
    Ok(())
}
