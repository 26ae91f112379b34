use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::definition::DefinitionStore;
use crate::document::TextDocument;
use crate::entity::PiiCollection;
use crate::error::Result;
use crate::finder::PiiFinder;

#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input document (YAML/JSON chunk list, or plain text).
    pub infile: PathBuf,

    /// Output file; `.ndjson`/`.jsonl` writes one instance per line.
    pub outfile: PathBuf,

    /// Document language.
    #[arg(long)]
    pub lang: Option<String>,

    /// Countries for country-specific detectors (`all` for every one).
    #[arg(long, value_delimiter = ',')]
    pub country: Vec<String>,

    /// PII categories to detect.
    #[arg(long, value_delimiter = ',')]
    pub tasks: Vec<String>,

    /// Use every detector available for the language and countries.
    #[arg(long)]
    pub all_tasks: bool,

    /// Extra definition batch file(s) to add.
    #[arg(long = "taskfile")]
    pub taskfiles: Vec<PathBuf>,

    /// Config file (default: ~/.config/pii-extract/config.yml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the detectors in use.
    #[arg(long)]
    pub show_tasks: bool,

    /// Print detection statistics.
    #[arg(long)]
    pub show_stats: bool,
}

pub fn run(args: &ProcessArgs) -> Result<()> {
    let mut cfg = super::load_config(args.config.as_deref(), args.lang.as_deref(), &args.country)?;
    if !args.tasks.is_empty() {
        cfg.tasks = args.tasks.clone();
    }
    cfg.all_tasks |= args.all_tasks;
    cfg.taskfiles.extend(args.taskfiles.iter().cloned());

    let store = DefinitionStore::builtin();
    let mut finder = PiiFinder::new(&store, cfg.finder_options()?)?;
    for path in &cfg.taskfiles {
        finder.add_taskfile(path)?;
    }
    if finder.tasks().is_empty() {
        tracing::warn!("no pii tasks selected, use --tasks, --all-tasks or --taskfile");
    }

    if args.show_tasks {
        eprintln!("pii-extract: {}", finder);
        for ((category, country), tasks) in finder.task_info() {
            let country = country.as_deref().unwrap_or("-");
            for (name, doc) in tasks {
                eprintln!("  {category} [{country}] {name}: {doc}");
            }
        }
    }

    let stats = process_file(&args.infile, &args.outfile, &mut finder)?;

    if args.show_stats {
        eprintln!("pii-extract: statistics");
        for (key, count) in &stats {
            eprintln!("  {key:>20} {count}");
        }
    }
    eprintln!(
        "pii-extract: {} pii instance(s) written to {}",
        stats
            .iter()
            .filter(|(k, _)| k.as_str() != crate::finder::CALLS)
            .map(|(_, n)| n)
            .sum::<u64>(),
        args.outfile.display()
    );
    Ok(())
}

/// Load `infile`, run `finder` over it and write the detected instances to
/// `outfile`. Returns the finder statistics after the run.
pub fn process_file(
    infile: &Path,
    outfile: &Path,
    finder: &mut PiiFinder,
) -> Result<BTreeMap<String, u64>> {
    let doc = TextDocument::load(infile)?;
    let result = finder.process(&doc)?;
    tracing::debug!(
        "{}: {} pii instance(s) in {} chunk(s)",
        infile.display(),
        result.len(),
        doc.chunks.len()
    );
    write_collection(&result, outfile)?;
    Ok(finder.stats().clone())
}

fn write_collection(result: &PiiCollection, outfile: &Path) -> Result<()> {
    let ndjson = matches!(
        outfile.extension().and_then(|e| e.to_str()),
        Some("ndjson") | Some("jsonl")
    );
    let mut out = BufWriter::new(std::fs::File::create(outfile)?);
    if ndjson {
        for entity in result {
            serde_json::to_writer(&mut out, entity)?;
            out.write_all(b"\n")?;
        }
    } else {
        serde_json::to_writer_pretty(&mut out, result)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
