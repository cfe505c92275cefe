use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use indexmap::IndexMap;
use phscore::editor::MoveCommand;
use phscore::model::{Category, CoreDoc, SymbolicCore};
use phscore::script::MoveScript;
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reorder variables of port-Hamiltonian cores stored as JSON", long_about = None)]
struct Cli {
    /// Core JSON file, or a directory searched recursively for *.json cores
    #[arg(value_name = "CORE_PATH")]
    core_path: Utf8PathBuf,

    /// Move to apply, as <category>:<from>:<to> (repeatable)
    #[arg(short = 'm', long = "move", value_name = "CAT:FROM:TO")]
    moves: Vec<MoveCommand>,

    /// JSON move script, applied before any --move
    #[arg(short, long, value_name = "SCRIPT")]
    script: Option<Utf8PathBuf>,

    /// Output file, or output directory when CORE_PATH is a directory
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<Utf8PathBuf>,

    /// Only validate the core(s) and print their dimensions
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut script = match &cli.script {
        Some(path) => MoveScript::load(path)?,
        None => MoveScript::default(),
    };
    script.extend(cli.moves.iter().copied());

    if cli.core_path.is_dir() {
        run_directory(&cli, &script)
    } else {
        run_file(&cli, &script)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn process(path: &Utf8Path, script: &MoveScript, check_only: bool) -> Result<CoreDoc> {
    let mut doc =
        CoreDoc::load_from_json(path).with_context(|| format!("Failed to load {}", path))?;
    if !check_only {
        script
            .run(&mut doc.core)
            .with_context(|| format!("While reordering {}", path))?;
    }
    Ok(doc)
}

fn report(path: &Utf8Path, core: &SymbolicCore) -> serde_json::Value {
    let dims = core.dims();
    let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
    for category in Category::ALL {
        counts.insert(category.name(), dims.get(category));
    }
    counts.insert("total", dims.total());
    serde_json::json!({
        "path": path.as_str(),
        "label": core.label,
        "dims": counts,
        "m_zero": core.m.is_zero(),
    })
}

fn run_file(cli: &Cli, script: &MoveScript) -> Result<()> {
    let doc = process(&cli.core_path, script, cli.check)?;
    if cli.check {
        println!("{}", serde_json::to_string_pretty(&report(&cli.core_path, &doc.core))?);
        return Ok(());
    }
    match &cli.output {
        Some(out) => {
            doc.save_to_json(out)
                .with_context(|| format!("Failed to write {}", out))?;
            info!(input = %cli.core_path, output = %out, moves = script.moves.len(), "core reordered");
        }
        None => println!("{}", serde_json::to_string_pretty(&doc)?),
    }
    Ok(())
}

fn collect_core_files(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => Some(path),
            Err(path) => {
                warn!("Skipping non-UTF8 path {}", path.display());
                None
            }
        })
        .filter(|path| path.extension() == Some("json"))
        .collect()
}

fn run_directory(cli: &Cli, script: &MoveScript) -> Result<()> {
    let out_dir = if cli.check {
        None
    } else {
        Some(
            cli.output
                .as_ref()
                .ok_or_else(|| anyhow!("--output <DIR> is required when CORE_PATH is a directory"))?,
        )
    };

    let mut files = collect_core_files(&cli.core_path);
    files.sort();
    info!(root = %cli.core_path, count = files.len(), "processing cores");

    let outcomes: Vec<(Utf8PathBuf, Result<CoreDoc>)> = files
        .into_par_iter()
        .map(|path| {
            let outcome = process(&path, script, cli.check);
            (path, outcome)
        })
        .collect();

    let total = outcomes.len();
    let mut failed = 0;
    for (path, outcome) in outcomes {
        let doc = match outcome {
            Ok(doc) => doc,
            Err(err) => {
                failed += 1;
                warn!("{:#}", err);
                continue;
            }
        };
        match out_dir {
            None => println!("{}", serde_json::to_string(&report(&path, &doc.core))?),
            Some(out_dir) => {
                let target = out_dir.join(path.strip_prefix(&cli.core_path)?);
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent))?;
                }
                doc.save_to_json(&target)
                    .with_context(|| format!("Failed to write {}", target))?;
                info!(input = %path, output = %target, "core reordered");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} cores failed", failed, total);
    }
    Ok(())
}
