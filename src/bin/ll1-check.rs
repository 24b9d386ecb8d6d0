use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ll1_check::{AnalyzerConfig, Grammar, Report};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Checks whether a grammar is LL(1), after left factoring and removing
/// immediate left recursion.
#[derive(Parser)]
#[command(version, about)]
struct AppArgs {
    /// grammar in JSON (Initial, Terminals, NonTerminals, Productions)
    grammar: PathBuf,

    /// directory to write Result.json into, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with analyzer settings (max_depth, epsilon, end_marker)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// recursion depth after which FIRST/FOLLOW give up
    #[arg(long)]
    max_depth: Option<usize>,

    /// symbol standing for the empty string
    #[arg(long)]
    epsilon: Option<String>,

    /// symbol standing for end of input
    #[arg(long)]
    end_marker: Option<String>,

    /// print a readable summary to stderr
    #[arg(short, long)]
    report: bool,
}

fn load_config(args: &AppArgs) -> Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("decoding config {}", path.display()))?
        }
        None => AnalyzerConfig::default(),
    };

    if let Some(max_depth) = args.max_depth {
        config = config.with_max_depth(max_depth);
    }
    if let Some(epsilon) = &args.epsilon {
        config = config.with_epsilon(epsilon.as_str());
    }
    if let Some(end_marker) = &args.end_marker {
        config = config.with_end_marker(end_marker.as_str());
    }
    Ok(config)
}

fn load_grammar(path: &Path) -> Result<Grammar> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("decoding grammar {}", path.display()))
}

/// four space indent, non-ASCII symbols like λ are written as is
fn write_grammar(out: impl Write, grammar: &Grammar) -> Result<()> {
    let mut out = BufWriter::new(out);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    grammar.serialize(&mut ser)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let args = AppArgs::parse();
    let config = load_config(&args)?;
    let grammar = load_grammar(&args.grammar)?;
    log::info!(
        "Grammar has {} productions, {} nonterminals, {} terminals",
        grammar.productions().len(),
        grammar.non_terminals().len(),
        grammar.terminals().len(),
    );

    let grammar = ll1_check::analyze(grammar, &config)
        .with_context(|| format!("analysing {}", args.grammar.display()))?;

    if args.report {
        eprintln!("{}", Report(&grammar));
    }

    match &args.output {
        Some(dir) => {
            let path = dir.join("Result.json");
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            write_grammar(file, &grammar)?;
            log::info!("wrote {}", path.display());
        }
        None => write_grammar(io::stdout().lock(), &grammar)?,
    }

    Ok(())
}
