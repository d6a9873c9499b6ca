//! soramimi-align CLI: parody/original lyric alignment and search datasets.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use soramimi_align_core::config::AlignConfig;
use soramimi_align_core::pipeline::{
    align_files, collect_input_files, create_dataset, write_aligned_csv, write_dataset_json,
    AlignOptions,
};
use soramimi_align_core::{Granularity, LineAligner};

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "soramimi-align",
    about = "Align parody lyrics to their originals mora by mora",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align analyzed lyric files and write a CSV of aligned rows
    Align(AlignArgs),
    /// Build a phonetic search dataset from word-level alignments
    Dataset(DatasetArgs),
}

// ─── Align ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Analyzed lyrics file, or a directory of *.txt files
    #[arg(short, long, default_value = "data/lyrics")]
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Parody-side alignment unit
    #[arg(long, default_value = "mora", value_parser = ["mora", "word"])]
    unit: String,

    /// JSON config file (overrides SORAMIMI_ALIGN_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip files that fail to parse or align
    #[arg(long, default_value_t = false)]
    keep_going: bool,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Dataset ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct DatasetArgs {
    /// Word table CSV with `pronunciation` and `type` columns
    #[arg(short, long)]
    word_table: PathBuf,

    /// Word-level aligned CSV from `align --unit word`
    #[arg(short, long)]
    aligned: PathBuf,

    /// Output JSON path
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Show verbose output
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    // Init logging
    let log_level = match &cli.command {
        Command::Align(a) if a.verbose => "debug",
        Command::Dataset(a) if a.verbose => "debug",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Align(args) => run_align(args),
        Command::Dataset(args) => run_dataset(args),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Runners ─────────────────────────────────────────────────────

fn run_align(args: AlignArgs) -> Result<()> {
    let config = AlignConfig::load(args.config.as_deref())?;
    let granularity: Granularity = args.unit.parse()?;

    let files = collect_input_files(&args.input)?;
    if files.is_empty() {
        bail!("No lyric files found in {}", args.input.display());
    }
    log::info!("Found {} lyric file(s)", files.len());

    let aligner = LineAligner::new(&config);
    let options = AlignOptions {
        granularity,
        keep_going: args.keep_going,
    };
    let rows = align_files(&aligner, &files, options)?;
    write_aligned_csv(&args.output, &rows)?;
    Ok(())
}

fn run_dataset(args: DatasetArgs) -> Result<()> {
    let dataset = create_dataset(&args.word_table, &args.aligned)?;
    write_dataset_json(&args.output, &dataset)?;
    Ok(())
}
