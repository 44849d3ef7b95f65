use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use lightshow::{
    CompileOpts, Constraints, FallbackRationale, Layout, PseqFile, SequenceStats, SequenceVariant,
    SongAnalysis, Strategy, VariantThreading,
};

#[derive(Parser, Debug)]
#[command(name = "lightshow", version)]
struct Cli {
    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effect plan for one strategy as JSON.
    Plan(PlanArgs),
    /// Compile one strategy to a sequence file.
    Render(RenderArgs),
    /// Compile every strategy and write a manifest.
    Variants(VariantsArgs),
    /// Print the header and a lit-channel summary of a sequence file.
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
struct Inputs {
    /// Layout JSON.
    #[arg(long)]
    layout: PathBuf,

    /// Song analysis JSON.
    #[arg(long)]
    song: PathBuf,

    /// Constraints JSON; the festive fallback is used when omitted.
    #[arg(long)]
    constraints: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// energy, elegant, or balanced.
    #[arg(long)]
    strategy: Strategy,

    /// Write the plan here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// energy, elegant, or balanced.
    #[arg(long)]
    strategy: Strategy,

    /// Output sequence path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct VariantsArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// Output directory for the sequences and `variants.json`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Compile strategies in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Date stamped into filenames (YYYY-MM-DD); defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<chrono::NaiveDate>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Sequence file to read.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    #[serde(flatten)]
    variant: &'a SequenceVariant,
    file: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectReport {
    header: lightshow::PseqHeader,
    payload_bytes: usize,
    stats: SequenceStats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Render(args) => cmd_render(args),
        Command::Variants(args) => cmd_variants(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{s}: {e}"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let bytes = std::fs::read(path).with_context(|| format!("read {what} '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {what} '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8], what: &str) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("write {what} '{}'", path.display()))
}

fn load(inputs: &Inputs) -> anyhow::Result<(Layout, SongAnalysis, Constraints)> {
    let layout: Layout = read_json(&inputs.layout, "layout")?;
    let song: SongAnalysis = read_json(&inputs.song, "song analysis")?;
    let constraints = match &inputs.constraints {
        Some(path) => read_json(path, "constraints")?,
        None => Constraints::fallback(),
    };
    Ok((layout, song, constraints))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (layout, song, constraints) = load(&args.inputs)?;
    let effects = lightshow::plan(&constraints, &layout, &song, args.strategy);
    let json = serde_json::to_string_pretty(&effects)?;

    match args.out {
        Some(out) => {
            ensure_parent(&out)?;
            write_output(&out, json.as_bytes(), "plan")?;
            eprintln!("wrote {} ({} effects)", out.display(), effects.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (layout, song, constraints) = load(&args.inputs)?;
    let compiled = lightshow::compile_sequence(
        &constraints,
        &layout,
        &song,
        args.strategy,
        &CompileOpts::default(),
    )?;

    ensure_parent(&args.out)?;
    write_output(&args.out, &compiled.data, "sequence")?;

    if compiled.render.effects_skipped > 0 {
        eprintln!(
            "skipped {} of {} effects",
            compiled.render.effects_skipped, compiled.render.effects_total
        );
    }
    eprintln!(
        "wrote {} ({} frames x {} channels, {} active frames)",
        args.out.display(),
        compiled.header.frame_count,
        compiled.header.channel_count,
        compiled.stats.active_frames
    );
    Ok(())
}

fn cmd_variants(args: VariantsArgs) -> anyhow::Result<()> {
    let (layout, song, constraints) = load(&args.inputs)?;
    let threading = VariantThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let variants = lightshow::compile_variants(
        &constraints,
        &layout,
        &song,
        &FallbackRationale,
        &CompileOpts::default(),
        &threading,
    )?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut manifest = Vec::with_capacity(variants.len());
    for variant in &variants {
        let file = lightshow::sequence_filename(&song.title, variant.strategy, date);
        let path = args.out_dir.join(&file);
        write_output(&path, &variant.data, "sequence")?;
        eprintln!("wrote {}", path.display());
        manifest.push(ManifestEntry { variant, file });
    }

    let manifest_path = args.out_dir.join("variants.json");
    let f = std::fs::File::create(&manifest_path)
        .with_context(|| format!("create manifest '{}'", manifest_path.display()))?;
    serde_json::to_writer_pretty(f, &manifest)
        .with_context(|| format!("write manifest '{}'", manifest_path.display()))?;
    eprintln!("wrote {}", manifest_path.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read sequence '{}'", args.in_path.display()))?;
    let file = PseqFile::parse(&bytes)
        .with_context(|| format!("decode sequence '{}'", args.in_path.display()))?;

    let report = InspectReport {
        header: file.header,
        payload_bytes: file.payload().len(),
        stats: SequenceStats::from_frames(file.header.channel_count as usize, file.frames()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
