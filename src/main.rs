//! RNGne CLI
//!
//! Command-line front end: decodes images, runs the extraction
//! pipeline, prints the entropy report and writes the raw bitstream.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rand_core::RngCore;
use rngne::{
    analysis::ThresholdViolation,
    config::{ConfigError, FileConfig, PipelineConfig},
    conditioning::HashAlgorithm,
    metrics::{MetricsError, MetricsRegistry},
    persist::{BitsWriter, PersistError},
    pipeline::{EntropyReport, Pipeline, PipelineError, PipelineOutput},
    seeding::SeededRng,
    source::{ImageFile, PixelSource, SourceError, SyntheticSource},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "rngne", version, about = "Random number generator from natural entropy")]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, analyze and seed from one or more images (JPEG, PNG, GIF).
    Process(ProcessArgs),
    /// Run the pipeline on a synthetic test pattern.
    Synthetic(SyntheticArgs),
    /// Print CSPRNG output seeded from an image's master seed.
    Sample(SampleArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// Bits per block for min-entropy and collision entropy.
    #[arg(long)]
    block_size: Option<usize>,

    /// Extractor hash: sha256 or blake3.
    #[arg(long)]
    hash: Option<HashAlgorithm>,
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Input images.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[command(flatten)]
    pipeline: PipelineArgs,

    /// Directory for raw bitstream files.
    #[arg(long)]
    bits_dir: Option<PathBuf>,

    /// Do not write raw bitstream files.
    #[arg(long)]
    no_bits: bool,

    /// Print one JSON object per image instead of text.
    #[arg(long)]
    json: bool,

    /// Write Prometheus metrics to this file after the batch.
    #[arg(long)]
    metrics: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SyntheticArgs {
    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Pattern variation.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Input image.
    image: PathBuf,

    /// Number of random bytes to print.
    #[arg(long, default_value_t = 32)]
    bytes: usize,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{failed} of {total} images failed")]
    Batch { failed: usize, total: usize },
}

/// One processed image, as printed with `--json`.
#[derive(Serialize)]
struct RunRecord<'a> {
    source: String,
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a EntropyReport,
    seed_entropy_bound: f64,
    bits_file: Option<PathBuf>,
    low_entropy: Option<String>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file_config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    match cli.cmd {
        Command::Process(args) => cmd_process(&file_config, args),
        Command::Synthetic(args) => cmd_synthetic(&file_config, args),
        Command::Sample(args) => cmd_sample(&file_config, args),
    }
}

fn build_pipeline(file_config: &FileConfig, args: &PipelineArgs) -> Result<Pipeline, CliError> {
    let mut config: PipelineConfig = file_config.pipeline.clone();
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(hash) = args.hash {
        config.hash = hash;
    }
    Ok(Pipeline::new(config)?)
}

fn cmd_process(file_config: &FileConfig, args: ProcessArgs) -> Result<(), CliError> {
    info!("RNGne v{}", rngne::VERSION);

    let pipeline = build_pipeline(file_config, &args.pipeline)?;
    let metrics = MetricsRegistry::new()?;

    let mut output = file_config.output.clone();
    if let Some(dir) = args.bits_dir.clone() {
        output.bits_dir = dir;
    }
    let writer = (output.write_bits && !args.no_bits).then(|| BitsWriter::from_config(&output));

    // Stop between images on Ctrl-C
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("Could not install Ctrl-C handler: {}", e);
    }

    let total = args.images.len();
    let mut succeeded = 0;
    let mut failed = 0;

    for path in &args.images {
        if interrupted.load(Ordering::SeqCst) {
            warn!("Interrupted, skipping remaining images");
            break;
        }

        let source = ImageFile::new(path);
        match process_one(&pipeline, &source, writer.as_ref(), file_config, args.json) {
            Ok(out) => {
                metrics.record_run(&out.report);
                succeeded += 1;
            }
            Err(e) => {
                eprintln!("Error: {}: {}", source.name(), e);
                metrics.record_failure();
                failed += 1;
            }
        }
    }

    info!(
        "Processed {} of {} images: {} ok, {} failed",
        succeeded + failed,
        total,
        succeeded,
        failed
    );

    if let Some(path) = &args.metrics {
        metrics.write_to(path)?;
    }

    if failed > 0 {
        return Err(CliError::Batch { failed, total });
    }
    Ok(())
}

fn process_one(
    pipeline: &Pipeline,
    source: &dyn PixelSource,
    writer: Option<&BitsWriter>,
    file_config: &FileConfig,
    json: bool,
) -> Result<PipelineOutput, CliError> {
    let name = source.name();
    let grid = source.load()?;
    let out = pipeline.run(&grid)?;

    let bits_file = match writer {
        Some(w) => Some(w.write(&name, &out.bits)?),
        None => None,
    };

    let quality = file_config.quality.check(out.report.estimates());
    if let Err(ref violation) = quality {
        warn!("{}: low entropy: {}", name, violation);
    }

    if json {
        let record = RunRecord {
            source: name,
            generated_at: Utc::now(),
            report: &out.report,
            seed_entropy_bound: out.report.seed_entropy_bound(),
            bits_file,
            low_entropy: quality.err().map(|v| v.to_string()),
        };
        println!("{}", serde_json::to_string(&record)?);
    } else {
        print_report(&name, &out.report, bits_file.as_ref(), quality.err());
    }

    Ok(out)
}

fn print_report(
    name: &str,
    report: &EntropyReport,
    bits_file: Option<&PathBuf>,
    violation: Option<ThresholdViolation>,
) {
    println!("== {} ==", name);
    println!("{}", report);
    println!(
        "Seed entropy bound:  {:.1} of 256 bits",
        report.seed_entropy_bound()
    );
    if let Some(path) = bits_file {
        println!("Raw bit output file: {}", path.display());
    }
    match violation {
        Some(v) => println!("Quality:             LOW ENTROPY ({})", v),
        None => println!("Quality:             ok"),
    }
    println!();
}

fn cmd_synthetic(file_config: &FileConfig, args: SyntheticArgs) -> Result<(), CliError> {
    info!("This is a demonstration using a synthetic pattern, not an entropy source");

    let pipeline = build_pipeline(file_config, &args.pipeline)?;
    let source = SyntheticSource::new(args.width, args.height).with_seed(args.seed);

    let grid = source.load()?;
    let out = pipeline.run(&grid)?;
    let violation = file_config.quality.check(out.report.estimates()).err();

    print_report(&source.name(), &out.report, None, violation);
    Ok(())
}

fn cmd_sample(file_config: &FileConfig, args: SampleArgs) -> Result<(), CliError> {
    let pipeline = build_pipeline(file_config, &args.pipeline)?;
    let grid = ImageFile::new(&args.image).load()?;
    let out = pipeline.run(&grid)?;

    let seed = out.report.master_seed();
    if file_config.quality.check(out.report.estimates()).is_err() {
        warn!("Master seed derived from a low-entropy image");
    }

    let mut rng = SeededRng::from_master_seed(seed);
    let mut buf = vec![0u8; args.bytes];
    rng.fill_bytes(&mut buf);

    println!("Master seed:  {}", seed);
    println!(
        "Random bytes: {}",
        buf.iter().map(|b| format!("{:02x}", b)).collect::<String>()
    );

    info!("Generated {} bytes", rng.bytes_generated());
    Ok(())
}
