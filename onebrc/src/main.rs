use anyhow::{Context, Result};
use clap::Parser;
use onebrc::{calculate, ChunkCount, EngineConfig, DEFAULT_INPUT};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Per-station min/mean/max over a `<station>;<value>` measurements file.
#[derive(Debug, Parser)]
#[command(name = "onebrc", version, about)]
struct Args {
    /// Measurements file
    #[arg(default_value = DEFAULT_INPUT)]
    path: PathBuf,

    /// Number of chunks to split the input into (default: 4 per worker)
    #[arg(short, long)]
    chunks: Option<NonZeroUsize>,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    workers: Option<NonZeroUsize>,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "Parsed arguments");

    let mut runtime = tokio::runtime::Builder::new_multi_thread();
    if let Some(workers) = args.workers {
        runtime.worker_threads(workers.get());
    }
    let runtime = runtime
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let config = EngineConfig::new()
        .with_chunks(args.chunks.map_or(ChunkCount::Auto, ChunkCount::Fixed));

    let start_time = Instant::now();
    let report = runtime
        .block_on(calculate(&args.path, &config))
        .with_context(|| format!("failed to process {}", args.path.display()))?;

    println!("{report}");
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "Done");

    Ok(())
}
