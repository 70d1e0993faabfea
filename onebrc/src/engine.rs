//! Entry points: read, dispatch chunks onto the runtime, merge, report.

use crate::chunk::{process_chunk, Chunk, Stations};
use crate::error::{Error, Result};
use crate::merge::merge_into;
use crate::partition::{ChunkCount, ChunkReader};
use crate::report::Report;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Instant;
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Default input path used when the caller names none.
pub const DEFAULT_INPUT: &str = "./measurements.txt";

/// Chunks allowed in flight per worker thread when no explicit limit is set.
pub const IN_FLIGHT_PER_WORKER: usize = 2;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// How the input is split into chunks.
    pub chunks: ChunkCount,
    /// Most chunks read but not yet merged at any time. `None` means
    /// [`IN_FLIGHT_PER_WORKER`] per available CPU.
    pub max_in_flight: Option<NonZeroUsize>,
}

impl EngineConfig {
    /// Creates a configuration with automatic chunking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunking policy.
    pub fn with_chunks(mut self, chunks: ChunkCount) -> Self {
        self.chunks = chunks;
        self
    }

    /// Caps how many chunks may be held in memory at once.
    pub fn with_max_in_flight(mut self, limit: NonZeroUsize) -> Self {
        self.max_in_flight = Some(limit);
        self
    }

    /// Effective in-flight chunk limit.
    pub fn in_flight_limit(&self) -> usize {
        self.max_in_flight.map_or_else(
            || {
                let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
                workers * IN_FLIGHT_PER_WORKER
            },
            NonZeroUsize::get,
        )
    }
}

/// Aggregates the measurements file at `path`.
///
/// Chunks are sized from the file length. Fails with
/// [`Error::FileNotFound`] if the file does not exist.
pub async fn calculate(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Report> {
    let path = path.as_ref();

    let file = File::open(path)
        .await
        .map_err(|e| Error::open(path, e))?;
    let len = file
        .metadata()
        .await
        .map_err(|e| Error::open(path, e))?
        .len();

    debug!(path = %path.display(), len, "Opened input");

    calculate_reader(file, len, config).await
}

/// Aggregates measurements read from `reader`.
///
/// `len` is the expected input size and only drives chunk sizing. Each chunk
/// is spawned onto the runtime as soon as it is read; results are merged in
/// completion order. At most [`EngineConfig::in_flight_limit`] chunks are
/// held at once; reading pauses until one of them has been merged. The first
/// failure aborts the outstanding chunks and is returned; which one is
/// reported when several chunks fail is unspecified.
pub async fn calculate_reader<R>(reader: R, len: u64, config: &EngineConfig) -> Result<Report>
where
    R: AsyncRead + Unpin,
{
    let chunk_size = config.chunks.chunk_size(len);
    let stations = aggregate_chunks(
        ChunkReader::new(reader, chunk_size),
        config.in_flight_limit(),
        process_chunk,
    )
    .await?;

    Ok(Report::from_stations(stations))
}

/// Read/dispatch/merge loop behind [`calculate_reader`], generic over the
/// per-chunk fold.
async fn aggregate_chunks<R, F>(
    mut chunks: ChunkReader<R>,
    max_in_flight: usize,
    process: F,
) -> Result<Stations>
where
    R: AsyncRead + Unpin,
    F: Fn(&Chunk) -> Result<Stations> + Clone + Send + 'static,
{
    let started = Instant::now();
    let max_in_flight = max_in_flight.max(1);

    let mut tasks = JoinSet::new();
    let mut stations = Stations::new();
    let mut dispatched = 0usize;

    while let Some(chunk) = chunks.next_chunk().await? {
        debug!(
            index = chunk.index,
            offset = chunk.offset,
            bytes = chunk.data.len(),
            in_flight = tasks.len(),
            "Dispatching chunk"
        );

        let process = process.clone();
        tasks.spawn(async move { process(&chunk) });
        dispatched += 1;

        while let Some(joined) = tasks.try_join_next() {
            merge_into(&mut stations, joined??);
        }

        while tasks.len() >= max_in_flight {
            match tasks.join_next().await {
                Some(joined) => merge_into(&mut stations, joined??),
                None => break,
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        merge_into(&mut stations, joined??);
    }

    info!(
        bytes = chunks.offset(),
        chunks = dispatched,
        max_in_flight,
        stations = stations.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Aggregation complete"
    );

    Ok(stations)
}
