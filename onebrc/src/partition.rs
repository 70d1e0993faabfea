//! Splitting the input into line-aligned chunks.

use crate::chunk::Chunk;
use std::io;
use std::num::NonZeroUsize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// Read buffer capacity for the underlying reader (1 MiB).
pub const BUF_CAPACITY: usize = 1024 * 1024;

/// Chunks per worker thread under [`ChunkCount::Auto`].
pub const CHUNKS_PER_WORKER: usize = 4;

/// Smallest chunk [`ChunkCount::Auto`] produces (64 KiB).
pub const MIN_CHUNK_SIZE: usize = 64 * 1024;

/// Largest chunk [`ChunkCount::Auto`] produces (64 MiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// How many chunks to split the input into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkCount {
    /// A small multiple of the available parallelism, with chunk sizes
    /// clamped to [`MIN_CHUNK_SIZE`]..=[`MAX_CHUNK_SIZE`].
    #[default]
    Auto,
    /// Aim for exactly this many chunks. Chunks are extended to the next line
    /// boundary, so fewer may be produced.
    Fixed(NonZeroUsize),
}

impl ChunkCount {
    /// Targets `n` chunks; `0` is treated as [`ChunkCount::Auto`].
    pub fn fixed(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(ChunkCount::Auto, ChunkCount::Fixed)
    }

    /// Number of chunks aimed for.
    pub fn target(self) -> NonZeroUsize {
        match self {
            ChunkCount::Auto => {
                let workers = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
                NonZeroUsize::new(workers * CHUNKS_PER_WORKER).unwrap_or(NonZeroUsize::MIN)
            }
            ChunkCount::Fixed(n) => n,
        }
    }

    /// Byte size of each chunk for an input of `len` bytes, before line
    /// extension. Always at least 1.
    pub fn chunk_size(self, len: u64) -> usize {
        let per_chunk = len.div_ceil(self.target().get() as u64);
        let per_chunk = usize::try_from(per_chunk).unwrap_or(usize::MAX);

        match self {
            ChunkCount::Auto => per_chunk.clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE),
            ChunkCount::Fixed(_) => per_chunk.max(1),
        }
    }
}

/// Reads line-aligned [`Chunk`]s from an async reader.
///
/// Each chunk takes `chunk_size` bytes and is then extended up to and
/// including the next `\n`.
pub struct ChunkReader<R> {
    reader: BufReader<R>,
    chunk_size: usize,
    next_index: usize,
    offset: u64,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Wraps `reader`, cutting chunks of roughly `chunk_size` bytes.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(BUF_CAPACITY.min(chunk_size.max(1)), reader),
            chunk_size: chunk_size.max(1),
            next_index: 0,
            offset: 0,
        }
    }

    /// Number of bytes handed out so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads the next chunk, or `None` at end of input.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        let mut task_chunk = Vec::with_capacity(self.chunk_size);

        let nread = (&mut self.reader)
            .take(self.chunk_size as u64)
            .read_to_end(&mut task_chunk)
            .await?;

        if nread == 0 {
            return Ok(None);
        }

        if task_chunk.last() != Some(&b'\n') {
            self.reader.read_until(b'\n', &mut task_chunk).await?;
        }

        let chunk = Chunk::new(self.next_index, self.offset, task_chunk);
        self.next_index += 1;
        self.offset += chunk.data.len() as u64;

        Ok(Some(chunk))
    }
}
