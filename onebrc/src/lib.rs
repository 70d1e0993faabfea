//! onebrc - parallel per-station min/mean/max aggregation.
//!
//! Reads a file of `<station>;<value>` lines, splits it into line-aligned
//! chunks, aggregates each chunk on its own tokio task and merges the partial
//! results into a report sorted by station name.
//!
//! # Components
//!
//! - [`parse`]: one line into a borrowed [`Measurement`]
//! - [`Station`]: min/max/sum/count accumulator with an order-independent merge
//! - [`chunk`]: folding a [`Chunk`] into a chunk-local map
//! - [`partition`]: cutting the input into chunks ([`ChunkCount`], [`ChunkReader`])
//! - [`merge`]: combining chunk-local maps
//! - [`Report`]: sorted `{name=min/mean/max, ...}` rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use onebrc::{calculate, EngineConfig};
//!
//! # async fn run() -> onebrc::Result<()> {
//! let report = calculate("measurements.txt", &EngineConfig::default()).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod chunk;
pub mod engine;
pub mod error;
pub mod merge;
pub mod parse;
pub mod partition;
pub mod report;
pub mod station;

pub use chunk::{process_chunk, Chunk, Stations};
pub use engine::{calculate, calculate_reader, EngineConfig, DEFAULT_INPUT};
pub use error::{Error, ParseErrorKind, Result};
pub use parse::{parse_line, Measurement};
pub use partition::{ChunkCount, ChunkReader};
pub use report::Report;
pub use station::{round_tenth, Station, StationSummary};
