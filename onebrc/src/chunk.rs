//! Chunk processing: folding a line-aligned slice of the input into a local map.

use crate::error::{Error, Result};
use crate::parse::parse_line;
use crate::station::Station;
use memchr::memchr_iter;
use std::collections::HashMap;

/// Station name to accumulator, unordered.
pub type Stations = HashMap<String, Station>;

/// A contiguous, line-aligned piece of the input.
///
/// `data` only ever holds whole lines. The final line of the input may lack
/// its `\n` terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in read order.
    pub index: usize,
    /// Absolute byte offset of `data[0]` in the input.
    pub offset: u64,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Creates a chunk.
    pub fn new(index: usize, offset: u64, data: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            data,
        }
    }

    /// Iterates over `(start, line)` pairs, `start` being relative to `data`.
    ///
    /// The empty tail after a final `\n` is not a line.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &[u8])> + '_ {
        let data = self.data.as_slice();
        let mut start = 0;

        memchr_iter(b'\n', data)
            .chain(std::iter::once(data.len()))
            .filter_map(move |end| {
                let line_start = start;
                start = end + 1;

                if line_start == data.len() {
                    None
                } else {
                    Some((line_start, &data[line_start..end]))
                }
            })
    }
}

/// Folds every line of `chunk` into a fresh chunk-local map.
///
/// The first malformed line fails the whole chunk.
pub fn process_chunk(chunk: &Chunk) -> Result<Stations> {
    let mut stations = Stations::new();

    for (start, line) in chunk.lines() {
        let measurement = parse_line(line).map_err(|kind| Error::Parse {
            chunk: chunk.index,
            offset: chunk.offset + start as u64,
            line: String::from_utf8_lossy(line).into_owned(),
            kind,
        })?;

        match stations.get_mut(measurement.station) {
            Some(station) => station.update(measurement.value),
            None => {
                stations.insert(
                    measurement.station.to_owned(),
                    Station::from_value(measurement.value),
                );
            }
        }
    }

    Ok(stations)
}
