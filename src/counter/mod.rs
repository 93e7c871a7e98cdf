mod bitset;
mod concurrent;
mod naive;

pub use bitset::*;
pub use concurrent::*;
pub use naive::*;

use crate::{Config, Error, ParserKind};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    ops::AddAssign,
    path::Path,
};

/// Outcome of counting one input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Non-empty lines read.
    pub lines: u64,
    /// Lines that did not parse as an address.
    pub malformed: u64,
    /// Addresses seen for the first time.
    pub unique: u64,
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.lines += rhs.lines;
        self.malformed += rhs.malformed;
        self.unique += rhs.unique;
    }
}

impl Tally {
    /// Feeds one raw line. Surrounding whitespace is dropped and empty lines
    /// are ignored; `insert` returns true when the address is new.
    pub fn record(
        &mut self,
        line: &[u8],
        parser: ParserKind,
        mut insert: impl FnMut(u32) -> bool,
    ) {
        let line = line.trim_ascii();
        if line.is_empty() {
            return;
        }

        self.lines += 1;

        match parser.parse(line) {
            Ok(address) => {
                if insert(address) {
                    self.unique += 1;
                }
            }
            Err(e) => {
                debug!(
                    "skipping malformed line {:?}: {}",
                    String::from_utf8_lossy(line),
                    e
                );
                self.malformed += 1;
            }
        }
    }
}

/// Counts distinct IPv4 addresses, one per line.
///
/// A counter keeps what it has seen across calls, so `unique` in the returned
/// tally only covers addresses that were new to this counter.
pub trait Counter {
    fn count(&mut self, reader: &mut dyn BufRead) -> Result<Tally, Error>;

    fn count_file(&mut self, path: &Path) -> Result<Tally, Error> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        self.count(&mut BufReader::new(file))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Naive,
    #[default]
    Bitset,
    Concurrent,
}

impl Strategy {
    pub fn build(self, config: &Config) -> Box<dyn Counter> {
        match self {
            Strategy::Naive => Box::new(NaiveCounter::new(config.parser)),
            Strategy::Bitset => Box::new(BitsetCounter::new(config.parser)),
            Strategy::Concurrent => Box::new(ConcurrentCounter::new(
                config.parser,
                config.workers(),
                config.chunk_size,
            )),
        }
    }
}

fn for_each_line(
    reader: &mut dyn BufRead,
    parser: ParserKind,
    mut insert: impl FnMut(u32) -> bool,
) -> Result<Tally, Error> {
    let mut tally = Tally::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        tally.record(&line, parser, &mut insert);
    }

    Ok(tally)
}
