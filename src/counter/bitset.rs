use super::{Counter, Tally};
use crate::{Error, ParserKind};
use std::io::BufRead;

/// Number of bits needed to cover every IPv4 address.
pub const ADDRESS_SPACE: u64 = 1 << 32;

/// Fixed size bit array.
#[derive(Debug, Clone)]
pub struct Bitset {
    words: Vec<u64>,
}

impl Bitset {
    pub fn with_bits(bits: u64) -> Self {
        let words = bits.div_ceil(64) as usize;

        Self {
            words: vec![0; words],
        }
    }

    /// Sets `bit` and returns true if it was previously clear.
    pub fn insert(&mut self, bit: u32) -> bool {
        let word = &mut self.words[(bit / 64) as usize];
        let mask = 1u64 << (bit % 64);

        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    pub fn contains(&self, bit: u32) -> bool {
        self.words[(bit / 64) as usize] & (1u64 << (bit % 64)) != 0
    }

    pub fn len(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

/// Tracks every possible address in one 512 MiB bitset.
pub struct BitsetCounter {
    seen: Bitset,
    parser: ParserKind,
}

impl BitsetCounter {
    pub fn new(parser: ParserKind) -> Self {
        Self {
            // Zeroed pages are only backed once they are written to
            seen: Bitset::with_bits(ADDRESS_SPACE),
            parser,
        }
    }

    pub fn contains(&self, address: u32) -> bool {
        self.seen.contains(address)
    }
}

impl Counter for BitsetCounter {
    fn count(&mut self, reader: &mut dyn BufRead) -> Result<Tally, Error> {
        let seen = &mut self.seen;
        super::for_each_line(reader, self.parser, |address| seen.insert(address))
    }
}
