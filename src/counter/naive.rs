use super::{Counter, Tally};
use crate::{Error, ParserKind};
use std::{collections::HashSet, io::BufRead};

/// Keeps every distinct address in a `HashSet`.
///
/// Memory grows with the number of distinct addresses, which makes it the
/// cheapest option for small inputs and the worst one for large ones.
#[derive(Debug, Default)]
pub struct NaiveCounter {
    seen: HashSet<u32>,
    parser: ParserKind,
}

impl NaiveCounter {
    pub fn new(parser: ParserKind) -> Self {
        Self {
            seen: HashSet::new(),
            parser,
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Counter for NaiveCounter {
    fn count(&mut self, reader: &mut dyn BufRead) -> Result<Tally, Error> {
        let seen = &mut self.seen;
        super::for_each_line(reader, self.parser, |address| seen.insert(address))
    }
}
