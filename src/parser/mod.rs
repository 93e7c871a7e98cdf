mod error;
mod ipv4;

pub use error::*;
pub use ipv4::*;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Parser backend used to turn one input line into an address.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Strict dotted-decimal scanner, accepts zero padded groups.
    #[default]
    Scan,
    /// `std::net::Ipv4Addr` parsing, rejects zero padded groups.
    Std,
}

impl ParserKind {
    pub fn parse(self, line: &[u8]) -> Result<u32, ParserError> {
        match self {
            ParserKind::Scan => parse_ipv4(line),
            ParserKind::Std => {
                let line = std::str::from_utf8(line).map_err(|_| ParserError::InvalidUtf8)?;
                Ok(u32::from(line.parse::<Ipv4Addr>()?))
            }
        }
    }
}
