use std::net::AddrParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Address is empty")]
    Empty,

    #[error("Group has no digits")]
    EmptyGroup,

    #[error("Address ends with a dot")]
    TrailingDot,

    #[error("Invalid character: '{}'", .0.escape_ascii())]
    InvalidCharacter(u8),

    #[error("Group has more than 3 digits")]
    TooManyDigits,

    #[error("Octet is greater than 255")]
    OctetOutOfRange,

    #[error("Expected 4 groups, found {0}")]
    TooFewGroups(usize),

    #[error("Unexpected data after the fourth group")]
    TooManyGroups,

    #[error("Address is not UTF-8")]
    InvalidUtf8,

    #[error("Rejected by std parser: {0}")]
    Std(#[from] AddrParseError),
}
