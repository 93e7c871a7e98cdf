use crate::ParserError;
use std::{ffi::CStr, net::Ipv4Addr};

/// Position of the scanner relative to the dotted groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing has been consumed yet.
    StartOfGroup,
    /// At least one digit of the current group has been consumed.
    InGroup { value: u16, digits: u8 },
    /// A dot has just been consumed and the next group has no digits yet.
    AfterDot,
}

/// Single pass, byte at a time IPv4 scanner.
///
/// Every call to [`Scanner::step`] either advances the state or rejects the
/// input. [`Scanner::finish`] commits the last group and packs the octets.
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    state: State,
    octets: [u8; 4],
    committed: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub const fn new() -> Self {
        Self {
            state: State::StartOfGroup,
            octets: [0; 4],
            committed: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Number of groups closed by a dot so far.
    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn step(&mut self, byte: u8) -> Result<(), ParserError> {
        self.state = match (self.state, byte) {
            (state, b'0'..=b'9') => {
                let (value, digits) = match state {
                    State::InGroup { value, digits } => (value, digits),
                    State::StartOfGroup | State::AfterDot => (0, 0),
                };

                let digits = digits + 1;
                let value = value * 10 + u16::from(byte - b'0');

                if digits > 3 {
                    return Err(ParserError::TooManyDigits);
                }
                if value > 255 {
                    return Err(ParserError::OctetOutOfRange);
                }

                State::InGroup { value, digits }
            }

            (State::StartOfGroup | State::AfterDot, b'.') => {
                return Err(ParserError::EmptyGroup);
            }

            (State::InGroup { value, .. }, b'.') => {
                // The fourth group can only be closed by the end of input
                if self.committed == 3 {
                    return Err(ParserError::TooManyGroups);
                }

                self.commit(value);
                State::AfterDot
            }

            (_, other) => return Err(ParserError::InvalidCharacter(other)),
        };

        Ok(())
    }

    pub fn finish(mut self) -> Result<u32, ParserError> {
        match self.state {
            State::StartOfGroup => Err(ParserError::Empty),
            State::AfterDot => Err(ParserError::TrailingDot),
            State::InGroup { value, .. } => {
                self.commit(value);

                if self.committed != 4 {
                    return Err(ParserError::TooFewGroups(self.committed));
                }

                Ok(u32::from_be_bytes(self.octets))
            }
        }
    }

    fn commit(&mut self, value: u16) {
        // value is capped at 255 by step
        self.octets[self.committed] = value as u8;
        self.committed += 1;
    }
}

/// Parses a dotted-decimal IPv4 address into its big-endian `u32` form.
///
/// The whole input must be consumed: whitespace, signs, a fifth group or a
/// trailing dot are all rejected. Groups may be zero padded up to 3 digits.
pub fn parse_ipv4(input: &[u8]) -> Result<u32, ParserError> {
    let mut scanner = Scanner::new();

    for &byte in input {
        scanner.step(byte)?;
    }

    scanner.finish()
}

pub fn parse_ipv4_str(input: &str) -> Result<u32, ParserError> {
    parse_ipv4(input.as_bytes())
}

/// Parses a NUL terminated address, everything up to the terminator.
pub fn parse_ipv4_cstr(input: &CStr) -> Result<u32, ParserError> {
    parse_ipv4(input.to_bytes())
}

pub fn parse_ipv4_addr(input: &str) -> Result<Ipv4Addr, ParserError> {
    parse_ipv4_str(input).map(Ipv4Addr::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scanner_after(input: &str) -> Scanner {
        let mut scanner = Scanner::new();
        for &byte in input.as_bytes() {
            scanner.step(byte).expect("prefix should be accepted");
        }
        scanner
    }

    #[test]
    fn parses_well_known_addresses() {
        assert_eq!(parse_ipv4_str("192.168.1.1"), Ok(0xC0A8_0101));
        assert_eq!(parse_ipv4_str("127.0.0.1"), Ok(0x7F00_0001));
        assert_eq!(parse_ipv4_str("0.0.0.0"), Ok(0));
        assert_eq!(parse_ipv4_str("255.255.255.255"), Ok(0xFFFF_FFFF));
        assert_eq!(parse_ipv4_str("1.2.3.4"), Ok(0x0102_0304));
    }

    #[test]
    fn accepts_zero_padding_up_to_three_digits() {
        assert_eq!(parse_ipv4_str("001.002.003.004"), Ok(0x0102_0304));
        assert_eq!(parse_ipv4_str("000.00.0.010"), Ok(0x0000_000A));
    }

    #[test]
    fn rejects_out_of_range_octets() {
        assert_eq!(
            parse_ipv4_str("256.1.1.1"),
            Err(ParserError::OctetOutOfRange)
        );
        assert_eq!(
            parse_ipv4_str("1.2.256.4"),
            Err(ParserError::OctetOutOfRange)
        );
        assert_eq!(
            parse_ipv4_str("1.2.3.999"),
            Err(ParserError::OctetOutOfRange)
        );
    }

    #[test]
    fn rejects_long_groups() {
        assert_eq!(
            parse_ipv4_str("1234.0.0.1"),
            Err(ParserError::TooManyDigits)
        );
        assert_eq!(
            parse_ipv4_str("0001.0.0.0"),
            Err(ParserError::TooManyDigits)
        );
    }

    #[test]
    fn rejects_wrong_group_count() {
        assert_eq!(parse_ipv4_str("1.2.3"), Err(ParserError::TooFewGroups(3)));
        assert_eq!(parse_ipv4_str("1"), Err(ParserError::TooFewGroups(1)));
        assert_eq!(
            parse_ipv4_str("1.2.3.4.5"),
            Err(ParserError::TooManyGroups)
        );
        assert_eq!(parse_ipv4_str("1.2.3.4."), Err(ParserError::TooManyGroups));
    }

    #[test]
    fn rejects_empty_groups() {
        assert_eq!(parse_ipv4_str(""), Err(ParserError::Empty));
        assert_eq!(parse_ipv4_str(".1.2.3"), Err(ParserError::EmptyGroup));
        assert_eq!(parse_ipv4_str("1..2.3"), Err(ParserError::EmptyGroup));
        assert_eq!(parse_ipv4_str("1.2.3."), Err(ParserError::TrailingDot));
    }

    #[test]
    fn rejects_foreign_characters() {
        assert_eq!(
            parse_ipv4_str("1.2.3.a"),
            Err(ParserError::InvalidCharacter(b'a'))
        );
        assert_eq!(
            parse_ipv4_str("+1.2.3.4"),
            Err(ParserError::InvalidCharacter(b'+'))
        );
        assert_eq!(
            parse_ipv4_str(" 1.2.3.4"),
            Err(ParserError::InvalidCharacter(b' '))
        );
        assert_eq!(
            parse_ipv4_str("1.2.3.4\n"),
            Err(ParserError::InvalidCharacter(b'\n'))
        );
    }

    #[test]
    fn digit_transitions() {
        let mut scanner = Scanner::new();
        assert_eq!(scanner.state(), State::StartOfGroup);

        scanner.step(b'2').unwrap();
        assert_eq!(scanner.state(), State::InGroup { value: 2, digits: 1 });

        scanner.step(b'5').unwrap();
        scanner.step(b'5').unwrap();
        assert_eq!(
            scanner.state(),
            State::InGroup {
                value: 255,
                digits: 3
            }
        );

        let mut overflow = scanner;
        assert_eq!(overflow.step(b'0'), Err(ParserError::TooManyDigits));
    }

    #[test]
    fn dot_transitions() {
        let mut scanner = scanner_after("10");
        scanner.step(b'.').unwrap();
        assert_eq!(scanner.state(), State::AfterDot);
        assert_eq!(scanner.committed(), 1);

        assert_eq!(scanner.step(b'.'), Err(ParserError::EmptyGroup));
        assert_eq!(Scanner::new().step(b'.'), Err(ParserError::EmptyGroup));

        let mut full = scanner_after("1.2.3.4");
        assert_eq!(full.committed(), 3);
        assert_eq!(full.step(b'.'), Err(ParserError::TooManyGroups));
    }

    #[test]
    fn finish_per_state() {
        assert_eq!(Scanner::new().finish(), Err(ParserError::Empty));
        assert_eq!(scanner_after("1.").finish(), Err(ParserError::TrailingDot));
        assert_eq!(
            scanner_after("1.2").finish(),
            Err(ParserError::TooFewGroups(2))
        );
        assert_eq!(scanner_after("10.0.0.1").finish(), Ok(0x0A00_0001));
    }

    #[test]
    fn cstr_stops_at_terminator() {
        let raw = b"10.1.2.3\0garbage";
        let input = CStr::from_bytes_until_nul(raw).unwrap();
        assert_eq!(parse_ipv4_cstr(input), Ok(0x0A01_0203));
    }

    #[test]
    fn parses_into_std_addr() {
        assert_eq!(
            parse_ipv4_addr("172.16.254.1"),
            Ok(Ipv4Addr::new(172, 16, 254, 1))
        );
    }

    proptest! {
        #[test]
        fn round_trips_any_octets(a: u8, b: u8, c: u8, d: u8) {
            let input = format!("{a}.{b}.{c}.{d}");
            let expected = (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(c) << 8) | u32::from(d);

            prop_assert_eq!(parse_ipv4_str(&input), Ok(expected));
        }

        #[test]
        fn agrees_with_std_on_unpadded_input(input in "[0-9.]{0,16}") {
            let std_parsed = input.parse::<Ipv4Addr>().map(u32::from);

            if let Ok(expected) = std_parsed {
                prop_assert_eq!(parse_ipv4_str(&input), Ok(expected));
            }
        }

        #[test]
        fn never_panics(input in proptest::collection::vec(any::<u8>(), 0..32)) {
            let _ = parse_ipv4(&input);
        }
    }
}
