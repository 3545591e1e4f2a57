//! Hardware address parsing
//!
//! Boot files are keyed by the client's MAC address, so every textual form
//! an operator might paste has to collapse to a single canonical string.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for input that is not a 48-bit hardware address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid MAC address: {0:?}")]
pub struct MacParseError(String);

/// A 48-bit hardware address.
///
/// Accepts colon-, dash- or dot-separated groups (`3C:EC:EF:F3:29:BE`,
/// `3c-ec-ef-f3-29-be`, `3:ec:ef:f3:29:be`, `3cec.eff3.29be`,
/// `3cec:eff3:29be`, `3cecef-f329be`) and bare hex (`3CECEFF329BE`),
/// case-insensitively.
/// Displays as lower-case colon-separated hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Address from raw octets.
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || MacParseError(s.to_string());

        let has_colon = input.contains(':');
        let has_dash = input.contains('-');
        let has_dot = input.contains('.');

        let octets = match (has_colon, has_dash, has_dot) {
            (true, false, false) => parse_groups(input, ':'),
            (false, true, false) => parse_groups(input, '-'),
            (false, false, true) => parse_groups(input, '.'),
            (false, false, false) => parse_bare(input),
            _ => None,
        };

        octets.map(MacAddress).ok_or_else(invalid)
    }
}

/// Separated groups, left-padded with zeros: six groups of one or two
/// digits, three of one to four (`3cec.eff3.29be`), or two of five or six
/// (`3cecef-f329be`).
fn parse_groups(input: &str, sep: char) -> Option<[u8; 6]> {
    let groups: Vec<&str> = input.split(sep).collect();
    let (min, width) = match groups.len() {
        6 => (1, 2),
        3 => (1, 4),
        2 => (5, 6),
        _ => return None,
    };

    let mut digits = String::with_capacity(12);
    for group in groups {
        if group.len() < min
            || group.len() > width
            || !group.chars().all(|c| c.is_ascii_hexdigit())
        {
            return None;
        }
        digits.extend(std::iter::repeat_n('0', width - group.len()));
        digits.push_str(group);
    }
    parse_bare(&digits)
}

/// Exactly twelve hex digits.
fn parse_bare(input: &str) -> Option<[u8; 6]> {
    if input.len() != 12 || !input.is_ascii() {
        return None;
    }
    let mut octets = [0u8; 6];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = parse_hex(&input[i * 2..i * 2 + 2])?;
    }
    Some(octets)
}

fn parse_hex(digits: &str) -> Option<u8> {
    // from_str_radix tolerates a leading '+', which is not a hex digit here
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Canonicalize a hardware address to lower-case colon-separated form.
pub fn format_mac(input: &str) -> Result<String, MacParseError> {
    input.parse::<MacAddress>().map(|mac| mac.to_string())
}
