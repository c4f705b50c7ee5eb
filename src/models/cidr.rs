//! CIDR block parsing and range arithmetic.
//!
//! Provides [`CidrBlock`], a canonical network (host bits cleared) for either
//! address family, plus the parsing rules shared by every network check.

use super::address::{AddressValue, Family};
use crate::error::{MalformedReason, ParseError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A network block: base address with every bit beyond `prefix_len` cleared.
///
/// Ordering is by family, then base address, then prefix length, so a sorted
/// list puts an enclosing block before the blocks it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CidrBlock {
    base: AddressValue,
    prefix_len: u8,
}

/// Split CIDR text into its literal address and prefix length.
///
/// Host bits are kept as written. Callers pick the masking policy.
pub fn parse_parts(input: &str) -> Result<(AddressValue, u8), ParseError> {
    if input.is_empty() {
        return Err(malformed(input, MalformedReason::Empty));
    }
    if input.contains(|c: char| c.is_whitespace()) {
        return Err(malformed(input, MalformedReason::Whitespace));
    }

    let (addr_part, prefix_part) = match input.matches('/').count() {
        0 => return Err(malformed(input, MalformedReason::MissingPrefix)),
        1 => input
            .split_once('/')
            .ok_or_else(|| malformed(input, MalformedReason::MissingPrefix))?,
        _ => return Err(malformed(input, MalformedReason::TooManySlashes)),
    };
    if prefix_part.is_empty() {
        return Err(malformed(input, MalformedReason::EmptyPrefix));
    }

    let addr = AddressValue::parse_segment(input, addr_part)?;
    let prefix_len = parse_prefix(input, prefix_part, addr.max_prefix())?;
    Ok((addr, prefix_len))
}

/// Parse a CIDR string, silently clearing host bits.
///
/// # Examples
/// ```
/// use net_validators::models::parse_cidr;
/// let block = parse_cidr("10.0.0.5/24").unwrap();
/// assert_eq!(block.to_string(), "10.0.0.0/24");
/// ```
pub fn parse_cidr(input: &str) -> Result<CidrBlock, ParseError> {
    let (addr, prefix_len) = parse_parts(input)?;
    let block = CidrBlock::masked(addr, prefix_len);
    if block.base != addr {
        log::debug!("parse_cidr({input}) cleared host bits -> {block}");
    }
    Ok(block)
}

/// Parse either a bare address (a single-host block) or a CIDR string.
pub fn parse_address_or_block(input: &str) -> Result<CidrBlock, ParseError> {
    if input.contains('/') {
        parse_cidr(input)
    } else {
        input.parse::<AddressValue>().map(CidrBlock::host)
    }
}

/// Prefix digits: ASCII `0-9` only. Leading zeros are accepted (`/024` is `/24`).
fn parse_prefix(input: &str, prefix: &str, max: u8) -> Result<u8, ParseError> {
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidPrefix {
            input: input.to_string(),
            prefix: prefix.to_string(),
        });
    }
    let out_of_range = || ParseError::PrefixOutOfRange {
        input: input.to_string(),
        prefix: prefix.to_string(),
        max,
    };
    // digits only, so the parse can only fail on overflow
    let len: u8 = prefix.parse().map_err(|_| out_of_range())?;
    if len > max {
        return Err(out_of_range());
    }
    Ok(len)
}

fn malformed(input: &str, reason: MalformedReason) -> ParseError {
    ParseError::Malformed {
        input: input.to_string(),
        reason,
    }
}

impl CidrBlock {
    /// Build a block from an address and prefix, clearing host bits.
    ///
    /// Returns `None` when `prefix_len` exceeds the family width.
    pub fn new(addr: AddressValue, prefix_len: u8) -> Option<CidrBlock> {
        if prefix_len > addr.max_prefix() {
            None
        } else {
            Some(CidrBlock::masked(addr, prefix_len))
        }
    }

    /// Caller guarantees `prefix_len` fits the family.
    pub(crate) fn masked(addr: AddressValue, prefix_len: u8) -> CidrBlock {
        CidrBlock {
            base: addr.masked(prefix_len),
            prefix_len,
        }
    }

    /// Single-host block (`/32` or `/128`).
    pub fn host(addr: AddressValue) -> CidrBlock {
        CidrBlock {
            base: addr,
            prefix_len: addr.max_prefix(),
        }
    }

    /// The canonical network address.
    pub fn network(&self) -> AddressValue {
        self.base
    }

    /// The highest address in the block (IPv4 broadcast).
    pub fn last(&self) -> AddressValue {
        self.base.last_in_block(self.prefix_len)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn family(&self) -> Family {
        self.base.family()
    }

    pub fn is_host(&self) -> bool {
        self.prefix_len == self.base.max_prefix()
    }

    /// Number of addresses in the block, saturating at `u128::MAX` for `::/0`.
    pub fn size(&self) -> u128 {
        let host_bits = u32::from(self.base.max_prefix() - self.prefix_len);
        1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
    }

    pub fn contains(&self, addr: &AddressValue) -> bool {
        self.family() == addr.family() && self.base <= *addr && *addr <= self.last()
    }

    /// True when every address of `other` lies inside `self`.
    pub fn contains_block(&self, other: &CidrBlock) -> bool {
        self.family() == other.family()
            && self.prefix_len <= other.prefix_len
            && other.base.masked(self.prefix_len) == self.base
    }

    /// True when the two blocks share at least one address.
    ///
    /// Blocks of different families never overlap.
    pub fn overlaps(&self, other: &CidrBlock) -> bool {
        match (self.base, other.base) {
            (AddressValue::V4(_), AddressValue::V4(_))
            | (AddressValue::V6(_), AddressValue::V6(_)) => {
                self.base.max(other.base) <= self.last().min(other.last())
            }
            _ => false,
        }
    }
}

impl FromStr for CidrBlock {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_len)
    }
}

impl Serialize for CidrBlock {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CidrBlock {
    fn deserialize<D>(deserializer: D) -> Result<CidrBlock, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_cidr(&s).map_err(de::Error::custom)
    }
}

/// Two input blocks that share addresses, with their positions in the input.
///
/// `first_index < second_index` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapPair {
    pub first_index: usize,
    pub first: CidrBlock,
    pub second_index: usize,
    pub second: CidrBlock,
}

impl OverlapPair {
    /// Build a pair, ordering the two entries by input position.
    pub fn new(a: (usize, CidrBlock), b: (usize, CidrBlock)) -> OverlapPair {
        let ((first_index, first), (second_index, second)) =
            if a.0 <= b.0 { (a, b) } else { (b, a) };
        OverlapPair {
            first_index,
            first,
            second_index,
            second,
        }
    }
}

impl fmt::Display for OverlapPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CIDR {} (element {}) overlaps {} (element {})",
            self.first, self.first_index, self.second, self.second_index
        )
    }
}
