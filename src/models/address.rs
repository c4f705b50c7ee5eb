//! Single IPv4/IPv6 address as a fixed-width integer.
//!
//! [`AddressValue`] keeps IPv4 as `u32` and IPv6 as `u128` so that comparing
//! addresses of different families is always an explicit branch.

use crate::error::{MalformedReason, ParseError};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

/// Maximum prefix length for IPv4 (32 bits).
pub const MAX_PREFIX_V4: u8 = 32;
/// Maximum prefix length for IPv6 (128 bits).
pub const MAX_PREFIX_V6: u8 = 128;

/// Address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Ipv4,
    Ipv6,
}

impl Family {
    /// Bit width of the family, which is also its maximum prefix length.
    pub const fn max_prefix(self) -> u8 {
        match self {
            Family::Ipv4 => MAX_PREFIX_V4,
            Family::Ipv6 => MAX_PREFIX_V6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Ipv4 => write!(f, "IPv4"),
            Family::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Fixed-width integer backing one address family.
///
/// Mask arithmetic is written once against this trait.
pub trait AddressBits:
    Copy + Ord + fmt::Debug + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    const WIDTH: u8;
    const ZERO: Self;
    const ALL_ONES: Self;

    fn checked_shift_left(self, rhs: u32) -> Option<Self>;

    /// Mask with the top `len` bits set.
    fn prefix_mask(len: u8) -> Self {
        // shifting by the full width overflows, /0 has an empty mask
        Self::ALL_ONES
            .checked_shift_left(u32::from(Self::WIDTH.saturating_sub(len)))
            .unwrap_or(Self::ZERO)
    }

    fn host_mask(len: u8) -> Self {
        !Self::prefix_mask(len)
    }
}

impl AddressBits for u32 {
    const WIDTH: u8 = MAX_PREFIX_V4;
    const ZERO: u32 = 0;
    const ALL_ONES: u32 = u32::MAX;

    fn checked_shift_left(self, rhs: u32) -> Option<u32> {
        self.checked_shl(rhs)
    }
}

impl AddressBits for u128 {
    const WIDTH: u8 = MAX_PREFIX_V6;
    const ZERO: u128 = 0;
    const ALL_ONES: u128 = u128::MAX;

    fn checked_shift_left(self, rhs: u32) -> Option<u128> {
        self.checked_shl(rhs)
    }
}

/// An IPv4 or IPv6 address.
///
/// Ordering sorts every IPv4 address before every IPv6 address, then by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressValue {
    V4(u32),
    V6(u128),
}

impl AddressValue {
    pub fn family(&self) -> Family {
        match self {
            AddressValue::V4(_) => Family::Ipv4,
            AddressValue::V6(_) => Family::Ipv6,
        }
    }

    pub fn max_prefix(&self) -> u8 {
        self.family().max_prefix()
    }

    /// Clear every bit at position `>= len`, counting from the most significant bit.
    ///
    /// `len` larger than the family width leaves the address untouched.
    pub fn masked(&self, len: u8) -> AddressValue {
        match *self {
            AddressValue::V4(bits) => AddressValue::V4(bits & u32::prefix_mask(len)),
            AddressValue::V6(bits) => AddressValue::V6(bits & u128::prefix_mask(len)),
        }
    }

    /// Set every bit at position `>= len`: the last address of the enclosing block.
    pub fn last_in_block(&self, len: u8) -> AddressValue {
        match *self {
            AddressValue::V4(bits) => AddressValue::V4(bits | u32::host_mask(len)),
            AddressValue::V6(bits) => AddressValue::V6(bits | u128::host_mask(len)),
        }
    }

    /// Parse a bare address with the crate-wide whitespace policy.
    ///
    /// `input` is the full text the caller supplied, used only for error context.
    pub(crate) fn parse_segment(input: &str, segment: &str) -> Result<AddressValue, ParseError> {
        if segment.is_empty() {
            return Err(ParseError::Malformed {
                input: input.to_string(),
                reason: MalformedReason::EmptyAddress,
            });
        }
        if segment.contains(|c: char| c.is_whitespace()) {
            return Err(ParseError::Malformed {
                input: input.to_string(),
                reason: MalformedReason::Whitespace,
            });
        }
        IpAddr::from_str(segment)
            .map(AddressValue::from)
            .map_err(|_| ParseError::InvalidAddress {
                input: input.to_string(),
                address: segment.to_string(),
            })
    }
}

impl From<IpAddr> for AddressValue {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => AddressValue::from(v4),
            IpAddr::V6(v6) => AddressValue::from(v6),
        }
    }
}

impl From<Ipv4Addr> for AddressValue {
    fn from(addr: Ipv4Addr) -> Self {
        AddressValue::V4(u32::from(addr))
    }
}

impl From<Ipv6Addr> for AddressValue {
    fn from(addr: Ipv6Addr) -> Self {
        AddressValue::V6(u128::from(addr))
    }
}

impl From<AddressValue> for IpAddr {
    fn from(addr: AddressValue) -> Self {
        match addr {
            AddressValue::V4(bits) => IpAddr::V4(Ipv4Addr::from(bits)),
            AddressValue::V6(bits) => IpAddr::V6(Ipv6Addr::from(bits)),
        }
    }
}

impl FromStr for AddressValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Malformed {
                input: String::new(),
                reason: MalformedReason::Empty,
            });
        }
        AddressValue::parse_segment(s, s)
    }
}

impl fmt::Display for AddressValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", IpAddr::from(*self))
    }
}

impl Serialize for AddressValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AddressValue {
    fn deserialize<D>(deserializer: D) -> Result<AddressValue, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AddressValue::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_mask_v4() {
        assert_eq!(u32::prefix_mask(0), 0x0000_0000);
        assert_eq!(u32::prefix_mask(8), 0xFF00_0000);
        assert_eq!(u32::prefix_mask(16), 0xFFFF_0000);
        assert_eq!(u32::prefix_mask(24), 0xFFFF_FF00);
        assert_eq!(u32::prefix_mask(32), 0xFFFF_FFFF);
        assert_eq!(u32::host_mask(24), 0x0000_00FF);
    }

    #[test]
    fn test_prefix_mask_v6() {
        assert_eq!(u128::prefix_mask(0), 0);
        assert_eq!(u128::prefix_mask(128), u128::MAX);
        assert_eq!(u128::prefix_mask(7), 0xFEu128 << 120);
        assert_eq!(u128::host_mask(64), u64::MAX as u128);
    }

    #[test]
    fn test_masked() {
        let ip: AddressValue = "192.168.1.42".parse().unwrap();
        assert_eq!(ip.masked(24).to_string(), "192.168.1.0");
        assert_eq!(ip.masked(16).to_string(), "192.168.0.0");
        assert_eq!(ip.masked(0).to_string(), "0.0.0.0");
        assert_eq!(ip.masked(32), ip);

        let ip6: AddressValue = "2001:db8:abcd:12::1".parse().unwrap();
        assert_eq!(ip6.masked(48).to_string(), "2001:db8:abcd::");
    }

    #[test]
    fn test_last_in_block() {
        let ip: AddressValue = "10.1.2.3".parse().unwrap();
        assert_eq!(ip.last_in_block(8).to_string(), "10.255.255.255");
        assert_eq!(ip.last_in_block(32), ip);
        assert_eq!(ip.last_in_block(0).to_string(), "255.255.255.255");
    }

    #[test]
    fn test_family_ordering() {
        let v4: AddressValue = "255.255.255.255".parse().unwrap();
        let v6: AddressValue = "::".parse().unwrap();
        assert!(v4 < v6, "IPv4 sorts before IPv6");
        assert_eq!(v4.family(), Family::Ipv4);
        assert_eq!(v6.family(), Family::Ipv6);
        assert_eq!(v6.max_prefix(), 128);
    }

    #[test]
    fn test_ipv4_mapped_is_ipv6() {
        let mapped: AddressValue = "::ffff:10.0.0.1".parse().unwrap();
        assert_eq!(mapped.family(), Family::Ipv6);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "".parse::<AddressValue>(),
            Err(ParseError::Malformed {
                reason: MalformedReason::Empty,
                ..
            })
        ));
        assert!(matches!(
            " 10.0.0.1".parse::<AddressValue>(),
            Err(ParseError::Malformed {
                reason: MalformedReason::Whitespace,
                ..
            })
        ));
        assert!(matches!(
            "10.0.0.256".parse::<AddressValue>(),
            Err(ParseError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_serde_as_string() {
        let ip: AddressValue = "fe80::1".parse().unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"fe80::1\"");
        let back: AddressValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ip);
    }
}
