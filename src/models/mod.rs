//! Address and network value types.
//!
//! - [`AddressValue`] - a single IPv4 or IPv6 address
//! - [`CidrBlock`] - a canonical network block and the CIDR parsing rules
//! - [`OverlapPair`] - two input blocks that share addresses

mod address;
mod cidr;

// Re-export public types
pub use address::{AddressBits, AddressValue, Family, MAX_PREFIX_V4, MAX_PREFIX_V6};
pub use cidr::{parse_address_or_block, parse_cidr, parse_parts, CidrBlock, OverlapPair};
