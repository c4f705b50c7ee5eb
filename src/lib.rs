//! Network address validation: CIDR parsing, overlap detection, address
//! classification, prefix bounds and canonical subnet form, for IPv4 and IPv6.
//!
//! ```
//! use net_validators::checks::{NetworkChecks, Value};
//!
//! let checks = NetworkChecks::default();
//! let cidrs = vec![
//!     Value::Known("10.0.0.0/8".to_string()),
//!     Value::Known("10.1.0.0/16".to_string()),
//! ];
//! assert!(checks.cidr_overlap(Value::Known(&cidrs[..])).is_invalid());
//! assert!(checks.private_ip(Value::Known("192.168.1.1")).is_valid());
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use checks::{NetworkChecks, Outcome, Value};
pub use error::{ErrorKind, MalformedReason, ParseError, ValidationError};
pub use models::{parse_cidr, AddressValue, CidrBlock, Family, OverlapPair};
