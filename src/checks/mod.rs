//! Caller-facing network checks.
//!
//! Wraps the processing functions in the host's three-valued calling
//! convention: every argument may be known, null, or not yet known, and every
//! check ends in [`Outcome::Valid`], [`Outcome::Invalid`] or
//! [`Outcome::Indeterminate`].

mod network;
mod outcome;

pub use network::NetworkChecks;
pub use outcome::{Outcome, Value};
