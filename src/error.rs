//! Typed failures for parsing and validation.
//!
//! The core never renders prose for the caller; every variant carries the
//! input text and the rule that failed so the boundary can build a message.

use crate::models::{AddressValue, OverlapPair};
use crate::processing::Label;
use serde::Serialize;
use thiserror::Error;

/// Flat discriminant of every failure, for comparisons that ignore payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Malformed,
    InvalidAddress,
    InvalidPrefix,
    PrefixOutOfRange,
    OverlapDetected,
    SubnetMismatch,
    PrefixNotAllowed,
    NotPrivate,
    NotPublic,
    NullElement,
    MissingInput,
}

/// Why an input did not match the CIDR/address grammar at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    Empty,
    MissingPrefix,
    TooManySlashes,
    EmptyAddress,
    EmptyPrefix,
    Whitespace,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MalformedReason::Empty => "empty input",
            MalformedReason::MissingPrefix => "missing '/prefix'",
            MalformedReason::TooManySlashes => "more than one '/'",
            MalformedReason::EmptyAddress => "empty address segment",
            MalformedReason::EmptyPrefix => "empty prefix segment",
            MalformedReason::Whitespace => "contains whitespace",
        };
        f.write_str(text)
    }
}

/// CIDR or address parse failure.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    #[error("malformed CIDR {input:?}: {reason}")]
    Malformed {
        input: String,
        reason: MalformedReason,
    },

    #[error("invalid IP address {address:?} in {input:?}")]
    InvalidAddress { input: String, address: String },

    #[error("invalid prefix length {prefix:?} in {input:?}")]
    InvalidPrefix { input: String, prefix: String },

    #[error("prefix length /{prefix} in {input:?} exceeds the maximum /{max}")]
    PrefixOutOfRange { input: String, prefix: String, max: u8 },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Malformed { .. } => ErrorKind::Malformed,
            ParseError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            ParseError::InvalidPrefix { .. } => ErrorKind::InvalidPrefix,
            ParseError::PrefixOutOfRange { .. } => ErrorKind::PrefixOutOfRange,
        }
    }

    /// The text the caller supplied.
    pub fn input(&self) -> &str {
        match self {
            ParseError::Malformed { input, .. }
            | ParseError::InvalidAddress { input, .. }
            | ParseError::InvalidPrefix { input, .. }
            | ParseError::PrefixOutOfRange { input, .. } => input,
        }
    }
}

/// Failure of one of the network checks.
///
/// Serialised with a `rule` tag; wrapped parse errors keep their own `kind` tag.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("element {index} of the CIDR list is invalid: {source}")]
    InvalidElement {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error("{0}")]
    OverlapDetected(OverlapPair),

    #[error("{input:?} is not a network address: {supplied} should be {network}/{prefix_len}")]
    SubnetMismatch {
        input: String,
        supplied: AddressValue,
        network: AddressValue,
        prefix_len: u8,
    },

    #[error("prefix length /{prefix_len} of {input:?} is outside the allowed range /{min} to /{max}")]
    PrefixNotAllowed {
        input: String,
        prefix_len: u8,
        min: i64,
        max: i64,
    },

    #[error("{input:?} is not a private address (classified as {label})")]
    NotPrivate { input: String, label: Label },

    #[error("{input:?} is not a public address (classified as {label})")]
    NotPublic { input: String, label: Label },

    #[error("element {index} of the CIDR list is null")]
    NullElement { index: usize },

    #[error("required argument {argument:?} is missing")]
    MissingInput { argument: &'static str },
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::Parse(e) => e.kind(),
            ValidationError::InvalidElement { source, .. } => source.kind(),
            ValidationError::OverlapDetected(_) => ErrorKind::OverlapDetected,
            ValidationError::SubnetMismatch { .. } => ErrorKind::SubnetMismatch,
            ValidationError::PrefixNotAllowed { .. } => ErrorKind::PrefixNotAllowed,
            ValidationError::NotPrivate { .. } => ErrorKind::NotPrivate,
            ValidationError::NotPublic { .. } => ErrorKind::NotPublic,
            ValidationError::NullElement { .. } => ErrorKind::NullElement,
            ValidationError::MissingInput { .. } => ErrorKind::MissingInput,
        }
    }
}
