//! The four network checks exposed to the host.

use super::outcome::{Outcome, Value};
use crate::error::ValidationError;
use crate::models::{parse_address_or_block, parse_cidr, CidrBlock};
use crate::processing::{
    detect_overlap, validate_prefix_range, validate_subnet_form, PublicIpOptions,
    RangeClassifier,
};

/// Entry point for the network checks.
///
/// Holds the classification table used by the private/public checks; build it
/// with [`NetworkChecks::new`] to use extra reserved ranges.
#[derive(Debug, Clone, Default)]
pub struct NetworkChecks {
    classifier: RangeClassifier,
}

impl NetworkChecks {
    pub fn new(classifier: RangeClassifier) -> NetworkChecks {
        NetworkChecks { classifier }
    }

    pub fn classifier(&self) -> &RangeClassifier {
        &self.classifier
    }

    /// Valid when no two CIDR blocks in the list share an address.
    ///
    /// An empty list is valid. A null list is a caller error. Any element not
    /// yet known makes the whole check indeterminate, even when other elements
    /// are invalid.
    pub fn cidr_overlap<S: AsRef<str>>(&self, cidrs: Value<&[Value<S>]>) -> Outcome {
        let cidrs = match cidrs.require("cidrs") {
            Ok(list) => list,
            Err(outcome) => return outcome,
        };
        if cidrs.iter().any(Value::is_unknown) {
            log::debug!("cidr_overlap() list has unknown elements");
            return Outcome::Indeterminate;
        }

        let mut blocks: Vec<CidrBlock> = Vec::with_capacity(cidrs.len());
        for (index, element) in cidrs.iter().enumerate() {
            let text = match element {
                Value::Known(text) => text.as_ref(),
                Value::Null | Value::Unknown => {
                    return Outcome::Invalid(ValidationError::NullElement { index })
                }
            };
            match parse_cidr(text) {
                Ok(block) => blocks.push(block),
                Err(source) => {
                    return Outcome::Invalid(ValidationError::InvalidElement { index, source })
                }
            }
        }

        match detect_overlap(&blocks) {
            Some(pair) => {
                log::debug!("cidr_overlap() {pair}");
                Outcome::Invalid(ValidationError::OverlapDetected(pair))
            }
            None => Outcome::Valid,
        }
    }

    /// Valid when the address (or every address of the block) is RFC 1918 or ULA space.
    pub fn private_ip(&self, ip: Value<&str>) -> Outcome {
        let ip = match ip.require("ip") {
            Ok(ip) => ip,
            Err(outcome) => return outcome,
        };
        let result = parse_address_or_block(ip)
            .map_err(ValidationError::from)
            .and_then(|block| {
                if self.classifier.is_private(&block) {
                    Ok(())
                } else {
                    Err(ValidationError::NotPrivate {
                        input: ip.to_string(),
                        label: self.classifier.classify_block(&block),
                    })
                }
            });
        Outcome::from(result)
    }

    /// Valid when the address (or block) touches no excluded range.
    pub fn public_ip(&self, ip: Value<&str>, options: PublicIpOptions) -> Outcome {
        let ip = match ip.require("ip") {
            Ok(ip) => ip,
            Err(outcome) => return outcome,
        };
        let result = parse_address_or_block(ip)
            .map_err(ValidationError::from)
            .and_then(|block| match self.classifier.public_conflict(&block, options) {
                None => Ok(()),
                Some(range) => Err(ValidationError::NotPublic {
                    input: ip.to_string(),
                    label: range.label,
                }),
            });
        Outcome::from(result)
    }

    /// Valid when the prefix length of `cidr` lies within `min_prefix..=max_prefix`.
    pub fn ip_range_size(
        &self,
        cidr: Value<&str>,
        min_prefix: Value<i64>,
        max_prefix: Value<i64>,
    ) -> Outcome {
        if cidr.is_unknown() || min_prefix.is_unknown() || max_prefix.is_unknown() {
            return Outcome::Indeterminate;
        }
        let args = cidr.require("cidr").and_then(|cidr| {
            Ok((
                cidr,
                min_prefix.require("min_prefix")?,
                max_prefix.require("max_prefix")?,
            ))
        });
        match args {
            Ok((cidr, min, max)) => Outcome::from(validate_prefix_range(cidr, min, max)),
            Err(outcome) => outcome,
        }
    }

    /// Valid when `cidr` is written as its own network address.
    pub fn subnet(&self, cidr: Value<&str>) -> Outcome {
        match cidr.require("cidr") {
            Ok(cidr) => Outcome::from(validate_subnet_form(cidr)),
            Err(outcome) => outcome,
        }
    }
}
