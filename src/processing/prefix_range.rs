//! Prefix length bounds check.

use crate::error::ValidationError;
use crate::models::{parse_cidr, CidrBlock};

/// Check that the prefix length of `input` lies within `min..=max`.
///
/// The bounds are compared as plain integers and are not checked against the
/// family width, so `max = 200` is accepted for an IPv4 block.
///
/// # Arguments
/// * `input` - CIDR text, parsed with [`parse_cidr`]
/// * `min` - Smallest allowed prefix length
/// * `max` - Largest allowed prefix length
///
/// # Returns
/// * `Ok(CidrBlock)` - The parsed block
/// * `Err(ValidationError::Parse)` - `input` is not a CIDR
/// * `Err(ValidationError::PrefixNotAllowed)` - The prefix is outside the bounds
pub fn validate_prefix_range(
    input: &str,
    min: i64,
    max: i64,
) -> Result<CidrBlock, ValidationError> {
    let block = parse_cidr(input)?;
    let prefix_len = block.prefix_len();
    if (min..=max).contains(&i64::from(prefix_len)) {
        Ok(block)
    } else {
        log::debug!("validate_prefix_range({input}) /{prefix_len} not in /{min}../{max}");
        Err(ValidationError::PrefixNotAllowed {
            input: input.to_string(),
            prefix_len,
            min,
            max,
        })
    }
}
