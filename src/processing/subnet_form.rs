//! Canonical subnet form check.
//!
//! Unlike [`parse_cidr`](crate::models::parse_cidr), which clears host bits,
//! this check fails when the supplied address is not the network address.

use crate::error::ValidationError;
use crate::models::{parse_parts, CidrBlock};

/// Check that `input` is written as its own network address.
///
/// `10.0.0.0/24` passes, `10.0.0.5/24` fails with
/// [`ValidationError::SubnetMismatch`] naming `10.0.0.0` as the expected address.
pub fn validate_subnet_form(input: &str) -> Result<CidrBlock, ValidationError> {
    let (supplied, prefix_len) = parse_parts(input)?;
    let network = supplied.masked(prefix_len);
    if supplied != network {
        log::debug!("validate_subnet_form({input}) host bits set, network is {network}");
        return Err(ValidationError::SubnetMismatch {
            input: input.to_string(),
            supplied,
            network,
            prefix_len,
        });
    }
    Ok(CidrBlock::masked(network, prefix_len))
}
