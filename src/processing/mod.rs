//! Network checks built on the parsed models.
//!
//! - [`overlap`] - Overlap detection across a list of blocks
//! - [`classify`] - Private/public/reserved classification
//! - [`prefix_range`] - Prefix length bounds
//! - [`subnet_form`] - Canonical network address form

pub mod classify;
pub mod overlap;
pub mod prefix_range;
pub mod subnet_form;

// Re-export public functions
pub use classify::{
    default_ranges, ClassificationRange, Label, PublicIpOptions, RangeClassifier,
};
pub use overlap::{detect_overlap, find_all_overlaps, log_overlaps};
pub use prefix_range::validate_prefix_range;
pub use subnet_form::validate_subnet_form;
