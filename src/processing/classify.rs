//! Address classification against the IANA special-purpose ranges.
//!
//! [`RangeClassifier`] holds a read-only table of [`ClassificationRange`]s.
//! The default table is built once per process; site-specific reservations
//! are passed in explicitly with [`RangeClassifier::with_extra_reserved`].

use crate::models::{AddressValue, CidrBlock, Family};
use lazy_static::lazy_static;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Classification outcome. Every address gets exactly one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    Public,
    Private,
    UniqueLocal,
    LinkLocal,
    Loopback,
    Multicast,
    Documentation,
    Reserved,
}

impl Label {
    /// RFC 1918 and IPv6 ULA space.
    pub fn is_private(self) -> bool {
        matches!(self, Label::Private | Label::UniqueLocal)
    }

    /// Reserved set excluded by the `exclude_reserved` public-IP option.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Label::Reserved | Label::Multicast | Label::Documentation
        )
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Label::Public => "public",
            Label::Private => "private",
            Label::UniqueLocal => "unique-local",
            Label::LinkLocal => "link-local",
            Label::Loopback => "loopback",
            Label::Multicast => "multicast",
            Label::Documentation => "documentation",
            Label::Reserved => "reserved",
        };
        f.write_str(text)
    }
}

/// One well-known range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRange {
    pub block: CidrBlock,
    pub label: Label,
    pub name: Cow<'static, str>,
}

impl ClassificationRange {
    pub fn family(&self) -> Family {
        self.block.family()
    }
}

/// Options of the public-IP check. Private and loopback space is always excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicIpOptions {
    /// Also treat link-local space as not public.
    pub exclude_link_local: bool,
    /// Also treat reserved, multicast and documentation space as not public.
    pub exclude_reserved: bool,
}

impl PublicIpOptions {
    fn excludes(&self, label: Label) -> bool {
        label.is_private()
            || label == Label::Loopback
            || (self.exclude_link_local && label == Label::LinkLocal)
            || (self.exclude_reserved && label.is_reserved())
    }
}

const DEFAULT_TABLE: &[(&str, Label, &str)] = &[
    // IPv4
    ("0.0.0.0/8", Label::Reserved, "this network"),
    ("10.0.0.0/8", Label::Private, "RFC 1918"),
    ("100.64.0.0/10", Label::Reserved, "shared address space"),
    ("127.0.0.0/8", Label::Loopback, "loopback"),
    ("169.254.0.0/16", Label::LinkLocal, "link local"),
    ("172.16.0.0/12", Label::Private, "RFC 1918"),
    ("192.0.0.0/24", Label::Reserved, "IETF protocol assignments"),
    ("192.0.2.0/24", Label::Documentation, "TEST-NET-1"),
    ("192.168.0.0/16", Label::Private, "RFC 1918"),
    ("198.18.0.0/15", Label::Reserved, "benchmarking"),
    ("198.51.100.0/24", Label::Documentation, "TEST-NET-2"),
    ("203.0.113.0/24", Label::Documentation, "TEST-NET-3"),
    ("224.0.0.0/4", Label::Multicast, "multicast"),
    ("240.0.0.0/4", Label::Reserved, "reserved"),
    ("255.255.255.255/32", Label::Reserved, "limited broadcast"),
    // IPv6
    ("::/128", Label::Reserved, "unspecified"),
    ("::1/128", Label::Loopback, "loopback"),
    ("::ffff:0:0/96", Label::Reserved, "IPv4-mapped"),
    ("100::/64", Label::Reserved, "discard-only"),
    ("2001::/23", Label::Reserved, "IETF protocol assignments"),
    ("2001:db8::/32", Label::Documentation, "documentation"),
    ("fc00::/7", Label::UniqueLocal, "RFC 4193 unique local"),
    ("fe80::/10", Label::LinkLocal, "link local"),
    ("ff00::/8", Label::Multicast, "multicast"),
];

lazy_static! {
    static ref DEFAULT_RANGES: Vec<ClassificationRange> = DEFAULT_TABLE
        .iter()
        .map(|&(cidr, label, name)| ClassificationRange {
            block: cidr.parse().expect("Invalid classification table entry?"),
            label,
            name: Cow::Borrowed(name),
        })
        .collect();
}

/// The built-in table.
pub fn default_ranges() -> &'static [ClassificationRange] {
    &DEFAULT_RANGES
}

/// Classifies addresses and blocks against a table of special ranges.
#[derive(Debug, Clone)]
pub struct RangeClassifier {
    ranges: Cow<'static, [ClassificationRange]>,
}

impl Default for RangeClassifier {
    fn default() -> Self {
        RangeClassifier {
            ranges: Cow::Borrowed(default_ranges()),
        }
    }
}

impl RangeClassifier {
    /// Classifier over a caller-supplied table.
    pub fn new(ranges: Vec<ClassificationRange>) -> RangeClassifier {
        RangeClassifier {
            ranges: Cow::Owned(ranges),
        }
    }

    /// Default table plus `extra` blocks labelled [`Label::Reserved`].
    pub fn with_extra_reserved(extra: &[CidrBlock]) -> RangeClassifier {
        let mut classifier = RangeClassifier::default();
        if !extra.is_empty() {
            let ranges = classifier.ranges.to_mut();
            ranges.extend(extra.iter().map(|block| ClassificationRange {
                block: *block,
                label: Label::Reserved,
                name: Cow::Owned(format!("site reserved {block}")),
            }));
            log::debug!("Classifier extended with {} reserved range(s)", extra.len());
        }
        classifier
    }

    pub fn ranges(&self) -> &[ClassificationRange] {
        &self.ranges
    }

    /// Most specific range that fully contains `block`.
    pub fn matching_range(&self, block: &CidrBlock) -> Option<&ClassificationRange> {
        self.ranges
            .iter()
            .filter(|r| r.block.contains_block(block))
            .max_by_key(|r| r.block.prefix_len())
    }

    /// Label of a single address. Total: addresses outside every range are public.
    pub fn classify(&self, addr: &AddressValue) -> Label {
        self.classify_block(&CidrBlock::host(*addr))
    }

    /// Label of the most specific range containing the whole block, else public.
    pub fn classify_block(&self, block: &CidrBlock) -> Label {
        let label = self
            .matching_range(block)
            .map(|r| r.label)
            .unwrap_or(Label::Public);
        log::debug!("classify_block({block}) = {label}");
        label
    }

    /// True when the whole block lies inside RFC 1918 or ULA space.
    pub fn is_private(&self, block: &CidrBlock) -> bool {
        self.ranges
            .iter()
            .any(|r| r.label.is_private() && r.block.contains_block(block))
    }

    /// Most specific excluded range that shares an address with `block`.
    ///
    /// `None` means the block is public under `options`.
    pub fn public_conflict(
        &self,
        block: &CidrBlock,
        options: PublicIpOptions,
    ) -> Option<&ClassificationRange> {
        self.ranges
            .iter()
            .filter(|r| options.excludes(r.label) && r.block.overlaps(block))
            .max_by_key(|r| r.block.prefix_len())
    }

    pub fn is_public(&self, block: &CidrBlock, options: PublicIpOptions) -> bool {
        self.public_conflict(block, options).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_address_or_block, parse_cidr};

    fn host(addr: &str) -> CidrBlock {
        parse_address_or_block(addr).unwrap()
    }

    fn label(addr: &str) -> Label {
        RangeClassifier::default().classify(&addr.parse().unwrap())
    }

    #[test]
    fn test_default_table_builds() {
        let ranges = default_ranges();
        assert_eq!(ranges.len(), DEFAULT_TABLE.len());
        for r in ranges {
            assert_eq!(
                r.block.network(),
                r.block.network().masked(r.block.prefix_len()),
                "table entry {} must be canonical",
                r.block
            );
        }
    }

    #[test]
    fn test_classify_ipv4() {
        assert_eq!(label("10.0.0.1"), Label::Private);
        assert_eq!(label("172.31.255.255"), Label::Private);
        assert_eq!(label("172.32.0.0"), Label::Public);
        assert_eq!(label("192.168.10.10"), Label::Private);
        assert_eq!(label("169.254.1.1"), Label::LinkLocal);
        assert_eq!(label("127.0.0.1"), Label::Loopback);
        assert_eq!(label("0.1.2.3"), Label::Reserved);
        assert_eq!(label("192.0.2.7"), Label::Documentation);
        assert_eq!(label("198.51.100.1"), Label::Documentation);
        assert_eq!(label("203.0.113.9"), Label::Documentation);
        assert_eq!(label("224.0.0.251"), Label::Multicast);
        assert_eq!(label("239.255.255.255"), Label::Multicast);
        assert_eq!(label("240.0.0.1"), Label::Reserved);
        assert_eq!(label("8.8.8.8"), Label::Public);
        assert_eq!(label("1.1.1.1"), Label::Public);
    }

    #[test]
    fn test_classify_most_specific_wins() {
        let classifier = RangeClassifier::default();
        let broadcast = classifier
            .matching_range(&host("255.255.255.255"))
            .unwrap();
        assert_eq!(broadcast.name, "limited broadcast");
        assert_eq!(broadcast.label, Label::Reserved);

        let doc = classifier.matching_range(&host("2001:db8::1")).unwrap();
        assert_eq!(doc.label, Label::Documentation);
        assert_eq!(doc.block.prefix_len(), 32);
    }

    #[test]
    fn test_classify_ipv6() {
        assert_eq!(label("fd12:3456::1"), Label::UniqueLocal);
        assert_eq!(label("fc00::"), Label::UniqueLocal);
        assert_eq!(label("fe80::1"), Label::LinkLocal);
        assert_eq!(label("febf:ffff::1"), Label::LinkLocal);
        assert_eq!(label("fec0::1"), Label::Public);
        assert_eq!(label("::1"), Label::Loopback);
        assert_eq!(label("::"), Label::Reserved);
        assert_eq!(label("ff02::1"), Label::Multicast);
        assert_eq!(label("2001:db8:1::1"), Label::Documentation);
        assert_eq!(label("2606:4700::1111"), Label::Public);
        assert_eq!(label("::ffff:10.0.0.1"), Label::Reserved);
    }

    #[test]
    fn test_is_private() {
        let classifier = RangeClassifier::default();
        assert!(classifier.is_private(&host("10.0.0.1")));
        assert!(!classifier.is_private(&host("8.8.8.8")));
        assert!(classifier.is_private(&host("fd00::1")));
        assert!(!classifier.is_private(&host("fe80::1")));
        assert!(classifier.is_private(&parse_cidr("10.1.0.0/16").unwrap()));
        assert!(
            !classifier.is_private(&parse_cidr("10.0.0.0/7").unwrap()),
            "a block straddling private space is not private"
        );
    }

    #[test]
    fn test_is_public_flags() {
        let classifier = RangeClassifier::default();
        let link_local = host("169.254.1.1");
        let exclude_ll = PublicIpOptions {
            exclude_link_local: true,
            ..Default::default()
        };
        assert!(!classifier.is_public(&link_local, exclude_ll));
        assert!(classifier.is_public(&link_local, PublicIpOptions::default()));

        assert!(classifier.is_public(&host("8.8.8.8"), PublicIpOptions::default()));
        assert!(!classifier.is_public(&host("10.0.0.1"), PublicIpOptions::default()));
        assert!(!classifier.is_public(&host("127.0.0.1"), PublicIpOptions::default()));
        assert!(!classifier.is_public(&host("fd00::1"), PublicIpOptions::default()));

        let doc = host("192.0.2.1");
        let exclude_reserved = PublicIpOptions {
            exclude_reserved: true,
            ..Default::default()
        };
        assert!(classifier.is_public(&doc, PublicIpOptions::default()));
        assert!(!classifier.is_public(&doc, exclude_reserved));
        assert!(!classifier.is_public(&host("ff02::1"), exclude_reserved));
        assert!(classifier.is_public(&host("169.254.1.1"), exclude_reserved));
    }

    #[test]
    fn test_public_conflict_names_range() {
        let classifier = RangeClassifier::default();
        let conflict = classifier
            .public_conflict(&parse_cidr("172.0.0.0/8").unwrap(), PublicIpOptions::default())
            .expect("172.0.0.0/8 covers 172.16.0.0/12");
        assert_eq!(conflict.block.to_string(), "172.16.0.0/12");
        assert_eq!(conflict.label, Label::Private);
    }

    #[test]
    fn test_with_extra_reserved() {
        let extra = vec![parse_cidr("44.0.0.0/8").unwrap()];
        let classifier = RangeClassifier::with_extra_reserved(&extra);
        assert_eq!(classifier.ranges().len(), DEFAULT_TABLE.len() + 1);
        assert_eq!(
            classifier.classify(&"44.1.2.3".parse().unwrap()),
            Label::Reserved
        );
        assert_eq!(label("44.1.2.3"), Label::Public, "default table is untouched");
    }

    #[test]
    fn test_custom_table() {
        let classifier = RangeClassifier::new(vec![ClassificationRange {
            block: parse_cidr("10.0.0.0/8").unwrap(),
            label: Label::Private,
            name: Cow::Borrowed("only"),
        }]);
        assert_eq!(
            classifier.classify(&"192.168.1.1".parse().unwrap()),
            Label::Public
        );
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::UniqueLocal.to_string(), "unique-local");
        assert_eq!(
            serde_json::to_string(&Label::LinkLocal).unwrap(),
            "\"link-local\""
        );
    }
}
