//! Overlapping CIDR block detection.
//!
//! Detects blocks that share addresses within one input list. IPv4 and IPv6
//! blocks are checked separately; a block never overlaps a block of the other
//! family.

use crate::models::{AddressBits, AddressValue, CidrBlock, OverlapPair};
use itertools::Itertools;

/// One input block reduced to its integer range.
#[derive(Debug, Clone, Copy)]
struct Span<T> {
    index: usize,
    start: T,
    end: T,
}

impl<T: AddressBits> Span<T> {
    fn new(index: usize, start: T, prefix_len: u8) -> Span<T> {
        Span {
            index,
            start,
            end: start | T::host_mask(prefix_len),
        }
    }
}

/// Find one pair of overlapping blocks, or `None` when all blocks are disjoint.
///
/// Runs a sort-and-sweep per family in O(n log n). Identical blocks and blocks
/// containing one another are overlaps. Fewer than two blocks never overlap.
///
/// # Arguments
/// * `blocks` - Parsed blocks in caller order
///
/// # Returns
/// * `Some(OverlapPair)` - An overlapping pair, indices refer to `blocks`
/// * `None` - No two blocks share an address
pub fn detect_overlap(blocks: &[CidrBlock]) -> Option<OverlapPair> {
    if blocks.len() < 2 {
        return None;
    }

    let mut v4: Vec<Span<u32>> = Vec::new();
    let mut v6: Vec<Span<u128>> = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        match block.network() {
            AddressValue::V4(start) => v4.push(Span::new(i, start, block.prefix_len())),
            AddressValue::V6(start) => v6.push(Span::new(i, start, block.prefix_len())),
        }
    }
    log::trace!(
        "detect_overlap() sweeping {} IPv4 and {} IPv6 blocks",
        v4.len(),
        v6.len()
    );

    let found = [sweep(v4), sweep(v6)]
        .into_iter()
        .flatten()
        .min_by_key(|&(a, b)| (b, a));

    found.map(|(a, b)| OverlapPair::new((a, blocks[a]), (b, blocks[b])))
}

/// Sweep spans sorted by start, tracking the span reaching furthest so far.
///
/// Returns the input indices of the first overlapping pair met.
fn sweep<T: AddressBits>(mut spans: Vec<Span<T>>) -> Option<(usize, usize)> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.index.cmp(&b.index)));

    let mut iter = spans.into_iter();
    let mut reach = iter.next()?;
    for span in iter {
        if span.start <= reach.end {
            log::trace!(
                "sweep: element {} starts inside element {}",
                span.index,
                reach.index
            );
            return Some((reach.index.min(span.index), reach.index.max(span.index)));
        }
        if span.end > reach.end {
            reach = span;
        }
    }
    None
}

/// Find every overlapping pair, in input order.
///
/// Pairwise O(n²); intended for reports, not for the yes/no check.
pub fn find_all_overlaps(blocks: &[CidrBlock]) -> Vec<OverlapPair> {
    blocks
        .iter()
        .copied()
        .enumerate()
        .tuple_combinations()
        .filter(|((_, a), (_, b))| a.overlaps(b))
        .map(|(a, b)| OverlapPair::new(a, b))
        .collect()
}

/// Log overlapping pairs as warnings.
pub fn log_overlaps(overlaps: &[OverlapPair]) {
    if overlaps.is_empty() {
        log::info!("No overlapping CIDR blocks found.");
        return;
    }

    log::warn!("Found {} overlapping CIDR pair(s):", overlaps.len());
    for pair in overlaps {
        let relation = if pair.first.contains_block(&pair.second) {
            "contains"
        } else if pair.second.contains_block(&pair.first) {
            "is inside"
        } else {
            "overlaps"
        };
        log::warn!(
            "  [{}] {} {} [{}] {}",
            pair.first_index,
            pair.first,
            relation,
            pair.second_index,
            pair.second
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_cidr;

    fn blocks(cidrs: &[&str]) -> Vec<CidrBlock> {
        cidrs.iter().map(|s| parse_cidr(s).unwrap()).collect()
    }

    #[test]
    fn test_detect_overlap_empty_and_single() {
        assert_eq!(detect_overlap(&[]), None);
        assert_eq!(detect_overlap(&blocks(&["10.0.0.0/8"])), None);
        assert_eq!(detect_overlap(&blocks(&["::/0"])), None);
    }

    #[test]
    fn test_detect_overlap_containment() {
        let input = blocks(&["10.0.0.0/8", "10.1.0.0/16"]);
        let pair = detect_overlap(&input).expect("the /16 is inside the /8");
        assert_eq!((pair.first_index, pair.second_index), (0, 1));
        assert_eq!(pair.first.to_string(), "10.0.0.0/8");
    }

    #[test]
    fn test_detect_overlap_adjacent() {
        let input = blocks(&["10.0.0.0/24", "10.0.1.0/24"]);
        assert_eq!(detect_overlap(&input), None);
    }

    #[test]
    fn test_detect_overlap_duplicate() {
        let input = blocks(&["192.168.0.0/24", "192.168.0.0/24"]);
        let pair = detect_overlap(&input).expect("duplicates overlap");
        assert_eq!((pair.first_index, pair.second_index), (0, 1));
    }

    #[test]
    fn test_detect_overlap_mixed_families() {
        let input = blocks(&["0.0.0.0/0", "::/0", "::ffff:0:0/96"]);
        let pair = detect_overlap(&input).expect("the two IPv6 blocks overlap");
        assert_eq!((pair.first_index, pair.second_index), (1, 2));

        let input = blocks(&["0.0.0.0/0", "::/0"]);
        assert_eq!(detect_overlap(&input), None);
    }

    #[test]
    fn test_detect_overlap_reports_input_order() {
        // sorted order differs from input order
        let input = blocks(&["10.5.0.0/16", "172.16.0.0/12", "10.0.0.0/8"]);
        let pair = detect_overlap(&input).unwrap();
        assert_eq!((pair.first_index, pair.second_index), (0, 2));
        assert_eq!(pair.first.to_string(), "10.5.0.0/16");
        assert_eq!(pair.second.to_string(), "10.0.0.0/8");
    }

    #[test]
    fn test_detect_overlap_long_reach() {
        // the block inside the /8 sorts after a disjoint neighbour
        let input = blocks(&["10.0.0.0/8", "9.0.0.0/8", "11.0.0.0/24", "10.200.0.0/16"]);
        let pair = detect_overlap(&input).unwrap();
        assert_eq!((pair.first_index, pair.second_index), (0, 3));
    }

    #[test]
    fn test_detect_overlap_ipv6_edges() {
        let input = blocks(&["ffff::/16", "::/1", "8000::/1"]);
        let pair = detect_overlap(&input).unwrap();
        assert_eq!((pair.first_index, pair.second_index), (0, 2));

        let input = blocks(&["::/1", "8000::/1"]);
        assert_eq!(detect_overlap(&input), None);
    }

    #[test]
    fn test_find_all_overlaps() {
        let input = blocks(&["10.0.0.0/8", "10.1.0.0/16", "10.1.2.0/24", "192.168.0.0/16"]);
        let pairs: Vec<(usize, usize)> = find_all_overlaps(&input)
            .iter()
            .map(|p| (p.first_index, p.second_index))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
        assert!(find_all_overlaps(&blocks(&["10.0.0.0/24", "10.0.1.0/24"])).is_empty());
    }

    #[test]
    fn test_sweep_agrees_with_pairwise() {
        let input = blocks(&[
            "10.0.0.0/24",
            "10.0.1.0/24",
            "10.0.2.0/23",
            "fd00::/8",
            "10.0.3.128/25",
            "fe80::/10",
        ]);
        let all = find_all_overlaps(&input);
        let one = detect_overlap(&input).unwrap();
        assert!(all.contains(&one), "{one} must be one of {all:?}");
    }
}
