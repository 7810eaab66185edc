//! Pattern index: which top-level group belongs to which route, and which
//! capture numbers carry that route's parameters.
//!
//! The combined pattern has the shape `(p0)|(p1)|(p2)...`. Each wrapper group
//! is a *top-level* group; its own capture number is the key of the index and
//! its position among wrappers is the route slot. Numbers are global across
//! the whole combined pattern, exactly as the regex engine numbers them.

use super::flatten::{flatten, skip_class};
use std::collections::BTreeMap;

/// Index entry for one top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIndexEntry {
    /// 0-based registration position of the owning route.
    pub route_slot: usize,
    /// Capture numbers of the route's own capturing groups, strictly increasing.
    pub sub_groups: Vec<usize>,
}

/// Mapping from top-level group number to its [`GroupIndexEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternIndex {
    entries: BTreeMap<usize, GroupIndexEntry>,
    group_count: usize,
}

impl PatternIndex {
    #[must_use]
    pub fn get(&self, group: usize) -> Option<&GroupIndexEntry> {
        self.entries.get(&group)
    }

    /// Entries in increasing top-level group number order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &GroupIndexEntry)> {
        self.entries.iter().map(|(group, entry)| (*group, entry))
    }

    /// Number of top-level groups (one per route for a well-formed pattern).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total capturing groups counted across the whole pattern.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.group_count
    }
}

/// Build the index for a combined pattern.
///
/// Rebuilding from the same text always yields the same index.
#[must_use]
pub fn build_index(combined: &str) -> PatternIndex {
    let pattern = combined.as_bytes();
    let mut entries = BTreeMap::new();
    let mut counter = 0usize;
    let mut pos = 0usize;

    while pos < pattern.len() {
        match pattern[pos] {
            b'\\' => {
                pos += 2;
                continue;
            }
            b'[' => {
                pos = skip_class(pattern, pos);
                continue;
            }
            b'(' => {
                counter += 1;
                let top = counter;
                let flat = flatten(pattern, pos, counter);
                let route_slot = entries.len();
                entries.insert(
                    top,
                    GroupIndexEntry {
                        route_slot,
                        sub_groups: flat.sub_groups,
                    },
                );
                counter = flat.group_counter;
                pos = flat.close;
            }
            _ => {}
        }
        pos += 1;
    }

    PatternIndex {
        entries,
        group_count: counter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(route_slot: usize, sub_groups: &[usize]) -> GroupIndexEntry {
        GroupIndexEntry {
            route_slot,
            sub_groups: sub_groups.to_vec(),
        }
    }

    #[test]
    fn test_index_simple() {
        let index = build_index(r"(/blog/(\d+)/post/(\d+))|(/blog/(\d+))|(other)");
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1), Some(&entry(0, &[2, 3])));
        assert_eq!(index.get(4), Some(&entry(1, &[5])));
        assert_eq!(index.get(6), Some(&entry(2, &[])));
        assert_eq!(index.group_count(), 6);
    }

    #[test]
    fn test_index_multiple_sub_groups() {
        let index = build_index(r"(/blog/(\d+)/post/(\d+))|(/blog/(\d+))|(o(t)h(e)(?:r))");
        assert_eq!(index.get(1), Some(&entry(0, &[2, 3])));
        assert_eq!(index.get(4), Some(&entry(1, &[5])));
        assert_eq!(index.get(6), Some(&entry(2, &[7, 8])));
        assert_eq!(index.group_count(), 8);
    }

    #[test]
    fn test_index_named_groups_and_spacing() {
        let index = build_index(
            r"(/test/(\d+)/p/(?P<pArg>[^/]+)/\d+/(?P<rest>.*)) | (/blog/(\d+)/post/(?P<post>\d+)(?P<rest2>.*)) | (.*)",
        );
        assert_eq!(index.get(1), Some(&entry(0, &[2, 3, 4])));
        assert_eq!(index.get(5), Some(&entry(1, &[6, 7, 8])));
        assert_eq!(index.get(9), Some(&entry(2, &[])));
    }

    #[test]
    fn test_index_route_slots_follow_order() {
        let index = build_index(r"(/a)|(/b/(x))|((?:/c)(y)(z))|(/d)");
        let slots: Vec<usize> = index.iter().map(|(_, e)| e.route_slot).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        let tops: Vec<usize> = index.iter().map(|(g, _)| g).collect();
        assert_eq!(tops, vec![1, 2, 4, 7]);
    }

    #[test]
    fn test_index_sub_groups_belong_to_their_route() {
        let index = build_index(r"(/a/(\d+)(?:/(\w+))?)|(/b/(\d+))|(/c)");
        for (top, e) in index.iter() {
            let next_top = index.iter().map(|(g, _)| g).find(|g| *g > top);
            for (i, g) in e.sub_groups.iter().enumerate() {
                assert!(*g > top);
                if i > 0 {
                    assert!(*g > e.sub_groups[i - 1]);
                }
                if let Some(next) = next_top {
                    assert!(*g < next);
                }
            }
        }
    }

    #[test]
    fn test_index_matches_regex_group_count() {
        let combined = r"(/a/(?P<x>\d+))|(/b/(?:\d+)/(y))|((?i)/c)|(/[()]/(z))";
        let index = build_index(combined);
        let re = regex::Regex::new(combined).unwrap();
        assert_eq!(index.group_count(), re.captures_len() - 1);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_index_is_idempotent() {
        let combined = r"(/a/(\d+))|(/b)";
        assert_eq!(build_index(combined), build_index(combined));
    }

    #[test]
    fn test_index_empty_pattern() {
        let index = build_index("");
        assert!(index.is_empty());
        assert_eq!(index.group_count(), 0);
    }
}
