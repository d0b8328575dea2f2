//! Ordering and filtering of parsed protocols.
//!
//! Non-BGP protocols come first, in the order bird reported them. BGP
//! sessions follow, grouped by the naming convention their name starts with
//! (see [PREFIX_ORDER]), and sorted by name within each group.

use std::cmp::Ordering;

use crate::{NameMap, ProtocolState};

/// Known protocol name prefixes, in display order. Matching ignores case.
pub const PREFIX_ORDER: [&str; 7] = [
    "internal",
    "transit",
    "collector",
    "rs",
    "peer",
    "client",
    "downstream",
];

/// Returns the index of the first prefix in [PREFIX_ORDER] that `name` starts
/// with, or `PREFIX_ORDER.len()` if there's none
pub fn prefix_priority(name: &str) -> usize {
    let name = name.to_lowercase();
    PREFIX_ORDER
        .iter()
        .position(|prefix| name.starts_with(prefix))
        .unwrap_or(PREFIX_ORDER.len())
}

/// Compares two protocols for display. Two non-BGP protocols are always
/// equal, so a stable sort keeps them in their original order.
pub fn compare_protocols(a: &ProtocolState, b: &ProtocolState) -> Ordering {
    match (a.is_bgp(), b.is_bgp()) {
        (false, false) => Ordering::Equal,
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => prefix_priority(&a.name)
            .cmp(&prefix_priority(&b.name))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name)),
    }
}

/// Which protocols to show
#[derive(Debug, Default, Clone)]
pub struct ProtocolFilter {
    /// Show BGP sessions only
    pub bgp_only: bool,
    /// Show only protocols carrying at least one of these tags. Empty means
    /// no tag filtering.
    pub tags: Vec<String>,
}

impl ProtocolFilter {
    /// Returns true if `protocol` should be shown
    pub fn matches(&self, protocol: &ProtocolState, names: &NameMap) -> bool {
        if self.bgp_only && !protocol.is_bgp() {
            return false;
        }
        self.tags.is_empty() || names.lookup(&protocol.name).has_any_tag(&self.tags)
    }
}

/// Sorts and filters `protocols` for display, without touching the protocols
/// themselves
pub fn select<'a>(
    protocols: &'a [ProtocolState],
    names: &NameMap,
    filter: &ProtocolFilter,
) -> Vec<&'a ProtocolState> {
    let mut selected: Vec<&ProtocolState> = protocols
        .iter()
        .filter(|p| filter.matches(p, names))
        .collect();
    // sort_by is stable
    selected.sort_by(|a, b| compare_protocols(a, b));
    log::debug!(
        "selected {} of {} protocols",
        selected.len(),
        protocols.len()
    );
    selected
}
