//! The analysis result handed to presentation, plus its display orderings.

use serde::Serialize;

use crate::extract::{AnchorRecord, ExtractStats, GroupedLinks, LinkExtraction, LinkGroup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub requested_url: String,
    pub base_url: String,
    pub analyzed_at: String,
    pub total_anchors: usize,
    pub unique_destinations: usize,
    pub stats: ExtractStats,
    pub links: GroupedLinks,
}

impl LinkReport {
    pub fn new(requested_url: String, base_url: String, extraction: LinkExtraction) -> Self {
        let LinkExtraction { links, stats } = extraction;
        Self {
            requested_url,
            base_url,
            analyzed_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            total_anchors: links.total_anchors(),
            unique_destinations: links.unique_destinations(),
            stats,
            links,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Destinations with the most anchors first; ties keep first-encounter order.
    pub fn groups_by_size(&self) -> Vec<&LinkGroup> {
        let mut groups = self.links.iter().collect::<Vec<_>>();
        groups.sort_by(|a, b| b.anchors.len().cmp(&a.anchors.len()));
        groups
    }

    /// Every anchor paired with its destination's group size, largest groups
    /// first.
    ///
    /// The sort is stable over the grouped order: on ties, destinations keep
    /// first-encounter order and anchors of one destination stay contiguous in
    /// document order.
    pub fn anchors_by_group_size(&self) -> Vec<(&AnchorRecord, usize)> {
        let mut anchors = self
            .links
            .iter()
            .flat_map(|group| {
                let size = group.anchors.len();
                group.anchors.iter().map(move |anchor| (anchor, size))
            })
            .collect::<Vec<_>>();
        anchors.sort_by(|a, b| b.1.cmp(&a.1));
        anchors
    }
}
