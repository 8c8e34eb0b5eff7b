//! Link extraction pipeline: parse, filter, label, group.

use std::collections::HashMap;

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::chrome::{ChromeRegion, classify_chrome};
use crate::error::{Error, Result};
use crate::label::label_anchor;
use crate::text::truncate_with_ellipsis;
use crate::url_utils::{is_valid_internal_link, normalize_parsed_url, resolve_href};

const MAX_SNIPPET_CHARS: usize = 200;

/// One surviving anchor occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorRecord {
    pub anchor_name: String,
    pub full_url: String,
    pub normalized_url: String,
    pub html_snippet: String,
}

/// All anchors pointing at one normalized destination, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkGroup {
    pub normalized_url: String,
    pub anchors: Vec<AnchorRecord>,
}

/// Anchors grouped by normalized destination.
///
/// Destinations keep first-encounter order and anchors keep document order.
/// A group is only created together with its first anchor, so no group is
/// ever empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedLinks {
    groups: Vec<LinkGroup>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GroupedLinks {
    pub fn push(&mut self, record: AnchorRecord) {
        match self.index.get(&record.normalized_url) {
            Some(&idx) => self.groups[idx].anchors.push(record),
            None => {
                self.index
                    .insert(record.normalized_url.clone(), self.groups.len());
                self.groups.push(LinkGroup {
                    normalized_url: record.normalized_url.clone(),
                    anchors: vec![record],
                });
            }
        }
    }

    pub fn get(&self, normalized_url: &str) -> Option<&[AnchorRecord]> {
        self.index
            .get(normalized_url)
            .map(|&idx| self.groups[idx].anchors.as_slice())
    }

    pub fn groups(&self) -> &[LinkGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &LinkGroup> {
        self.groups.iter()
    }

    /// Number of distinct destinations.
    pub fn unique_destinations(&self) -> usize {
        self.groups.len()
    }

    /// Number of anchors across all destinations.
    pub fn total_anchors(&self) -> usize {
        self.groups.iter().map(|group| group.anchors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Counters for one extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub anchors_seen: usize,
    pub skipped_navigation: usize,
    pub skipped_footer: usize,
    pub skipped_not_internal: usize,
    pub kept: usize,
}

impl ExtractStats {
    fn record_chrome(&mut self, region: ChromeRegion) {
        match region {
            ChromeRegion::Navigation => self.skipped_navigation += 1,
            ChromeRegion::Footer => self.skipped_footer += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkExtraction {
    pub links: GroupedLinks,
    pub stats: ExtractStats,
}

/// Extracts and groups the content links of `html`.
///
/// `base_url` is the page's final URL after redirects; relative hrefs resolve
/// against it and only hrefs on its network location are kept.
pub fn extract_links(html: &str, base_url: &str) -> Result<LinkExtraction> {
    let base = Url::parse(base_url).map_err(|source| Error::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;
    Ok(extract_links_from(html, &base))
}

pub(crate) fn extract_links_from(html: &str, base: &Url) -> LinkExtraction {
    let doc = Html::parse_document(html);
    let mut extraction = LinkExtraction::default();
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return extraction,
    };

    for anchor in doc.select(&selector) {
        extraction.stats.anchors_seen += 1;
        let Some(raw_href) = anchor.value().attr("href") else {
            continue;
        };

        if let Some(region) = classify_chrome(anchor) {
            debug!(href = raw_href, region = region.label(), "skipping chrome anchor");
            extraction.stats.record_chrome(region);
            continue;
        }

        let href = raw_href.trim();
        if !is_valid_internal_link(href, base) {
            debug!(href, "skipping non-internal anchor");
            extraction.stats.skipped_not_internal += 1;
            continue;
        }
        let Some(absolute) = resolve_href(href, base) else {
            extraction.stats.skipped_not_internal += 1;
            continue;
        };

        extraction.links.push(AnchorRecord {
            anchor_name: label_anchor(anchor),
            full_url: absolute.to_string(),
            normalized_url: normalize_parsed_url(&absolute),
            html_snippet: truncate_with_ellipsis(&anchor.html(), MAX_SNIPPET_CHARS),
        });
        extraction.stats.kept += 1;
    }

    info!(
        base = %base,
        seen = extraction.stats.anchors_seen,
        kept = extraction.stats.kept,
        destinations = extraction.links.unique_destinations(),
        "extracted content links"
    );
    extraction
}
