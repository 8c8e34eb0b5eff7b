//! Content link grouping for a single web page.
//!
//! The engine takes fetched HTML plus the page's resolved URL, drops anchors
//! that live inside navigation or footer chrome, keeps same-host links, and
//! groups what survives by a normalized destination (scheme, host, path).
//!
//! ```no_run
//! # fn main() -> anchorscope::Result<()> {
//! let html = r#"<main><a href="/products?ref=x">Shop</a></main>"#;
//! let extraction = anchorscope::extract_links(html, "https://shop.test/")?;
//! assert_eq!(extraction.links.unique_destinations(), 1);
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod app;
pub mod chrome;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod label;
pub mod report;
mod text;
pub mod url_utils;

pub use analyze::{analyze_html, analyze_url, validate_target_url};
pub use chrome::{ChromeRegion, classify_chrome, is_in_chrome};
pub use error::{Error, Result};
pub use extract::{AnchorRecord, ExtractStats, GroupedLinks, LinkExtraction, LinkGroup, extract_links};
pub use fetch::{FetchConfig, FetchedPage, PageFetcher};
pub use label::label_anchor;
pub use report::LinkReport;
pub use url_utils::{is_same_domain, is_valid_internal_link, normalize_url, resolve_href};
