//! Entry points tying validation, fetch and extraction together.

use tracing::warn;
use url::Url;

use crate::error::{Error, Result};
use crate::extract::{extract_links, extract_links_from};
use crate::fetch::PageFetcher;
use crate::report::LinkReport;

/// Checks user input before any network call is made.
pub fn validate_target_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(Error::InvalidInput {
            input: input.to_string(),
            reason: "must start with http:// or https://",
        });
    }
    Url::parse(trimmed).map_err(|_| Error::InvalidInput {
        input: input.to_string(),
        reason: "not a valid URL",
    })
}

/// Fetches `input` and groups its content links.
///
/// Relative links resolve against the final URL after redirects, not the
/// requested one. Any fetch failure short-circuits with no partial result.
pub async fn analyze_url(fetcher: &PageFetcher, input: &str) -> Result<LinkReport> {
    let target = validate_target_url(input)?;
    let page = fetcher.fetch(&target).await.inspect_err(|err| {
        warn!(url = %target, error = %err, "fetch failed");
    })?;
    let extraction = extract_links_from(&page.html, &page.final_url);
    Ok(LinkReport::new(
        page.requested_url.to_string(),
        page.final_url.to_string(),
        extraction,
    ))
}

/// Groups the content links of HTML the caller already holds.
pub fn analyze_html(html: &str, requested_url: &str, base_url: &str) -> Result<LinkReport> {
    let extraction = extract_links(html, base_url)?;
    Ok(LinkReport::new(
        requested_url.to_string(),
        base_url.to_string(),
        extraction,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert_eq!(
            validate_target_url("https://shop.test/a").unwrap().as_str(),
            "https://shop.test/a"
        );
        assert!(validate_target_url("  http://shop.test  ").is_ok());
    }

    #[test]
    fn rejects_missing_or_other_schemes() {
        for input in ["", "shop.test", "ftp://shop.test/", "HTTPS://shop.test/", "//shop.test"] {
            let err = validate_target_url(input).unwrap_err();
            assert!(matches!(err, Error::InvalidInput { .. }), "{input}");
        }
    }

    #[test]
    fn rejects_unparseable_http_url() {
        let err = validate_target_url("http://").unwrap_err();
        assert!(err.to_string().contains("not a valid URL"));
    }

    #[test]
    fn analyze_html_builds_report() {
        let report = analyze_html(
            r#"<main><a href="/x">X</a></main>"#,
            "https://shop.test/start",
            "https://shop.test/landing",
        )
        .unwrap();
        assert_eq!(report.requested_url, "https://shop.test/start");
        assert_eq!(report.base_url, "https://shop.test/landing");
        assert_eq!(report.total_anchors, 1);
    }
}
