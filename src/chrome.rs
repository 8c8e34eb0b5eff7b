//! Navigation/footer ("chrome") detection by ancestor inspection.
//!
//! Chrome is structural: an anchor is chrome only when one of its ancestors
//! is marked as navigation or footer. The anchor's own tag, classes, id or
//! role never matter.

use scraper::ElementRef;
use serde::Serialize;

const NAV_TOKENS: [&str; 6] = [
    "nav",
    "navbar",
    "menu",
    "navigation",
    "header",
    "main-menu",
];
const NAV_ROLES: [&str; 2] = ["navigation", "menu"];
const FOOTER_TOKENS: [&str; 4] = ["footer", "site-footer", "bottom", "copyright"];
const FOOTER_ROLE: &str = "contentinfo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromeRegion {
    Navigation,
    Footer,
}

impl ChromeRegion {
    pub fn label(self) -> &'static str {
        match self {
            ChromeRegion::Navigation => "navigation",
            ChromeRegion::Footer => "footer",
        }
    }
}

/// The attributes of one ancestor that take part in classification.
///
/// Classes stay token-split for exact membership; id and role are lower-cased
/// free text.
struct AncestorAttrs<'a> {
    tag: &'a str,
    classes: Vec<&'a str>,
    id: Option<String>,
    role: Option<String>,
}

impl<'a> AncestorAttrs<'a> {
    fn from_element(element: ElementRef<'a>) -> Self {
        let value = element.value();
        Self {
            tag: value.name(),
            classes: value.classes().collect(),
            id: value.id().map(str::to_lowercase),
            role: value.attr("role").map(str::to_lowercase),
        }
    }

    fn has_class_in(&self, tokens: &[&str]) -> bool {
        self.classes.iter().any(|class| tokens.contains(class))
    }

    fn id_contains_any(&self, tokens: &[&str]) -> bool {
        self.id
            .as_deref()
            .is_some_and(|id| tokens.iter().any(|token| id.contains(token)))
    }

    fn is_navigation(&self) -> bool {
        matches!(self.tag, "nav" | "header")
            || self.has_class_in(&NAV_TOKENS)
            || self.id_contains_any(&NAV_TOKENS)
            || self
                .role
                .as_deref()
                .is_some_and(|role| NAV_ROLES.contains(&role))
    }

    fn is_footer(&self) -> bool {
        self.tag == "footer"
            || self.has_class_in(&FOOTER_TOKENS)
            || self.id_contains_any(&FOOTER_TOKENS)
            || self
                .role
                .as_deref()
                .is_some_and(|role| role.contains(FOOTER_ROLE))
    }

    fn region(&self) -> Option<ChromeRegion> {
        if self.is_navigation() {
            Some(ChromeRegion::Navigation)
        } else if self.is_footer() {
            Some(ChromeRegion::Footer)
        } else {
            None
        }
    }
}

/// Returns the chrome region of the innermost marked ancestor, if any.
pub fn classify_chrome(element: ElementRef<'_>) -> Option<ChromeRegion> {
    // ancestors() starts at the parent and ends at the document node.
    for node in element.ancestors() {
        let Some(ancestor) = ElementRef::wrap(node) else {
            continue;
        };
        if let Some(region) = AncestorAttrs::from_element(ancestor).region() {
            return Some(region);
        }
    }
    None
}

pub fn is_in_chrome(element: ElementRef<'_>) -> bool {
    classify_chrome(element).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn classify(body: &str) -> Option<ChromeRegion> {
        let doc = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        let selector = Selector::parse("a#probe").unwrap();
        let anchor = doc.select(&selector).next().expect("probe anchor");
        classify_chrome(anchor)
    }

    #[test]
    fn plain_content_is_not_chrome() {
        assert_eq!(classify(r#"<main><p><a id="probe" href="/x">x</a></p></main>"#), None);
    }

    #[test]
    fn nav_and_header_tags() {
        assert_eq!(
            classify(r#"<nav><ul><li><a id="probe" href="/x">x</a></li></ul></nav>"#),
            Some(ChromeRegion::Navigation)
        );
        assert_eq!(
            classify(r#"<header><a id="probe" href="/x">x</a></header>"#),
            Some(ChromeRegion::Navigation)
        );
    }

    #[test]
    fn class_tokens_need_exact_match() {
        assert_eq!(
            classify(r#"<div class="wide navbar"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Navigation)
        );
        assert_eq!(
            classify(r#"<div class="top-nav"><a id="probe" href="/x">x</a></div>"#),
            None
        );
        assert_eq!(
            classify(r#"<div class="copyright"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Footer)
        );
    }

    #[test]
    fn id_matches_by_substring_case_insensitively() {
        assert_eq!(
            classify(r#"<div id="MainNavigationBar"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Navigation)
        );
        // "unavailable-list" contains "nav" mid-word.
        assert_eq!(
            classify(r#"<div id="unavailable-list"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Navigation)
        );
        assert_eq!(
            classify(r#"<div id="canvas"><a id="probe" href="/x">x</a></div>"#),
            None
        );
        assert_eq!(
            classify(r#"<section id="page-bottom-links"><a id="probe" href="/x">x</a></section>"#),
            Some(ChromeRegion::Footer)
        );
    }

    #[test]
    fn roles() {
        assert_eq!(
            classify(r#"<div role="Navigation"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Navigation)
        );
        assert_eq!(
            classify(r#"<div role="menubar"><a id="probe" href="/x">x</a></div>"#),
            None
        );
        assert_eq!(
            classify(r#"<div role="contentinfo"><a id="probe" href="/x">x</a></div>"#),
            Some(ChromeRegion::Footer)
        );
    }

    #[test]
    fn anchor_own_attributes_are_ignored() {
        assert_eq!(
            classify(r#"<main><a id="probe" class="nav footer" role="navigation" href="/x">x</a></main>"#),
            None
        );
    }

    #[test]
    fn innermost_marked_ancestor_wins() {
        assert_eq!(
            classify(r#"<footer><nav><a id="probe" href="/x">x</a></nav></footer>"#),
            Some(ChromeRegion::Navigation)
        );
        assert_eq!(
            classify(r#"<nav><footer><a id="probe" href="/x">x</a></footer></nav>"#),
            Some(ChromeRegion::Footer)
        );
    }
}
