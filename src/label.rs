//! Human-readable labels for anchors.

use scraper::{ElementRef, Selector};

use crate::text::{normalize_text, truncate_chars};

/// Visible text must be shorter than this to serve as a label.
const MAX_TEXT_LABEL_CHARS: usize = 50;
/// Attribute, alt and fragment values are cut to this many characters.
const MAX_VALUE_CHARS: usize = 50;
const LABEL_ATTRIBUTES: [&str; 4] = ["title", "aria-label", "name", "id"];
pub const UNNAMED_ANCHOR: &str = "Unnamed Anchor";

type LabelSource = fn(ElementRef<'_>) -> Option<String>;

/// Sources tried in order; the first one yielding a label wins.
const LABEL_SOURCES: [LabelSource; 4] = [
    text_label,
    attribute_label,
    image_alt_label,
    fragment_label,
];

/// Derives a label for `anchor`.
///
/// Priority: short visible text, then `title` / `aria-label` / `name` / `id`,
/// then the alt text of a contained image, then the href fragment, then
/// [`UNNAMED_ANCHOR`].
pub fn label_anchor(anchor: ElementRef<'_>) -> String {
    LABEL_SOURCES
        .iter()
        .find_map(|source| source(anchor))
        .unwrap_or_else(|| UNNAMED_ANCHOR.to_string())
}

fn text_label(anchor: ElementRef<'_>) -> Option<String> {
    let text = normalize_text(&anchor.text().collect::<Vec<_>>().join(" "));
    (!text.is_empty() && text.chars().count() < MAX_TEXT_LABEL_CHARS).then_some(text)
}

fn attribute_label(anchor: ElementRef<'_>) -> Option<String> {
    LABEL_ATTRIBUTES.iter().find_map(|name| {
        anchor
            .value()
            .attr(name)
            .filter(|value| !value.is_empty())
            .map(|value| format!("{name}: {}", truncate_chars(value, MAX_VALUE_CHARS)))
    })
}

fn image_alt_label(anchor: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("img[alt]").ok()?;
    anchor
        .select(&selector)
        .find_map(|img| img.value().attr("alt"))
        .map(|alt| format!("Image: {}", truncate_chars(alt, MAX_VALUE_CHARS)))
}

fn fragment_label(anchor: ElementRef<'_>) -> Option<String> {
    let href = anchor.value().attr("href")?;
    let fragment = href.split('#').nth(1)?;
    Some(format!(
        "Fragment: {}",
        truncate_chars(fragment, MAX_VALUE_CHARS)
    ))
}
