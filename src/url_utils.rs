//! URL helpers: same-host checks, internal-link validation, normalization.

use url::Url;

/// Raw href prefixes that never point at another document.
const NON_NAVIGABLE_PREFIXES: [&str; 4] = ["#", "javascript:", "mailto:", "tel:"];

/// True when both URLs share host and explicit port, whatever the scheme.
pub fn is_same_domain(url: &Url, base: &Url) -> bool {
    network_location(url) == network_location(base)
}

fn network_location(url: &Url) -> (Option<&str>, Option<u16>) {
    (url.host_str(), url.port())
}

/// Resolves `href` against `base_url` the way a browser would.
pub fn resolve_href(href: &str, base_url: &Url) -> Option<Url> {
    base_url.join(href).ok()
}

/// Decides whether an (already trimmed) href is an internal link worth keeping.
///
/// Empty hrefs and hrefs starting with `#`, `javascript:`, `mailto:` or `tel:`
/// are rejected outright (case-sensitive). Anything else must resolve to the
/// same network location as `base_url`.
///
/// When the href spells out its own authority, the port is taken as written:
/// `http://shop.test:80/` is `shop.test:80`, never `shop.test`, whatever the
/// base's scheme.
pub fn is_valid_internal_link(href: &str, base_url: &Url) -> bool {
    if href.is_empty()
        || NON_NAVIGABLE_PREFIXES
            .iter()
            .any(|prefix| href.starts_with(prefix))
    {
        return false;
    }

    resolve_href(href, base_url).is_some_and(|absolute| {
        let port = match href_authority(href) {
            Some(authority) => written_port(authority),
            None => absolute.port(),
        };
        absolute.host_str() == base_url.host_str() && port == base_url.port()
    })
}

/// The raw `[userinfo@]host[:port]` of an absolute or protocol-relative href.
fn href_authority(href: &str) -> Option<&str> {
    let rest = match href.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = href.split_once(':')?;
            let valid_scheme = scheme
                .chars()
                .next()
                .is_some_and(|first| first.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid_scheme {
                return None;
            }
            rest.strip_prefix("//")?
        }
    };
    let end = rest.find(['/', '?', '#', '\\']).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn written_port(authority: &str) -> Option<u16> {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);
    let port = match host_port.rfind(']') {
        Some(idx) => host_port[idx + 1..].strip_prefix(':')?,
        None => host_port.rsplit_once(':')?.1,
    };
    port.parse().ok()
}

/// Reduces a URL to scheme, network location and path.
///
/// Query and fragment are always dropped. Input that does not parse is cut at
/// the first `?` or `#`.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => normalize_parsed_url(&parsed),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    }
}

pub(crate) fn normalize_parsed_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_query(None);
    normalized.set_fragment(None);
    normalized.to_string()
}
