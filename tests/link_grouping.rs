use anchorscope::{
    LinkReport, analyze_html, extract_links, is_valid_internal_link, normalize_url, resolve_href,
};
use url::Url;

const SHOP_PAGE: &str = r#"<header><a href="/home">Home</a></header><main><a href="/products?ref=x">Shop</a><a href="/products#top">Shop Top</a></main><footer><a href="/contact">Contact</a></footer>"#;

fn analyze(html: &str, base: &str) -> LinkReport {
    analyze_html(html, base, base).unwrap()
}

#[test]
fn shop_page_groups_content_links_and_drops_chrome() {
    let report = analyze(SHOP_PAGE, "https://shop.test/");

    assert_eq!(report.total_anchors, 2);
    assert_eq!(report.unique_destinations, 1);
    let anchors = report.links.get("https://shop.test/products").unwrap();
    let full_urls = anchors
        .iter()
        .map(|anchor| anchor.full_url.as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        full_urls,
        ["https://shop.test/products?ref=x", "https://shop.test/products#top"]
    );
    assert_eq!(anchors[0].anchor_name, "Shop");
    assert_eq!(anchors[1].anchor_name, "Shop Top");
    assert!(report.links.get("https://shop.test/home").is_none());
    assert!(report.links.get("https://shop.test/contact").is_none());
    assert_eq!(report.stats.skipped_navigation, 1);
    assert_eq!(report.stats.skipped_footer, 1);
}

#[test]
fn nav_descendants_never_reach_the_result() {
    let html = r#"
        <nav>
          <div class="content article" id="main" role="main">
            <a href="/deep" class="content" title="Deep link">Deep</a>
          </div>
        </nav>
        <section><a href="/kept">Kept</a></section>"#;
    let report = analyze(html, "https://shop.test/");

    assert!(report.links.get("https://shop.test/deep").is_none());
    assert_eq!(report.total_anchors, 1);
}

#[test]
fn long_text_falls_back_to_title() {
    let html = r#"<main><a href="/offer" title="Read More">Click here to read more about our very long and detailed product offering</a></main>"#;
    let report = analyze(html, "https://shop.test/");

    let anchors = report.links.get("https://shop.test/offer").unwrap();
    assert_eq!(anchors[0].anchor_name, "title: Read More");
}

#[test]
fn same_destination_shares_one_key_in_encounter_order() {
    let html = r#"<article>
        <a href="https://shop.test/docs/intro?lang=en">First</a>
        <p>text</p>
        <a href="/docs/intro#setup">Second</a>
    </article>"#;
    let extraction = extract_links(html, "https://shop.test/docs/").unwrap();

    assert_eq!(extraction.links.unique_destinations(), 1);
    let group = &extraction.links.groups()[0];
    assert_eq!(group.normalized_url, "https://shop.test/docs/intro");
    assert_eq!(group.anchors.len(), 2);
    assert_eq!(group.anchors[0].anchor_name, "First");
    assert_eq!(group.anchors[1].anchor_name, "Second");
}

#[test]
fn fragment_only_and_non_navigable_links_are_excluded() {
    let html = r##"<main>
        <a href="#section2">Jump</a>
        <a href="javascript:void(0)">Script</a>
        <a href="mailto:team@shop.test">Mail</a>
        <a href="tel:+15550100">Call</a>
        <a href="https://elsewhere.test/page">Away</a>
    </main>"##;
    let report = analyze(html, "https://shop.test/");

    assert!(report.is_empty());
    assert_eq!(report.stats.anchors_seen, 5);
    assert_eq!(report.stats.skipped_not_internal, 5);
}

#[test]
fn flat_order_puts_most_linked_destination_first() {
    let html = r#"<main>
        <a href="/solo">Solo</a>
        <a href="/popular">Popular A</a>
        <a href="/popular?x=1">Popular B</a>
        <a href="/popular#c">Popular C</a>
    </main>"#;
    let report = analyze(html, "https://shop.test/");

    let names = report
        .anchors_by_group_size()
        .into_iter()
        .map(|(anchor, size)| (anchor.anchor_name.as_str(), size))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            ("Popular A", 3),
            ("Popular B", 3),
            ("Popular C", 3),
            ("Solo", 1)
        ]
    );
}

#[test]
fn normalization_is_idempotent_and_internal_links_stay_on_host() {
    let base = Url::parse("https://shop.test:8443/catalog/").unwrap();
    let hrefs = [
        "item?id=1",
        "../about#team",
        "//shop.test:8443/x",
        "//shop.test/x",
        "https://SHOP.test:8443/Case/Path/",
        "/a/./b/../c?q#f",
    ];

    for href in hrefs {
        let resolved = resolve_href(href, &base).unwrap();
        let once = normalize_url(resolved.as_str());
        assert_eq!(normalize_url(&once), once, "href {href}");

        if is_valid_internal_link(href, &base) {
            assert_eq!(resolved.host_str(), base.host_str(), "href {href}");
            assert_eq!(resolved.port(), base.port(), "href {href}");
        }
    }
    assert!(!is_valid_internal_link("//shop.test/x", &base));
}

#[test]
fn invalid_base_url_is_an_error() {
    let err = extract_links(SHOP_PAGE, "not a url").unwrap_err();
    assert!(matches!(err, anchorscope::Error::InvalidBaseUrl { .. }));
}
