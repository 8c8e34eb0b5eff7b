use std::io::Write;

use crate::error::Result;
use crate::extract::AnchorRecord;
use crate::report::LinkReport;

use super::types::{EMPTY_RESULT_NOTICE, FormatArg, ViewArg};

const CSV_HEADERS: [&str; 5] = [
    "anchor_name",
    "full_url",
    "normalized_url",
    "group_size",
    "html_element",
];

#[derive(Debug, Clone)]
struct ExportRecord<'a> {
    anchor_name: &'a str,
    full_url: &'a str,
    normalized_url: &'a str,
    group_size: usize,
    html_element: &'a str,
}

fn anchor_to_export_record(anchor: &AnchorRecord, group_size: usize) -> ExportRecord<'_> {
    ExportRecord {
        anchor_name: &anchor.anchor_name,
        full_url: &anchor.full_url,
        normalized_url: &anchor.normalized_url,
        group_size,
        html_element: &anchor.html_snippet,
    }
}

pub(crate) fn write_report<W: Write>(
    report: &LinkReport,
    format: FormatArg,
    view: ViewArg,
    show_html: bool,
    writer: W,
) -> Result<()> {
    match format {
        FormatArg::Text => write_text(report, view, show_html, writer),
        FormatArg::Csv => write_csv(report, writer),
        FormatArg::Json => write_json(report, writer),
    }
}

/// One CSV row per anchor, in flat-view order.
pub(crate) fn write_csv<W: Write>(report: &LinkReport, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(CSV_HEADERS)?;
    for (anchor, group_size) in report.anchors_by_group_size() {
        let rec = anchor_to_export_record(anchor, group_size);
        let group_size = rec.group_size.to_string();
        writer.write_record([
            rec.anchor_name,
            rec.full_url,
            rec.normalized_url,
            group_size.as_str(),
            rec.html_element,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_json<W: Write>(report: &LinkReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub(crate) fn write_text<W: Write>(
    report: &LinkReport,
    view: ViewArg,
    show_html: bool,
    mut writer: W,
) -> Result<()> {
    writeln!(writer, "Analysis of {} (base {})", report.requested_url, report.base_url)?;
    if report.is_empty() {
        writeln!(writer, "{EMPTY_RESULT_NOTICE}")?;
        writer.flush()?;
        return Ok(());
    }

    writeln!(
        writer,
        "Found {} anchor links grouped into {} unique destinations",
        report.total_anchors, report.unique_destinations
    )?;
    writeln!(
        writer,
        "Skipped: {} navigation, {} footer, {} not internal",
        report.stats.skipped_navigation,
        report.stats.skipped_footer,
        report.stats.skipped_not_internal
    )?;

    if matches!(view, ViewArg::Grouped | ViewArg::Both) {
        write_heading(&mut writer, "Links Grouped by Destination")?;
        for group in report.groups_by_size() {
            writeln!(
                writer,
                "{} ({} links)",
                group.normalized_url,
                group.anchors.len()
            )?;
            for anchor in &group.anchors {
                writeln!(writer, "  {}", anchor.anchor_name)?;
                writeln!(writer, "    Full URL: {}", anchor.full_url)?;
                if show_html {
                    writeln!(writer, "    {}", anchor.html_snippet)?;
                }
            }
        }
    }

    if matches!(view, ViewArg::Flat | ViewArg::Both) {
        write_heading(&mut writer, "All Links")?;
        for (anchor, _) in report.anchors_by_group_size() {
            writeln!(writer, "{} -> {}", anchor.anchor_name, anchor.normalized_url)?;
            writeln!(writer, "  Full URL: {}", anchor.full_url)?;
            if show_html {
                writeln!(writer, "  {}", anchor.html_snippet)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn write_heading<W: Write>(writer: &mut W, title: &str) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "-".repeat(title.chars().count()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_html;

    const PAGE: &str = r#"<main>
        <a href="/one">One</a>
        <a href="/two?a=1">Two A</a>
        <a href="/two#b">Two B</a>
    </main>"#;

    fn report() -> LinkReport {
        analyze_html(PAGE, "https://shop.test/", "https://shop.test/").unwrap()
    }

    fn render(format: FormatArg, view: ViewArg, show_html: bool) -> String {
        let mut out = Vec::new();
        write_report(&report(), format, view, show_html, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_grouped_view_lists_largest_group_first() {
        let text = render(FormatArg::Text, ViewArg::Grouped, false);
        assert!(text.contains("Found 3 anchor links grouped into 2 unique destinations"));
        let two = text.find("https://shop.test/two (2 links)").unwrap();
        let one = text.find("https://shop.test/one (1 links)").unwrap();
        assert!(two < one);
        assert!(!text.contains("All Links"));
        assert!(!text.contains("<a "));
    }

    #[test]
    fn text_flat_view_with_snippets() {
        let text = render(FormatArg::Text, ViewArg::Flat, true);
        assert!(text.contains("Two A -> https://shop.test/two"));
        assert!(text.contains(r#"<a href="/one">One</a>"#));
        assert!(!text.contains("Links Grouped by Destination"));
    }

    #[test]
    fn text_empty_report_prints_notice() {
        let empty = analyze_html("<p>nothing</p>", "https://shop.test/", "https://shop.test/")
            .unwrap();
        let mut out = Vec::new();
        write_text(&empty, ViewArg::Both, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(EMPTY_RESULT_NOTICE));
    }

    #[test]
    fn csv_has_header_and_flat_rows() {
        let csv = render(FormatArg::Csv, ViewArg::Both, false);
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS);

        let rows = reader
            .records()
            .map(|record| record.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "Two A");
        assert_eq!(&rows[0][3], "2");
        assert_eq!(&rows[2][1], "https://shop.test/one");
    }

    #[test]
    fn json_serializes_groups_in_encounter_order() {
        let json = render(FormatArg::Json, ViewArg::Both, false);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_anchors"], 3);
        assert_eq!(value["unique_destinations"], 2);
        assert_eq!(
            value["links"]["groups"][0]["normalized_url"],
            "https://shop.test/one"
        );
        assert_eq!(
            value["links"]["groups"][1]["anchors"][1]["full_url"],
            "https://shop.test/two#b"
        );
    }
}
