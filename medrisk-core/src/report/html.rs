//! HTML risk card.
//!
//! Generates a standalone page with embedded CSS for viewing in any browser.

use crate::form::check_source;

use super::{DatasetReport, EMPTY_CELL, RenderOptions, join_labels, join_or_empty, or_empty};

/// Generate an HTML risk card for one dataset.
pub fn report_to_html(report: &DatasetReport, options: &RenderOptions) -> String {
    let assessment = &report.assessment;
    let band = assessment.band;
    let mut html = String::new();

    // Header
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!(
        "<title>{} risk card</title>\n",
        escape_html(&report.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(&format!(
        "<h1>{} <span class=\"badge {}\">{}</span> <span class=\"score\">({:.prec$})</span></h1>\n",
        escape_html(&report.name),
        band.css_class(),
        band.label(),
        assessment.score,
        prec = options.precision
    ));
    if !report.description.trim().is_empty() {
        html.push_str(&format!(
            "<p class=\"description\">{}</p>\n",
            escape_html(report.description.trim())
        ));
    }
    // Only web links become anchors.
    match check_source(&report.source) {
        Ok(_) => html.push_str(&format!(
            "<p><a href=\"{}\">dataset link</a></p>\n",
            escape_html(report.source.trim())
        )),
        Err(_) if !report.source.trim().is_empty() => html.push_str(&format!(
            "<p class=\"source\">{}</p>\n",
            escape_html(report.source.trim())
        )),
        Err(_) => {}
    }
    html.push_str(&format!(
        "<p class=\"meta\">Modalities: {} | Jurisdictions: {}</p>\n",
        escape_html(&join_labels(&report.modalities)),
        escape_html(&join_labels(&report.regions))
    ));

    // Summary table
    html.push_str("<div class=\"summary\">\n");
    html.push_str("<table>\n<tbody>\n");
    html.push_str(&format!(
        "<tr><td>Applicable rows</td><td>{}</td></tr>\n",
        assessment.applicable
    ));
    html.push_str(&format!(
        "<tr><td>Answered</td><td>{}</td></tr>\n",
        assessment.answered
    ));
    html.push_str(&format!(
        "<tr><td>Mitigated</td><td>{}</td></tr>\n",
        assessment.mitigated
    ));
    html.push_str("</tbody>\n</table>\n</div>\n");

    if assessment.rows.is_empty() {
        html.push_str("<p class=\"no-rows\">No applicable checklist rows.</p>\n");
    } else {
        html.push_str("<table class=\"checklist\">\n<thead><tr>");
        for heading in ["Category", "Question", "Answer", "Mitigations", "Notes", "Severity"] {
            html.push_str(&format!("<th>{heading}</th>"));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        for row in &assessment.rows {
            let row_band = row.band();
            let class = if row.counts { "answered" } else { "pending" };
            html.push_str(&format!("<tr class=\"{class}\">"));
            html.push_str(&format!(
                "<td class=\"category\">{}</td>",
                escape_html(&row.category)
            ));
            html.push_str(&format!("<td>{}</td>", escape_html(&row.question)));
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(row.answer.as_deref().unwrap_or(EMPTY_CELL))
            ));
            html.push_str(&format!(
                "<td class=\"mitigations\">{}</td>",
                escape_html(&join_or_empty(&row.mitigations))
            ));
            html.push_str(&format!(
                "<td>{}</td>",
                escape_html(or_empty(row.notes.as_deref().unwrap_or_default()))
            ));
            html.push_str(&format!(
                "<td><span class=\"badge {}\">{}</span></td>",
                row_band.css_class(),
                row_band.label()
            ));
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }

    // Footer
    html.push_str("<footer><p>Generated by MedRisk</p></footer>\n");
    html.push_str("</body>\n</html>\n");

    html
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 1100px; margin: 0 auto; padding: 24px; color: #1f2937; background: #f9fafb; }
h1 { display: flex; align-items: center; gap: 12px; font-weight: 600; }
.score { color: #6b7280; font-size: 0.6em; }
.description { color: #374151; }
.meta { color: #6b7280; font-size: 0.9em; }
table { border-collapse: collapse; width: 100%; margin: 12px 0; background: white; }
th, td { border-bottom: 1px solid #e5e7eb; padding: 8px 12px; text-align: left; vertical-align: top; font-size: 0.9em; }
th { background: #f3f4f6; font-weight: 500; }
.summary table { width: auto; }
td.category { white-space: nowrap; }
td.mitigations { max-width: 280px; }
tr.pending { color: #6b7280; }
.badge { padding: 2px 8px; border-radius: 9999px; color: white; font-size: 0.75em; }
.badge.low { background: #22c55e; }
.badge.medium { background: #fbbf24; }
.badge.high { background: #ef4444; }
.no-rows { color: #6b7280; text-align: center; padding: 40px; }
footer { margin-top: 40px; padding-top: 10px; border-top: 1px solid #e5e7eb; color: #9ca3af; font-size: 0.85em; text-align: center; }
a { color: #2563eb; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Modality};
    use crate::dataset::{Dataset, blank_answers};

    fn report_for(name: &str, answers: &[(&str, &str)]) -> DatasetReport {
        let catalog = Catalog::builtin();
        let mut risk = blank_answers(catalog);
        for (item, answer) in answers {
            risk.get_mut(*item).unwrap().answer = answer.to_string();
        }
        let dataset = Dataset {
            id: "x".into(),
            name: name.into(),
            description: "Whole-slide images".into(),
            source: "https://example.org/?a=1&b=2".into(),
            modalities: vec![Modality::Pathology],
            risk_answers: risk,
            ..Default::default()
        };
        DatasetReport::build(&dataset, catalog)
    }

    fn render(report: &DatasetReport) -> String {
        report_to_html(report, &RenderOptions::default())
    }

    #[test]
    fn test_html_report_structure() {
        let html = render(&report_for("OpenPath", &[("path_slide_label", "Yes")]));
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<title>OpenPath risk card</title>"));
        assert!(html.contains("<span class=\"badge high\">High</span>"));
        assert!(html.contains("<th>Mitigations</th>"));
        assert!(html.contains("<tr class=\"answered\">"));
        assert!(html.contains("<tr class=\"pending\">"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn test_html_links_only_web_sources() {
        let mut report = report_for("OpenPath", &[]);
        let html = render(&report);
        assert!(html.contains("<a href=\"https://example.org/?a=1&amp;b=2\">dataset link</a>"));

        report.source = "javascript:alert(document.cookie)".into();
        let html = render(&report);
        assert!(!html.contains("href=\"javascript:"));
        assert!(html.contains("<p class=\"source\">javascript:alert(document.cookie)</p>"));
    }

    #[test]
    fn test_html_escaping() {
        let html = render(&report_for("<script>alert(1)</script> & co", &[]));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; co"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("href=\"https://example.org/?a=1&amp;b=2\""));
    }

    #[test]
    fn test_html_has_css() {
        let html = render(&report_for("Styled", &[]));
        assert!(html.contains("<style>"));
        assert!(html.contains(".badge.high"));
    }

    #[test]
    fn test_html_without_rows() {
        let mut report = report_for("Empty", &[]);
        report.assessment.rows.clear();
        assert!(render(&report).contains("No applicable checklist rows."));
    }
}
