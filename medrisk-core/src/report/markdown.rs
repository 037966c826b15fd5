//! Markdown risk card: human-readable per-dataset report.

use super::list::escape_cell;
use super::{DatasetReport, EMPTY_CELL, RenderOptions, join_labels, join_or_empty, or_empty};
use crate::form::check_source;
use crate::scoring::RiskBand;

/// Generate a Markdown risk card for one dataset.
pub fn report_to_markdown(report: &DatasetReport, options: &RenderOptions) -> String {
    let assessment = &report.assessment;
    let mut md = String::new();

    md.push_str(&format!(
        "# {} — {} ({:.prec$})\n\n",
        report.name,
        assessment.band,
        assessment.score,
        prec = options.precision
    ));

    if !report.description.trim().is_empty() {
        md.push_str(&format!("{}\n\n", report.description.trim()));
    }
    match check_source(&report.source) {
        Ok(_) => md.push_str(&format!(
            "**Source:** [dataset link]({})\n\n",
            report.source.trim()
        )),
        Err(_) if !report.source.trim().is_empty() => md.push_str(&format!(
            "**Source:** `{}`\n\n",
            report.source.trim().replace('`', "'")
        )),
        Err(_) => {}
    }
    md.push_str(&format!(
        "**Modalities:** {} | **Jurisdictions:** {}\n\n",
        join_labels(&report.modalities),
        join_labels(&report.regions)
    ));

    // Summary
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Applicable rows | {} |\n", assessment.applicable));
    md.push_str(&format!("| Answered | {} |\n", assessment.answered));
    md.push_str(&format!("| Mitigated | {} |\n", assessment.mitigated));
    md.push_str(&format!(
        "| **Risk score** | **{:.prec$}** |\n\n",
        assessment.score,
        prec = options.precision
    ));

    if assessment.rows.is_empty() {
        md.push_str("No applicable checklist rows.\n");
        return md;
    }

    md.push_str("## Checklist\n\n");
    md.push_str("| Category | Question | Answer | Mitigations | Notes | Severity |\n");
    md.push_str("|----------|----------|--------|-------------|-------|----------|\n");
    for row in &assessment.rows {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&row.category),
            escape_cell(&row.question),
            escape_cell(row.answer.as_deref().unwrap_or(EMPTY_CELL)),
            escape_cell(&join_or_empty(&row.mitigations)),
            escape_cell(or_empty(row.notes.as_deref().unwrap_or_default())),
            severity_label(row.band())
        ));
    }
    md.push('\n');

    md
}

fn severity_label(band: RiskBand) -> &'static str {
    match band {
        RiskBand::High => "🔴 High",
        RiskBand::Medium => "🟠 Medium",
        RiskBand::Low => "🟢 Low",
    }
}
