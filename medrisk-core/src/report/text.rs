//! Plain-text risk card for terminals and logs.

use super::{DatasetReport, EMPTY_CELL, RenderOptions, join_labels, join_or_empty, or_empty};

/// Generate a plain-text risk card for one dataset.
pub fn report_to_text(report: &DatasetReport, options: &RenderOptions) -> String {
    let assessment = &report.assessment;
    let mut out = String::new();

    out.push_str(&format!("{}\n", report.name));
    out.push_str(&format!("{}\n", "=".repeat(report.name.chars().count().max(1))));
    out.push_str(&format!(
        "Risk:          {} ({:.prec$})\n",
        assessment.band,
        assessment.score,
        prec = options.precision
    ));
    out.push_str(&format!("Description:   {}\n", or_empty(&report.description)));
    out.push_str(&format!("Source:        {}\n", or_empty(&report.source)));
    out.push_str(&format!("Modalities:    {}\n", join_labels(&report.modalities)));
    out.push_str(&format!("Jurisdictions: {}\n", join_labels(&report.regions)));
    out.push_str(&format!(
        "Rows:          {} applicable, {} answered, {} mitigated\n",
        assessment.applicable, assessment.answered, assessment.mitigated
    ));

    if assessment.rows.is_empty() {
        out.push_str("\nNo applicable checklist rows.\n");
        return out;
    }

    for row in &assessment.rows {
        out.push_str(&format!(
            "\n[{}] {}: {}\n",
            row.band(),
            row.category,
            row.question
        ));
        out.push_str(&format!(
            "  Answer:      {}\n",
            row.answer.as_deref().unwrap_or(EMPTY_CELL)
        ));
        out.push_str(&format!(
            "  Severity:    {} ({:.prec$})\n",
            row.severity,
            row.effective_severity,
            prec = options.precision
        ));
        out.push_str(&format!("  Mitigations: {}\n", join_or_empty(&row.mitigations)));
        out.push_str(&format!(
            "  Notes:       {}\n",
            or_empty(row.notes.as_deref().unwrap_or_default())
        ));
    }

    out
}
