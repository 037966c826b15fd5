//! Dataset list view.

use super::{EMPTY_CELL, RenderOptions, format_score, or_empty};
use crate::catalog::Catalog;
use crate::dataset::Dataset;
use crate::form::check_source;
use crate::scoring::{RiskBand, compute_score};
use serde::{Deserialize, Serialize};

/// One row of the dataset list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub source: String,
    pub score: f64,
    pub band: RiskBand,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset, catalog: &Catalog) -> Self {
        let score = compute_score(dataset, catalog);
        Self {
            id: dataset.id.clone(),
            name: dataset.name.clone(),
            description: dataset.description.clone(),
            source: dataset.source.clone(),
            score,
            band: RiskBand::from_score(score),
        }
    }

    /// Whether any applicable row has been answered.
    pub fn is_scored(&self) -> bool {
        self.score != 0.0
    }
}

/// Score every dataset, preserving input order.
pub fn summarize(datasets: &[Dataset], catalog: &Catalog) -> Vec<DatasetSummary> {
    datasets
        .iter()
        .map(|d| DatasetSummary::from_dataset(d, catalog))
        .collect()
}

/// Fixed-width text table for terminals.
pub fn summaries_to_text(summaries: &[DatasetSummary], options: &RenderOptions) -> String {
    if summaries.is_empty() {
        return "No datasets registered.\n".to_string();
    }

    let scores: Vec<String> = summaries
        .iter()
        .map(|s| format_score(s.score, options))
        .collect();
    let id_w = column_width("ID", summaries.iter().map(|s| s.id.as_str()));
    let name_w = column_width("Dataset", summaries.iter().map(|s| s.name.as_str()));
    let score_w = column_width("Risk Score", scores.iter().map(String::as_str));

    let mut out = String::new();
    out.push_str(&format!(
        "{:<id_w$}  {:<name_w$}  {:<score_w$}  Source\n",
        "ID", "Dataset", "Risk Score"
    ));
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(id_w),
        "-".repeat(name_w),
        "-".repeat(score_w),
        "-".repeat(6)
    ));
    for (summary, score) in summaries.iter().zip(&scores) {
        out.push_str(&format!(
            "{:<id_w$}  {:<name_w$}  {:<score_w$}  {}\n",
            summary.id,
            summary.name,
            score,
            or_empty(&summary.source)
        ));
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

/// Markdown table matching the list view columns.
pub fn summaries_to_markdown(summaries: &[DatasetSummary], options: &RenderOptions) -> String {
    let mut md = String::new();
    md.push_str("# Medical-Imaging Datasets\n\n");

    if summaries.is_empty() {
        md.push_str("No datasets registered.\n");
        return md;
    }

    md.push_str("| Dataset | Description | Source | Risk Score | ID |\n");
    md.push_str("|---------|-------------|--------|------------|----|\n");
    for s in summaries {
        let source = match check_source(&s.source) {
            Ok(_) => format!("[link]({})", s.source.trim()),
            Err(_) if s.source.trim().is_empty() => EMPTY_CELL.to_string(),
            Err(_) => format!("`{}`", escape_cell(s.source.trim()).replace('`', "'")),
        };
        md.push_str(&format!(
            "| **{}** | {} | {} | {} | `{}` |\n",
            escape_cell(&s.name),
            escape_cell(or_empty(&s.description)),
            source,
            format_score(s.score, options),
            s.id
        ));
    }
    md
}

/// Keep pipes and line breaks from breaking a Markdown table row.
pub(crate) fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Modality;
    use crate::dataset::blank_answers;
    use pretty_assertions::assert_eq;

    fn dataset(id: &str, name: &str, answered: &[(&str, &str)]) -> Dataset {
        let mut answers = blank_answers(Catalog::builtin());
        for (item, answer) in answered {
            answers.get_mut(*item).unwrap().answer = answer.to_string();
        }
        Dataset {
            id: id.into(),
            name: name.into(),
            description: "desc".into(),
            source: "https://example.org".into(),
            modalities: vec![Modality::Radiology],
            risk_answers: answers,
            ..Default::default()
        }
    }

    #[test]
    fn test_summarize_scores_each_dataset() {
        let catalog = Catalog::builtin();
        let datasets = vec![
            dataset("a", "Unscored", &[]),
            dataset("b", "Scored", &[("rad_incidental", "Yes")]),
        ];
        let rows = summarize(&datasets, catalog);
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_scored());
        assert_eq!(rows[0].band, RiskBand::Low);
        assert_eq!(rows[1].score, 1.5);
        assert_eq!(rows[1].band, RiskBand::Medium);
    }

    #[test]
    fn test_text_table() {
        let catalog = Catalog::builtin();
        let rows = summarize(
            &[
                dataset("a", "Unscored", &[]),
                dataset("b", "Scored", &[("rad_incidental", "Yes")]),
            ],
            catalog,
        );
        let text = summaries_to_text(&rows, &RenderOptions::default());
        let expected = "\
ID  Dataset   Risk Score     Source
--  --------  -------------  ------
a   Unscored  —              https://example.org
b   Scored    Medium (1.50)  https://example.org
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_markdown_table() {
        let rows = summarize(
            &[dataset("b", "Pipe | Name", &[("rad_faces", "Yes")])],
            Catalog::builtin(),
        );
        let md = summaries_to_markdown(&rows, &RenderOptions::default());
        assert!(md.contains("| Dataset | Description | Source | Risk Score | ID |"));
        assert!(md.contains("**Pipe \\| Name**"));
        assert!(md.contains("High (3.00)"));
        assert!(md.contains("[link](https://example.org)"));

        let mut script = dataset("c", "Script", &[]);
        script.source = "javascript:alert(1)".into();
        let rows = summarize(&[script], Catalog::builtin());
        let md = summaries_to_markdown(&rows, &RenderOptions::default());
        assert!(md.contains("| `javascript:alert(1)` |"));
        assert!(!md.contains("](javascript:"));
    }

    #[test]
    fn test_empty_list() {
        let options = RenderOptions::default();
        assert_eq!(summaries_to_text(&[], &options), "No datasets registered.\n");
        assert!(summaries_to_markdown(&[], &options).contains("No datasets registered."));
    }
}
