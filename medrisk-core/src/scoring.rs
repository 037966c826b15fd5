//! Score reducer: mean effective severity over answered, applicable rows.
//!
//! Unanswered rows are skipped entirely: they count neither toward the
//! numerator nor the denominator. Checking any mitigation on a row halves
//! its weight. The result lies in `[0, 3]`, with `0` meaning "nothing
//! answered yet".

use crate::applicability::{DeclaredScope, applicable_items};
use crate::catalog::{Catalog, ChecklistItem};
use crate::dataset::RiskAnswer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied to a row's weight when any mitigation is checked.
pub const MITIGATION_FACTOR: f64 = 0.5;

/// Scores at or above this are banded High.
pub const HIGH_THRESHOLD: f64 = 1.9;

/// Scores at or above this (and below [`HIGH_THRESHOLD`]) are banded Medium.
pub const MEDIUM_THRESHOLD: f64 = 1.5;

/// A record that carries per-item answers in addition to its scope.
pub trait AnswerSheet: DeclaredScope {
    fn answer(&self, item_id: &str) -> Option<&RiskAnswer>;
}

/// Categorical risk band derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Classify a score. Boundaries are inclusive from below.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskBand::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskBand::Medium
        } else {
            RiskBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        }
    }

    /// CSS class used by the HTML report badges.
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }

    /// Badge colour (green / amber / red).
    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Low => "#22c55e",
            RiskBand::Medium => "#fbbf24",
            RiskBand::High => "#ef4444",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Band for a score.
pub fn band(score: f64) -> RiskBand {
    RiskBand::from_score(score)
}

/// Row weight after the mitigation discount, regardless of whether the
/// row has been answered.
pub fn effective_severity(item: &ChecklistItem, answer: Option<&RiskAnswer>) -> f64 {
    let base = item.weight();
    if answer.is_some_and(RiskAnswer::any_mitigation_checked) {
        base * MITIGATION_FACTOR
    } else {
        base
    }
}

/// Contribution of a row to the score, or `None` when it is unanswered.
fn scored_weight(item: &ChecklistItem, answer: Option<&RiskAnswer>) -> Option<f64> {
    match answer {
        Some(row) if row.is_answered() => Some(effective_severity(item, Some(row))),
        _ => None,
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Mean effective severity of the answered, applicable rows.
pub fn compute_score<D: AnswerSheet + ?Sized>(dataset: &D, catalog: &Catalog) -> f64 {
    let (total, answered) = applicable_items(dataset, catalog)
        .into_iter()
        .filter_map(|item| scored_weight(item, dataset.answer(&item.id)))
        .fold((0.0, 0usize), |(sum, n), weight| (sum + weight, n + 1));
    mean(total, answered)
}

/// Per-row view used by reports and the form preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowAssessment {
    pub item_id: String,
    pub category: String,
    pub question: String,
    pub severity: String,
    /// Recorded answer, `None` when unanswered.
    pub answer: Option<String>,
    /// Checked mitigation labels.
    pub mitigations: Vec<String>,
    pub notes: Option<String>,
    pub base_weight: f64,
    pub effective_severity: f64,
    /// Whether the row contributes to the dataset score.
    pub counts: bool,
}

impl RowAssessment {
    pub fn band(&self) -> RiskBand {
        band(self.effective_severity)
    }

    pub fn is_mitigated(&self) -> bool {
        !self.mitigations.is_empty()
    }
}

/// Assess a single row.
pub fn assess_row(item: &ChecklistItem, answer: Option<&RiskAnswer>) -> RowAssessment {
    let recorded = answer.filter(|row| row.is_answered());
    RowAssessment {
        item_id: item.id.clone(),
        category: item.category.clone(),
        question: item.question.clone(),
        severity: item.severity.label().to_string(),
        answer: recorded.map(|row| row.answer.clone()),
        mitigations: answer
            .map(|row| row.checked_mitigations(item))
            .unwrap_or_default(),
        notes: answer
            .map(|row| row.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
        base_weight: item.weight(),
        effective_severity: effective_severity(item, answer),
        counts: recorded.is_some(),
    }
}

/// Full assessment of a dataset against a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Same value as [`compute_score`].
    pub score: f64,
    pub band: RiskBand,
    /// Number of applicable rows.
    pub applicable: usize,
    /// Number of applicable rows with an answer.
    pub answered: usize,
    /// Number of answered rows with at least one mitigation checked.
    pub mitigated: usize,
    /// Applicable rows in catalog order.
    pub rows: Vec<RowAssessment>,
}

impl RiskAssessment {
    /// Fraction of applicable rows that have been answered.
    pub fn completeness(&self) -> f64 {
        if self.applicable == 0 {
            0.0
        } else {
            self.answered as f64 / self.applicable as f64
        }
    }
}

/// Assess every applicable row and reduce to a score and band.
pub fn assess<D: AnswerSheet + ?Sized>(dataset: &D, catalog: &Catalog) -> RiskAssessment {
    let items = applicable_items(dataset, catalog);
    let mut total = 0.0;
    let mut answered = 0;
    let mut mitigated = 0;
    let mut rows = Vec::with_capacity(items.len());

    for item in items {
        let answer = dataset.answer(&item.id);
        if let Some(weight) = scored_weight(item, answer) {
            total += weight;
            answered += 1;
            if answer.is_some_and(RiskAnswer::any_mitigation_checked) {
                mitigated += 1;
            }
        }
        rows.push(assess_row(item, answer));
    }

    let score = mean(total, answered);
    tracing::debug!(
        applicable = rows.len(),
        answered,
        mitigated,
        score,
        "Assessed dataset"
    );

    RiskAssessment {
        score,
        band: band(score),
        applicable: rows.len(),
        answered,
        mitigated,
        rows,
    }
}
