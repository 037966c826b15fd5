//! Dataset records and their per-item checklist answers.
//!
//! Field names accept the document-store spellings (`risk`, `boxes`,
//! `createdAt`) so exported collections load without conversion. Missing
//! collections deserialise as empty.

use crate::applicability::DeclaredScope;
use crate::catalog::{Catalog, ChecklistItem, Modality, Region};
use crate::scoring::AnswerSheet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The recorded answer for one checklist item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnswer {
    /// Selected option; empty means "not yet assessed".
    #[serde(default)]
    pub answer: String,
    /// Mitigation label -> checked.
    #[serde(default, alias = "boxes")]
    pub mitigation_checks: BTreeMap<String, bool>,
    #[serde(default)]
    pub notes: String,
}

impl RiskAnswer {
    /// Unanswered row with every recommended mitigation present and unchecked.
    pub fn blank(item: &ChecklistItem) -> Self {
        Self {
            answer: String::new(),
            mitigation_checks: item
                .recommended_mitigations
                .iter()
                .map(|m| (m.clone(), false))
                .collect(),
            notes: String::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.answer.is_empty()
    }

    pub fn any_mitigation_checked(&self) -> bool {
        self.mitigation_checks.values().any(|checked| *checked)
    }

    /// Checked labels, recommended order first, then any extra labels.
    pub fn checked_mitigations(&self, item: &ChecklistItem) -> Vec<String> {
        let mut checked: Vec<String> = item
            .recommended_mitigations
            .iter()
            .filter(|m| self.mitigation_checks.get(*m).copied().unwrap_or(false))
            .cloned()
            .collect();
        for (label, on) in &self.mitigation_checks {
            if *on && !item.recommends(label) {
                checked.push(label.clone());
            }
        }
        checked
    }
}

/// One entry per catalog item, all unanswered and unmitigated.
pub fn blank_answers(catalog: &Catalog) -> BTreeMap<String, RiskAnswer> {
    catalog
        .iter()
        .map(|item| (item.id.clone(), RiskAnswer::blank(item)))
        .collect()
}

/// A validated submission, before the store assigns identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDataset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub modalities: Vec<Modality>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default, alias = "risk")]
    pub risk_answers: BTreeMap<String, RiskAnswer>,
}

impl NewDataset {
    /// Ensure one row per catalog item, with every recommended mitigation
    /// present. Existing answers, checks, and notes are kept.
    pub fn seed_rows(&mut self, catalog: &Catalog) {
        for item in catalog {
            let row = self
                .risk_answers
                .entry(item.id.clone())
                .or_insert_with(|| RiskAnswer::blank(item));
            for label in &item.recommended_mitigations {
                row.mitigation_checks.entry(label.clone()).or_insert(false);
            }
        }
    }
}

/// A persisted dataset record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub modalities: Vec<Modality>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default, alias = "risk")]
    pub risk_answers: BTreeMap<String, RiskAnswer>,
    /// Store-assigned creation time.
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Attach store-assigned identity to a submission.
    pub fn from_new(new: NewDataset, id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            description: new.description,
            source: new.source,
            modalities: new.modalities,
            regions: new.regions,
            risk_answers: new.risk_answers,
            created_at: Some(created_at),
        }
    }

    /// Strip identity, e.g. to re-submit an imported record.
    pub fn into_new(self) -> NewDataset {
        NewDataset {
            name: self.name,
            description: self.description,
            source: self.source,
            modalities: self.modalities,
            regions: self.regions,
            risk_answers: self.risk_answers,
        }
    }
}

impl DeclaredScope for Dataset {
    fn modalities(&self) -> &[Modality] {
        &self.modalities
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl AnswerSheet for Dataset {
    fn answer(&self, item_id: &str) -> Option<&RiskAnswer> {
        self.risk_answers.get(item_id)
    }
}

impl DeclaredScope for NewDataset {
    fn modalities(&self) -> &[Modality] {
        &self.modalities
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl AnswerSheet for NewDataset {
    fn answer(&self, item_id: &str) -> Option<&RiskAnswer> {
        self.risk_answers.get(item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answers_cover_catalog() {
        let catalog = Catalog::builtin();
        let answers = blank_answers(catalog);
        assert_eq!(answers.len(), catalog.len());
        for item in catalog {
            let row = &answers[&item.id];
            assert!(!row.is_answered());
            assert_eq!(row.mitigation_checks.len(), item.recommended_mitigations.len());
            assert!(row.mitigation_checks.values().all(|v| !v));
        }
    }

    #[test]
    fn test_checked_mitigations_follow_recommended_order() {
        let item = Catalog::builtin().get("privacy_identifiers").unwrap();
        let mut row = RiskAnswer::blank(item);
        row.mitigation_checks
            .insert("Remove or mute audio tracks".into(), true);
        row.mitigation_checks
            .insert("Strip all DICOM / EXIF tags".into(), true);
        row.mitigation_checks.insert("Ad-hoc review".into(), true);

        assert_eq!(
            row.checked_mitigations(item),
            vec![
                "Strip all DICOM / EXIF tags".to_string(),
                "Remove or mute audio tracks".to_string(),
                "Ad-hoc review".to_string(),
            ]
        );
        assert!(row.any_mitigation_checked());
    }

    #[test]
    fn test_document_store_field_names() {
        let json = r#"{
            "id": "abc123",
            "name": "MIMIC-CXR",
            "source": "https://physionet.org/content/mimic-cxr/",
            "modalities": ["Radiology"],
            "risk": {
                "rad_faces": { "answer": "No", "boxes": { "Manual QC of samples": true } }
            }
        }"#;
        let ds: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(ds.modalities, vec![Modality::Radiology]);
        assert!(ds.regions.is_empty());
        let row = &ds.risk_answers["rad_faces"];
        assert_eq!(row.answer, "No");
        assert!(row.any_mitigation_checked());
        assert_eq!(row.notes, "");
    }

    #[test]
    fn test_missing_collections_default_empty() {
        let ds: Dataset = serde_json::from_str(r#"{ "name": "bare" }"#).unwrap();
        assert!(ds.modalities.is_empty());
        assert!(ds.regions.is_empty());
        assert!(ds.risk_answers.is_empty());
        assert!(ds.created_at.is_none());
    }

    #[test]
    fn test_seed_rows_keeps_existing_answers() {
        let catalog = Catalog::builtin();
        let mut new = NewDataset {
            name: "Legacy".into(),
            ..Default::default()
        };
        new.risk_answers.insert(
            "rad_faces".into(),
            RiskAnswer {
                answer: "Yes".into(),
                mitigation_checks: [("Manual QC of samples".to_string(), true)].into(),
                notes: "kept".into(),
            },
        );
        new.seed_rows(catalog);

        assert_eq!(new.risk_answers.len(), catalog.len());
        let faces = &new.risk_answers["rad_faces"];
        let item = catalog.get("rad_faces").unwrap();
        assert_eq!(faces.answer, "Yes");
        assert_eq!(faces.notes, "kept");
        assert_eq!(faces.mitigation_checks.len(), item.recommended_mitigations.len());
        assert_eq!(faces.mitigation_checks["Manual QC of samples"], true);
        assert!(!new.risk_answers["privacy_identifiers"].any_mitigation_checked());
    }

    #[test]
    fn test_identity_roundtrip() {
        let new = NewDataset {
            name: "OpenPath".into(),
            source: "https://example.org/openpath".into(),
            ..Default::default()
        };
        let now = Utc::now();
        let ds = Dataset::from_new(new.clone(), "id-1", now);
        assert_eq!(ds.id, "id-1");
        assert_eq!(ds.created_at, Some(now));
        assert_eq!(ds.into_new(), new);
    }
}
