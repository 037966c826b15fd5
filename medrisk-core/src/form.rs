//! Add-dataset form state.
//!
//! A [`DatasetDraft`] holds everything the user has entered so far. It is
//! itself a [`DeclaredScope`] and an [`AnswerSheet`], so the questions it
//! shows and the live score it previews come from the exact same filter
//! and reducer used by the report.

use crate::applicability::{DeclaredScope, applicable_items};
use crate::catalog::{Catalog, ChecklistItem, Modality, Region};
use crate::dataset::{NewDataset, RiskAnswer, blank_answers};
use crate::error::ValidationError;
use crate::scoring::{AnswerSheet, compute_score};
use std::collections::BTreeMap;
use url::Url;

/// In-progress dataset submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetDraft {
    pub name: String,
    pub description: String,
    pub source: String,
    modalities: Vec<Modality>,
    regions: Vec<Region>,
    risk_answers: BTreeMap<String, RiskAnswer>,
}

impl DatasetDraft {
    /// Blank draft with one unanswered row per catalog item.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            risk_answers: blank_answers(catalog),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Add the modality if absent, remove it if present.
    pub fn toggle_modality(&mut self, modality: Modality) {
        toggle(&mut self.modalities, modality);
    }

    /// Add the region if absent, remove it if present.
    pub fn toggle_region(&mut self, region: Region) {
        toggle(&mut self.regions, region);
    }

    /// Record an answer. An empty value clears it.
    pub fn set_answer(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        value: &str,
    ) -> Result<(), ValidationError> {
        let item = lookup(catalog, item_id)?;
        if !value.is_empty() && !item.answer.accepts(value) {
            return Err(ValidationError::InvalidAnswer {
                item_id: item_id.to_string(),
                answer: value.to_string(),
                options: item.answer.options().join(", "),
            });
        }
        self.row_mut(item).answer = value.to_string();
        Ok(())
    }

    /// Flip one mitigation checkbox. Returns the new state.
    pub fn toggle_mitigation(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        label: &str,
    ) -> Result<bool, ValidationError> {
        let item = lookup(catalog, item_id)?;
        if !item.recommends(label) {
            return Err(ValidationError::UnknownMitigation {
                item_id: item_id.to_string(),
                label: label.to_string(),
            });
        }
        let checked = self
            .row_mut(item)
            .mitigation_checks
            .entry(label.to_string())
            .or_insert(false);
        *checked = !*checked;
        Ok(*checked)
    }

    pub fn set_notes(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        notes: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let item = lookup(catalog, item_id)?;
        self.row_mut(item).notes = notes.into();
        Ok(())
    }

    /// Rows the form should display for the current scope.
    pub fn visible_items<'c>(&self, catalog: &'c Catalog) -> Vec<&'c ChecklistItem> {
        applicable_items(self, catalog)
    }

    /// Live score of the draft as currently filled in.
    pub fn preview_score(&self, catalog: &Catalog) -> f64 {
        compute_score(self, catalog)
    }

    /// Check required fields and that every visible row is answered.
    ///
    /// Notes and the description are optional. Rows hidden by the current
    /// scope may stay unanswered.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ValidationError> {
        check_required(&self.name, &self.source)?;
        if let Some(item) = self
            .visible_items(catalog)
            .into_iter()
            .find(|item| !self.answer(&item.id).is_some_and(RiskAnswer::is_answered))
        {
            return Err(ValidationError::UnansweredRow {
                item_id: item.id.clone(),
            });
        }
        Ok(())
    }

    /// Validate and produce the record handed to the store.
    pub fn into_new_dataset(self, catalog: &Catalog) -> Result<NewDataset, ValidationError> {
        self.validate(catalog)?;
        Ok(NewDataset {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            source: self.source.trim().to_string(),
            modalities: self.modalities,
            regions: self.regions,
            risk_answers: self.risk_answers,
        })
    }

    fn row_mut(&mut self, item: &ChecklistItem) -> &mut RiskAnswer {
        self.risk_answers
            .entry(item.id.clone())
            .or_insert_with(|| RiskAnswer::blank(item))
    }
}

/// A dataset needs a non-blank name and a web source link.
pub fn check_required(name: &str, source: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "name".into(),
        });
    }
    if source.trim().is_empty() {
        return Err(ValidationError::MissingField {
            field: "source".into(),
        });
    }
    check_source(source)?;
    Ok(())
}

/// Parse a source link. Only `http` and `https` URLs are accepted.
pub fn check_source(source: &str) -> Result<Url, ValidationError> {
    let source = source.trim();
    let invalid = |reason: String| ValidationError::InvalidSource {
        value: source.to_string(),
        reason,
    };
    let url = Url::parse(source).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if let Some(pos) = values.iter().position(|v| *v == value) {
        values.remove(pos);
    } else {
        values.push(value);
    }
}

fn lookup<'c>(catalog: &'c Catalog, item_id: &str) -> Result<&'c ChecklistItem, ValidationError> {
    catalog.get(item_id).ok_or_else(|| ValidationError::UnknownItem {
        id: item_id.to_string(),
    })
}

impl DeclaredScope for DatasetDraft {
    fn modalities(&self) -> &[Modality] {
        &self.modalities
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }
}

impl AnswerSheet for DatasetDraft {
    fn answer(&self, item_id: &str) -> Option<&RiskAnswer> {
        self.risk_answers.get(item_id)
    }
}
