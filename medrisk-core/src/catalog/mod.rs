//! Checklist catalog: the static, ordered list of risk questions.
//!
//! Every item declares the modality and jurisdiction it applies to, a
//! severity weight, its closed answer options, and the mitigations that
//! halve its effective severity when checked. A [`Catalog`] is immutable
//! once built and is passed by reference to the applicability filter and
//! the score reducer.

mod builtin;

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Weight used for any severity label the catalog does not recognise.
pub const FALLBACK_WEIGHT: f64 = 2.0;

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    items: builtin::items(),
});

/// Imaging modality a checklist item applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modality {
    /// Matches every dataset regardless of declared modalities.
    Universal,
    Radiology,
    Pathology,
    Ophthalmology,
    Endoscopy,
    Dermatology,
    Surgery,
}

impl Modality {
    /// Modalities a dataset can declare (everything except `Universal`).
    pub const DECLARABLE: [Modality; 6] = [
        Modality::Radiology,
        Modality::Pathology,
        Modality::Ophthalmology,
        Modality::Endoscopy,
        Modality::Dermatology,
        Modality::Surgery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Universal => "Universal",
            Modality::Radiology => "Radiology",
            Modality::Pathology => "Pathology",
            Modality::Ophthalmology => "Ophthalmology",
            Modality::Endoscopy => "Endoscopy",
            Modality::Dermatology => "Dermatology",
            Modality::Surgery => "Surgery",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "universal" => Ok(Modality::Universal),
            "radiology" => Ok(Modality::Radiology),
            "pathology" => Ok(Modality::Pathology),
            "ophthalmology" => Ok(Modality::Ophthalmology),
            "endoscopy" => Ok(Modality::Endoscopy),
            "dermatology" => Ok(Modality::Dermatology),
            "surgery" => Ok(Modality::Surgery),
            other => Err(format!("unknown modality: {other}")),
        }
    }
}

/// Jurisdiction a checklist item applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// Matches every dataset regardless of declared jurisdictions.
    Universal,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "EU")]
    Eu,
    India,
}

impl Region {
    /// Jurisdictions a dataset can declare.
    pub const DECLARABLE: [Region; 3] = [Region::Usa, Region::Eu, Region::India];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Universal => "Universal",
            Region::Usa => "USA",
            Region::Eu => "EU",
            Region::India => "India",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "universal" => Ok(Region::Universal),
            "usa" | "us" => Ok(Region::Usa),
            "eu" => Ok(Region::Eu),
            "india" => Ok(Region::India),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

/// Ordered severity scale of a checklist item.
///
/// Deserialises from the labels `Low`, `Low-Medium`, `Medium`,
/// `Medium-High` and `High`. Anything else is kept as
/// [`Severity::Unrecognized`] and weighted with [`FALLBACK_WEIGHT`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    LowMedium,
    Medium,
    MediumHigh,
    High,
    Unrecognized(String),
}

impl Severity {
    /// Numeric weight used by the score reducer.
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Low => 1.0,
            Severity::LowMedium => 1.5,
            Severity::Medium => 2.0,
            Severity::MediumHigh => 2.5,
            Severity::High => 3.0,
            Severity::Unrecognized(_) => FALLBACK_WEIGHT,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Severity::Low => "Low",
            Severity::LowMedium => "Low-Medium",
            Severity::Medium => "Medium",
            Severity::MediumHigh => "Medium-High",
            Severity::High => "High",
            Severity::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Severity::Unrecognized(_))
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Low" => Severity::Low,
            "Low-Medium" => Severity::LowMedium,
            "Medium" => Severity::Medium,
            "Medium-High" => Severity::MediumHigh,
            "High" => Severity::High,
            _ => Severity::Unrecognized(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.label().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

fn default_options() -> Vec<String> {
    vec!["Yes".into(), "No".into(), "Uncertain".into()]
}

/// How a checklist item is answered, with its closed option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerKind {
    /// A yes/no style question (options may include `N/A`, `Partial`, ...).
    YesNo {
        #[serde(default = "default_options")]
        options: Vec<String>,
    },
    /// A question with a list of named choices.
    MultipleChoice {
        #[serde(default = "default_options")]
        options: Vec<String>,
    },
}

impl AnswerKind {
    pub fn yes_no(options: &[&str]) -> Self {
        AnswerKind::YesNo {
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn multiple_choice(options: &[&str]) -> Self {
        AnswerKind::MultipleChoice {
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            AnswerKind::YesNo { options } | AnswerKind::MultipleChoice { options } => options,
        }
    }

    /// Whether `value` is one of the closed options.
    pub fn accepts(&self, value: &str) -> bool {
        self.options().iter().any(|o| o == value)
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, AnswerKind::MultipleChoice { .. })
    }
}

impl Default for AnswerKind {
    fn default() -> Self {
        AnswerKind::YesNo {
            options: default_options(),
        }
    }
}

/// One static risk question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Unique, stable key.
    pub id: String,
    pub modality: Modality,
    pub region: Region,
    /// Short heading shown next to the question.
    pub category: String,
    pub question: String,
    #[serde(default)]
    pub answer: AnswerKind,
    #[serde(default)]
    pub guidance: String,
    pub severity: Severity,
    #[serde(default)]
    pub recommended_mitigations: Vec<String>,
    /// Free-text citation.
    #[serde(default)]
    pub references: String,
}

impl ChecklistItem {
    pub fn weight(&self) -> f64 {
        self.severity.weight()
    }

    pub fn recommends(&self, mitigation: &str) -> bool {
        self.recommended_mitigations.iter().any(|m| m == mitigation)
    }
}

/// Serialized shape of a custom catalog file.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    items: Vec<ChecklistItem>,
}

/// Immutable, ordered set of checklist items with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: Vec<ChecklistItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<ChecklistItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
            if !item.severity.is_recognized() {
                tracing::warn!(
                    item = %item.id,
                    severity = %item.severity,
                    "Unrecognized severity, weighting as {FALLBACK_WEIGHT}"
                );
            }
        }
        Ok(Self { items })
    }

    /// The built-in medical imaging catalog.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Load a catalog from a TOML document with an `[[items]]` array.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = toml::from_str(source).map_err(|e| CatalogError::Parse {
            format: "TOML".into(),
            message: e.to_string(),
        })?;
        Self::new(doc.items)
    }

    /// Load a catalog from a JSON document `{ "items": [...] }`.
    pub fn from_json_str(source: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(source).map_err(|e| CatalogError::Parse {
                format: "JSON".into(),
                message: e.to_string(),
            })?;
        Self::new(doc.items)
    }

    /// Serialize the catalog as a JSON document accepted by [`Catalog::from_json_str`].
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&CatalogDocument {
            items: self.items.clone(),
        })
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChecklistItem> {
        self.items.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ChecklistItem;
    type IntoIter = std::slice::Iter<'a, ChecklistItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(id: &str) -> ChecklistItem {
        ChecklistItem {
            id: id.into(),
            modality: Modality::Universal,
            region: Region::Universal,
            category: "Test".into(),
            question: "Is this a test?".into(),
            answer: AnswerKind::default(),
            guidance: String::new(),
            severity: Severity::Medium,
            recommended_mitigations: vec!["Fix it".into()],
            references: String::new(),
        }
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Low.weight(), 1.0);
        assert_eq!(Severity::LowMedium.weight(), 1.5);
        assert_eq!(Severity::Medium.weight(), 2.0);
        assert_eq!(Severity::MediumHigh.weight(), 2.5);
        assert_eq!(Severity::High.weight(), 3.0);
    }

    #[test]
    fn test_unrecognized_severity_falls_back() {
        let severity = Severity::from("Catastrophic".to_string());
        assert_eq!(severity, Severity::Unrecognized("Catastrophic".into()));
        assert_eq!(severity.weight(), FALLBACK_WEIGHT);
        assert_eq!(severity.label(), "Catastrophic");
    }

    #[test]
    fn test_severity_serde_labels() {
        let json = serde_json::to_string(&Severity::MediumHigh).unwrap();
        assert_eq!(json, "\"Medium-High\"");
        let parsed: Severity = serde_json::from_str("\"Low-Medium\"").unwrap();
        assert_eq!(parsed, Severity::LowMedium);
        let odd: Severity = serde_json::from_str("\"severe\"").unwrap();
        assert_eq!(odd.weight(), 2.0);
    }

    #[test]
    fn test_region_serde_names() {
        assert_eq!(serde_json::to_string(&Region::Usa).unwrap(), "\"USA\"");
        assert_eq!(serde_json::to_string(&Region::Eu).unwrap(), "\"EU\"");
        let india: Region = serde_json::from_str("\"India\"").unwrap();
        assert_eq!(india, Region::India);
    }

    #[test]
    fn test_modality_and_region_from_str() {
        assert_eq!("radiology".parse::<Modality>().unwrap(), Modality::Radiology);
        assert_eq!(" Surgery ".parse::<Modality>().unwrap(), Modality::Surgery);
        assert!("xray".parse::<Modality>().is_err());
        assert_eq!("usa".parse::<Region>().unwrap(), Region::Usa);
        assert_eq!("EU".parse::<Region>().unwrap(), Region::Eu);
        assert!("mars".parse::<Region>().is_err());
    }

    #[test]
    fn test_answer_kind_accepts_only_its_options() {
        let kind = AnswerKind::yes_no(&["Yes", "No", "N/A"]);
        assert!(kind.accepts("N/A"));
        assert!(!kind.accepts("Uncertain"));
        assert!(!kind.is_multiple_choice());
    }

    #[test]
    fn test_answer_kind_default_options() {
        let kind: AnswerKind = serde_json::from_str(r#"{"type":"yes_no"}"#).unwrap();
        assert_eq!(kind.options(), ["Yes", "No", "Uncertain"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = Catalog::new(vec![sample_item("a"), sample_item("b"), sample_item("a")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn test_catalog_lookup_preserves_order() {
        let catalog = Catalog::new(vec![sample_item("first"), sample_item("second")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].id, "first");
        assert!(catalog.get("second").is_some());
        assert!(catalog.get("third").is_none());
    }

    #[test]
    fn test_catalog_from_toml() {
        let source = r#"
            [[items]]
            id = "custom_privacy"
            modality = "Radiology"
            region = "EU"
            category = "Custom"
            question = "Custom question?"
            severity = "High"
            recommended_mitigations = ["Do the thing"]

            [items.answer]
            type = "multiple_choice"
            options = ["A", "B"]
        "#;
        let catalog = Catalog::from_toml_str(source).unwrap();
        let item = catalog.get("custom_privacy").unwrap();
        assert_eq!(item.modality, Modality::Radiology);
        assert_eq!(item.region, Region::Eu);
        assert!(item.answer.is_multiple_choice());
        assert_eq!(item.weight(), 3.0);
    }

    #[test]
    fn test_catalog_json_roundtrip_of_builtin() {
        let json = Catalog::builtin().to_json_string().unwrap();
        let reloaded = Catalog::from_json_str(&json).unwrap();
        assert_eq!(&reloaded, Catalog::builtin());
    }

    #[test]
    fn test_catalog_parse_error() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { format, .. } if format == "JSON"));
    }
}
