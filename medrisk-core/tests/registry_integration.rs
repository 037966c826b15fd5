//! End-to-end: fill a draft, submit it, watch the feed, render the card.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use medrisk_core::report::list::summaries_to_text;
use medrisk_core::store::{import_into, parse_export};
use medrisk_core::{
    Catalog, ChecklistItem, DatasetDraft, DatasetReport, DatasetStore, JsonFileStore,
    MedRiskError, MemoryStore, Modality, Region, RenderOptions, ReportFormat, RiskBand,
    ValidationError, assess,
};

fn mimic_draft(catalog: &Catalog) -> DatasetDraft {
    let mut draft = DatasetDraft::new(catalog)
        .with_name("MIMIC-CXR")
        .with_description("Chest radiographs with free-text reports")
        .with_source("https://physionet.org/content/mimic-cxr/");
    draft.toggle_modality(Modality::Radiology);
    draft.toggle_region(Region::Usa);
    draft
}

/// Answer every visible row with its first option.
fn answer_visible(draft: &mut DatasetDraft, catalog: &Catalog) {
    let visible: Vec<ChecklistItem> = draft.visible_items(catalog).into_iter().cloned().collect();
    for item in visible {
        let first = item.answer.options()[0].clone();
        draft.set_answer(catalog, &item.id, &first).unwrap();
    }
}

fn mitigate_first(draft: &mut DatasetDraft, catalog: &Catalog, item_id: &str) {
    let label = catalog.get(item_id).unwrap().recommended_mitigations[0].clone();
    assert!(draft.toggle_mitigation(catalog, item_id, &label).unwrap());
}

#[test]
fn draft_and_report_use_the_same_rows() {
    let catalog = Catalog::builtin();
    let mut draft = mimic_draft(catalog);
    answer_visible(&mut draft, catalog);
    draft.set_answer(catalog, "privacy_identifiers", "No").unwrap();
    draft.set_answer(catalog, "rad_faces", "Yes").unwrap();
    draft
        .toggle_mitigation(catalog, "rad_faces", "Automated defacing or deep-learning mask")
        .unwrap();
    let visible: Vec<String> = draft
        .visible_items(catalog)
        .iter()
        .map(|i| i.id.clone())
        .collect();
    let preview = draft.preview_score(catalog);

    let store = MemoryStore::new();
    let dataset = store.create(draft.into_new_dataset(catalog).unwrap()).unwrap();
    let assessment = assess(&dataset, catalog);

    let reported: Vec<String> = assessment.rows.iter().map(|r| r.item_id.clone()).collect();
    assert_eq!(reported, visible);
    assert_eq!(assessment.score, preview);
    // Twelve rows weighing 29.0 in total, less 1.5 for the defaced faces row.
    assert_eq!(assessment.answered, 12);
    assert_eq!(assessment.mitigated, 1);
    assert_eq!(assessment.score, 27.5 / 12.0);
    assert_eq!(assessment.band, RiskBand::High);
}

#[test]
fn invalid_submission_is_rejected() {
    let catalog = Catalog::builtin();
    let mut draft = mimic_draft(catalog).with_source("physionet dot org");
    answer_visible(&mut draft, catalog);
    assert!(matches!(
        draft.clone().into_new_dataset(catalog),
        Err(ValidationError::InvalidSource { .. })
    ));

    let mut draft = draft.with_source("https://physionet.org/content/mimic-cxr/");
    draft.set_answer(catalog, "rad_dicom_meta", "").unwrap();
    assert_eq!(
        draft.into_new_dataset(catalog).unwrap_err(),
        ValidationError::UnansweredRow {
            item_id: "rad_dicom_meta".into()
        }
    );
}

#[tokio::test]
async fn json_store_feed_end_to_end() {
    let catalog = Catalog::builtin();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".medrisk").join("datasets.json");

    let store = Arc::new(JsonFileStore::open(&path).unwrap());
    let mut feed = store.subscribe();
    let poller = store.spawn_poller(Duration::from_millis(25));

    // A second writer (another process in practice) appends a record.
    let writer = JsonFileStore::open(&path).unwrap();
    let mut draft = DatasetDraft::new(catalog)
        .with_name("MIMIC-CXR")
        .with_source("https://physionet.org/content/mimic-cxr/");
    answer_visible(&mut draft, catalog);
    for item_id in [
        "privacy_identifiers",
        "reidentification_risk",
        "consent_governance",
        "data_quality",
    ] {
        mitigate_first(&mut draft, catalog, item_id);
    }
    let created = writer.create(draft.into_new_dataset(catalog).unwrap()).unwrap();

    let snapshot = tokio::time::timeout(Duration::from_secs(2), feed.next())
        .await
        .expect("poller should publish the external write")
        .expect("store still alive");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, created.id);

    let summaries = feed.scored(catalog);
    assert_eq!(summaries[0].band, RiskBand::Medium);
    let text = summaries_to_text(&summaries, &RenderOptions::default());
    // (1.5 + 1.5 + 1.5 + 2.5 + 1.0 + 2.0 + 1.0) / 7
    assert!(text.contains("Medium (1.57)"));

    let fetched = store.get(&created.id).unwrap().unwrap();
    let card = DatasetReport::build(&fetched, catalog)
        .render(ReportFormat::Markdown, &RenderOptions::default())
        .unwrap();
    assert!(card.starts_with("# MIMIC-CXR — Medium (1.57)"));

    poller.stop().await;
}

#[test]
fn import_exported_documents() {
    let export = r#"{
        "datasets": [
            {
                "id": "firestore-1",
                "name": "OpenPath",
                "description": "Whole-slide images",
                "source": "https://example.org/openpath",
                "modalities": ["Pathology"],
                "risk": {
                    "path_slide_label": { "answer": "Yes", "boxes": {}, "notes": "" }
                },
                "createdAt": "2024-05-01T12:00:00Z"
            },
            { "name": "Bare minimum", "source": "https://example.org/bare" }
        ]
    }"#;
    let catalog = Catalog::builtin();
    let store = MemoryStore::new();
    let created = import_into(&store, catalog, parse_export(export).unwrap()).unwrap();
    assert_eq!(created.len(), 2);

    let listed = store.list().unwrap();
    assert_eq!(assess(&listed[0], catalog).score, 3.0);
    assert_eq!(assess(&listed[1], catalog).score, 0.0);
    for dataset in &listed {
        assert_eq!(dataset.risk_answers.len(), catalog.len());
    }
}

#[test]
fn import_rejects_records_without_source() {
    let export = r#"[
        { "name": "Complete", "source": "https://example.org/a" },
        { "name": "No link" }
    ]"#;
    let store = MemoryStore::new();
    let err = import_into(&store, Catalog::builtin(), parse_export(export).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        MedRiskError::Validation(ValidationError::ImportRecord { index: 1, .. })
    ));
    assert!(store.list().unwrap().is_empty());
}
