//! Terminal rendering of the add-dataset form.

use dialoguer::{Input, MultiSelect, Select};
use medrisk_core::report::format_score;
use medrisk_core::{
    AnswerSheet, Catalog, DatasetDraft, DeclaredScope, Modality, Region, RenderOptions,
    check_source,
};

/// Describe the rows the form shows for the draft's current scope.
pub fn describe(draft: &DatasetDraft, catalog: &Catalog) -> String {
    let visible = draft.visible_items(catalog);
    let mut out = format!("Checklist: {} applicable row(s)\n", visible.len());

    for item in visible {
        let row = draft.answer(&item.id);
        let answer = row
            .filter(|r| r.is_answered())
            .map(|r| r.answer.as_str())
            .unwrap_or("—");
        out.push_str(&format!(
            "  [{}] {}: {}\n      options: {} | answer: {}\n",
            item.id,
            item.category,
            item.question,
            item.answer.options().join(" / "),
            answer
        ));
        if let Some(row) = row {
            let checked = row.checked_mitigations(item);
            if !checked.is_empty() {
                out.push_str(&format!("      mitigations: {}\n", checked.join(", ")));
            }
        }
    }

    out.push_str(&format!(
        "Preview score: {}\n",
        format_score(draft.preview_score(catalog), &RenderOptions::default())
    ));
    out
}

/// Prompt for anything missing, then walk every applicable row. Every row
/// needs an answer before the draft can be submitted.
pub fn fill_interactively(draft: &mut DatasetDraft, catalog: &Catalog) -> anyhow::Result<()> {
    if draft.name.trim().is_empty() {
        draft.name = Input::new().with_prompt("Dataset name").interact_text()?;
    }
    if draft.source.trim().is_empty() {
        draft.source = Input::new()
            .with_prompt("Source URL")
            .validate_with(|value: &String| -> Result<(), String> {
                check_source(value).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;
    }
    if draft.description.trim().is_empty() {
        draft.description = Input::new()
            .with_prompt("Description (optional)")
            .allow_empty(true)
            .interact_text()?;
    }

    choose_scope(draft)?;

    let visible: Vec<_> = draft.visible_items(catalog).into_iter().cloned().collect();
    println!("\n{} applicable checklist row(s)\n", visible.len());

    for item in &visible {
        println!("{}: {}", item.category, item.question);
        if !item.guidance.is_empty() {
            println!("  {}", item.guidance);
        }

        let choices = item.answer.options();
        let current = draft
            .answer(&item.id)
            .and_then(|r| choices.iter().position(|c| *c == r.answer))
            .unwrap_or(0);
        let picked = Select::new()
            .with_prompt("Answer")
            .items(choices)
            .default(current)
            .interact()?;
        draft.set_answer(catalog, &item.id, &choices[picked])?;

        if !item.recommended_mitigations.is_empty() {
            let checked: Vec<bool> = item
                .recommended_mitigations
                .iter()
                .map(|label| {
                    draft
                        .answer(&item.id)
                        .and_then(|r| r.mitigation_checks.get(label).copied())
                        .unwrap_or(false)
                })
                .collect();
            let selected = MultiSelect::new()
                .with_prompt("Mitigations in place (space to toggle)")
                .items(&item.recommended_mitigations)
                .defaults(&checked)
                .interact()?;
            for (idx, label) in item.recommended_mitigations.iter().enumerate() {
                if selected.contains(&idx) != checked[idx] {
                    draft.toggle_mitigation(catalog, &item.id, label)?;
                }
            }
        }

        let notes: String = Input::new()
            .with_prompt("Notes (optional)")
            .allow_empty(true)
            .interact_text()?;
        if !notes.trim().is_empty() {
            draft.set_notes(catalog, &item.id, notes)?;
        }
        println!();
    }

    println!(
        "Preview score: {}",
        format_score(draft.preview_score(catalog), &RenderOptions::default())
    );
    Ok(())
}

fn choose_scope(draft: &mut DatasetDraft) -> anyhow::Result<()> {
    let modality_checked: Vec<bool> = Modality::DECLARABLE
        .iter()
        .map(|m| draft.modalities().contains(m))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Modalities (space to toggle)")
        .items(&Modality::DECLARABLE)
        .defaults(&modality_checked)
        .interact()?;
    for (idx, modality) in Modality::DECLARABLE.iter().enumerate() {
        if picked.contains(&idx) != modality_checked[idx] {
            draft.toggle_modality(*modality);
        }
    }

    let region_checked: Vec<bool> = Region::DECLARABLE
        .iter()
        .map(|r| draft.regions().contains(r))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Jurisdictions (space to toggle)")
        .items(&Region::DECLARABLE)
        .defaults(&region_checked)
        .interact()?;
    for (idx, region) in Region::DECLARABLE.iter().enumerate() {
        if picked.contains(&idx) != region_checked[idx] {
            draft.toggle_region(*region);
        }
    }
    Ok(())
}
