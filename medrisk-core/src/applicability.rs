//! Applicability filter: which checklist rows matter for a dataset.
//!
//! The same predicate drives the submission form (which questions to ask)
//! and the report (which rows to score), so both always agree.

use crate::catalog::{Catalog, ChecklistItem, Modality, Region};

/// Anything that declares the modalities and jurisdictions it covers.
///
/// An absent collection is represented by an empty slice.
pub trait DeclaredScope {
    fn modalities(&self) -> &[Modality];
    fn regions(&self) -> &[Region];
}

/// A bare declared scope, useful for catalog queries without a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub modalities: Vec<Modality>,
    pub regions: Vec<Region>,
}

impl Scope {
    pub fn new(modalities: Vec<Modality>, regions: Vec<Region>) -> Self {
        Self {
            modalities,
            regions,
        }
    }
}

impl DeclaredScope for Scope {
    fn modalities(&self) -> &[Modality] {
        &self.modalities
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// Whether a single item applies to the declared scope.
pub fn is_applicable<S: DeclaredScope + ?Sized>(item: &ChecklistItem, scope: &S) -> bool {
    let modality_ok =
        item.modality == Modality::Universal || scope.modalities().contains(&item.modality);
    let region_ok = item.region == Region::Universal || scope.regions().contains(&item.region);
    modality_ok && region_ok
}

/// Catalog items applicable to the declared scope, in catalog order.
pub fn applicable_items<'c, S: DeclaredScope + ?Sized>(
    scope: &S,
    catalog: &'c Catalog,
) -> Vec<&'c ChecklistItem> {
    catalog
        .iter()
        .filter(|item| is_applicable(item, scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&ChecklistItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_scope_gets_only_universal_rows() {
        let catalog = Catalog::builtin();
        let rows = applicable_items(&Scope::default(), catalog);
        assert_eq!(rows.len(), 7);
        assert!(rows
            .iter()
            .all(|i| i.modality == Modality::Universal && i.region == Region::Universal));
    }

    #[test]
    fn test_region_rows_need_declared_region() {
        let catalog = Catalog::builtin();
        let eu = Scope::new(vec![], vec![Region::Eu]);
        let rows = ids(&applicable_items(&eu, catalog));
        assert!(rows.contains(&"legal_compliance_eu".to_string()));
        assert!(rows.contains(&"gdpr_data_transfer".to_string()));
        assert!(!rows.contains(&"legal_compliance_usa".to_string()));
        assert_eq!(rows.len(), 10);
    }

    #[test]
    fn test_modality_and_region_must_both_match() {
        let catalog = Catalog::builtin();
        let rad_only = Scope::new(vec![Modality::Radiology], vec![]);
        let rows = ids(&applicable_items(&rad_only, catalog));
        assert!(rows.contains(&"rad_faces".to_string()));
        assert!(!rows.contains(&"rad_pcpndt".to_string()));

        let rad_india = Scope::new(vec![Modality::Radiology], vec![Region::India]);
        let rows = ids(&applicable_items(&rad_india, catalog));
        assert!(rows.contains(&"rad_pcpndt".to_string()));
        assert!(rows.contains(&"dpdp_localisation".to_string()));
    }

    #[test]
    fn test_output_preserves_catalog_order() {
        let catalog = Catalog::builtin();
        let scope = Scope::new(
            vec![Modality::Surgery, Modality::Pathology],
            vec![Region::Usa],
        );
        let rows = applicable_items(&scope, catalog);
        let positions: Vec<usize> = rows
            .iter()
            .map(|r| catalog.iter().position(|c| c.id == r.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_full_scope_covers_catalog() {
        let catalog = Catalog::builtin();
        let everything = Scope::new(Modality::DECLARABLE.to_vec(), Region::DECLARABLE.to_vec());
        assert_eq!(applicable_items(&everything, catalog).len(), catalog.len());
    }
}
