//! Built-in medical imaging checklist.
//!
//! Order matters: universal core rows first, then region-specific legal
//! rows, then one block per modality.

use super::{AnswerKind, ChecklistItem, Modality, Region, Severity};

pub(super) fn items() -> Vec<ChecklistItem> {
    let mut items = universal_core();
    items.extend(regional_legal());
    items.extend(radiology());
    items.extend(pathology());
    items.extend(ophthalmology());
    items.extend(endoscopy());
    items.extend(dermatology());
    items.extend(surgery());
    items
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    modality: Modality,
    region: Region,
    category: &str,
    question: &str,
    answer: AnswerKind,
    guidance: &str,
    mitigations: &[&str],
    severity: Severity,
    references: &str,
) -> ChecklistItem {
    ChecklistItem {
        id: id.into(),
        modality,
        region,
        category: category.into(),
        question: question.into(),
        answer,
        guidance: guidance.into(),
        severity,
        recommended_mitigations: strings(mitigations),
        references: references.into(),
    }
}

const YES_NO: &[&str] = &["Yes", "No"];
const YES_NO_UNCERTAIN: &[&str] = &["Yes", "No", "Uncertain"];
const YES_NO_PARTIAL: &[&str] = &["Yes", "No", "Partial"];
const YES_NO_NA: &[&str] = &["Yes", "No", "N/A"];

fn universal_core() -> Vec<ChecklistItem> {
    use Modality::Universal as Any;
    use Region::Universal as Everywhere;

    vec![
        item(
            "privacy_identifiers",
            Any,
            Everywhere,
            "Privacy & Identifiability",
            "Does the dataset contain any direct identifiers (names, dates of birth, medical record numbers, faces, voices)?",
            AnswerKind::yes_no(YES_NO),
            "Direct identifiers are high-risk personal data and must be removed or obfuscated before sharing.",
            &[
                "Strip all DICOM / EXIF tags",
                "OCR check for burned-in text",
                "Deface faces or crop external anatomy",
                "Remove or mute audio tracks",
            ],
            Severity::High,
            "Global de-identification best practice",
        ),
        item(
            "reidentification_risk",
            Any,
            Everywhere,
            "Re-identification Risk",
            "Could individuals be re-identified via latent markers or linkage with external data?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Examples: facial outlines in MRI, unique retinal vessels, AI prediction of demographics from images.",
            &[
                "Deface / crop risk areas",
                "Quantitative assessment (k-anonymity, δ-presence, etc.)",
                "Data-use agreement prohibiting re-ID attempts",
            ],
            Severity::High,
            "Anonymisation risk frameworks",
        ),
        item(
            "consent_governance",
            Any,
            Everywhere,
            "Consent & Governance",
            "Is appropriate participant consent or ethics/IRB waiver documented?",
            AnswerKind::multiple_choice(&[
                "Informed consent",
                "IRB/Ethics waiver",
                "Public/open data",
                "No consent",
            ]),
            "Human-subject imaging data generally require either explicit consent or a documented waiver.",
            &[
                "Obtain consent",
                "Secure ethics board approval or waiver",
                "Record dataset provenance & data-use terms",
            ],
            Severity::High,
            "Ethical principles for medical data",
        ),
        item(
            "bias_demographic",
            Any,
            Everywhere,
            "Demographic Bias & Fairness",
            "Does the dataset adequately represent age, sex, ethnicity and geography for the intended use?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Skewed datasets can lead to disparate model performance; representation should reflect target population.",
            &[
                "Report demographic composition",
                "Augment under-represented groups",
                "Evaluate performance by subgroup",
            ],
            Severity::MediumHigh,
            "Fairness in medical-AI guidance",
        ),
        item(
            "data_quality",
            Any,
            Everywhere,
            "Data Quality & Integrity",
            "Any quality issues (artifacts, corrupt files, noisy labels)?",
            AnswerKind::yes_no(YES_NO),
            "Artifacts or label noise can materially degrade model accuracy and reliability.",
            &[
                "Automated quality-control filters",
                "Multi-reader or adjudicated labelling",
                "Random sample audit",
            ],
            Severity::Medium,
            "Best practice QC literature",
        ),
        item(
            "misuse_potential",
            Any,
            Everywhere,
            "Misuse & Ethical Concerns",
            "Could the dataset or resulting models enable harmful or unethical uses?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Examples: predicting sensitive demographics for discrimination, generating deep-fakes, or identity inference.",
            &[
                "Restrictive licence / data-use agreement",
                "Explicit ethics statement",
                "Monitor downstream usage",
            ],
            Severity::Medium,
            "WHO / UNESCO AI ethics reports",
        ),
        item(
            "data_documentation",
            Any,
            Everywhere,
            "Data Governance & Documentation",
            "Is a comprehensive data-sheet / documentation available?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Transparent documentation improves reproducibility and regulatory acceptance.",
            &[
                "Publish or update a data-card / datasheet",
                "Include source, demographics, preprocessing and limitations",
            ],
            Severity::Low,
            "Datasheets for Datasets (2018)",
        ),
    ]
}

fn regional_legal() -> Vec<ChecklistItem> {
    use Modality::Universal as Any;

    vec![
        item(
            "legal_compliance_usa",
            Any,
            Region::Usa,
            "Legal & Regulatory – USA",
            "Dataset complies with HIPAA de-identification, Common Rule (45 CFR §46) and FDA GMLP expectations?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Include Safe-Harbor or Expert-Determination de-identification, IRB authorisation where required, and traceability for device submissions.",
            &[
                "Legal review",
                "Remove residual PHI",
                "Prepare FDA traceability documents",
            ],
            Severity::High,
            "HIPAA; FDA GMLP 2021",
        ),
        item(
            "legal_compliance_eu",
            Any,
            Region::Eu,
            "Legal & Regulatory – EU",
            "Dataset meets GDPR & Medical Device Regulation (MDR) requirements (special-category data handling, RoPA, DPIA)?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Health data are “special-category” under Art 9 GDPR; lawful basis, Data Processing Agreement and risk assessment (DPIA) required.",
            &[
                "Conduct DPIA",
                "Execute DPA with controller",
                "Pseudonymise & record in RoPA",
            ],
            Severity::High,
            "GDPR Art 9; EU MDR 2017/745",
        ),
        item(
            "legal_compliance_india",
            Any,
            Region::India,
            "Legal & Regulatory – India",
            "Dataset aligns with the Digital Personal Data Protection (DPDP) Act 2023 and (if prenatal) PNDT 1994?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Health data are “sensitive personal data”; PNDT bans disclosure of fetal sex.",
            &[
                "Remove personal identifiers",
                "Implement localisation / cross-border safeguards where required",
                "Strip fetal-sex fields",
            ],
            Severity::High,
            "DPDP 2023; PNDT 1994",
        ),
        item(
            "gdpr_data_transfer",
            Any,
            Region::Eu,
            "Legal – EU International Transfer",
            "If personal data leave the EEA, are Standard Contractual Clauses (SCC) or adequacy decisions in place?",
            AnswerKind::yes_no(YES_NO_NA),
            "GDPR Art 46 requires appropriate safeguards for transfers to third countries.",
            &[
                "Adopt SCCs",
                "Use an adequacy-listed country",
                "Rely on EU–US Data-Privacy Framework where applicable",
            ],
            Severity::Medium,
            "GDPR Art 44-46",
        ),
        item(
            "dpdp_localisation",
            Any,
            Region::India,
            "Legal – India Local Storage",
            "Does Indian regulation require local storage or mirroring of health data?",
            AnswerKind::yes_no(YES_NO_NA),
            "Sectoral rules may mandate localisation even when the DPDP Act allows export.",
            &["Store primary copy in India", "Use in-country cloud region"],
            Severity::Medium,
            "MeitY localisation drafts 2022",
        ),
        item(
            "mdr_clinical_eval",
            Any,
            Region::Eu,
            "Regulation – EU MDR Clinical Evaluation",
            "If the dataset supports an AI software-as-medical-device, is MDR Annex XIV clinical-evaluation evidence planned?",
            AnswerKind::yes_no(YES_NO_NA),
            "Clinical evidence and post-market follow-up are mandatory under MDR.",
            &[
                "Plan clinical evaluation",
                "Define PMCF study using the dataset",
            ],
            Severity::Medium,
            "EU MDR Annex XIV",
        ),
    ]
}

fn radiology() -> Vec<ChecklistItem> {
    use Modality::Radiology as Rad;
    use Region::Universal as Everywhere;

    vec![
        item(
            "rad_faces",
            Rad,
            Everywhere,
            "Radiology – Identifiable Anatomy",
            "Do images include patient faces or tattoos not removed?",
            AnswerKind::yes_no(YES_NO_NA),
            "Head CT/MRI often capture faces; visible tattoos can uniquely identify patients.",
            &[
                "Automated defacing or deep-learning mask",
                "Manual QC of samples",
            ],
            Severity::High,
            "Imaging de-identification studies",
        ),
        item(
            "rad_dicom_meta",
            Rad,
            Everywhere,
            "Radiology – Embedded Metadata",
            "Have DICOM headers been fully anonymised (no patient tags remain)?",
            AnswerKind::yes_no(YES_NO_NA),
            "Patient name, accession number or institution fields in DICOM violate privacy if present.",
            &["Certified DICOM anonymiser", "Random file audit"],
            Severity::High,
            "DICOM PS3.15",
        ),
        item(
            "rad_pcpndt",
            Rad,
            Region::India,
            "Radiology – PNDT Compliance",
            "Does any prenatal ultrasound content comply with PNDT (no fetal-sex info)?",
            AnswerKind::yes_no(YES_NO_NA),
            "Indian PNDT Act forbids disclosure of fetal sex.",
            &[
                "Remove sex labels",
                "Exclude genital views",
                "Controlled access to ultrasound clips",
            ],
            Severity::High,
            "PCPNDT Act 1994",
        ),
        item(
            "rad_device_bias",
            Rad,
            Everywhere,
            "Radiology – Device / Protocol Bias",
            "Are multiple scanner vendors or protocols represented to avoid device bias?",
            AnswerKind::yes_no(YES_NO),
            "Single-vendor data may not generalise; domain-shift risk for deployed models.",
            &["Include multi-site data", "Domain adaptation / normalisation"],
            Severity::Medium,
            "Cross-vendor generalisation studies",
        ),
        item(
            "rad_incidental",
            Rad,
            Everywhere,
            "Radiology – Incidental Findings",
            "Are incidental findings handled or annotated consistently?",
            AnswerKind::yes_no(YES_NO_NA),
            "NLP labelling may miss incidental lesions → noisy ground-truth.",
            &[
                "Expert review of critical regions",
                "Document label source & uncertainty",
            ],
            Severity::LowMedium,
            "Radiology reporting guidelines",
        ),
    ]
}

fn pathology() -> Vec<ChecklistItem> {
    use Modality::Pathology as Patho;
    use Region::Universal as Everywhere;

    vec![
        item(
            "path_slide_label",
            Patho,
            Everywhere,
            "Pathology – Slide Label PHI",
            "Are slide labels with patient identifiers visible?",
            AnswerKind::yes_no(YES_NO),
            "Label regions can contain patient names or IDs.",
            &["Crop / mask label strip", "OCR to detect stray text"],
            Severity::High,
            "Digital pathology de-ID guidance",
        ),
        item(
            "path_metadata",
            Patho,
            Everywhere,
            "Pathology – Patient Metadata",
            "Are linked clinical metadata anonymised (e.g. age binned)?",
            AnswerKind::yes_no(YES_NO_NA),
            "Fine-grained age or hospital IDs can re-identify; bin or remove.",
            &[
                "Bin ages (e.g. five-year groups)",
                "Strip medical-record numbers",
                "Obtain consent for sensitive fields",
            ],
            Severity::Medium,
            "Metadata anonymisation best practice",
        ),
        item(
            "path_stain_variability",
            Patho,
            Everywhere,
            "Pathology – Stain & Scanner Variability",
            "Does the dataset account for stain or scanner variability?",
            AnswerKind::yes_no(YES_NO),
            "Colour shift biases models; stain normalisation or augmentation needed.",
            &[
                "Include multi-lab slides",
                "Apply stain normalisation (e.g. Macenko)",
            ],
            Severity::Medium,
            "Histopathology domain-shift studies",
        ),
        item(
            "path_dataset_bias",
            Patho,
            Everywhere,
            "Pathology – Dataset Bias",
            "Is over-representation of certain diseases or demographics documented?",
            AnswerKind::yes_no(YES_NO),
            "Tertiary-care datasets may over-represent advanced or rare disease.",
            &["Document composition", "Augment or limit model claims"],
            Severity::Medium,
            "WHO AI equity reports",
        ),
        item(
            "path_annotation_accuracy",
            Patho,
            Everywhere,
            "Pathology – Annotation Accuracy",
            "Are annotations verified by multiple pathologists or gold-standard?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Single-annotator labels may include errors; inter-observer variability significant in pathology.",
            &[
                "Consensus or adjudication",
                "Report label confidence / provenance",
            ],
            Severity::Medium,
            "Gleason variability studies",
        ),
    ]
}

fn ophthalmology() -> Vec<ChecklistItem> {
    use Modality::Ophthalmology as Oph;
    use Region::Universal as Everywhere;

    vec![
        item(
            "oph_latent_info",
            Oph,
            Everywhere,
            "Ophthalmology – Hidden Health Info",
            "Retinal/OCT images could reveal unintended traits (age, sex, cardiovascular risk, etc.)?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Fundus AI can predict age, sex, and systemic risk factors.",
            &[
                "Warn users & include ethical statement",
                "Restrict downstream misuse",
                "Obtain consent for secondary analyses",
            ],
            Severity::Medium,
            "Nature 2018 retina-risk study",
        ),
        item(
            "oph_face_in_frame",
            Oph,
            Everywhere,
            "Ophthalmology – Identifiable Frame",
            "Do any images include facial regions or identifying features?",
            AnswerKind::yes_no(YES_NO_NA),
            "External eye photographs may reveal the face; fundus images usually do not.",
            &["Crop external views", "Verify no printed names"],
            Severity::Low,
            "Ophthalmic imaging privacy guidance",
        ),
        item(
            "oph_clinical_context",
            Oph,
            Everywhere,
            "Ophthalmology – Clinical Context",
            "Is acquisition context (eye side, disease stage) documented?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Missing laterality or stage may lead to label noise and evaluation errors.",
            &["Include metadata fields", "Patient-level split"],
            Severity::Low,
            "EyePACS documentation",
        ),
    ]
}

fn endoscopy() -> Vec<ChecklistItem> {
    use Modality::Endoscopy as Endo;
    use Region::Universal as Everywhere;

    vec![
        item(
            "endo_audio",
            Endo,
            Everywhere,
            "Endoscopy – Audio Identifiers",
            "Do videos contain audio with patient or staff identifiers?",
            AnswerKind::yes_no(YES_NO_NA),
            "Names or voices can re-identify individuals; treat audio as sensitive.",
            &[
                "Remove or mute audio",
                "Redact spoken names",
                "Voice distortion if speech essential",
            ],
            Severity::High,
            "Audio PHI guidance",
        ),
        item(
            "endo_external_view",
            Endo,
            Everywhere,
            "Endoscopy – External Footage",
            "Do any frames show patient face or external anatomy?",
            AnswerKind::yes_no(YES_NO),
            "Intro frames or scope insertion can expose faces or identifying marks.",
            &["Trim intro frames", "Blur external anatomy"],
            Severity::High,
            "Endoscopy privacy best practice",
        ),
        item(
            "endo_consent",
            Endo,
            Everywhere,
            "Endoscopy – Consent",
            "Is patient consent or IRB approval documented for video capture and research use?",
            AnswerKind::yes_no(&["Yes", "No", "Unknown"]),
            "Procedural video recording typically requires explicit informed consent or documented waiver.",
            &["Obtain consent", "Secure IRB paperwork"],
            Severity::High,
            "Endoscopic research ethics literature",
        ),
        item(
            "endo_sensitive_scenes",
            Endo,
            Everywhere,
            "Endoscopy – Sensitive Scenes",
            "Could videos be misused or cause harm if publicly shared?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Graphic internal images or rare pathologies may need controlled access.",
            &["Restrict access", "Include content warnings"],
            Severity::Medium,
            "WHO AI ethics 2021",
        ),
        item(
            "endo_security",
            Endo,
            Everywhere,
            "Endoscopy – Data Volume & Security",
            "Are secure storage and transfer methods used for large video files?",
            AnswerKind::yes_no(YES_NO),
            "Unencrypted drives or public links expose sensitive data.",
            &["Encrypt at rest and in transit", "Audit access logs"],
            Severity::Medium,
            "ISO 27001 best practice",
        ),
    ]
}

fn dermatology() -> Vec<ChecklistItem> {
    use Modality::Dermatology as Derm;
    use Region::Universal as Everywhere;

    vec![
        item(
            "derm_face_visible",
            Derm,
            Everywhere,
            "Dermatology – Identifiable Face / Tattoos",
            "Do photos show full face, tattoos, or unique body art?",
            AnswerKind::yes_no(YES_NO),
            "Faces and tattoos are direct identifiers in clinical imagery.",
            &[
                "Crop / blur faces & tattoos",
                "Automatic face-masking",
                "Manual QC sample",
            ],
            Severity::High,
            "Dermatology photo de-ID studies",
        ),
        item(
            "derm_exif_geo",
            Derm,
            Everywhere,
            "Dermatology – EXIF / Location Metadata",
            "Are GPS coordinates or device IDs preserved in EXIF headers?",
            AnswerKind::yes_no(YES_NO_NA),
            "Smartphone cameras embed latitude/longitude and serial numbers by default.",
            &["Strip all EXIF metadata", "Validate with exiftool"],
            Severity::High,
            "NIH Photo De-ID Guidance 2021",
        ),
        item(
            "derm_skin_tone_bias",
            Derm,
            Everywhere,
            "Dermatology – Skin-Tone Diversity",
            "Does the dataset span Fitzpatrick I-VI skin types?",
            AnswerKind::yes_no(YES_NO_PARTIAL),
            "Most public dermatology datasets over-represent lighter skin; leads to false negatives on darker tones.",
            &[
                "Augment or collect darker skin samples",
                "Report stratified performance",
            ],
            Severity::MediumHigh,
            "Nature Med 2022 skin-tone gap",
        ),
        item(
            "derm_colour_calibration",
            Derm,
            Everywhere,
            "Dermatology – Colour Calibration & Lighting",
            "Is colour calibration or lighting variability documented?",
            AnswerKind::yes_no(YES_NO),
            "Inconsistent lighting alters lesion appearance; colour calibration improves robustness.",
            &[
                "Capture with colour-checker card",
                "Apply colour or illumination normalisation",
            ],
            Severity::Medium,
            "IEEE JBHI 2020 derm standards",
        ),
    ]
}

fn surgery() -> Vec<ChecklistItem> {
    use Modality::Surgery as Surg;
    use Region::Universal as Everywhere;

    vec![
        item(
            "surg_or_faces_audio",
            Surg,
            Everywhere,
            "Surgery Video – Staff Faces & Audio",
            "Do videos include surgical team faces, name badges, or audible names?",
            AnswerKind::yes_no(YES_NO),
            "Operating-room footage often reveals staff identities and spoken names.",
            &["Blur faces/badges", "Mute or redact audio"],
            Severity::High,
            "OR privacy studies",
        ),
        item(
            "surg_patient_body",
            Surg,
            Everywhere,
            "Surgery Video – External Patient Anatomy",
            "Are external patient views present before draping (face, tattoos, etc.)?",
            AnswerKind::yes_no(YES_NO_NA),
            "Prep and drape shots may reveal patient identity.",
            &["Trim to intra-cavity segments", "Blur exposed skin"],
            Severity::High,
            "Surgical video privacy reviews",
        ),
        item(
            "surg_industry_ip",
            Surg,
            Everywhere,
            "Surgery Video – Proprietary UI / IP",
            "Do videos display proprietary robotic or device UIs that are copyrighted?",
            AnswerKind::yes_no(YES_NO),
            "Manufacturers may restrict redistribution of logos or overlays.",
            &["Crop UI overlay", "Obtain vendor licence"],
            Severity::Medium,
            "Vendor IP notices",
        ),
        item(
            "surg_graphic_content",
            Surg,
            Everywhere,
            "Surgery Video – Graphic Content",
            "Could graphic scenes cause harm or require content warnings if shared publicly?",
            AnswerKind::yes_no(YES_NO_UNCERTAIN),
            "Graphic content may violate platform policies or distress viewers.",
            &["Add content warnings", "Restrict to credentialled users"],
            Severity::Medium,
            "Platform medical-content rules",
        ),
        item(
            "surg_file_security",
            Surg,
            Everywhere,
            "Surgery Video – File Size & Security",
            "Are raw (>100 GB) videos stored or transferred with encryption and access logs?",
            AnswerKind::yes_no(YES_NO),
            "Large unencrypted files on portable drives pose breach risks.",
            &[
                "Encrypt at rest (AES-256)",
                "Use managed object storage with audit trail",
            ],
            Severity::Medium,
            "ISO 27001 best practice",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_unique() {
        let all = items();
        let ids: HashSet<&str> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn test_builtin_block_sizes() {
        let all = items();
        assert_eq!(all.len(), 40);
        let count = |m: Modality| all.iter().filter(|i| i.modality == m).count();
        assert_eq!(count(Modality::Universal), 13);
        assert_eq!(count(Modality::Radiology), 5);
        assert_eq!(count(Modality::Pathology), 5);
        assert_eq!(count(Modality::Ophthalmology), 3);
        assert_eq!(count(Modality::Endoscopy), 5);
        assert_eq!(count(Modality::Dermatology), 4);
        assert_eq!(count(Modality::Surgery), 5);
    }

    #[test]
    fn test_builtin_universal_rows_lead() {
        let all = items();
        assert_eq!(all[0].id, "privacy_identifiers");
        assert!(all[..7]
            .iter()
            .all(|i| i.modality == Modality::Universal && i.region == Region::Universal));
    }

    #[test]
    fn test_only_consent_is_multiple_choice() {
        let all = items();
        let multi: Vec<&str> = all
            .iter()
            .filter(|i| i.answer.is_multiple_choice())
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(multi, vec!["consent_governance"]);
    }

    #[test]
    fn test_all_builtin_severities_recognized() {
        assert!(items().iter().all(|i| i.severity.is_recognized()));
    }
}
