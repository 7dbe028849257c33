//! Reference data: medicine catalog, interaction rules, and search aliases
//!
//! All three tables are ordered sequences. Catalog order is significant:
//! name resolution returns the first matching entry, so reordering the
//! catalog changes which record an ambiguous name resolves to.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, PharmacyMcpError, Result};
use crate::pharmacy::resolver::normalize;
use crate::pharmacy::types::{CategoryAlias, InteractionRule, MedicineRecord, Severity};

/// Read-only reference tables shared by every tool handler
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub medicines: Vec<MedicineRecord>,
    pub interactions: Vec<InteractionRule>,
    pub category_aliases: Vec<CategoryAlias>,
}

/// On-disk layout; any missing table falls back to the built-in one
#[derive(Debug, Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    medicines: Option<Vec<MedicineRecord>>,
    #[serde(default)]
    interactions: Option<Vec<InteractionRule>>,
    #[serde(default)]
    category_aliases: Option<Vec<CategoryAlias>>,
}

impl ReferenceData {
    /// Built-in catalog and interaction table
    pub fn builtin() -> Self {
        Self {
            medicines: builtin_medicines(),
            interactions: builtin_interactions(),
            category_aliases: builtin_aliases(),
        }
    }

    /// Load reference data from a JSON file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PharmacyMcpError::Config(ConfigError::DataFileNotFound {
                path: path.display().to_string(),
            }));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse reference data from a JSON document
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: ReferenceFile = serde_json::from_str(raw)?;

        let mut medicines = file.medicines.unwrap_or_else(builtin_medicines);
        for record in &mut medicines {
            if record.key.is_empty() {
                record.key = normalize(&record.name);
            }
        }

        Ok(Self {
            medicines,
            interactions: file.interactions.unwrap_or_else(builtin_interactions),
            category_aliases: file.category_aliases.unwrap_or_else(builtin_aliases),
        })
    }

    /// Built-in data, or the file at `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_path(p),
            None => Ok(Self::builtin()),
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_medicines() -> Vec<MedicineRecord> {
    vec![
        MedicineRecord::new("lisinopril", "Lisinopril", &["5mg", "10mg", "20mg"], 1599, "ACE Inhibitor"),
        MedicineRecord::new("metformin", "Metformin", &["500mg", "850mg", "1000mg"], 1250, "Antidiabetic"),
        MedicineRecord::new("atorvastatin", "Atorvastatin", &["10mg", "20mg", "40mg"], 1875, "Statin"),
        MedicineRecord::new("omeprazole", "Omeprazole", &["20mg", "40mg"], 999, "PPI"),
        MedicineRecord::new("amlodipine", "Amlodipine", &["5mg", "10mg"], 1425, "Calcium Channel Blocker"),
        MedicineRecord::new("ibuprofen", "Ibuprofen", &["200mg", "400mg", "600mg"], 850, "NSAID"),
        MedicineRecord::new("acetaminophen", "Acetaminophen", &["325mg", "500mg", "650mg"], 799, "Analgesic"),
        MedicineRecord::new("aspirin", "Aspirin", &["81mg", "325mg"], 699, "NSAID/Antiplatelet"),
        MedicineRecord::new("losartan", "Losartan", &["25mg", "50mg", "100mg"], 1650, "ARB"),
        MedicineRecord::new("gabapentin", "Gabapentin", &["100mg", "300mg", "600mg"], 2200, "Anticonvulsant"),
    ]
}

fn builtin_interactions() -> Vec<InteractionRule> {
    vec![
        InteractionRule::new(
            "lisinopril",
            "ibuprofen",
            Severity::Moderate,
            "NSAIDs may reduce the antihypertensive effect of ACE inhibitors and increase risk of kidney problems",
        ),
        InteractionRule::new(
            "lisinopril",
            "aspirin",
            Severity::Minor,
            "Low-dose aspirin is generally safe with ACE inhibitors",
        ),
        InteractionRule::new(
            "metformin",
            "ibuprofen",
            Severity::Minor,
            "NSAIDs may slightly increase risk of lactic acidosis with metformin",
        ),
        InteractionRule::new(
            "atorvastatin",
            "amlodipine",
            Severity::Safe,
            "No significant interaction - commonly prescribed together",
        ),
        InteractionRule::new(
            "lisinopril",
            "metformin",
            Severity::Safe,
            "Commonly prescribed together for diabetic patients with hypertension",
        ),
        InteractionRule::new(
            "lisinopril",
            "losartan",
            Severity::Severe,
            "Do NOT combine ACE inhibitors with ARBs - increased risk of hyperkalemia and kidney damage",
        ),
        InteractionRule::new(
            "ibuprofen",
            "aspirin",
            Severity::Moderate,
            "NSAIDs may reduce cardioprotective effect of low-dose aspirin",
        ),
        InteractionRule::new(
            "gabapentin",
            "opioids",
            Severity::Severe,
            "Increased risk of respiratory depression - use with extreme caution",
        ),
    ]
}

fn builtin_aliases() -> Vec<CategoryAlias> {
    vec![
        CategoryAlias::new("blood pressure", &["ace inhibitor", "arb", "calcium channel blocker"]),
        CategoryAlias::new("diabetes", &["antidiabetic"]),
        CategoryAlias::new("cholesterol", &["statin"]),
        CategoryAlias::new("pain", &["nsaid", "analgesic"]),
    ]
}
