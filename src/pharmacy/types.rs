//! Pharmacy domain type definitions
//!
//! Catalog records, interaction rules, and orders. The reference types
//! deserialize from the JSON reference data file.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monetary amount in whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(i64);

impl Price {
    /// Create a price from cents
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in cents
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// Price of `quantity` units
    pub fn times(&self, quantity: i64) -> Price {
        Price(self.0.saturating_mul(quantity))
    }
}

impl TryFrom<f64> for Price {
    type Error = String;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(format!("invalid price: {}", amount));
        }
        Ok(Price((amount * 100.0).round() as i64))
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// A canonical catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineRecord {
    /// Lookup key used by name resolution (lower-case, no whitespace)
    #[serde(default)]
    pub key: String,

    /// Display name
    pub name: String,

    /// Valid dosages, in display order
    pub dosages: Vec<String>,

    /// Price per unit
    pub price: Price,

    /// Therapeutic category
    pub category: String,
}

impl MedicineRecord {
    pub fn new(key: &str, name: &str, dosages: &[&str], price_cents: i64, category: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            dosages: dosages.iter().map(|d| d.to_string()).collect(),
            price: Price::from_cents(price_cents),
            category: category.to_string(),
        }
    }

    /// Whether `dosage` is one of the valid dosages (exact match)
    pub fn has_dosage(&self, dosage: &str) -> bool {
        self.dosages.iter().any(|d| d == dosage)
    }

    /// Dosages joined for display
    pub fn dosage_list(&self) -> String {
        self.dosages.join(", ")
    }
}

/// Interaction severity.
///
/// Ranked SEVERE < MODERATE < MINOR < SAFE for sorting; any other label is
/// kept verbatim and ranks after all known severities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Severe,
    Moderate,
    Minor,
    Safe,
    Unranked(String),
}

impl Severity {
    /// Sort rank, lower is more severe
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Severe => 0,
            Severity::Moderate => 1,
            Severity::Minor => 2,
            Severity::Safe => 3,
            Severity::Unranked(_) => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Severe => "SEVERE",
            Severity::Moderate => "MODERATE",
            Severity::Minor => "MINOR",
            Severity::Safe => "SAFE",
            Severity::Unranked(label) => label,
        }
    }
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        match label.as_str() {
            "SEVERE" => Severity::Severe,
            "MODERATE" => Severity::Moderate,
            "MINOR" => Severity::Minor,
            "SAFE" => Severity::Safe,
            _ => Severity::Unranked(label),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A known interaction between two drugs (unordered pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRule {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: Severity,
    pub description: String,
}

impl InteractionRule {
    pub fn new(drug_a: &str, drug_b: &str, severity: Severity, description: &str) -> Self {
        Self {
            drug_a: drug_a.to_string(),
            drug_b: drug_b.to_string(),
            severity,
            description: description.to_string(),
        }
    }
}

/// Search alias: queries containing `alias` also search the listed categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAlias {
    pub alias: String,
    pub categories: Vec<String>,
}

impl CategoryAlias {
    pub fn new(alias: &str, categories: &[&str]) -> Self {
        Self {
            alias: alias.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Every order waits here; nothing in this server advances it
    PendingPhysicianApproval,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::PendingPhysicianApproval => f.write_str("PENDING_PHYSICIAN_APPROVAL"),
        }
    }
}

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub medicine_name: String,
    pub dosage: String,
    pub quantity: i64,
    pub patient_id: String,
    pub unit_price: Price,
    pub total_price: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated order contents, before the ledger assigns an ID
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub medicine_name: String,
    pub dosage: String,
    pub quantity: i64,
    pub patient_id: String,
    pub unit_price: Price,
}
