//! Pharmacy service
//!
//! Business rules behind each tool. Returns typed results; the MCP layer
//! turns them into text.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ToolError;
use crate::pharmacy::interactions::{InteractionEngine, InteractionReport};
use crate::pharmacy::ledger::OrderLedger;
use crate::pharmacy::reference::ReferenceData;
use crate::pharmacy::resolver::resolve;
use crate::pharmacy::types::{MedicineRecord, NewOrder, Order};

/// Patient ID recorded when the caller supplies none
pub const UNKNOWN_PATIENT: &str = "UNKNOWN";

/// Outcome of an availability check
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<'a> {
    /// Name resolved and the requested dosage (if any) is stocked
    InStock {
        record: &'a MedicineRecord,
        dosage: Option<String>,
    },
    /// Name resolved but the requested dosage is not stocked
    WrongDosage {
        record: &'a MedicineRecord,
        dosage: String,
    },
    /// Name did not resolve
    NotAvailable { name: String },
}

/// Order request as received from a tool call
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub medicine_name: String,
    pub dosage: String,
    pub quantity: i64,
    pub patient_id: Option<String>,
}

/// Pharmacy operations over shared reference data and an order ledger
#[derive(Debug, Clone)]
pub struct PharmacyService {
    reference: Arc<ReferenceData>,
    ledger: Arc<OrderLedger>,
}

impl PharmacyService {
    pub fn new(reference: Arc<ReferenceData>, ledger: Arc<OrderLedger>) -> Self {
        Self { reference, ledger }
    }

    /// Service over the built-in reference data and an empty ledger
    pub fn with_builtin_data() -> Self {
        Self::new(Arc::new(ReferenceData::builtin()), Arc::new(OrderLedger::new()))
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    /// Search the catalog by name, key, or category, expanding category aliases
    pub fn search_medicines(&self, query: &str) -> Vec<&MedicineRecord> {
        let query = query.to_lowercase();

        let mut terms = vec![query.clone()];
        for alias in &self.reference.category_aliases {
            if query.contains(alias.alias.as_str()) {
                terms.extend(alias.categories.iter().map(|c| c.to_lowercase()));
            }
        }

        self.reference
            .medicines
            .iter()
            .filter(|record| {
                let category = record.category.to_lowercase();
                let name = record.name.to_lowercase();
                terms.iter().any(|term| {
                    record.key.contains(term.as_str())
                        || category.contains(term.as_str())
                        || name.contains(term.as_str())
                })
            })
            .collect()
    }

    /// Check whether a medicine (and optionally a dosage) is stocked
    pub fn check_availability(&self, medicine_name: &str, dosage: Option<&str>) -> Availability<'_> {
        let dosage = dosage.filter(|d| !d.is_empty());

        match resolve(&self.reference.medicines, medicine_name) {
            None => Availability::NotAvailable {
                name: medicine_name.to_string(),
            },
            Some(record) => match dosage {
                Some(d) if !record.has_dosage(d) => Availability::WrongDosage {
                    record,
                    dosage: d.to_string(),
                },
                _ => Availability::InStock {
                    record,
                    dosage: dosage.map(str::to_string),
                },
            },
        }
    }

    /// Validate and record a new order
    pub async fn place_order(&self, request: OrderRequest) -> Result<Order, ToolError> {
        let record = resolve(&self.reference.medicines, &request.medicine_name).ok_or_else(|| {
            ToolError::MedicineNotFound {
                name: request.medicine_name.clone(),
            }
        })?;

        if !record.has_dosage(&request.dosage) {
            return Err(ToolError::InvalidDosage {
                dosage: request.dosage,
                medicine: record.name.clone(),
            });
        }

        if request.quantity <= 0 {
            warn!(quantity = request.quantity, medicine = %record.name, "order placed with non-positive quantity");
        }

        let order = self
            .ledger
            .append(NewOrder {
                medicine_name: record.name.clone(),
                dosage: request.dosage,
                quantity: request.quantity,
                patient_id: request
                    .patient_id
                    .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
                unit_price: record.price,
            })
            .await;

        info!(order_id = %order.order_id, medicine = %order.medicine_name, "order placed");
        Ok(order)
    }

    /// Check every pair of `medicines` for known interactions
    pub fn check_drug_interactions(&self, medicines: &[String]) -> InteractionReport {
        InteractionEngine::new(&self.reference.interactions).check(medicines)
    }

    /// Look up an order by exact ID
    pub async fn get_order_status(&self, order_id: &str) -> Result<Order, ToolError> {
        self.ledger
            .find(order_id)
            .await
            .ok_or_else(|| ToolError::OrderNotFound {
                order_id: order_id.to_string(),
            })
    }
}
