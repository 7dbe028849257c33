//! MCP Tool definitions and handlers
//!
//! Defines all available tools and their implementations.

use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use validator::Validate;

use crate::error::ToolError;
use crate::mcp::types::{CallToolResult, Tool};
use crate::pharmacy::service::{Availability, OrderRequest, PharmacyService};
use crate::pharmacy::types::{MedicineRecord, Order};

/// Quantity used when `place_order` omits one
pub const DEFAULT_ORDER_QUANTITY: i64 = 30;

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    SearchMedicines,
    CheckAvailability,
    PlaceOrder,
    CheckDrugInteractions,
    GetOrderStatus,
}

impl ToolKind {
    /// All tools, in listing order
    pub const ALL: [ToolKind; 5] = [
        ToolKind::SearchMedicines,
        ToolKind::CheckAvailability,
        ToolKind::PlaceOrder,
        ToolKind::CheckDrugInteractions,
        ToolKind::GetOrderStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::SearchMedicines => "search_medicines",
            ToolKind::CheckAvailability => "check_availability",
            ToolKind::PlaceOrder => "place_order",
            ToolKind::CheckDrugInteractions => "check_drug_interactions",
            ToolKind::GetOrderStatus => "get_order_status",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ToolKind::SearchMedicines => "Search for available medicines by name or category. Returns matching medicines with dosages and pricing.",
            ToolKind::CheckAvailability => "Check if a specific medicine is available in stock and get detailed pricing information.",
            ToolKind::PlaceOrder => "Place an order for a medicine. Orders require physician approval before dispensing.",
            ToolKind::CheckDrugInteractions => "Check for potential drug interactions between multiple medicines. Important for patient safety.",
            ToolKind::GetOrderStatus => "Check the status of a medicine order by order ID.",
        }
    }

    fn input_schema(&self) -> Value {
        match self {
            ToolKind::SearchMedicines => search_medicines_schema(),
            ToolKind::CheckAvailability => check_availability_schema(),
            ToolKind::PlaceOrder => place_order_schema(),
            ToolKind::CheckDrugInteractions => check_drug_interactions_schema(),
            ToolKind::GetOrderStatus => get_order_status_schema(),
        }
    }

    /// Descriptor returned by `tools/list`
    pub fn descriptor(&self) -> Tool {
        Tool {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl FromStr for ToolKind {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_string(),
            })
    }
}

/// Tool handler
pub struct ToolHandler {
    service: Arc<PharmacyService>,
}

impl ToolHandler {
    /// Create a new tool handler
    pub fn new(service: Arc<PharmacyService>) -> Self {
        Self { service }
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        ToolKind::ALL.iter().map(ToolKind::descriptor).collect()
    }

    /// Call a tool by name
    pub async fn call_tool(&self, name: &str, args: Value) -> CallToolResult {
        let kind = match name.parse::<ToolKind>() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(tool = name, "unknown tool requested");
                return CallToolResult::error(e.to_string());
            }
        };

        debug!(tool = kind.name(), "calling tool");
        let outcome = match kind {
            ToolKind::SearchMedicines => Ok(self.handle_search_medicines(&args)),
            ToolKind::CheckAvailability => Ok(self.handle_check_availability(&args)),
            ToolKind::PlaceOrder => self.handle_place_order(args).await,
            ToolKind::CheckDrugInteractions => self.handle_check_drug_interactions(args),
            ToolKind::GetOrderStatus => self.handle_get_order_status(args).await,
        };

        match outcome {
            Ok(text) => CallToolResult::text(text),
            Err(e) => CallToolResult::error(e.to_string()),
        }
    }

    // ==================== Tool Handlers ====================

    /// Never fails: a missing or non-string query searches for ""
    fn handle_search_medicines(&self, args: &Value) -> String {
        let query = string_arg(args, "query").unwrap_or_default();
        let matches = self.service.search_medicines(&query);

        if matches.is_empty() {
            return format!("No medicines found matching '{}'.", query);
        }

        let mut text = format!("Found {} medicine(s) matching '{}':\n\n", matches.len(), query);
        for (i, record) in matches.iter().enumerate() {
            text.push_str(&format!(
                "{}. **{}** ({})\n   Dosages: {}\n   Price: {} per unit\n\n",
                i + 1,
                record.name,
                record.category,
                record.dosage_list(),
                record.price
            ));
        }

        text
    }

    /// Never fails: an unknown medicine is reported as not available
    fn handle_check_availability(&self, args: &Value) -> String {
        let medicine_name = string_arg(args, "medicine_name").unwrap_or_default();
        let dosage = string_arg(args, "dosage");

        match self
            .service
            .check_availability(&medicine_name, dosage.as_deref())
        {
            Availability::NotAvailable { name } => {
                format!("**{}** is NOT AVAILABLE in our pharmacy inventory.", name)
            }
            Availability::WrongDosage { record, dosage } => format!(
                "**{}** is available but NOT in {} dosage.\nAvailable dosages: {}\nPrice: {} per unit",
                record.name,
                dosage,
                record.dosage_list(),
                record.price
            ),
            Availability::InStock { record, dosage } => {
                let mut text = in_stock_text(record);
                if let Some(d) = dosage {
                    text.push_str(&format!("\n{} dosage is available for immediate order.", d));
                }
                text
            }
        }
    }

    async fn handle_place_order(&self, args: Value) -> Result<String, ToolError> {
        #[derive(Deserialize, Validate)]
        struct Args {
            #[validate(length(min = 1))]
            medicine_name: String,
            #[validate(length(min = 1))]
            dosage: String,
            #[serde(default = "default_quantity")]
            quantity: i64,
            patient_id: Option<String>,
        }

        let args: Args = parse_args(args)?;

        let order = self
            .service
            .place_order(OrderRequest {
                medicine_name: args.medicine_name,
                dosage: args.dosage,
                quantity: args.quantity,
                patient_id: args.patient_id,
            })
            .await?;

        Ok(order_placed_text(&order))
    }

    fn handle_check_drug_interactions(&self, args: Value) -> Result<String, ToolError> {
        #[derive(Deserialize, Validate)]
        struct Args {
            medicines: Vec<String>,
        }

        let args: Args = parse_args(args)?;
        Ok(self.service.check_drug_interactions(&args.medicines).to_string())
    }

    async fn handle_get_order_status(&self, args: Value) -> Result<String, ToolError> {
        #[derive(Deserialize, Validate)]
        struct Args {
            #[validate(length(min = 1))]
            order_id: String,
        }

        let args: Args = parse_args(args)?;
        let order = self.service.get_order_status(&args.order_id).await?;

        Ok(format!(
            "Order {}: {} {} x{} - {}",
            order.order_id, order.medicine_name, order.dosage, order.quantity, order.status
        ))
    }
}

fn default_quantity() -> i64 {
    DEFAULT_ORDER_QUANTITY
}

/// Deserialize and validate tool arguments; absent arguments read as `{}`
fn parse_args<T: DeserializeOwned + Validate>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() { json!({}) } else { args };

    let parsed: T = serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        message: e.to_string(),
    })?;
    parsed.validate().map_err(|e| ToolError::InvalidArguments {
        message: e.to_string(),
    })?;

    Ok(parsed)
}

/// String argument by name; absent or non-string values read as `None`
fn string_arg(args: &Value, name: &str) -> Option<String> {
    args.get(name).and_then(Value::as_str).map(str::to_string)
}

fn in_stock_text(record: &MedicineRecord) -> String {
    format!(
        "**{}** is IN STOCK\nCategory: {}\nDosages: {}\nPrice: {} per unit",
        record.name,
        record.category,
        record.dosage_list(),
        record.price
    )
}

fn order_placed_text(order: &Order) -> String {
    format!(
        "ORDER PLACED\nOrder ID: {}\nMedicine: {} {}\nQuantity: {} units\nTotal: {}\nStatus: {}",
        order.order_id,
        order.medicine_name,
        order.dosage,
        order.quantity,
        order.total_price,
        order.status
    )
}

// ==================== Tool Schemas ====================

fn search_medicines_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Medicine name or category to search for (e.g., 'metformin', 'NSAID', 'blood pressure')"
            }
        },
        "required": ["query"]
    })
}

fn check_availability_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medicine_name": {
                "type": "string",
                "description": "Name of the medicine to check (e.g., 'lisinopril', 'metformin')"
            },
            "dosage": {
                "type": "string",
                "description": "Optional: Specific dosage to check (e.g., '10mg', '500mg')"
            }
        },
        "required": ["medicine_name"]
    })
}

fn place_order_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medicine_name": {
                "type": "string",
                "description": "Name of the medicine to order"
            },
            "dosage": {
                "type": "string",
                "description": "Dosage strength (e.g., '10mg', '500mg')"
            },
            "quantity": {
                "type": "integer",
                "description": "Number of units to order (default: 30)"
            },
            "patient_id": {
                "type": "string",
                "description": "Patient identifier for the order"
            }
        },
        "required": ["medicine_name", "dosage", "quantity"]
    })
}

fn check_drug_interactions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medicines": {
                "type": "array",
                "items": {"type": "string"},
                "description": "List of medicine names to check for interactions"
            }
        },
        "required": ["medicines"]
    })
}

fn get_order_status_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "order_id": {
                "type": "string",
                "description": "The order ID to check (e.g., 'ORD-1001')"
            }
        },
        "required": ["order_id"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler() -> ToolHandler {
        ToolHandler::new(Arc::new(PharmacyService::with_builtin_data()))
    }

    #[test]
    fn test_tool_kind_round_trip_names() {
        for kind in ToolKind::ALL {
            assert_eq!(kind.name().parse::<ToolKind>().unwrap(), kind);
        }
        assert_eq!(
            "refill".parse::<ToolKind>(),
            Err(ToolError::UnknownTool {
                name: "refill".to_string()
            })
        );
    }

    #[test]
    fn test_list_tools_schemas() {
        let tools = handler().list_tools();
        assert_eq!(tools.len(), 5);

        let place = tools.iter().find(|t| t.name == "place_order").unwrap();
        let props = place.input_schema["properties"].as_object().unwrap();
        for key in ["medicine_name", "dosage", "quantity", "patient_id"] {
            assert!(props.contains_key(key), "missing property {}", key);
        }
        assert_eq!(place.input_schema["required"], json!(["medicine_name", "dosage", "quantity"]));

        let interactions = tools.iter().find(|t| t.name == "check_drug_interactions").unwrap();
        assert_eq!(interactions.input_schema["properties"]["medicines"]["items"]["type"], "string");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let result = handler().call_tool("refill", json!({})).await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Unknown tool: refill");
    }

    #[tokio::test]
    async fn test_search_not_found_is_not_error() {
        let result = handler()
            .call_tool("search_medicines", json!({"query": "antibiotic"}))
            .await;
        assert!(!result.is_error);
        assert_eq!(result.text_content(), "No medicines found matching 'antibiotic'.");
    }

    #[tokio::test]
    async fn test_search_text() {
        let result = handler()
            .call_tool("search_medicines", json!({"query": "statin"}))
            .await;
        let text = result.text_content();
        assert!(text.starts_with("Found 1 medicine(s) matching 'statin':"));
        assert!(text.contains("1. **Atorvastatin** (Statin)"));
        assert!(text.contains("Dosages: 10mg, 20mg, 40mg"));
        assert!(text.contains("Price: $18.75 per unit"));
    }

    #[tokio::test]
    async fn test_availability_texts() {
        let handler = handler();

        let result = handler
            .call_tool("check_availability", json!({"medicine_name": "lisinopril", "dosage": "99mg"}))
            .await;
        assert!(!result.is_error);
        assert!(result
            .text_content()
            .contains("is available but NOT in 99mg dosage.\nAvailable dosages: 5mg, 10mg, 20mg"));

        let result = handler
            .call_tool("check_availability", json!({"medicine_name": "warfarin"}))
            .await;
        assert!(!result.is_error);
        assert_eq!(
            result.text_content(),
            "**warfarin** is NOT AVAILABLE in our pharmacy inventory."
        );

        let result = handler
            .call_tool("check_availability", json!({"medicine_name": "Metformin", "dosage": "500mg"}))
            .await;
        assert!(result.text_content().ends_with("500mg dosage is available for immediate order."));
    }

    #[tokio::test]
    async fn test_place_order_default_quantity() {
        let result = handler()
            .call_tool("place_order", json!({"medicine_name": "aspirin", "dosage": "81mg"}))
            .await;
        assert!(!result.is_error);
        let text = result.text_content();
        assert!(text.starts_with("ORDER PLACED\nOrder ID: ORD-1001"));
        assert!(text.contains("Quantity: 30 units"));
        assert!(text.contains("Total: $209.70"));
        assert!(text.ends_with("Status: PENDING_PHYSICIAN_APPROVAL"));
    }

    #[tokio::test]
    async fn test_place_order_errors() {
        let handler = handler();

        let result = handler
            .call_tool("place_order", json!({"medicine_name": "warfarin", "dosage": "5mg", "quantity": 10}))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Order Failed: warfarin not found.");

        let result = handler
            .call_tool("place_order", json!({"medicine_name": "metformin", "dosage": "999mg", "quantity": 30}))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Order Failed: 999mg not valid for Metformin.");
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let handler = handler();

        let result = handler.call_tool("get_order_status", Value::Null).await;
        assert!(result.is_error);
        assert!(result.text_content().starts_with("Invalid arguments:"));

        let result = handler
            .call_tool("place_order", json!({"medicine_name": "", "dosage": "5mg"}))
            .await;
        assert!(result.is_error);
        assert!(result.text_content().starts_with("Invalid arguments:"));
    }

    #[tokio::test]
    async fn test_order_status_round_trip() {
        let handler = handler();
        handler
            .call_tool(
                "place_order",
                json!({"medicine_name": "gabapentin", "dosage": "300mg", "quantity": 60, "patient_id": "P-42"}),
            )
            .await;

        let result = handler
            .call_tool("get_order_status", json!({"order_id": "ORD-1001"}))
            .await;
        assert!(!result.is_error);
        assert_eq!(
            result.text_content(),
            "Order ORD-1001: Gabapentin 300mg x60 - PENDING_PHYSICIAN_APPROVAL"
        );

        let result = handler
            .call_tool("get_order_status", json!({"order_id": "ORD-2000"}))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text_content(), "Order ORD-2000 not found.");
    }

    #[tokio::test]
    async fn test_search_and_availability_never_flag_errors() {
        let handler = handler();

        for (tool, args) in [
            ("search_medicines", json!({})),
            ("search_medicines", json!({"query": 5})),
            ("search_medicines", Value::Null),
            ("check_availability", json!({})),
            ("check_availability", json!({"medicine_name": ""})),
            ("check_availability", json!({"medicine_name": 7, "dosage": ["10mg"]})),
        ] {
            let result = handler.call_tool(tool, args.clone()).await;
            assert!(!result.is_error, "{} {} flagged an error", tool, args);
        }
    }

    #[tokio::test]
    async fn test_empty_query_lists_whole_catalog() {
        let result = handler().call_tool("search_medicines", json!({})).await;
        assert!(result.text_content().starts_with("Found 10 medicine(s) matching '':"));
    }

    #[tokio::test]
    async fn test_blank_availability_name_resolves_first_entry() {
        let result = handler()
            .call_tool("check_availability", json!({"medicine_name": ""}))
            .await;
        assert!(result.text_content().starts_with("**Lisinopril** is IN STOCK"));
    }

    #[tokio::test]
    async fn test_place_order_accepts_non_positive_quantities() {
        let handler = handler();

        let zero = handler
            .call_tool("place_order", json!({"medicine_name": "lisinopril", "dosage": "5mg", "quantity": 0}))
            .await;
        assert!(!zero.is_error);
        assert!(zero.text_content().contains("Order ID: ORD-1001"));
        assert!(zero.text_content().contains("Quantity: 0 units\nTotal: $0.00"));

        let negative = handler
            .call_tool("place_order", json!({"medicine_name": "lisinopril", "dosage": "5mg", "quantity": -1}))
            .await;
        assert!(!negative.is_error);
        assert!(negative.text_content().contains("Order ID: ORD-1002"));
        assert!(negative.text_content().contains("Quantity: -1 units\nTotal: -$15.99"));
    }
}
