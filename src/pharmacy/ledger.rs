//! In-memory order ledger
//!
//! Append-only. Order IDs are derived from the ledger length under the same
//! lock as the append, so concurrent placements get unique, gap-free IDs.

use chrono::Utc;
use tokio::sync::Mutex;

use crate::pharmacy::types::{NewOrder, Order, OrderStatus};

/// Number used for the first order ID (`ORD-1001`)
pub const FIRST_ORDER_NUMBER: usize = 1001;

/// Process-lifetime store of placed orders
#[derive(Debug, Default)]
pub struct OrderLedger {
    orders: Mutex<Vec<Order>>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next order ID and append the order
    pub async fn append(&self, draft: NewOrder) -> Order {
        let mut orders = self.orders.lock().await;

        let order = Order {
            order_id: format!("ORD-{}", FIRST_ORDER_NUMBER + orders.len()),
            total_price: draft.unit_price.times(draft.quantity),
            medicine_name: draft.medicine_name,
            dosage: draft.dosage,
            quantity: draft.quantity,
            patient_id: draft.patient_id,
            unit_price: draft.unit_price,
            status: OrderStatus::PendingPhysicianApproval,
            created_at: Utc::now(),
        };
        orders.push(order.clone());

        order
    }

    /// Find an order by exact ID
    pub async fn find(&self, order_id: &str) -> Option<Order> {
        self.orders
            .lock()
            .await
            .iter()
            .find(|o| o.order_id == order_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.orders.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::pharmacy::types::Price;

    fn draft(quantity: i64) -> NewOrder {
        NewOrder {
            medicine_name: "Lisinopril".to_string(),
            dosage: "10mg".to_string(),
            quantity,
            patient_id: "P-1".to_string(),
            unit_price: Price::from_cents(1599),
        }
    }

    #[tokio::test]
    async fn test_sequential_ids() {
        let ledger = OrderLedger::new();
        let first = ledger.append(draft(30)).await;
        let second = ledger.append(draft(10)).await;

        assert_eq!(first.order_id, "ORD-1001");
        assert_eq!(second.order_id, "ORD-1002");
        assert_eq!(first.total_price.cents(), 47970);
        assert_eq!(first.status, OrderStatus::PendingPhysicianApproval);
        assert_eq!(ledger.len().await, 2);
    }

    #[tokio::test]
    async fn test_find() {
        let ledger = OrderLedger::new();
        ledger.append(draft(5)).await;

        let found = ledger.find("ORD-1001").await.unwrap();
        assert_eq!(found.quantity, 5);
        assert!(ledger.find("ORD-1002").await.is_none());
        assert!(ledger.find("ord-1001").await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_unique() {
        let ledger = Arc::new(OrderLedger::new());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.append(draft(1)).await.order_id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort();

        let expected: Vec<String> = (1001..1051).map(|n| format!("ORD-{}", n)).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        let ledger = OrderLedger::new();
        assert!(ledger.is_empty().await);
    }
}
