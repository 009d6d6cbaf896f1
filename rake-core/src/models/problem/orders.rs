#[cfg(test)]
#[path = "../../../tests/unit/models/problem/orders_test.rs"]
mod orders_test;

use crate::models::common::{TimeWindow, Tonnes};
use crate::utils::{GenericError, GenericResult};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A customer priority tier, bigger value means more important customer.
pub type PriorityTier = u8;

/// Represents a pending freight order.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    /// An unique order id.
    pub id: String,
    /// Revision number, starts with zero and grows with every amendment.
    pub revision: usize,
    /// A plant where material is produced and loaded.
    pub plant: String,
    /// Material type.
    pub material: String,
    /// Quantity in tonnes.
    pub quantity: Tonnes,
    /// A delivery destination.
    pub destination: String,
    /// Requested delivery window: earliest and latest arrival.
    pub window: TimeWindow,
    /// Customer priority tier.
    pub priority: PriorityTier,
    /// Explicit wagon type requirements which narrow material compatibility. Empty means no narrowing.
    pub wagon_types: Vec<String>,
    /// When set, a missed delivery window is never tolerated as delay.
    pub hard_deadline: bool,
}

/// An amendment of order priority or delivery window.
#[derive(Clone, Debug, Default)]
pub struct Amendment {
    /// A new priority tier.
    pub priority: Option<PriorityTier>,
    /// A new delivery window.
    pub window: Option<TimeWindow>,
}

impl Order {
    /// Returns the latest acceptable arrival time.
    pub fn due(&self) -> f64 {
        self.window.end
    }

    /// Creates a new revision of the order with amendment applied.
    pub fn amend(&self, amendment: &Amendment) -> Order {
        Order {
            revision: self.revision + 1,
            priority: amendment.priority.unwrap_or(self.priority),
            window: amendment.window.clone().unwrap_or_else(|| self.window.clone()),
            ..self.clone()
        }
    }
}

/// Keeps the current revision of every pending order together with its full revision history.
#[derive(Clone, Debug, Default)]
pub struct Backlog {
    current: Vec<Arc<Order>>,
    history: FxHashMap<String, Vec<Arc<Order>>>,
}

impl Backlog {
    /// Creates a new backlog, order ids must be unique.
    pub fn new(orders: Vec<Order>) -> GenericResult<Self> {
        let mut backlog = Self::default();
        orders.into_iter().try_for_each(|order| backlog.add(order))?;

        Ok(backlog)
    }

    /// Adds a new order to the backlog.
    pub fn add(&mut self, order: Order) -> GenericResult<()> {
        if self.history.contains_key(&order.id) {
            return Err(format!("order with id '{}' is already known", order.id).into());
        }

        let order = Arc::new(order);
        self.history.insert(order.id.clone(), vec![order.clone()]);
        self.current.push(order);

        Ok(())
    }

    /// Amends a pending order creating a new revision, the old one is retained for audit.
    pub fn amend(&mut self, order_id: &str, amendment: &Amendment) -> GenericResult<Arc<Order>> {
        let position = self
            .current
            .iter()
            .position(|order| order.id == order_id)
            .ok_or_else(|| GenericError::from(format!("cannot amend unknown or completed order '{order_id}'")))?;

        if let Some(window) = amendment.window.as_ref().filter(|window| !window.is_valid()) {
            return Err(format!("invalid window [{}, {}] for order '{order_id}'", window.start, window.end).into());
        }

        let revised = Arc::new(self.current[position].amend(amendment));
        self.current[position] = revised.clone();
        self.history.entry(order_id.to_string()).or_default().push(revised.clone());

        Ok(revised)
    }

    /// Removes orders from pending list, their history is kept.
    pub fn complete(&mut self, order_ids: &[&str]) {
        self.current.retain(|order| !order_ids.contains(&order.id.as_str()));
    }

    /// Returns current revisions of pending orders.
    pub fn orders(&self) -> &[Arc<Order>] {
        self.current.as_slice()
    }

    /// Returns all revisions of the order, the last one is the current.
    pub fn history(&self, order_id: &str) -> &[Arc<Order>] {
        self.history.get(order_id).map_or(&[], |revisions| revisions.as_slice())
    }
}
