use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::order::{Item, OrderHeader, OrderView};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A write collided with a uniqueness constraint.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("{0}")]
    Backend(String),
}

/// Header values for an insert. A missing `creation_date` takes the store's
/// current time.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub order_id: String,
    pub value: BigDecimal,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Persistence for orders and their items.
///
/// Reads and `delete_order` run as single autonomous statements. Multi-step
/// writes go through a session obtained from `begin`.
pub trait OrderStore: Send + Sync + 'static {
    fn begin(&self) -> Result<Box<dyn OrderTransaction + '_>, StoreError>;

    fn find_order(&self, order_id: &str) -> Result<Option<OrderHeader>, StoreError>;

    /// Items of one order, in insertion order.
    fn find_items(&self, order_id: &str) -> Result<Vec<Item>, StoreError>;

    /// Every order with its items, most recent first, ties by order id.
    fn list_orders(&self) -> Result<Vec<OrderView>, StoreError>;

    /// Deletes the order and, by cascade, its items. Returns `false` if no
    /// order matched.
    fn delete_order(&self, order_id: &str) -> Result<bool, StoreError>;
}

/// A transactional session.
///
/// Dropping a session without calling `commit` rolls back every statement
/// issued through it and releases the underlying connection.
pub trait OrderTransaction {
    fn insert_order(&mut self, order: &OrderRecord) -> Result<OrderHeader, StoreError>;

    /// Takes an exclusive row lock on the order for the rest of the session.
    /// Returns `false` if the order does not exist.
    fn lock_order(&mut self, order_id: &str) -> Result<bool, StoreError>;

    fn update_value(&mut self, order_id: &str, value: &BigDecimal) -> Result<(), StoreError>;

    fn delete_items(&mut self, order_id: &str) -> Result<usize, StoreError>;

    fn insert_item(&mut self, order_id: &str, item: &Item) -> Result<(), StoreError>;

    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
