use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::item::ItemCandidate;

/// An order exclusive of its items.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHeader {
    pub order_id: String,
    pub value: BigDecimal,
    pub creation_date: DateTime<Utc>,
}

/// A validated line item.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub product_id: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub header: OrderHeader,
    pub items: Vec<Item>,
}

/// Everything needed to create an order. Items are still unchecked; the
/// engine validates them one by one inside the write transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub value: BigDecimal,
    pub creation_date: Option<DateTime<Utc>>,
    pub items: Vec<ItemCandidate>,
}

/// A partial update. `items: Some(vec![])` clears the item list.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub value: Option<BigDecimal>,
    pub items: Option<Vec<ItemCandidate>>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.items.is_none()
    }
}
