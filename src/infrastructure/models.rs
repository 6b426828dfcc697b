use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::order::{Item, OrderHeader};
use crate::schema::{order_items, orders};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub order_id: String,
    pub value: BigDecimal,
    pub creation_date: DateTime<Utc>,
}

/// `creation_date: None` inserts `DEFAULT`, i.e. `now()`.
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub order_id: &'a str,
    pub value: &'a BigDecimal,
    pub creation_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow<'a> {
    pub order_id: &'a str,
    pub product_id: &'a str,
    pub quantity: i32,
    pub price: &'a BigDecimal,
}

impl From<OrderRow> for OrderHeader {
    fn from(row: OrderRow) -> Self {
        OrderHeader {
            order_id: row.order_id,
            value: row.value,
            creation_date: row.creation_date,
        }
    }
}

impl From<OrderItemRow> for Item {
    fn from(row: OrderItemRow) -> Self {
        Item {
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
        }
    }
}
