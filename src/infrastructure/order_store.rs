use bigdecimal::BigDecimal;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::result::DatabaseErrorKind;

use crate::db::DbPool;
use crate::domain::order::{Item, OrderHeader, OrderView};
use crate::domain::ports::{OrderRecord, OrderStore, OrderTransaction, StoreError};
use crate::schema::{order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::UniqueViolation(info.message().to_string())
            }
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for DieselOrderStore {
    fn begin(&self) -> Result<Box<dyn OrderTransaction + '_>, StoreError> {
        let mut conn = self.pool.get()?;
        AnsiTransactionManager::begin_transaction(&mut *conn)?;
        Ok(Box::new(PgOrderTransaction {
            conn,
            finished: false,
        }))
    }

    fn find_order(&self, order_id: &str) -> Result<Option<OrderHeader>, StoreError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::order_id.eq(order_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(order.map(OrderHeader::from))
    }

    fn find_items(&self, order_id: &str) -> Result<Vec<Item>, StoreError> {
        let mut conn = self.pool.get()?;

        let rows = order_items::table
            .filter(order_items::order_id.eq(order_id))
            .order(order_items::id.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    fn list_orders(&self) -> Result<Vec<OrderView>, StoreError> {
        let mut conn = self.pool.get()?;

        // One statement, so every order is seen together with its items.
        let rows: Vec<(OrderRow, Option<OrderItemRow>)> = orders::table
            .left_join(order_items::table)
            .order((
                orders::creation_date.desc(),
                orders::order_id.asc(),
                order_items::id.nullable().asc(),
            ))
            .select((OrderRow::as_select(), Option::<OrderItemRow>::as_select()))
            .load(&mut conn)?;

        Ok(group_rows(rows))
    }

    fn delete_order(&self, order_id: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(orders::table.filter(orders::order_id.eq(order_id)))
            .execute(&mut conn)?;

        Ok(deleted > 0)
    }
}

/// Folds joined rows, already sorted by order, into one view per order.
fn group_rows(rows: Vec<(OrderRow, Option<OrderItemRow>)>) -> Vec<OrderView> {
    let mut views: Vec<OrderView> = Vec::new();
    for (order, item) in rows {
        let same_order = views
            .last()
            .is_some_and(|v| v.header.order_id == order.order_id);
        if !same_order {
            views.push(OrderView {
                header: order.into(),
                items: Vec::new(),
            });
        }
        if let (Some(item), Some(view)) = (item, views.last_mut()) {
            view.items.push(item.into());
        }
    }
    views
}

// ── Transactional session ─────────────────────────────────────────────────────

struct PgOrderTransaction {
    conn: PooledConnection<ConnectionManager<PgConnection>>,
    finished: bool,
}

impl OrderTransaction for PgOrderTransaction {
    fn insert_order(&mut self, order: &OrderRecord) -> Result<OrderHeader, StoreError> {
        let row = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                order_id: &order.order_id,
                value: &order.value,
                creation_date: order.creation_date,
            })
            .returning(OrderRow::as_returning())
            .get_result(&mut *self.conn)?;

        Ok(row.into())
    }

    fn lock_order(&mut self, order_id: &str) -> Result<bool, StoreError> {
        let locked = orders::table
            .filter(orders::order_id.eq(order_id))
            .select(orders::order_id)
            .for_update()
            .first::<String>(&mut *self.conn)
            .optional()?;

        Ok(locked.is_some())
    }

    fn update_value(&mut self, order_id: &str, value: &BigDecimal) -> Result<(), StoreError> {
        diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
            .set(orders::value.eq(value))
            .execute(&mut *self.conn)?;
        Ok(())
    }

    fn delete_items(&mut self, order_id: &str) -> Result<usize, StoreError> {
        let deleted = diesel::delete(order_items::table.filter(order_items::order_id.eq(order_id)))
            .execute(&mut *self.conn)?;
        Ok(deleted)
    }

    fn insert_item(&mut self, order_id: &str, item: &Item) -> Result<(), StoreError> {
        diesel::insert_into(order_items::table)
            .values(&NewOrderItemRow {
                order_id,
                product_id: &item.product_id,
                quantity: item.quantity,
                price: &item.price,
            })
            .execute(&mut *self.conn)?;
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        // Diesel rolls back by itself when COMMIT fails.
        self.finished = true;
        AnsiTransactionManager::commit_transaction(&mut *self.conn)?;
        Ok(())
    }
}

impl Drop for PgOrderTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = AnsiTransactionManager::rollback_transaction(&mut *self.conn) {
            log::error!("Rollback of uncommitted order transaction failed: {}", e);
        }
    }
}
