use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;

use crate::domain::order::{Item, OrderHeader, OrderView};
use crate::domain::ports::{OrderRecord, OrderStore, OrderTransaction, StoreError};

#[derive(Debug, Clone, Default)]
struct Tables {
    orders: HashMap<String, StoredOrder>,
}

#[derive(Debug, Clone)]
struct StoredOrder {
    header: OrderHeader,
    items: Vec<Item>,
}

/// In-memory order store for tests.
///
/// A session holds the store's lock until it ends, so sessions are fully
/// serialized. Writes go to a staged copy that only replaces the live tables
/// on commit.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    tables: Mutex<Tables>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub fn order_count(&self) -> usize {
        self.lock().map(|t| t.orders.len()).unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }
}

impl OrderStore for InMemoryOrderStore {
    fn begin(&self) -> Result<Box<dyn OrderTransaction + '_>, StoreError> {
        let live = self.lock()?;
        let staged = live.clone();
        Ok(Box::new(InMemoryTransaction { live, staged }))
    }

    fn find_order(&self, order_id: &str) -> Result<Option<OrderHeader>, StoreError> {
        Ok(self.lock()?.orders.get(order_id).map(|o| o.header.clone()))
    }

    fn find_items(&self, order_id: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .lock()?
            .orders
            .get(order_id)
            .map(|o| o.items.clone())
            .unwrap_or_default())
    }

    fn list_orders(&self) -> Result<Vec<OrderView>, StoreError> {
        let tables = self.lock()?;
        let mut orders: Vec<OrderView> = tables
            .orders
            .values()
            .map(|o| OrderView {
                header: o.header.clone(),
                items: o.items.clone(),
            })
            .collect();
        orders.sort_by(|a, b| {
            b.header
                .creation_date
                .cmp(&a.header.creation_date)
                .then_with(|| a.header.order_id.cmp(&b.header.order_id))
        });
        Ok(orders)
    }

    fn delete_order(&self, order_id: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.orders.remove(order_id).is_some())
    }
}

struct InMemoryTransaction<'a> {
    live: MutexGuard<'a, Tables>,
    staged: Tables,
}

impl InMemoryTransaction<'_> {
    fn order_mut(&mut self, order_id: &str) -> Result<&mut StoredOrder, StoreError> {
        self.staged
            .orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::Backend(format!("order '{}' does not exist", order_id)))
    }
}

impl OrderTransaction for InMemoryTransaction<'_> {
    fn insert_order(&mut self, order: &OrderRecord) -> Result<OrderHeader, StoreError> {
        if self.staged.orders.contains_key(&order.order_id) {
            return Err(StoreError::UniqueViolation(format!(
                "duplicate key value violates unique constraint \"orders_pkey\" ({})",
                order.order_id
            )));
        }
        let header = OrderHeader {
            order_id: order.order_id.clone(),
            value: order.value.clone(),
            creation_date: order.creation_date.unwrap_or_else(Utc::now),
        };
        self.staged.orders.insert(
            order.order_id.clone(),
            StoredOrder {
                header: header.clone(),
                items: Vec::new(),
            },
        );
        Ok(header)
    }

    fn lock_order(&mut self, order_id: &str) -> Result<bool, StoreError> {
        // The whole store is already held by this session.
        Ok(self.staged.orders.contains_key(order_id))
    }

    fn update_value(&mut self, order_id: &str, value: &BigDecimal) -> Result<(), StoreError> {
        self.order_mut(order_id)?.header.value = value.clone();
        Ok(())
    }

    fn delete_items(&mut self, order_id: &str) -> Result<usize, StoreError> {
        let order = self.order_mut(order_id)?;
        let removed = order.items.len();
        order.items.clear();
        Ok(removed)
    }

    fn insert_item(&mut self, order_id: &str, item: &Item) -> Result<(), StoreError> {
        self.order_mut(order_id)?.items.push(item.clone());
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryTransaction { mut live, staged } = *self;
        *live = staged;
        Ok(())
    }
}
