use std::sync::Arc;

use bigdecimal::BigDecimal;

use crate::domain::amount::fits_storage;
use crate::domain::errors::DomainError;
use crate::domain::item::{validate_item, ItemCandidate};
use crate::domain::order::{NewOrder, OrderChanges, OrderHeader};
use crate::domain::ports::{OrderRecord, OrderStore, OrderTransaction, StoreError};

/// Write side of the order API.
///
/// Create and update run inside one store transaction each. Every early
/// return drops the open session, which rolls it back and hands the
/// connection back to the pool.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Creates the order header and all of its items, or nothing at all.
    pub fn create_order(&self, order: NewOrder) -> Result<OrderHeader, DomainError> {
        check_value(&order.value)?;
        let mut tx = self.store.begin().map_err(storage_failure("create", &order.order_id))?;

        let record = OrderRecord {
            order_id: order.order_id.clone(),
            value: order.value,
            creation_date: order.creation_date,
        };
        let header = tx.insert_order(&record).map_err(|e| match e {
            StoreError::UniqueViolation(detail) => {
                log::warn!("Order '{}' already exists: {}", order.order_id, detail);
                DomainError::Conflict(order.order_id.clone())
            }
            other => storage_failure("create", &order.order_id)(other),
        })?;

        insert_items(tx.as_mut(), &order.order_id, &order.items)?;

        tx.commit().map_err(storage_failure("create", &order.order_id))?;
        log::info!(
            "Created order '{}' with {} item(s)",
            header.order_id,
            order.items.len()
        );
        Ok(header)
    }

    /// Applies a value change and/or a full replacement of the item list
    /// while holding a row lock on the order.
    pub fn update_order(&self, order_id: &str, changes: OrderChanges) -> Result<(), DomainError> {
        if changes.is_empty() {
            return Err(DomainError::InvalidRequest(
                "Nothing to update: send value and/or items".to_string(),
            ));
        }

        if let Some(value) = &changes.value {
            check_value(value)?;
        }

        let mut tx = self.store.begin().map_err(storage_failure("update", order_id))?;

        let exists = tx.lock_order(order_id).map_err(storage_failure("update", order_id))?;
        if !exists {
            log::warn!("Update rejected, order '{}' not found", order_id);
            return Err(DomainError::NotFound);
        }

        if let Some(value) = &changes.value {
            tx.update_value(order_id, value)
                .map_err(storage_failure("update", order_id))?;
        }

        if let Some(items) = &changes.items {
            tx.delete_items(order_id)
                .map_err(storage_failure("update", order_id))?;
            insert_items(tx.as_mut(), order_id, items)?;
        }

        tx.commit().map_err(storage_failure("update", order_id))?;
        log::info!("Updated order '{}'", order_id);
        Ok(())
    }

    /// Removes the order; its items go with it through the foreign key cascade.
    pub fn delete_order(&self, order_id: &str) -> Result<(), DomainError> {
        let deleted = self
            .store
            .delete_order(order_id)
            .map_err(storage_failure("delete", order_id))?;
        if !deleted {
            return Err(DomainError::NotFound);
        }
        log::info!("Deleted order '{}'", order_id);
        Ok(())
    }
}

fn check_value(value: &BigDecimal) -> Result<(), DomainError> {
    if fits_storage(value) {
        Ok(())
    } else {
        Err(DomainError::InvalidRequest(
            "value must have at most two decimal places and twelve integer digits".to_string(),
        ))
    }
}

/// Validates and inserts items in input order, stopping at the first bad one.
fn insert_items(
    tx: &mut dyn OrderTransaction,
    order_id: &str,
    candidates: &[ItemCandidate],
) -> Result<(), DomainError> {
    for (index, candidate) in candidates.iter().enumerate() {
        let item = validate_item(candidate).map_err(|reason| {
            log::warn!(
                "Rolling back write of order '{}': item {} is invalid ({})",
                order_id,
                index,
                reason
            );
            DomainError::InvalidItem { index, reason }
        })?;
        tx.insert_item(order_id, &item)
            .map_err(storage_failure("insert item for", order_id))?;
    }
    Ok(())
}

fn storage_failure<'a>(
    action: &'a str,
    order_id: &'a str,
) -> impl Fn(StoreError) -> DomainError + 'a {
    move |e| {
        log::error!("Failed to {} order '{}': {}", action, order_id, e);
        DomainError::from(e)
    }
}
