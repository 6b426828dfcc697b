use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::OrderView;
use crate::domain::ports::OrderStore;

/// Read side of the order API. Runs outside any transaction, so a reader may
/// see a header without items written concurrently with it.
#[derive(Clone)]
pub struct OrderQueries {
    store: Arc<dyn OrderStore>,
}

impl OrderQueries {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub fn get_order(&self, order_id: &str) -> Result<OrderView, DomainError> {
        let header = self
            .store
            .find_order(order_id)
            .inspect_err(|e| log::error!("Failed to load order '{}': {}", order_id, e))?
            .ok_or(DomainError::NotFound)?;

        let items = self
            .store
            .find_items(order_id)
            .inspect_err(|e| log::error!("Failed to load items of order '{}': {}", order_id, e))?;

        Ok(OrderView { header, items })
    }

    pub fn list_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        let orders = self
            .store
            .list_orders()
            .inspect_err(|e| log::error!("Failed to list orders: {}", e))?;
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bigdecimal::BigDecimal;
    use chrono::{Duration, Utc};

    use super::OrderQueries;
    use crate::application::order_service::OrderService;
    use crate::domain::errors::DomainError;
    use crate::domain::item::ItemCandidate;
    use crate::domain::order::NewOrder;
    use crate::infrastructure::InMemoryOrderStore;

    fn setup() -> (OrderService, OrderQueries) {
        let store = Arc::new(InMemoryOrderStore::new());
        (OrderService::new(store.clone()), OrderQueries::new(store))
    }

    fn item(product_id: &str, quantity: i64) -> ItemCandidate {
        ItemCandidate {
            product_id: Some(product_id.to_string()),
            quantity: Some(quantity),
            price: Some(BigDecimal::from(10)),
        }
    }

    #[test]
    fn get_order_attaches_items() {
        let (orders, queries) = setup();
        orders
            .create_order(NewOrder {
                order_id: "O1".to_string(),
                value: BigDecimal::from(100),
                creation_date: None,
                items: vec![item("P1", 2)],
            })
            .expect("create failed");

        let order = queries.get_order("O1").expect("read failed");

        assert_eq!(order.header.order_id, "O1");
        assert_eq!(order.header.value, BigDecimal::from(100));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, "P1");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].price, BigDecimal::from(10));
    }

    #[test]
    fn get_missing_order_is_not_found() {
        let (_, queries) = setup();

        assert!(matches!(queries.get_order("nope"), Err(DomainError::NotFound)));
    }

    #[test]
    fn list_is_newest_first_with_order_id_tie_break() {
        let (orders, queries) = setup();
        let now = Utc::now();
        for (id, offset, items) in [
            ("b", 0, vec![item("P1", 1)]),
            ("a", 0, vec![]),
            ("c", 30, vec![item("P2", 1), item("P3", 1)]),
        ] {
            orders
                .create_order(NewOrder {
                    order_id: id.to_string(),
                    value: BigDecimal::from(1),
                    creation_date: Some(now + Duration::seconds(offset)),
                    items,
                })
                .expect("create failed");
        }

        let listed = queries.list_orders().expect("list failed");

        let ids: Vec<&str> = listed.iter().map(|o| o.header.order_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(listed[0].items.len(), 2);
        assert!(listed[1].items.is_empty());
        assert_eq!(listed[2].items.len(), 1);
    }

    #[test]
    fn list_of_empty_store_is_empty() {
        let (_, queries) = setup();

        assert!(queries.list_orders().expect("list failed").is_empty());
    }
}
