pub mod order_query;
pub mod order_service;

pub use order_query::OrderQueries;
pub use order_service::OrderService;
