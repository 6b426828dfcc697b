pub mod memory_store;
pub mod models;
pub mod order_store;

pub use memory_store::InMemoryOrderStore;
pub use order_store::DieselOrderStore;
