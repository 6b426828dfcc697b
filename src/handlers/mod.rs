pub mod auth;
pub mod health;
pub mod money;
pub mod orders;
pub mod timestamp;
