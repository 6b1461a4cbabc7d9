//! Domain aggregates exposed by the MotoPay service layer.

pub mod agency;
pub mod auth;
pub mod client;
pub mod payment;
pub mod reminder;
pub mod settings;
pub mod statistics;
pub mod subscription;
pub mod types;
pub mod user;
