//! Database models shared across the MotoPay repository.

pub mod agency;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod payment;
pub mod reminder;
pub mod settings;
pub mod subscription;
pub mod user;
