//! DTO modules that bridge services with templates and APIs.

pub mod agencies;
pub mod api;
pub mod clients;
pub mod dashboard;
pub mod payments;
pub mod reminders;
pub mod settings;
pub mod statistics;
pub mod subscriptions;
