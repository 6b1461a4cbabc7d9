//! Business workflows invoked by the HTTP routes.

use chrono::{Local, NaiveDate};

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::AgencyId;

pub mod agencies;
pub mod api;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod errors;
pub mod payments;
pub mod reminders;
pub mod settings;
pub mod statistics;
pub mod subscriptions;

pub use errors::{ServiceError, ServiceResult};

/// Agency the user acts for; super-admins and users without an agency are refused.
pub fn agency_scope(user: &AuthenticatedUser) -> ServiceResult<AgencyId> {
    user.agency_id().ok_or(ServiceError::Unauthorized)
}

pub fn ensure_super_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if user.is_super_admin() {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Trims the search term and drops it when empty.
pub(crate) fn search_term(search: Option<String>) -> Option<String> {
    search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
