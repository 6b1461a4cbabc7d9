use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{DbConnection, DbPool};
use crate::domain::agency::{
    Agency, AgencyOverview, AgencyStatusChange, NewAgency, UpdateAgencyInfo,
};
use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::payment::{NewPayment, Payment, PaymentTotals};
use crate::domain::reminder::{NewReminder, Reminder, ReminderView};
use crate::domain::settings::AgencySettings;
use crate::domain::statistics::{AgencyPerformance, PlatformStats};
use crate::domain::subscription::{
    ActiveSubscription, NewSubscriptionPlan, NewSubscriptionRequest, SubscriptionPlan,
    SubscriptionRequest, SubscriptionRequestView,
};
use crate::domain::types::{
    AgencyId, ClientId, Email, PaymentId, PaymentStatus, PersonName, PlanId, ReminderId,
    ReminderStatus, RequestStatus, SubscriptionRequestId, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;

pub mod agency;
pub mod client;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod payment;
pub mod reminder;
pub mod settings;
pub mod statistics;
pub mod subscription;
pub mod user;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Escape character used by every `LIKE` search.
pub(crate) const LIKE_ESCAPE: char = '\\';

/// Substring `LIKE` pattern for a search term; blank terms yield `None`.
///
/// `%`, `_` and the escape character match literally.
pub(crate) fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|term| !term.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub(crate) fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }

    /// Rows before the page; page `0` counts as the first page.
    fn skipped(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::try_from(self.skipped()).unwrap_or(i64::MAX)
    }

    /// Slices an already loaded list.
    pub(crate) fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skipped())
            .take(self.per_page)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientListQuery {
    pub agency_id: AgencyId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new(agency_id: AgencyId) -> Self {
        Self {
            agency_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentListQuery {
    pub agency_id: AgencyId,
    pub status: Option<PaymentStatus>,
    pub client_id: Option<ClientId>,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl PaymentListQuery {
    pub fn new(agency_id: AgencyId) -> Self {
        Self {
            agency_id,
            status: None,
            client_id: None,
            search: None,
            pagination: None,
        }
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgencyListQuery {
    /// Matches the agency name or the owner's name or e-mail.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionRequestQuery {
    pub status: Option<RequestStatus>,
    /// Matches the agency name.
    pub search: Option<String>,
}

pub trait AgencyReader {
    fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>>;
    fn list_agencies(&self, query: AgencyListQuery) -> RepositoryResult<Vec<AgencyOverview>>;
    fn list_recent_agencies(&self, limit: usize) -> RepositoryResult<Vec<Agency>>;
    fn list_active_subscriptions(&self) -> RepositoryResult<Vec<ActiveSubscription>>;
}

pub trait AgencyWriter {
    /// Creates the agency, its owner profile and its settings row atomically.
    fn register_agency(
        &self,
        agency: &NewAgency,
        owner: &NewUser,
    ) -> RepositoryResult<(Agency, User)>;
    fn update_agency_status(
        &self,
        id: AgencyId,
        change: &AgencyStatusChange,
    ) -> RepositoryResult<Agency>;
    fn update_agency_info(&self, id: AgencyId, info: &UpdateAgencyInfo)
    -> RepositoryResult<Agency>;
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn update_user_name(&self, id: UserId, name: &PersonName) -> RepositoryResult<User>;
    fn update_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;
    /// Inserts the super-admin or resets the existing profile with that e-mail.
    fn upsert_super_admin(&self, user: &NewUser) -> RepositoryResult<User>;
}

pub trait ClientReader {
    fn get_client_by_id(
        &self,
        id: ClientId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    fn count_clients(&self, agency_id: AgencyId) -> RepositoryResult<usize>;
    /// Earliest pending due date per client.
    fn next_payment_dates(
        &self,
        agency_id: AgencyId,
        client_ids: &[ClientId],
    ) -> RepositoryResult<HashMap<ClientId, NaiveDate>>;
}

pub trait ClientWriter {
    fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
    fn update_client(
        &self,
        id: ClientId,
        agency_id: AgencyId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client>;
    /// Removes the client together with its payments and reminders.
    fn delete_client(&self, id: ClientId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait PaymentReader {
    fn get_payment_by_id(
        &self,
        id: PaymentId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<Payment>>;
    fn list_payments(
        &self,
        query: PaymentListQuery,
    ) -> RepositoryResult<(usize, Vec<(Payment, Client)>)>;
    fn payment_totals(&self, agency_id: AgencyId) -> RepositoryResult<PaymentTotals>;
}

pub trait PaymentWriter {
    fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
    fn complete_payment(
        &self,
        id: PaymentId,
        agency_id: AgencyId,
        paid_date: NaiveDate,
    ) -> RepositoryResult<Payment>;
    fn delete_payment(&self, id: PaymentId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait ReminderReader {
    fn get_reminder(
        &self,
        id: ReminderId,
        agency_id: AgencyId,
    ) -> RepositoryResult<Option<ReminderView>>;
    /// Open reminders first, each group ordered by send date.
    fn list_reminders(&self, agency_id: AgencyId) -> RepositoryResult<Vec<ReminderView>>;
    fn count_active_reminders(&self, agency_id: AgencyId) -> RepositoryResult<usize>;
}

pub trait ReminderWriter {
    fn create_reminder(&self, reminder: &NewReminder) -> RepositoryResult<Reminder>;
    fn set_reminder_status(
        &self,
        id: ReminderId,
        agency_id: AgencyId,
        status: ReminderStatus,
        sent_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Reminder>;
    fn delete_reminder(&self, id: ReminderId, agency_id: AgencyId) -> RepositoryResult<()>;
}

pub trait SettingsReader {
    fn get_settings(&self, agency_id: AgencyId) -> RepositoryResult<Option<AgencySettings>>;
}

pub trait SettingsWriter {
    /// `None` restores the default template.
    fn save_whatsapp_template(
        &self,
        agency_id: AgencyId,
        template: Option<String>,
    ) -> RepositoryResult<AgencySettings>;
}

pub trait PlanReader {
    fn list_plans(&self, active_only: bool) -> RepositoryResult<Vec<SubscriptionPlan>>;
    fn get_plan_by_id(&self, id: PlanId) -> RepositoryResult<Option<SubscriptionPlan>>;
}

pub trait PlanWriter {
    fn create_plan(&self, plan: &NewSubscriptionPlan) -> RepositoryResult<SubscriptionPlan>;
    fn set_plan_active(&self, id: PlanId, is_active: bool) -> RepositoryResult<SubscriptionPlan>;
}

pub trait SubscriptionRequestReader {
    fn list_subscription_requests(
        &self,
        query: SubscriptionRequestQuery,
    ) -> RepositoryResult<Vec<SubscriptionRequestView>>;
    fn get_subscription_request(
        &self,
        id: SubscriptionRequestId,
    ) -> RepositoryResult<Option<SubscriptionRequest>>;
    fn has_pending_request(&self, agency_id: AgencyId) -> RepositoryResult<bool>;
}

pub trait SubscriptionRequestWriter {
    fn create_subscription_request(
        &self,
        request: &NewSubscriptionRequest,
    ) -> RepositoryResult<SubscriptionRequest>;
    /// Marks the request approved and activates its agency on the plan.
    fn approve_subscription_request(
        &self,
        request: &SubscriptionRequest,
        subscription_ends: NaiveDate,
    ) -> RepositoryResult<Agency>;
    fn reject_subscription_request(
        &self,
        id: SubscriptionRequestId,
    ) -> RepositoryResult<SubscriptionRequest>;
}

pub trait StatisticsReader {
    fn platform_stats(&self) -> RepositoryResult<PlatformStats>;
    /// Sorted by client count, largest first.
    fn agency_performance(&self) -> RepositoryResult<Vec<AgencyPerformance>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_offsets_start_at_first_page() {
        let first = Pagination {
            page: 0,
            per_page: 20,
        };
        assert_eq!(first.offset(), 0);
        let third = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);
    }

    #[test]
    fn pagination_slices_loaded_items() {
        let page = Pagination {
            page: 2,
            per_page: 2,
        };
        assert_eq!(page.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(
            like_pattern(Some(" 50%_off ")).as_deref(),
            Some("%50\\%\\_off%")
        );
        assert_eq!(like_pattern(Some("a\\b")).as_deref(), Some("%a\\\\b%"));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }

    #[test]
    fn query_builders_set_filters() {
        let agency = AgencyId::new(1).unwrap();
        let query = PaymentListQuery::new(agency)
            .status(PaymentStatus::Pending)
            .search("فهد")
            .paginate(2, 10);
        assert_eq!(query.status, Some(PaymentStatus::Pending));
        assert_eq!(query.search.as_deref(), Some("فهد"));
        assert_eq!(
            query.pagination,
            Some(Pagination {
                page: 2,
                per_page: 10
            })
        );
    }
}
