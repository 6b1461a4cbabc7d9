//! Mock repository used to exercise services without a database.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use mockall::mock;

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
    AgencyId, ClientId, Email, PaymentId, PersonName, PlanId, ReminderId, ReminderStatus,
    SubscriptionRequestId, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AgencyListQuery, AgencyReader, AgencyWriter, ClientListQuery, ClientReader, ClientWriter,
    PaymentListQuery, PaymentReader, PaymentWriter, PlanReader, PlanWriter, ReminderReader,
    ReminderWriter, SettingsReader, SettingsWriter, StatisticsReader, SubscriptionRequestQuery,
    SubscriptionRequestReader, SubscriptionRequestWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl AgencyReader for Repository {
        fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>>;
        fn list_agencies(&self, query: AgencyListQuery) -> RepositoryResult<Vec<AgencyOverview>>;
        fn list_recent_agencies(&self, limit: usize) -> RepositoryResult<Vec<Agency>>;
        fn list_active_subscriptions(&self) -> RepositoryResult<Vec<ActiveSubscription>>;
    }

    impl AgencyWriter for Repository {
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
        fn update_agency_info(
            &self,
            id: AgencyId,
            info: &UpdateAgencyInfo,
        ) -> RepositoryResult<Agency>;
    }

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &Email) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn update_user_name(&self, id: UserId, name: &PersonName) -> RepositoryResult<User>;
        fn update_user_password(&self, id: UserId, password_hash: &str) -> RepositoryResult<()>;
        fn upsert_super_admin(&self, user: &NewUser) -> RepositoryResult<User>;
    }

    impl ClientReader for Repository {
        fn get_client_by_id(
            &self,
            id: ClientId,
            agency_id: AgencyId,
        ) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
        fn count_clients(&self, agency_id: AgencyId) -> RepositoryResult<usize>;
        fn next_payment_dates(
            &self,
            agency_id: AgencyId,
            client_ids: &[ClientId],
        ) -> RepositoryResult<HashMap<ClientId, NaiveDate>>;
    }

    impl ClientWriter for Repository {
        fn create_clients(&self, new_clients: &[NewClient]) -> RepositoryResult<usize>;
        fn update_client(
            &self,
            id: ClientId,
            agency_id: AgencyId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, id: ClientId, agency_id: AgencyId) -> RepositoryResult<()>;
    }

    impl PaymentReader for Repository {
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

    impl PaymentWriter for Repository {
        fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
        fn complete_payment(
            &self,
            id: PaymentId,
            agency_id: AgencyId,
            paid_date: NaiveDate,
        ) -> RepositoryResult<Payment>;
        fn delete_payment(&self, id: PaymentId, agency_id: AgencyId) -> RepositoryResult<()>;
    }

    impl ReminderReader for Repository {
        fn get_reminder(
            &self,
            id: ReminderId,
            agency_id: AgencyId,
        ) -> RepositoryResult<Option<ReminderView>>;
        fn list_reminders(&self, agency_id: AgencyId) -> RepositoryResult<Vec<ReminderView>>;
        fn count_active_reminders(&self, agency_id: AgencyId) -> RepositoryResult<usize>;
    }

    impl ReminderWriter for Repository {
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

    impl SettingsReader for Repository {
        fn get_settings(&self, agency_id: AgencyId) -> RepositoryResult<Option<AgencySettings>>;
    }

    impl SettingsWriter for Repository {
        fn save_whatsapp_template(
            &self,
            agency_id: AgencyId,
            template: Option<String>,
        ) -> RepositoryResult<AgencySettings>;
    }

    impl PlanReader for Repository {
        fn list_plans(&self, active_only: bool) -> RepositoryResult<Vec<SubscriptionPlan>>;
        fn get_plan_by_id(&self, id: PlanId) -> RepositoryResult<Option<SubscriptionPlan>>;
    }

    impl PlanWriter for Repository {
        fn create_plan(&self, plan: &NewSubscriptionPlan) -> RepositoryResult<SubscriptionPlan>;
        fn set_plan_active(
            &self,
            id: PlanId,
            is_active: bool,
        ) -> RepositoryResult<SubscriptionPlan>;
    }

    impl SubscriptionRequestReader for Repository {
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

    impl SubscriptionRequestWriter for Repository {
        fn create_subscription_request(
            &self,
            request: &NewSubscriptionRequest,
        ) -> RepositoryResult<SubscriptionRequest>;
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

    impl StatisticsReader for Repository {
        fn platform_stats(&self) -> RepositoryResult<PlatformStats>;
        fn agency_performance(&self) -> RepositoryResult<Vec<AgencyPerformance>>;
    }
}
