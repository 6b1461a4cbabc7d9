//! Landing page after login.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::payment::PaymentRow;
use crate::domain::types::AgencyId;
use crate::dto::dashboard::{AdminDashboard, AgencyDashboard, DashboardPageData, RECENT_ITEMS};
use crate::repository::{
    AgencyReader, ClientListQuery, ClientReader, PaymentListQuery, PaymentReader, PlanReader,
    ReminderReader, StatisticsReader,
};
use crate::services::{ServiceError, ServiceResult, agency_scope, today};

pub fn load_dashboard<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<DashboardPageData>
where
    R: AgencyReader
        + ClientReader
        + PaymentReader
        + PlanReader
        + ReminderReader
        + StatisticsReader
        + ?Sized,
{
    if user.is_super_admin() {
        let stats = repo.platform_stats().map_err(|err| {
            log::error!("Failed to load platform stats: {err}");
            err
        })?;
        let recent_agencies = repo.list_recent_agencies(RECENT_ITEMS)?;
        return Ok(DashboardPageData::Admin(AdminDashboard {
            stats,
            recent_agencies,
        }));
    }

    let agency_id = agency_scope(user)?;
    load_agency_dashboard(repo, agency_id).map(|data| DashboardPageData::Agency(Box::new(data)))
}

fn load_agency_dashboard<R>(repo: &R, agency_id: AgencyId) -> ServiceResult<AgencyDashboard>
where
    R: AgencyReader + ClientReader + PaymentReader + PlanReader + ReminderReader + ?Sized,
{
    let agency = repo
        .get_agency_by_id(agency_id)
        .map_err(|err| {
            log::error!("Failed to load agency {agency_id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    let plan = match agency.plan_id {
        Some(plan_id) => repo.get_plan_by_id(plan_id)?,
        None => None,
    };

    let today = today();

    let (total_clients, recent_clients) =
        repo.list_clients(ClientListQuery::new(agency_id).paginate(1, RECENT_ITEMS))?;

    let (_, recent_payments) =
        repo.list_payments(PaymentListQuery::new(agency_id).paginate(1, RECENT_ITEMS))?;
    let recent_payments = recent_payments
        .into_iter()
        .map(|(payment, client)| PaymentRow {
            is_overdue: payment.is_overdue(today),
            payment,
            client,
        })
        .collect();

    Ok(AgencyDashboard {
        has_active_subscription: agency.has_active_subscription(today),
        agency,
        plan,
        total_clients,
        active_reminders: repo.count_active_reminders(agency_id)?,
        totals: repo.payment_totals(agency_id)?,
        recent_clients,
        recent_payments,
    })
}
