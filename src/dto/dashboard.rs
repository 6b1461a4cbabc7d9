use serde::Serialize;

use crate::domain::agency::Agency;
use crate::domain::client::Client;
use crate::domain::payment::{PaymentRow, PaymentTotals};
use crate::domain::statistics::PlatformStats;
use crate::domain::subscription::SubscriptionPlan;

/// Number of recent rows shown on the dashboard.
pub const RECENT_ITEMS: usize = 5;

#[derive(Debug, Serialize)]
pub struct AgencyDashboard {
    pub agency: Agency,
    pub plan: Option<SubscriptionPlan>,
    pub has_active_subscription: bool,
    pub total_clients: usize,
    pub active_reminders: usize,
    pub totals: PaymentTotals,
    pub recent_clients: Vec<Client>,
    pub recent_payments: Vec<PaymentRow>,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub stats: PlatformStats,
    pub recent_agencies: Vec<Agency>,
}

/// Dashboard content depends on the role.
#[derive(Debug)]
pub enum DashboardPageData {
    Agency(Box<AgencyDashboard>),
    Admin(AdminDashboard),
}
