//! Platform-wide figures for the super-admin.

use serde::Serialize;

use crate::domain::agency::Agency;
use crate::domain::types::Amount;

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PlatformStats {
    pub total_users: usize,
    pub total_agencies: usize,
    pub active_agencies: usize,
    pub pending_agencies: usize,
    pub pending_requests: usize,
    /// Sum of plan prices over approved subscription requests.
    pub revenue: Amount,
}

impl PlatformStats {
    /// Share of active agencies in percent, rounded down; zero without agencies.
    pub fn activity_rate(&self) -> usize {
        if self.total_agencies == 0 {
            return 0;
        }
        self.active_agencies * 100 / self.total_agencies
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AgencyPerformance {
    pub agency: Agency,
    pub client_count: usize,
    pub completed_total: Amount,
}
