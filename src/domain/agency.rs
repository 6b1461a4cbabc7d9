//! Agencies are the tenants of the platform.

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, AgencyName, AgencyStatus, PlanId};
use crate::domain::user::User;

/// Days granted when a super-admin activates an agency manually.
pub const MANUAL_ACTIVATION_DAYS: u64 = 30;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Agency {
    pub id: AgencyId,
    pub name: AgencyName,
    pub status: AgencyStatus,
    pub subscription_ends: Option<NaiveDate>,
    pub plan_id: Option<PlanId>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Agency {
    /// True when the agency is active and its subscription has not lapsed.
    pub fn has_active_subscription(&self, today: NaiveDate) -> bool {
        self.status == AgencyStatus::Active
            && self.subscription_ends.is_none_or(|ends| ends >= today)
    }
}

#[derive(Clone, Debug)]
pub struct NewAgency {
    pub name: AgencyName,
    pub status: AgencyStatus,
    pub subscription_ends: Option<NaiveDate>,
}

impl NewAgency {
    #[must_use]
    pub fn new(name: AgencyName, status: AgencyStatus, today: NaiveDate) -> Self {
        let subscription_ends = match status {
            AgencyStatus::Active => today.checked_add_days(Days::new(MANUAL_ACTIVATION_DAYS)),
            AgencyStatus::Pending => None,
        };
        Self {
            name,
            status,
            subscription_ends,
        }
    }
}

/// Contact details editable by the agency owner.
#[derive(Clone, Debug)]
pub struct UpdateAgencyInfo {
    pub name: AgencyName,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl UpdateAgencyInfo {
    #[must_use]
    pub fn new(name: AgencyName, phone: Option<String>, address: Option<String>) -> Self {
        Self {
            name,
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Status change applied by a super-admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgencyStatusChange {
    pub status: AgencyStatus,
    pub subscription_ends: Option<NaiveDate>,
}

impl AgencyStatusChange {
    /// Flips the agency between active and pending.
    ///
    /// Activation keeps a running subscription and otherwise grants
    /// [`MANUAL_ACTIVATION_DAYS`] from `today`; suspension clears the end date.
    pub fn toggle(agency: &Agency, today: NaiveDate) -> Self {
        match agency.status {
            AgencyStatus::Active => Self {
                status: AgencyStatus::Pending,
                subscription_ends: None,
            },
            AgencyStatus::Pending => {
                let subscription_ends = match agency.subscription_ends {
                    Some(ends) if ends >= today => Some(ends),
                    _ => today.checked_add_days(Days::new(MANUAL_ACTIVATION_DAYS)),
                };
                Self {
                    status: AgencyStatus::Active,
                    subscription_ends,
                }
            }
        }
    }
}

/// Agency row as shown in the super-admin listing.
#[derive(Clone, Debug, Serialize)]
pub struct AgencyOverview {
    pub agency: Agency,
    pub owner: Option<User>,
    pub client_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn agency(status: AgencyStatus, ends: Option<NaiveDate>) -> Agency {
        let now = date(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap();
        Agency {
            id: AgencyId::new(1).unwrap(),
            name: AgencyName::new("الفارس للدراجات").unwrap(),
            status,
            subscription_ends: ends,
            plan_id: None,
            phone: None,
            address: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn suspending_clears_subscription_end() {
        let today = date(2024, 4, 1);
        let change = AgencyStatusChange::toggle(
            &agency(AgencyStatus::Active, Some(date(2024, 5, 1))),
            today,
        );
        assert_eq!(change.status, AgencyStatus::Pending);
        assert_eq!(change.subscription_ends, None);
    }

    #[test]
    fn activating_grants_thirty_days_when_expired() {
        let today = date(2024, 4, 1);
        let change = AgencyStatusChange::toggle(
            &agency(AgencyStatus::Pending, Some(date(2024, 3, 1))),
            today,
        );
        assert_eq!(change.status, AgencyStatus::Active);
        assert_eq!(change.subscription_ends, Some(date(2024, 5, 1)));
    }

    #[test]
    fn activating_keeps_running_subscription() {
        let today = date(2024, 4, 1);
        let change = AgencyStatusChange::toggle(
            &agency(AgencyStatus::Pending, Some(date(2024, 6, 1))),
            today,
        );
        assert_eq!(change.subscription_ends, Some(date(2024, 6, 1)));
    }

    #[test]
    fn subscription_is_active_until_end_date() {
        let ends = date(2024, 4, 10);
        let a = agency(AgencyStatus::Active, Some(ends));
        assert!(a.has_active_subscription(date(2024, 4, 10)));
        assert!(!a.has_active_subscription(date(2024, 4, 11)));
        assert!(!agency(AgencyStatus::Pending, None).has_active_subscription(ends));
    }
}
