//! Subscription plans and agencies' requests to join them.

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::agency::Agency;
use crate::domain::types::{
    AgencyId, Amount, PlanId, PlanName, RequestStatus, SubscriptionRequestId,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub name: PlanName,
    pub price: Amount,
    pub duration_days: u32,
    /// `None` means unlimited clients.
    pub max_clients: Option<u32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl SubscriptionPlan {
    /// Last day covered by a subscription started on `start`.
    pub fn ends_on(&self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(u64::from(self.duration_days)))
    }

    /// Whether an agency holding `current` clients may add `additional` more.
    pub fn allows_clients(&self, current: usize, additional: usize) -> bool {
        self.max_clients
            .is_none_or(|max| current.saturating_add(additional) <= max as usize)
    }
}

#[derive(Clone, Debug)]
pub struct NewSubscriptionPlan {
    pub name: PlanName,
    pub price: Amount,
    pub duration_days: u32,
    pub max_clients: Option<u32>,
}

impl NewSubscriptionPlan {
    #[must_use]
    pub fn new(
        name: PlanName,
        price: Amount,
        duration_days: u32,
        max_clients: Option<u32>,
    ) -> Self {
        Self {
            name,
            price,
            duration_days,
            max_clients,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRequest {
    pub id: SubscriptionRequestId,
    pub agency_id: AgencyId,
    pub plan_id: PlanId,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewSubscriptionRequest {
    pub agency_id: AgencyId,
    pub plan_id: PlanId,
}

/// Request joined with the agency and plan it refers to.
#[derive(Clone, Debug, Serialize)]
pub struct SubscriptionRequestView {
    pub request: SubscriptionRequest,
    pub agency: Agency,
    pub plan: SubscriptionPlan,
}

/// Active agency subscription as shown to the super-admin.
#[derive(Clone, Debug, Serialize)]
pub struct ActiveSubscription {
    pub agency: Agency,
    pub plan: Option<SubscriptionPlan>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(duration_days: u32, max_clients: Option<u32>) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(1).unwrap(),
            name: PlanName::new("باقة شهرية").unwrap(),
            price: Amount::from_minor(29_900).unwrap(),
            duration_days,
            max_clients,
            is_active: true,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn plan_end_date_adds_duration() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(
            plan(30, None).ends_on(start),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(
            plan(365, None).ends_on(start),
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
    }

    #[test]
    fn client_limit_is_enforced_only_when_set() {
        assert!(plan(30, Some(2)).allows_clients(1, 1));
        assert!(!plan(30, Some(2)).allows_clients(2, 1));
        assert!(!plan(30, Some(5)).allows_clients(1, 5));
        assert!(plan(30, None).allows_clients(10_000, 500));
    }
}
