use serde::Serialize;

use crate::domain::subscription::{ActiveSubscription, SubscriptionPlan, SubscriptionRequestView};

#[derive(Debug, Default)]
pub struct SubscriptionsQuery {
    /// Filters pending requests by agency name.
    pub search: Option<String>,
}

/// Plans, pending requests and running subscriptions on one page.
#[derive(Debug, Serialize)]
pub struct SubscriptionsPageData {
    pub plans: Vec<SubscriptionPlan>,
    pub requests: Vec<SubscriptionRequestView>,
    pub active_subscriptions: Vec<ActiveSubscription>,
    pub search_query: Option<String>,
}
