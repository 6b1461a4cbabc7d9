//! Diesel models for subscription plans and requests.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscription::{
    NewSubscriptionPlan as DomainNewPlan, NewSubscriptionRequest as DomainNewRequest,
    SubscriptionPlan as DomainPlan, SubscriptionRequest as DomainRequest,
};
use crate::domain::types::{
    AgencyId, Amount, PlanId, PlanName, RequestStatus, SubscriptionRequestId, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscription_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionPlan {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub duration_days: i32,
    pub max_clients: Option<i32>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscription_plans)]
pub struct NewSubscriptionPlan<'a> {
    pub name: &'a str,
    pub price: i64,
    pub duration_days: i32,
    pub max_clients: Option<i32>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscription_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionRequest {
    pub id: i32,
    pub agency_id: i32,
    pub plan_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscription_requests)]
pub struct NewSubscriptionRequest {
    pub agency_id: i32,
    pub plan_id: i32,
}

fn non_negative(value: i32) -> Result<u32, TypeConstraintError> {
    u32::try_from(value).map_err(|_| TypeConstraintError::InvalidValue(value.to_string()))
}

fn clamp_to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl TryFrom<SubscriptionPlan> for DomainPlan {
    type Error = TypeConstraintError;

    fn try_from(plan: SubscriptionPlan) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlanId::new(plan.id)?,
            name: PlanName::new(plan.name)?,
            price: Amount::from_minor(plan.price)?,
            duration_days: non_negative(plan.duration_days)?,
            max_clients: plan.max_clients.map(non_negative).transpose()?,
            is_active: plan.is_active,
            created_at: plan.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewPlan> for NewSubscriptionPlan<'a> {
    fn from(plan: &'a DomainNewPlan) -> Self {
        Self {
            name: plan.name.as_str(),
            price: plan.price.minor(),
            duration_days: clamp_to_i32(plan.duration_days),
            max_clients: plan.max_clients.map(clamp_to_i32),
        }
    }
}

impl TryFrom<SubscriptionRequest> for DomainRequest {
    type Error = TypeConstraintError;

    fn try_from(request: SubscriptionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SubscriptionRequestId::new(request.id)?,
            agency_id: AgencyId::new(request.agency_id)?,
            plan_id: PlanId::new(request.plan_id)?,
            status: RequestStatus::try_from(request.status)?,
            created_at: request.created_at,
            updated_at: request.updated_at,
        })
    }
}

impl From<&DomainNewRequest> for NewSubscriptionRequest {
    fn from(request: &DomainNewRequest) -> Self {
        Self {
            agency_id: request.agency_id.get(),
            plan_id: request.plan_id.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_plan_maps_to_none() {
        let db = SubscriptionPlan {
            id: 3,
            name: "باقة للشركات".to_string(),
            price: 599_900,
            duration_days: 365,
            max_clients: None,
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
        };

        let plan = DomainPlan::try_from(db).expect("valid plan");

        assert_eq!(plan.max_clients, None);
        assert_eq!(plan.duration_days, 365);
        assert_eq!(plan.price.minor(), 599_900);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let db = SubscriptionPlan {
            id: 3,
            name: "x".to_string(),
            price: 1,
            duration_days: -1,
            max_clients: None,
            is_active: true,
            created_at: chrono::Utc::now().naive_utc(),
        };

        assert!(DomainPlan::try_from(db).is_err());
    }
}
