//! Plans, subscription requests and running subscriptions.

use crate::domain::agency::Agency;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::subscription::{NewSubscriptionPlan, SubscriptionPlan};
use crate::domain::types::{PlanId, RequestStatus, SubscriptionRequestId};
use crate::dto::subscriptions::{SubscriptionsPageData, SubscriptionsQuery};
use crate::forms::subscriptions::AddPlanForm;
use crate::repository::{
    AgencyReader, PlanReader, PlanWriter, SubscriptionRequestQuery, SubscriptionRequestReader,
    SubscriptionRequestWriter,
};
use crate::services::{ServiceError, ServiceResult, ensure_super_admin, search_term, today};

pub const REQUEST_ALREADY_HANDLED: &str = "تمت معالجة هذا الطلب مسبقاً";

pub fn load_subscriptions<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: SubscriptionsQuery,
) -> ServiceResult<SubscriptionsPageData>
where
    R: AgencyReader + PlanReader + SubscriptionRequestReader + ?Sized,
{
    ensure_super_admin(user)?;

    let search_query = search_term(query.search);

    let plans = repo.list_plans(false).map_err(|err| {
        log::error!("Failed to list plans: {err}");
        err
    })?;

    let requests = repo.list_subscription_requests(SubscriptionRequestQuery {
        status: Some(RequestStatus::Pending),
        search: search_query.clone(),
    })?;

    Ok(SubscriptionsPageData {
        plans,
        requests,
        active_subscriptions: repo.list_active_subscriptions()?,
        search_query,
    })
}

pub fn add_plan<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPlanForm,
) -> ServiceResult<SubscriptionPlan>
where
    R: PlanWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let new_plan = NewSubscriptionPlan::try_from(form)?;

    let plan = repo.create_plan(&new_plan).map_err(|err| {
        log::error!("Failed to create plan: {err}");
        err
    })?;

    Ok(plan)
}

/// Hides an active plan from agencies or offers an inactive one again.
pub fn toggle_plan<R>(
    repo: &R,
    user: &AuthenticatedUser,
    plan_id: i32,
) -> ServiceResult<SubscriptionPlan>
where
    R: PlanReader + PlanWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let plan_id = PlanId::new(plan_id).map_err(|_| ServiceError::NotFound)?;
    let plan = repo
        .get_plan_by_id(plan_id)?
        .ok_or(ServiceError::NotFound)?;

    let updated = repo
        .set_plan_active(plan_id, !plan.is_active)
        .map_err(|err| {
            log::error!("Failed to toggle plan {plan_id}: {err}");
            err
        })?;

    Ok(updated)
}

/// Activates the requesting agency on the plan starting today.
pub fn approve_request<R>(
    repo: &R,
    user: &AuthenticatedUser,
    request_id: i32,
) -> ServiceResult<Agency>
where
    R: PlanReader + SubscriptionRequestReader + SubscriptionRequestWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let request_id = SubscriptionRequestId::new(request_id).map_err(|_| ServiceError::NotFound)?;
    let request = repo
        .get_subscription_request(request_id)?
        .ok_or(ServiceError::NotFound)?;

    if request.status != RequestStatus::Pending {
        return Err(ServiceError::Conflict(REQUEST_ALREADY_HANDLED.to_string()));
    }

    let plan = repo
        .get_plan_by_id(request.plan_id)?
        .ok_or(ServiceError::NotFound)?;

    let subscription_ends = plan.ends_on(today()).ok_or_else(|| {
        ServiceError::Internal(format!("plan {} ends out of calendar range", plan.id))
    })?;

    let agency = repo
        .approve_subscription_request(&request, subscription_ends)
        .map_err(|err| {
            log::error!("Failed to approve request {request_id}: {err}");
            err
        })?;

    Ok(agency)
}

pub fn reject_request<R>(repo: &R, user: &AuthenticatedUser, request_id: i32) -> ServiceResult<()>
where
    R: SubscriptionRequestReader + SubscriptionRequestWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let request_id = SubscriptionRequestId::new(request_id).map_err(|_| ServiceError::NotFound)?;
    let request = repo
        .get_subscription_request(request_id)?
        .ok_or(ServiceError::NotFound)?;

    if request.status != RequestStatus::Pending {
        return Err(ServiceError::Conflict(REQUEST_ALREADY_HANDLED.to_string()));
    }

    repo.reject_subscription_request(request_id)
        .map_err(|err| {
            log::error!("Failed to reject request {request_id}: {err}");
            err
        })?;

    Ok(())
}
