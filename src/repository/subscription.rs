use chrono::{NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::agency::Agency;
use crate::domain::subscription::{
    NewSubscriptionPlan, NewSubscriptionRequest, SubscriptionPlan, SubscriptionRequest,
    SubscriptionRequestView,
};
use crate::domain::types::{AgencyId, AgencyStatus, PlanId, RequestStatus, SubscriptionRequestId};
use crate::models::agency::Agency as DbAgency;
use crate::models::subscription::{
    NewSubscriptionPlan as DbNewPlan, NewSubscriptionRequest as DbNewRequest,
    SubscriptionPlan as DbPlan, SubscriptionRequest as DbRequest,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    DieselRepository, LIKE_ESCAPE, PlanReader, PlanWriter, SubscriptionRequestQuery,
    SubscriptionRequestReader, SubscriptionRequestWriter, like_pattern,
};

impl PlanReader for DieselRepository {
    fn list_plans(&self, active_only: bool) -> RepositoryResult<Vec<SubscriptionPlan>> {
        use crate::schema::subscription_plans;

        let mut conn = self.conn()?;
        let mut query = subscription_plans::table
            .order((
                subscription_plans::price.asc(),
                subscription_plans::id.asc(),
            ))
            .select(DbPlan::as_select())
            .into_boxed();

        if active_only {
            query = query.filter(subscription_plans::is_active.eq(true));
        }

        query
            .load(&mut conn)?
            .into_iter()
            .map(|plan| SubscriptionPlan::try_from(plan).map_err(RepositoryError::from))
            .collect()
    }

    fn get_plan_by_id(&self, id: PlanId) -> RepositoryResult<Option<SubscriptionPlan>> {
        use crate::schema::subscription_plans;

        let mut conn = self.conn()?;
        let plan = subscription_plans::table
            .find(id.get())
            .select(DbPlan::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(plan.map(SubscriptionPlan::try_from).transpose()?)
    }
}

impl PlanWriter for DieselRepository {
    fn create_plan(&self, plan: &NewSubscriptionPlan) -> RepositoryResult<SubscriptionPlan> {
        use crate::schema::subscription_plans;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(subscription_plans::table)
            .values(DbNewPlan::from(plan))
            .returning(DbPlan::as_returning())
            .get_result(&mut conn)?;

        Ok(SubscriptionPlan::try_from(created)?)
    }

    fn set_plan_active(&self, id: PlanId, is_active: bool) -> RepositoryResult<SubscriptionPlan> {
        use crate::schema::subscription_plans;

        let mut conn = self.conn()?;
        let updated = diesel::update(subscription_plans::table.find(id.get()))
            .set(subscription_plans::is_active.eq(is_active))
            .returning(DbPlan::as_returning())
            .get_result(&mut conn)?;

        Ok(SubscriptionPlan::try_from(updated)?)
    }
}

impl SubscriptionRequestReader for DieselRepository {
    fn list_subscription_requests(
        &self,
        query: SubscriptionRequestQuery,
    ) -> RepositoryResult<Vec<SubscriptionRequestView>> {
        use crate::schema::{agencies, subscription_plans, subscription_requests};

        let mut conn = self.conn()?;

        let pattern = like_pattern(query.search.as_deref());

        let mut items = subscription_requests::table
            .inner_join(agencies::table)
            .inner_join(
                subscription_plans::table
                    .on(subscription_requests::plan_id.eq(subscription_plans::id)),
            )
            .order((
                subscription_requests::created_at.desc(),
                subscription_requests::id.desc(),
            ))
            .select((
                DbRequest::as_select(),
                DbAgency::as_select(),
                DbPlan::as_select(),
            ))
            .into_boxed();

        if let Some(status) = query.status {
            items = items.filter(subscription_requests::status.eq(status.as_str()));
        }
        if let Some(pattern) = &pattern {
            items = items.filter(agencies::name.like(pattern).escape(LIKE_ESCAPE));
        }

        items
            .load::<(DbRequest, DbAgency, DbPlan)>(&mut conn)?
            .into_iter()
            .map(|(request, agency, plan)| -> RepositoryResult<SubscriptionRequestView> {
                Ok(SubscriptionRequestView {
                    request: SubscriptionRequest::try_from(request)?,
                    agency: Agency::try_from(agency)?,
                    plan: SubscriptionPlan::try_from(plan)?,
                })
            })
            .collect()
    }

    fn get_subscription_request(
        &self,
        id: SubscriptionRequestId,
    ) -> RepositoryResult<Option<SubscriptionRequest>> {
        use crate::schema::subscription_requests;

        let mut conn = self.conn()?;
        let request = subscription_requests::table
            .find(id.get())
            .select(DbRequest::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(request.map(SubscriptionRequest::try_from).transpose()?)
    }

    fn has_pending_request(&self, agency_id: AgencyId) -> RepositoryResult<bool> {
        use crate::schema::subscription_requests;

        let mut conn = self.conn()?;
        let pending = diesel::select(diesel::dsl::exists(
            subscription_requests::table
                .filter(subscription_requests::agency_id.eq(agency_id.get()))
                .filter(subscription_requests::status.eq(RequestStatus::Pending.as_str())),
        ))
        .get_result(&mut conn)?;

        Ok(pending)
    }
}

impl SubscriptionRequestWriter for DieselRepository {
    fn create_subscription_request(
        &self,
        request: &NewSubscriptionRequest,
    ) -> RepositoryResult<SubscriptionRequest> {
        use crate::schema::subscription_requests;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(subscription_requests::table)
            .values(DbNewRequest::from(request))
            .returning(DbRequest::as_returning())
            .get_result(&mut conn)?;

        Ok(SubscriptionRequest::try_from(created)?)
    }

    fn approve_subscription_request(
        &self,
        request: &SubscriptionRequest,
        subscription_ends: NaiveDate,
    ) -> RepositoryResult<Agency> {
        use crate::schema::{agencies, subscription_requests};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(
                subscription_requests::table
                    .filter(subscription_requests::id.eq(request.id.get()))
                    .filter(subscription_requests::status.eq(RequestStatus::Pending.as_str())),
            )
            .set((
                subscription_requests::status.eq(RequestStatus::Approved.as_str()),
                subscription_requests::updated_at.eq(now),
            ))
            .execute(conn)?;

            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            let agency = diesel::update(agencies::table.find(request.agency_id.get()))
                .set((
                    agencies::status.eq(AgencyStatus::Active.as_str()),
                    agencies::plan_id.eq(Some(request.plan_id.get())),
                    agencies::subscription_ends.eq(Some(subscription_ends)),
                    agencies::updated_at.eq(now),
                ))
                .returning(DbAgency::as_returning())
                .get_result(conn)?;

            Ok(Agency::try_from(agency)?)
        })
    }

    fn reject_subscription_request(
        &self,
        id: SubscriptionRequestId,
    ) -> RepositoryResult<SubscriptionRequest> {
        use crate::schema::subscription_requests;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            subscription_requests::table
                .filter(subscription_requests::id.eq(id.get()))
                .filter(subscription_requests::status.eq(RequestStatus::Pending.as_str())),
        )
        .set((
            subscription_requests::status.eq(RequestStatus::Rejected.as_str()),
            subscription_requests::updated_at.eq(Utc::now().naive_utc()),
        ))
        .returning(DbRequest::as_returning())
        .get_result(&mut conn)?;

        Ok(SubscriptionRequest::try_from(updated)?)
    }
}
