use std::collections::HashMap;

use chrono::Utc;
use diesel::dsl::count;
use diesel::prelude::*;

use crate::domain::agency::{
    Agency, AgencyOverview, AgencyStatusChange, NewAgency, UpdateAgencyInfo,
};
use crate::domain::subscription::{ActiveSubscription, SubscriptionPlan};
use crate::domain::types::{AgencyId, AgencyStatus, Role};
use crate::domain::user::{NewUser, User};
use crate::models::agency::{
    Agency as DbAgency, NewAgency as DbNewAgency, UpdateAgencyInfo as DbUpdateAgencyInfo,
};
use crate::models::subscription::SubscriptionPlan as DbPlan;
use crate::models::user::{NewProfile, Profile};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AgencyListQuery, AgencyReader, AgencyWriter, DieselRepository, LIKE_ESCAPE, like_pattern,
};

impl AgencyReader for DieselRepository {
    fn get_agency_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let agency = agencies::table
            .find(id.get())
            .select(DbAgency::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(agency.map(Agency::try_from).transpose()?)
    }

    fn list_agencies(&self, query: AgencyListQuery) -> RepositoryResult<Vec<AgencyOverview>> {
        use crate::schema::{agencies, clients, profiles};

        let mut conn = self.conn()?;

        let search = like_pattern(query.search.as_deref());

        let mut agencies_query = agencies::table
            .select(DbAgency::as_select())
            .order((agencies::created_at.desc(), agencies::id.desc()))
            .into_boxed();

        if let Some(pattern) = &search {
            let matching_owners = profiles::table
                .filter(profiles::role.eq(Role::Agency.as_str()))
                .filter(
                    profiles::name
                        .like(pattern)
                        .escape(LIKE_ESCAPE)
                        .or(profiles::email.like(pattern).escape(LIKE_ESCAPE)),
                )
                .select(profiles::agency_id);
            agencies_query = agencies_query.filter(
                agencies::name
                    .like(pattern)
                    .escape(LIKE_ESCAPE)
                    .or(agencies::id.nullable().eq_any(matching_owners)),
            );
        }

        let rows = agencies_query.load(&mut conn)?;
        let ids: Vec<i32> = rows.iter().map(|agency| agency.id).collect();

        let mut owners: HashMap<i32, Profile> = HashMap::new();
        for profile in profiles::table
            .filter(profiles::agency_id.eq_any(&ids))
            .filter(profiles::role.eq(Role::Agency.as_str()))
            .order(profiles::id.asc())
            .select(Profile::as_select())
            .load(&mut conn)?
        {
            if let Some(agency_id) = profile.agency_id {
                owners.entry(agency_id).or_insert(profile);
            }
        }

        let client_counts: HashMap<i32, i64> = clients::table
            .filter(clients::agency_id.eq_any(&ids))
            .group_by(clients::agency_id)
            .select((clients::agency_id, count(clients::id)))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| -> RepositoryResult<AgencyOverview> {
                let owner = owners.remove(&row.id).map(User::try_from).transpose()?;
                let client_count = client_counts.get(&row.id).copied().unwrap_or(0);
                Ok(AgencyOverview {
                    agency: Agency::try_from(row)?,
                    owner,
                    client_count: usize::try_from(client_count).unwrap_or(0),
                })
            })
            .collect()
    }

    fn list_recent_agencies(&self, limit: usize) -> RepositoryResult<Vec<Agency>> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let rows = agencies::table
            .order((agencies::created_at.desc(), agencies::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(DbAgency::as_select())
            .load(&mut conn)?;

        rows.into_iter()
            .map(|row| Agency::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn list_active_subscriptions(&self) -> RepositoryResult<Vec<ActiveSubscription>> {
        use crate::schema::{agencies, subscription_plans};

        let mut conn = self.conn()?;
        let rows: Vec<(DbAgency, Option<DbPlan>)> = agencies::table
            .left_join(subscription_plans::table)
            .filter(agencies::status.eq(AgencyStatus::Active.as_str()))
            .order(agencies::subscription_ends.asc())
            .select((DbAgency::as_select(), Option::<DbPlan>::as_select()))
            .load(&mut conn)?;

        rows.into_iter()
            .map(|(agency, plan)| -> RepositoryResult<ActiveSubscription> {
                Ok(ActiveSubscription {
                    agency: Agency::try_from(agency)?,
                    plan: plan.map(SubscriptionPlan::try_from).transpose()?,
                })
            })
            .collect()
    }
}

impl AgencyWriter for DieselRepository {
    fn register_agency(
        &self,
        agency: &NewAgency,
        owner: &NewUser,
    ) -> RepositoryResult<(Agency, User)> {
        use crate::schema::{agencies, profiles, settings};

        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let created: DbAgency = diesel::insert_into(agencies::table)
                .values(DbNewAgency::from(agency))
                .returning(DbAgency::as_returning())
                .get_result(conn)?;

            let profile = NewProfile {
                agency_id: Some(created.id),
                ..NewProfile::from(owner)
            };
            let profile: Profile = diesel::insert_into(profiles::table)
                .values(&profile)
                .returning(Profile::as_returning())
                .get_result(conn)?;

            diesel::insert_into(settings::table)
                .values(settings::agency_id.eq(created.id))
                .execute(conn)?;

            Ok((Agency::try_from(created)?, User::try_from(profile)?))
        })
    }

    fn update_agency_status(
        &self,
        id: AgencyId,
        change: &AgencyStatusChange,
    ) -> RepositoryResult<Agency> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let updated = diesel::update(agencies::table.find(id.get()))
            .set((
                agencies::status.eq(change.status.as_str()),
                agencies::subscription_ends.eq(change.subscription_ends),
                agencies::updated_at.eq(Utc::now().naive_utc()),
            ))
            .returning(DbAgency::as_returning())
            .get_result(&mut conn)?;

        Ok(Agency::try_from(updated)?)
    }

    fn update_agency_info(
        &self,
        id: AgencyId,
        info: &UpdateAgencyInfo,
    ) -> RepositoryResult<Agency> {
        use crate::schema::agencies;

        let mut conn = self.conn()?;
        let updated = diesel::update(agencies::table.find(id.get()))
            .set(DbUpdateAgencyInfo::from(info))
            .returning(DbAgency::as_returning())
            .get_result(&mut conn)?;

        Ok(Agency::try_from(updated)?)
    }
}
