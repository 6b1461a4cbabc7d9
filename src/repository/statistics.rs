use std::collections::HashMap;

use diesel::dsl::count;
use diesel::prelude::*;

use crate::domain::agency::Agency;
use crate::domain::statistics::{AgencyPerformance, PlatformStats};
use crate::domain::types::{AgencyStatus, Amount, PaymentStatus, RequestStatus};
use crate::models::agency::Agency as DbAgency;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, StatisticsReader};

fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

impl StatisticsReader for DieselRepository {
    fn platform_stats(&self) -> RepositoryResult<PlatformStats> {
        use crate::schema::{agencies, profiles, subscription_plans, subscription_requests};

        let mut conn = self.conn()?;

        let total_users: i64 = profiles::table.count().get_result(&mut conn)?;

        let statuses: Vec<String> = agencies::table.select(agencies::status).load(&mut conn)?;
        let mut stats = PlatformStats {
            total_users: to_usize(total_users),
            total_agencies: statuses.len(),
            ..PlatformStats::default()
        };
        for status in statuses {
            match AgencyStatus::try_from(status)? {
                AgencyStatus::Active => stats.active_agencies += 1,
                AgencyStatus::Pending => stats.pending_agencies += 1,
            }
        }

        let pending_requests: i64 = subscription_requests::table
            .filter(subscription_requests::status.eq(RequestStatus::Pending.as_str()))
            .count()
            .get_result(&mut conn)?;
        stats.pending_requests = to_usize(pending_requests);

        let approved_prices: Vec<i64> = subscription_requests::table
            .inner_join(
                subscription_plans::table
                    .on(subscription_requests::plan_id.eq(subscription_plans::id)),
            )
            .filter(subscription_requests::status.eq(RequestStatus::Approved.as_str()))
            .select(subscription_plans::price)
            .load(&mut conn)?;
        for price in approved_prices {
            stats.revenue = stats.revenue.saturating_add(Amount::from_minor(price)?);
        }

        Ok(stats)
    }

    fn agency_performance(&self) -> RepositoryResult<Vec<AgencyPerformance>> {
        use crate::schema::{agencies, clients, payments};

        let mut conn = self.conn()?;

        let rows = agencies::table
            .order(agencies::name.asc())
            .select(DbAgency::as_select())
            .load(&mut conn)?;

        let client_counts: HashMap<i32, i64> = clients::table
            .group_by(clients::agency_id)
            .select((clients::agency_id, count(clients::id)))
            .load::<(i32, i64)>(&mut conn)?
            .into_iter()
            .collect();

        let mut completed: HashMap<i32, Amount> = HashMap::new();
        for (agency_id, amount) in payments::table
            .filter(payments::status.eq(PaymentStatus::Completed.as_str()))
            .select((payments::agency_id, payments::amount))
            .load::<(i32, i64)>(&mut conn)?
        {
            let amount = Amount::from_minor(amount)?;
            let total = completed.entry(agency_id).or_default();
            *total = total.saturating_add(amount);
        }

        let mut performance = rows
            .into_iter()
            .map(|row| -> RepositoryResult<AgencyPerformance> {
                let client_count = to_usize(client_counts.get(&row.id).copied().unwrap_or(0));
                let completed_total = completed.get(&row.id).copied().unwrap_or_default();
                Ok(AgencyPerformance {
                    agency: Agency::try_from(row)?,
                    client_count,
                    completed_total,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        performance.sort_by(|a, b| b.client_count.cmp(&a.client_count));
        Ok(performance)
    }
}
