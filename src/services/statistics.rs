//! Platform figures for the super-admin.

use crate::domain::auth::AuthenticatedUser;
use crate::dto::statistics::StatisticsPageData;
use crate::repository::StatisticsReader;
use crate::services::{ServiceResult, ensure_super_admin};

pub fn load_statistics<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<StatisticsPageData>
where
    R: StatisticsReader + ?Sized,
{
    ensure_super_admin(user)?;

    let stats = repo.platform_stats().map_err(|err| {
        log::error!("Failed to load platform stats: {err}");
        err
    })?;

    let performance = repo.agency_performance().map_err(|err| {
        log::error!("Failed to load agency performance: {err}");
        err
    })?;

    Ok(StatisticsPageData {
        activity_rate: stats.activity_rate(),
        stats,
        performance,
    })
}
