//! Super-admin management of agencies.

use crate::auth::hash_password;
use crate::domain::agency::{Agency, AgencyStatusChange, NewAgency};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{AgencyId, AgencyStatus, Role};
use crate::domain::user::NewUser;
use crate::dto::agencies::{AgenciesPageData, AgenciesQuery};
use crate::forms::agencies::{AddAgencyForm, AddAgencyPayload};
use crate::repository::{AgencyListQuery, AgencyReader, AgencyWriter, UserReader};
use crate::services::{ServiceError, ServiceResult, ensure_super_admin, search_term, today};

pub const EMAIL_TAKEN: &str = "البريد الإلكتروني مستخدم بالفعل";

pub fn list_agencies<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: AgenciesQuery,
) -> ServiceResult<AgenciesPageData>
where
    R: AgencyReader + ?Sized,
{
    ensure_super_admin(user)?;

    let search_query = search_term(query.search);
    let agencies = repo
        .list_agencies(AgencyListQuery {
            search: search_query.clone(),
        })
        .map_err(|err| {
            log::error!("Failed to list agencies: {err}");
            err
        })?;

    let active_count = agencies
        .iter()
        .filter(|overview| overview.agency.status == AgencyStatus::Active)
        .count();

    Ok(AgenciesPageData {
        pending_count: agencies.len() - active_count,
        active_count,
        agencies,
        search_query,
    })
}

/// Creates an agency together with its owner account.
pub fn add_agency<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddAgencyForm,
) -> ServiceResult<Agency>
where
    R: UserReader + AgencyWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let payload = AddAgencyPayload::try_from(form)?;

    if repo.get_user_by_email(&payload.owner_email)?.is_some() {
        return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(&payload.owner_password).map_err(|err| {
        log::error!("Failed to hash password: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let new_agency = NewAgency::new(payload.name, payload.status, today());
    let owner = NewUser::new(
        None,
        payload.owner_email,
        password_hash,
        payload.owner_name,
        Role::Agency,
    );

    let (agency, _) = repo.register_agency(&new_agency, &owner).map_err(|err| {
        if err.is_unique_violation() {
            return ServiceError::Conflict(EMAIL_TAKEN.to_string());
        }
        log::error!("Failed to create agency: {err}");
        ServiceError::from(err)
    })?;

    Ok(agency)
}

/// Activates a pending agency or suspends an active one.
pub fn toggle_agency_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    agency_id: i32,
) -> ServiceResult<Agency>
where
    R: AgencyReader + AgencyWriter + ?Sized,
{
    ensure_super_admin(user)?;

    let agency_id = AgencyId::new(agency_id).map_err(|_| ServiceError::NotFound)?;
    let agency = repo
        .get_agency_by_id(agency_id)?
        .ok_or(ServiceError::NotFound)?;

    let change = AgencyStatusChange::toggle(&agency, today());

    let updated = repo
        .update_agency_status(agency_id, &change)
        .map_err(|err| {
            log::error!("Failed to change status of agency {agency_id}: {err}");
            err
        })?;

    Ok(updated)
}
