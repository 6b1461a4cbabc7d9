//! Profile, agency and messaging preferences.

use crate::auth::{hash_password, verify_password};
use crate::domain::agency::{Agency, UpdateAgencyInfo};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::subscription::NewSubscriptionRequest;
use crate::domain::types::{AgencyId, PersonName, PlanId};
use crate::domain::user::User;
use crate::dto::settings::{AgencySection, SettingsPageData};
use crate::forms::settings::{
    AgencyInfoForm, PasswordChange, PasswordForm, ProfileForm, SubscriptionRequestForm,
    TemplateForm,
};
use crate::repository::{
    AgencyReader, AgencyWriter, PlanReader, SettingsReader, SettingsWriter,
    SubscriptionRequestReader, SubscriptionRequestWriter, UserReader, UserWriter,
};
use crate::services::{ServiceError, ServiceResult, agency_scope};
use crate::whatsapp::{DEFAULT_TEMPLATE, preview};

pub const WRONG_CURRENT_PASSWORD: &str = "كلمة المرور الحالية غير صحيحة";
pub const PLAN_UNAVAILABLE: &str = "الباقة غير متاحة";
pub const REQUEST_ALREADY_PENDING: &str = "لديك طلب اشتراك قيد المراجعة";

fn current_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;
    repo.get_user_by_id(user_id)?
        .ok_or(ServiceError::Unauthorized)
}

fn load_agency_section<R>(repo: &R, agency_id: AgencyId) -> ServiceResult<AgencySection>
where
    R: AgencyReader + PlanReader + SettingsReader + SubscriptionRequestReader + ?Sized,
{
    let agency = repo
        .get_agency_by_id(agency_id)?
        .ok_or(ServiceError::NotFound)?;

    let settings = repo.get_settings(agency_id)?;
    let custom = settings.and_then(|settings| settings.whatsapp_template);
    let is_default_template = custom.is_none();
    let template = custom.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

    let current_plan = match agency.plan_id {
        Some(plan_id) => repo.get_plan_by_id(plan_id)?,
        None => None,
    };

    Ok(AgencySection {
        preview: preview(&template),
        template,
        is_default_template,
        plans: repo.list_plans(true)?,
        current_plan,
        has_pending_request: repo.has_pending_request(agency_id)?,
        agency,
    })
}

pub fn load_settings<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: UserReader
        + AgencyReader
        + PlanReader
        + SettingsReader
        + SubscriptionRequestReader
        + ?Sized,
{
    let profile = current_profile(repo, user).map_err(|err| {
        log::error!("Failed to load profile: {err}");
        err
    })?;

    let agency = match user.agency_id() {
        Some(agency_id) => Some(load_agency_section(repo, agency_id)?),
        None => None,
    };

    Ok(SettingsPageData { profile, agency })
}

pub fn update_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProfileForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;
    let name = PersonName::try_from(form)?;

    let updated = repo.update_user_name(user_id, &name).map_err(|err| {
        log::error!("Failed to update profile {user_id}: {err}");
        err
    })?;

    Ok(updated)
}

pub fn change_password<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: PasswordForm,
) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    let change = PasswordChange::try_from(form)?;
    let profile = current_profile(repo, user)?;

    if !verify_password(&change.current, &profile.password_hash) {
        return Err(ServiceError::Form(WRONG_CURRENT_PASSWORD.to_string()));
    }

    let password_hash = hash_password(&change.new).map_err(|err| {
        log::error!("Failed to hash password: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    repo.update_user_password(profile.id, &password_hash)
        .map_err(|err| {
            log::error!("Failed to change password of {}: {err}", profile.id);
            err
        })?;

    Ok(())
}

pub fn update_agency_info<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AgencyInfoForm,
) -> ServiceResult<Agency>
where
    R: AgencyWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let info = UpdateAgencyInfo::try_from(form)?;

    let agency = repo.update_agency_info(agency_id, &info).map_err(|err| {
        log::error!("Failed to update agency {agency_id}: {err}");
        err
    })?;

    Ok(agency)
}

pub fn save_template<R>(repo: &R, user: &AuthenticatedUser, form: TemplateForm) -> ServiceResult<()>
where
    R: SettingsWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let template = form.into_template()?;

    repo.save_whatsapp_template(agency_id, Some(template))
        .map_err(|err| {
            log::error!("Failed to save template of agency {agency_id}: {err}");
            err
        })?;

    Ok(())
}

/// Drops the custom template so the default one applies again.
pub fn reset_template<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<()>
where
    R: SettingsWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;

    repo.save_whatsapp_template(agency_id, None)
        .map_err(|err| {
            log::error!("Failed to reset template of agency {agency_id}: {err}");
            err
        })?;

    Ok(())
}

/// Renders an unsaved template with sample values.
pub fn preview_template(user: &AuthenticatedUser, form: TemplateForm) -> ServiceResult<String> {
    agency_scope(user)?;
    Ok(preview(&form.into_template()?))
}

/// Asks the super-admin to move the agency to an active plan.
pub fn request_subscription<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SubscriptionRequestForm,
) -> ServiceResult<()>
where
    R: PlanReader + SubscriptionRequestReader + SubscriptionRequestWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let plan_id = PlanId::try_from(form)?;

    let plan = repo
        .get_plan_by_id(plan_id)?
        .filter(|plan| plan.is_active)
        .ok_or_else(|| ServiceError::Form(PLAN_UNAVAILABLE.to_string()))?;

    if repo.has_pending_request(agency_id)? {
        return Err(ServiceError::Conflict(REQUEST_ALREADY_PENDING.to_string()));
    }

    repo.create_subscription_request(&NewSubscriptionRequest {
        agency_id,
        plan_id: plan.id,
    })
    .map_err(|err| {
        log::error!("Failed to request plan {plan_id} for agency {agency_id}: {err}");
        err
    })?;

    Ok(())
}
