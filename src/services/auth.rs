//! Registration and login workflows.

use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::domain::agency::{Agency, NewAgency};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{AgencyStatus, Email, Role};
use crate::domain::user::{NewUser, User};
use crate::forms::FormError;
use crate::forms::auth::{LoginForm, RegisterForm, RegisterPayload};
use crate::repository::{AgencyReader, AgencyWriter, UserReader};
use crate::services::{ServiceError, ServiceResult, today};

pub const INVALID_CREDENTIALS: &str = "بيانات الدخول غير صحيحة";
pub const EMAIL_TAKEN: &str = "البريد الإلكتروني مستخدم بالفعل";

/// Profile that just signed in together with its agency.
#[derive(Debug)]
pub struct SignedIn {
    pub user: User,
    pub agency: Option<Agency>,
}

/// Creates a pending agency with its owner and settings.
pub fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<SignedIn>
where
    R: UserReader + AgencyWriter + ?Sized,
{
    let payload = RegisterPayload::try_from(form)?;

    if repo.get_user_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let password_hash = hash_password(&payload.password).map_err(|err| {
        log::error!("Failed to hash password: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    let new_agency = NewAgency::new(payload.agency_name, AgencyStatus::Pending, today());
    let owner = NewUser::new(
        None,
        payload.email,
        password_hash,
        payload.owner_name,
        Role::Agency,
    );

    let (agency, user) = repo.register_agency(&new_agency, &owner).map_err(|err| {
        if err.is_unique_violation() {
            return ServiceError::Conflict(EMAIL_TAKEN.to_string());
        }
        log::error!("Failed to register agency: {err}");
        ServiceError::from(err)
    })?;

    Ok(SignedIn {
        user,
        agency: Some(agency),
    })
}

/// Checks the credentials; unknown emails and wrong passwords look the same.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<SignedIn>
where
    R: UserReader + AgencyReader + ?Sized,
{
    form.validate().map_err(FormError::from)?;

    let invalid = || ServiceError::Form(INVALID_CREDENTIALS.to_string());

    let email = Email::new(form.email).map_err(|_| invalid())?;

    let user = repo
        .get_user_by_email(&email)
        .map_err(|err| {
            log::error!("Failed to load user: {err}");
            err
        })?
        .ok_or_else(invalid)?;

    if !verify_password(&form.password, &user.password_hash) {
        return Err(invalid());
    }

    let agency = match user.agency_id {
        Some(agency_id) => repo.get_agency_by_id(agency_id)?,
        None => None,
    };

    Ok(SignedIn { user, agency })
}

/// Reloads the profile behind the session so renamed users and agencies get
/// fresh claims.
pub fn refresh_session<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SignedIn>
where
    R: UserReader + AgencyReader + ?Sized,
{
    let user_id = user.user_id().ok_or(ServiceError::Unauthorized)?;

    let user = repo
        .get_user_by_id(user_id)?
        .ok_or(ServiceError::Unauthorized)?;

    let agency = match user.agency_id {
        Some(agency_id) => repo.get_agency_by_id(agency_id)?,
        None => None,
    };

    Ok(SignedIn { user, agency })
}
