//! Form definitions backing the dashboard routes.

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub(crate) use crate::domain::types::plain_text;

pub mod agencies;
pub mod auth;
pub mod clients;
pub mod payments;
pub mod reminders;
pub mod settings;
pub mod subscriptions;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data. Messages are shown to
/// the user as-is.
pub enum FormError {
    #[error("يرجى تعبئة جميع الحقول المطلوبة")]
    Validation(#[from] ValidationErrors),

    #[error("كلمة المرور غير متطابقة")]
    PasswordMismatch,

    #[error("كلمة المرور يجب أن تتكون من 8 أحرف على الأقل")]
    PasswordTooShort,

    #[error("البريد الإلكتروني غير صالح")]
    InvalidEmail,

    #[error("رقم الهاتف غير صالح")]
    InvalidPhone,

    #[error("المبلغ غير صالح")]
    InvalidAmount,

    #[error("التاريخ غير صالح")]
    InvalidDate,

    #[error("قيمة غير صالحة: {0}")]
    InvalidValue(String),

    #[error("ملف CSV غير صالح: {0}")]
    Csv(String),
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidEmail => Self::InvalidEmail,
            TypeConstraintError::InvalidPhone => Self::InvalidPhone,
            TypeConstraintError::InvalidAmount => Self::InvalidAmount,
            other => Self::InvalidValue(other.to_string()),
        }
    }
}

/// Parses an `<input type="date">` value.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate)
}

/// Parses an optional numeric id from a `<select>` whose empty option means none.
pub(crate) fn parse_optional_id(value: &str) -> Result<Option<i32>, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| FormError::InvalidValue(trimmed.to_string()))
}

/// Trims the value and maps the empty string to `None`.
pub(crate) fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Checks a new password and its confirmation.
pub(crate) fn check_new_password(password: &str, confirmation: &str) -> Result<(), FormError> {
    if password != confirmation {
        return Err(FormError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FormError::PasswordTooShort);
    }
    Ok(())
}
