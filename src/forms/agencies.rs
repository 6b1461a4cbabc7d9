use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AgencyName, AgencyStatus, Email, PersonName};
use crate::forms::{FormError, MIN_PASSWORD_LENGTH, non_empty};

#[derive(Deserialize, Validate)]
/// Super-admin form creating an agency together with its owner account.
pub struct AddAgencyForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub owner_name: String,
    #[validate(length(min = 1))]
    pub owner_email: String,
    #[validate(length(min = 1))]
    pub owner_password: String,
    #[serde(default)]
    pub status: String,
}

pub struct AddAgencyPayload {
    pub name: AgencyName,
    pub status: AgencyStatus,
    pub owner_name: PersonName,
    pub owner_email: Email,
    pub owner_password: String,
}

impl TryFrom<AddAgencyForm> for AddAgencyPayload {
    type Error = FormError;

    fn try_from(form: AddAgencyForm) -> Result<Self, Self::Error> {
        form.validate()?;

        if form.owner_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }

        let status = match non_empty(&form.status) {
            Some(status) => AgencyStatus::try_from(status)?,
            None => AgencyStatus::Pending,
        };

        Ok(Self {
            name: AgencyName::new(form.name)?,
            status,
            owner_name: PersonName::new(form.owner_name)?,
            owner_email: Email::new(form.owner_email)?,
            owner_password: form.owner_password,
        })
    }
}
