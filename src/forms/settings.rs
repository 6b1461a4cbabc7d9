use serde::Deserialize;
use validator::Validate;

use crate::domain::agency::UpdateAgencyInfo;
use crate::domain::types::{AgencyName, PersonName, PlanId};
use crate::forms::{FormError, check_new_password, non_empty, plain_text};

#[derive(Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1))]
    pub name: String,
}

impl TryFrom<ProfileForm> for PersonName {
    type Error = FormError;

    fn try_from(form: ProfileForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(PersonName::new(form.name)?)
    }
}

#[derive(Deserialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 1))]
    pub new_password: String,
    #[validate(length(min = 1))]
    pub confirm_password: String,
}

pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

impl TryFrom<PasswordForm> for PasswordChange {
    type Error = FormError;

    fn try_from(form: PasswordForm) -> Result<Self, Self::Error> {
        form.validate()?;
        check_new_password(&form.new_password, &form.confirm_password)?;
        Ok(Self {
            current: form.current_password,
            new: form.new_password,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct AgencyInfoForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl TryFrom<AgencyInfoForm> for UpdateAgencyInfo {
    type Error = FormError;

    fn try_from(form: AgencyInfoForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(UpdateAgencyInfo::new(
            AgencyName::new(form.name)?,
            non_empty(&form.phone).map(plain_text),
            non_empty(&form.address).map(plain_text),
        ))
    }
}

#[derive(Deserialize, Validate)]
pub struct TemplateForm {
    #[validate(length(min = 1))]
    pub template: String,
}

impl TemplateForm {
    /// Returns the sanitized template text.
    pub fn into_template(self) -> Result<String, FormError> {
        self.validate()?;
        let template = plain_text(&self.template);
        if template.is_empty() {
            return Err(FormError::InvalidValue(self.template));
        }
        Ok(template)
    }
}

#[derive(Deserialize)]
pub struct SubscriptionRequestForm {
    pub plan_id: i32,
}

impl TryFrom<SubscriptionRequestForm> for PlanId {
    type Error = FormError;

    fn try_from(form: SubscriptionRequestForm) -> Result<Self, Self::Error> {
        Ok(PlanId::new(form.plan_id)?)
    }
}
