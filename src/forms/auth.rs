use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{AgencyName, Email, PersonName};
use crate::forms::{FormError, check_new_password};

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
/// Self-service sign-up of an agency and its owner.
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub agency_name: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub confirm_password: String,
}

pub struct RegisterPayload {
    pub agency_name: AgencyName,
    pub owner_name: PersonName,
    pub email: Email,
    pub password: String,
}

impl TryFrom<RegisterForm> for RegisterPayload {
    type Error = FormError;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;
        check_new_password(&form.password, &form.confirm_password)?;

        Ok(Self {
            agency_name: AgencyName::new(form.agency_name)?,
            owner_name: PersonName::new(form.name)?,
            email: Email::new(form.email)?,
            password: form.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            agency_name: " وكالة النجم ".to_string(),
            name: "خالد".to_string(),
            email: "Khaled@Example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn register_form_normalizes_fields() {
        let payload = RegisterPayload::try_from(form("secret123", "secret123")).unwrap();
        assert_eq!(payload.agency_name.as_str(), "وكالة النجم");
        assert_eq!(payload.email.as_str(), "khaled@example.com");
    }

    #[test]
    fn register_form_rejects_mismatched_passwords() {
        let err = RegisterPayload::try_from(form("secret123", "secret124"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "كلمة المرور غير متطابقة");
    }

    #[test]
    fn register_form_requires_every_field() {
        let mut incomplete = form("secret123", "secret123");
        incomplete.agency_name.clear();
        assert!(matches!(
            RegisterPayload::try_from(incomplete),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn register_form_rejects_bad_email() {
        let mut bad = form("secret123", "secret123");
        bad.email = "not-an-email".to_string();
        assert!(matches!(
            RegisterPayload::try_from(bad),
            Err(FormError::InvalidEmail)
        ));
    }
}
