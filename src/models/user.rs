//! Diesel models for user profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{AgencyId, Email, PersonName, Role, TypeConstraintError, UserId};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Profile {
    pub id: i32,
    pub agency_id: Option<i32>,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::profiles)]
pub struct NewProfile<'a> {
    pub agency_id: Option<i32>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

impl TryFrom<Profile> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(profile.id)?,
            agency_id: profile.agency_id.map(AgencyId::new).transpose()?,
            email: Email::new(profile.email)?,
            password_hash: profile.password_hash,
            name: PersonName::new(profile.name)?,
            role: Role::try_from(profile.role)?,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewProfile<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            agency_id: user.agency_id.map(AgencyId::get),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            name: user.name.as_str(),
            role: user.role.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_into_insertable() {
        let domain = DomainNewUser::new(
            Some(AgencyId::new(3).unwrap()),
            Email::new("Owner@Agency.com").unwrap(),
            "$argon2id$hash".to_string(),
            PersonName::new("أحمد").unwrap(),
            Role::Agency,
        );

        let insertable: NewProfile = (&domain).into();

        assert_eq!(insertable.agency_id, Some(3));
        assert_eq!(insertable.email, "owner@agency.com");
        assert_eq!(insertable.role, "agency");
    }
}
