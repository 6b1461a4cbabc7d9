use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, Email, PersonName, Role, UserId};

/// User profile with login credentials.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub agency_id: Option<AgencyId>,
    pub email: Email,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: PersonName,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub agency_id: Option<AgencyId>,
    pub email: Email,
    pub password_hash: String,
    pub name: PersonName,
    pub role: Role,
}

impl NewUser {
    #[must_use]
    pub fn new(
        agency_id: Option<AgencyId>,
        email: Email,
        password_hash: String,
        name: PersonName,
        role: Role,
    ) -> Self {
        Self {
            agency_id,
            email,
            password_hash,
            name,
            role,
        }
    }
}
