//! Session identity carried by every authenticated request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::agency::Agency;
use crate::domain::types::{AgencyId, Role, UserId};
use crate::domain::user::User;

/// Claims stored in the signed session token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Profile id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub agency_id: Option<i32>,
    pub agency_name: Option<String>,
    /// Expiration as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Builds the claims for a freshly authenticated profile.
    pub fn new(user: &User, agency: Option<&Agency>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            role: user.role,
            agency_id: user.agency_id.map(AgencyId::get),
            agency_name: agency.map(|agency| agency.name.as_str().to_string()),
            exp: usize::try_from(expires_at.timestamp()).unwrap_or(0),
        }
    }

    /// Profile id stored in `sub`.
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok().and_then(|id| UserId::new(id).ok())
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Agency the user works for; super-admins have none.
    pub fn agency_id(&self) -> Option<AgencyId> {
        match self.role {
            Role::SuperAdmin => None,
            Role::Admin | Role::Agency => self.agency_id.and_then(|id| AgencyId::new(id).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, agency_id: Option<i32>) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "agency@motopay.com".to_string(),
            name: "أحمد محمد".to_string(),
            role,
            agency_id,
            agency_name: None,
            exp: 0,
        }
    }

    #[test]
    fn super_admin_has_no_agency() {
        let admin = user(Role::SuperAdmin, Some(3));
        assert!(admin.is_super_admin());
        assert_eq!(admin.agency_id(), None);
    }

    #[test]
    fn agency_roles_resolve_agency_id() {
        assert_eq!(
            user(Role::Agency, Some(3)).agency_id(),
            Some(AgencyId::new(3).unwrap())
        );
        assert_eq!(
            user(Role::Admin, Some(4)).agency_id(),
            Some(AgencyId::new(4).unwrap())
        );
        assert_eq!(user(Role::Agency, None).agency_id(), None);
    }

    #[test]
    fn claims_are_built_from_profile() {
        let created = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let profile = User {
            id: UserId::new(12).unwrap(),
            agency_id: Some(AgencyId::new(3).unwrap()),
            email: crate::domain::types::Email::new("owner@agency.com").unwrap(),
            password_hash: "hash".to_string(),
            name: crate::domain::types::PersonName::new("سامي").unwrap(),
            role: Role::Agency,
            created_at: created,
            updated_at: created,
        };
        let expires = DateTime::from_timestamp(1_800_000_000, 0).unwrap();

        let claims = AuthenticatedUser::new(&profile, None, expires);

        assert_eq!(claims.sub, "12");
        assert_eq!(claims.user_id(), Some(UserId::new(12).unwrap()));
        assert_eq!(claims.agency_id, Some(3));
        assert_eq!(claims.agency_name, None);
        assert_eq!(claims.exp, 1_800_000_000);
    }

    #[test]
    fn role_serializes_in_kebab_case() {
        let json = serde_json::to_string(&user(Role::SuperAdmin, None)).unwrap();
        assert!(json.contains("\"role\":\"super-admin\""));
    }
}
