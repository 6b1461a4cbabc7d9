use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    AgencyId, ClientId, ClientName, ClientPhone, ClientStatus, Email, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub agency_id: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub agency_id: i32,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub status: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            agency_id: AgencyId::new(client.agency_id)?,
            name: ClientName::new(client.name)?,
            phone: ClientPhone::new(client.phone)?,
            email: client.email.map(Email::new).transpose()?,
            status: ClientStatus::try_from(client.status)?,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            agency_id: client.agency_id.get(),
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_ref().map(Email::as_str),
        }
    }
}

impl<'a> From<&'a DomainUpdateClient> for UpdateClient<'a> {
    fn from(client: &'a DomainUpdateClient) -> Self {
        Self {
            name: client.name.as_str(),
            phone: client.phone.as_str(),
            email: client.email.as_ref().map(Email::as_str),
            status: client.status.as_str(),
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_domain_new() -> DomainNewClient {
        DomainNewClient::new(
            AgencyId::new(1).unwrap(),
            ClientName::new("عبدالله أحمد").unwrap(),
            ClientPhone::new("0512345678").unwrap(),
            Some(Email::new("abdullah@example.com").unwrap()),
        )
    }

    #[test]
    fn from_domain_new_creates_newclient() {
        let domain = sample_domain_new();
        let new: NewClient = (&domain).into();
        assert_eq!(new.agency_id, 1);
        assert_eq!(new.name, domain.name.as_str());
        assert_eq!(new.phone, "0512345678");
        assert_eq!(new.email, Some("abdullah@example.com"));
    }

    #[test]
    fn from_domain_update_creates_updateclient() {
        let domain = DomainUpdateClient::new(
            ClientName::new("محمد خالد").unwrap(),
            ClientPhone::new("0523456789").unwrap(),
            None,
            ClientStatus::Inactive,
        );
        let update: UpdateClient = (&domain).into();
        assert_eq!(update.name, "محمد خالد");
        assert_eq!(update.email, None);
        assert_eq!(update.status, "inactive");
    }

    #[test]
    fn client_into_domain() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_client = Client {
            id: 1,
            agency_id: 2,
            name: "n".to_string(),
            phone: "0512345678".to_string(),
            email: Some("e@example.com".to_string()),
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        };
        let domain = DomainClient::try_from(db_client).expect("valid client");
        assert_eq!(domain.id.get(), 1);
        assert_eq!(domain.agency_id.get(), 2);
        assert_eq!(domain.status, ClientStatus::Active);
        assert_eq!(domain.created_at, now);
    }
}
