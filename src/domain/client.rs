use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{AgencyId, ClientId, ClientName, ClientPhone, ClientStatus, Email};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub agency_id: AgencyId,
    pub name: ClientName,
    pub phone: ClientPhone,
    pub email: Option<Email>,
    pub status: ClientStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewClient {
    pub agency_id: AgencyId,
    pub name: ClientName,
    pub phone: ClientPhone,
    pub email: Option<Email>,
}

impl NewClient {
    #[must_use]
    pub fn new(
        agency_id: AgencyId,
        name: ClientName,
        phone: ClientPhone,
        email: Option<Email>,
    ) -> Self {
        Self {
            agency_id,
            name,
            phone,
            email,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UpdateClient {
    pub name: ClientName,
    pub phone: ClientPhone,
    pub email: Option<Email>,
    pub status: ClientStatus,
}

impl UpdateClient {
    #[must_use]
    pub fn new(
        name: ClientName,
        phone: ClientPhone,
        email: Option<Email>,
        status: ClientStatus,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            status,
        }
    }
}

/// Client listing row enriched with the next pending payment.
#[derive(Clone, Debug, Serialize)]
pub struct ClientRow {
    pub client: Client,
    pub next_payment: Option<NaiveDate>,
    pub is_late: bool,
}

impl ClientRow {
    /// A client is late when the earliest pending payment is already due.
    pub fn new(client: Client, next_payment: Option<NaiveDate>, today: NaiveDate) -> Self {
        let is_late = next_payment.is_some_and(|due| due < today);
        Self {
            client,
            next_payment,
            is_late,
        }
    }
}
