use std::io::Read;

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{AgencyId, ClientName, ClientPhone, ClientStatus, Email};
use crate::forms::{FormError, non_empty};

#[derive(Deserialize, Validate)]
/// Add and edit form of a client.
pub struct ClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Only present on the edit form.
    #[serde(default)]
    pub status: String,
}

pub struct ClientPayload {
    pub name: ClientName,
    pub phone: ClientPhone,
    pub email: Option<Email>,
    pub status: ClientStatus,
}

impl TryFrom<ClientForm> for ClientPayload {
    type Error = FormError;

    fn try_from(form: ClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let status = match non_empty(&form.status) {
            Some(status) => ClientStatus::try_from(status)?,
            None => ClientStatus::Active,
        };

        Ok(Self {
            name: ClientName::new(form.name)?,
            phone: ClientPhone::new(form.phone)?,
            email: non_empty(&form.email).map(Email::new).transpose()?,
            status,
        })
    }
}

impl ClientPayload {
    pub fn into_new_client(self, agency_id: AgencyId) -> NewClient {
        NewClient::new(agency_id, self.name, self.phone, self.email)
    }

    pub fn into_update(self) -> UpdateClient {
        UpdateClient::new(self.name, self.phone, self.email, self.status)
    }
}

#[derive(MultipartForm)]
pub struct UploadClientsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadClientsForm {
    pub fn parse(&self, agency_id: AgencyId) -> Result<Vec<NewClient>, FormError> {
        let file = self
            .csv
            .file
            .reopen()
            .map_err(|err| FormError::Csv(err.to_string()))?;
        parse_clients_csv(file, agency_id)
    }
}

#[derive(Deserialize)]
struct ClientCsvRow {
    name: String,
    phone: String,
    #[serde(default)]
    email: Option<String>,
}

/// Reads `name,phone[,email]` rows; any invalid row rejects the whole file.
pub fn parse_clients_csv<R: Read>(
    reader: R,
    agency_id: AgencyId,
) -> Result<Vec<NewClient>, FormError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut clients = Vec::new();
    for (index, row) in rdr.deserialize::<ClientCsvRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = row.map_err(|err| FormError::Csv(format!("{line}: {err}")))?;

        let payload = ClientPayload::try_from(ClientForm {
            name: row.name,
            phone: row.phone,
            email: row.email.unwrap_or_default(),
            status: String::new(),
        })
        .map_err(|err| FormError::Csv(format!("{line}: {err}")))?;

        clients.push(payload.into_new_client(agency_id));
    }

    if clients.is_empty() {
        return Err(FormError::Csv("لا توجد بيانات".to_string()));
    }

    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agency() -> AgencyId {
        AgencyId::new(5).unwrap()
    }

    #[test]
    fn edit_form_maps_status_and_optional_email() {
        let payload = ClientPayload::try_from(ClientForm {
            name: "سعد".to_string(),
            phone: "0551234567".to_string(),
            email: "  ".to_string(),
            status: "inactive".to_string(),
        })
        .unwrap();

        assert_eq!(payload.email, None);
        assert_eq!(payload.status, ClientStatus::Inactive);
    }

    #[test]
    fn add_form_requires_phone() {
        let result = ClientPayload::try_from(ClientForm {
            name: "سعد".to_string(),
            phone: String::new(),
            email: String::new(),
            status: String::new(),
        });
        assert!(matches!(result, Err(FormError::Validation(_))));
    }

    #[test]
    fn csv_rows_become_clients() {
        let data = "name,phone,email\nفهد,0512345678,fahd@example.com\nسالم,+966 55 123 4567,\n";
        let clients = parse_clients_csv(data.as_bytes(), agency()).unwrap();

        assert_eq!(clients.len(), 2);
        assert_eq!(
            clients[0].email.as_ref().unwrap().as_str(),
            "fahd@example.com"
        );
        assert_eq!(clients[1].phone.as_str(), "+966551234567");
        assert_eq!(clients[1].email, None);
    }

    #[test]
    fn csv_without_email_column_is_accepted() {
        let data = "name,phone\nفهد,0512345678\n";
        let clients = parse_clients_csv(data.as_bytes(), agency()).unwrap();
        assert_eq!(clients.len(), 1);
    }

    #[test]
    fn csv_reports_the_failing_line() {
        let data = "name,phone\nفهد,0512345678\nسالم,abc\n";
        let err = parse_clients_csv(data.as_bytes(), agency()).unwrap_err();
        assert!(err.to_string().contains("3: "));
    }

    #[test]
    fn empty_csv_is_rejected() {
        assert!(parse_clients_csv("name,phone\n".as_bytes(), agency()).is_err());
    }
}
