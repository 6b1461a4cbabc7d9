//! JSON payloads of the `/api` scope.

use serde::Serialize;

use crate::domain::client::Client;

#[derive(Debug, Default)]
pub struct ClientsQuery {
    pub search: Option<String>,
    /// Without a page the whole matching list is returned.
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ClientsResponse {
    /// Number of matching clients before pagination.
    pub total: usize,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub clients: Vec<Client>,
}
