use serde::Serialize;

use crate::domain::client::{Client, ClientRow};
use crate::domain::payment::PaymentRow;
use crate::pagination::Paginated;

/// Query parameters of the clients page.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

pub struct ClientsPageData {
    pub clients: Paginated<ClientRow>,
    pub search_query: Option<String>,
    /// `None` when the plan has no client limit.
    pub remaining_slots: Option<usize>,
}

/// Edit page of a single client.
#[derive(Debug, Serialize)]
pub struct ClientPageData {
    pub client: Client,
    pub payments: Vec<PaymentRow>,
}
