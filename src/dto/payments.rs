use crate::domain::client::Client;
use crate::domain::payment::{PaymentRow, PaymentTotals};
use crate::domain::types::PaymentStatus;
use crate::pagination::Paginated;

/// Query parameters of the payments page.
#[derive(Debug, Default)]
pub struct PaymentsQuery {
    pub search: Option<String>,
    /// `pending`, `completed` or anything else for all payments.
    pub tab: Option<String>,
    pub page: Option<usize>,
}

impl PaymentsQuery {
    pub fn status(&self) -> Option<PaymentStatus> {
        self.tab
            .as_deref()
            .and_then(|tab| PaymentStatus::try_from(tab).ok())
    }
}

pub struct PaymentsPageData {
    pub payments: Paginated<PaymentRow>,
    pub totals: PaymentTotals,
    /// Active tab name as rendered in the template.
    pub tab: &'static str,
    pub search_query: Option<String>,
    /// Choices of the add form.
    pub clients: Vec<Client>,
}
