use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::types::{AgencyId, Amount, ClientId, Currency, PaymentId, PaymentStatus};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub agency_id: AgencyId,
    pub client_id: ClientId,
    pub amount: Amount,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Payment {
    /// Pending payments past their due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }
}

#[derive(Clone, Debug)]
pub struct NewPayment {
    pub agency_id: AgencyId,
    pub client_id: ClientId,
    pub amount: Amount,
    pub currency: Currency,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub paid_date: Option<NaiveDate>,
}

impl NewPayment {
    /// Completed payments are recorded as paid on their due date.
    #[must_use]
    pub fn new(
        agency_id: AgencyId,
        client_id: ClientId,
        amount: Amount,
        currency: Currency,
        due_date: NaiveDate,
        status: PaymentStatus,
    ) -> Self {
        let paid_date = match status {
            PaymentStatus::Completed => Some(due_date),
            PaymentStatus::Pending => None,
        };
        Self {
            agency_id,
            client_id,
            amount,
            currency,
            due_date,
            status,
            paid_date,
        }
    }
}

/// Payment joined with its client for listings.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentRow {
    pub payment: Payment,
    pub client: Client,
    pub is_overdue: bool,
}

/// Aggregated payment counters for an agency.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct PaymentTotals {
    pub pending_count: usize,
    pub completed_count: usize,
    pub completed_amount: Amount,
}
