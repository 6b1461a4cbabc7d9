use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::types::{
    AgencyId, Amount, ClientId, PaymentId, ReminderId, ReminderStatus, ReminderTitle,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    pub id: ReminderId,
    pub agency_id: AgencyId,
    pub client_id: Option<ClientId>,
    pub payment_id: Option<PaymentId>,
    pub title: ReminderTitle,
    pub amount: Option<Amount>,
    pub send_date: NaiveDate,
    pub sent_at: Option<NaiveDateTime>,
    pub status: ReminderStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reminder {
    /// Status after the user clicks the completion toggle.
    pub fn toggled_status(&self) -> ReminderStatus {
        match self.status {
            ReminderStatus::Completed => ReminderStatus::Pending,
            ReminderStatus::Pending | ReminderStatus::Sent => ReminderStatus::Completed,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewReminder {
    pub agency_id: AgencyId,
    pub client_id: Option<ClientId>,
    pub payment_id: Option<PaymentId>,
    pub title: ReminderTitle,
    pub amount: Option<Amount>,
    pub send_date: NaiveDate,
}

impl NewReminder {
    #[must_use]
    pub fn new(
        agency_id: AgencyId,
        title: ReminderTitle,
        send_date: NaiveDate,
        client_id: Option<ClientId>,
        payment_id: Option<PaymentId>,
        amount: Option<Amount>,
    ) -> Self {
        Self {
            agency_id,
            client_id,
            payment_id,
            title,
            amount,
            send_date,
        }
    }
}

/// Reminder with the related rows loaded for display and sending.
#[derive(Clone, Debug, Serialize)]
pub struct ReminderView {
    pub reminder: Reminder,
    pub client: Option<Client>,
    pub payment: Option<Payment>,
}

impl ReminderView {
    /// Amount quoted in the WhatsApp message: the linked payment first, then
    /// the reminder's own amount, else zero.
    pub fn amount_due(&self) -> Amount {
        self.payment
            .as_ref()
            .map(|payment| payment.amount)
            .or(self.reminder.amount)
            .unwrap_or_default()
    }
}
