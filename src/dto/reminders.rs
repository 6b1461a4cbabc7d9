use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::payment::Payment;
use crate::domain::reminder::ReminderView;
use crate::domain::types::Amount;

/// Reminder row of the reminders page.
#[derive(Debug, Serialize)]
pub struct ReminderItem {
    #[serde(flatten)]
    pub view: ReminderView,
    pub amount_due: Amount,
    /// Only reminders linked to a client can open WhatsApp.
    pub can_send: bool,
}

impl From<ReminderView> for ReminderItem {
    fn from(view: ReminderView) -> Self {
        Self {
            amount_due: view.amount_due(),
            can_send: view.client.is_some(),
            view,
        }
    }
}

pub struct RemindersPageData {
    pub reminders: Vec<ReminderItem>,
    /// Choices of the add form.
    pub clients: Vec<Client>,
    pub pending_payments: Vec<Payment>,
}
