use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::reminder::{NewReminder as DomainNewReminder, Reminder as DomainReminder};
use crate::domain::types::{
    AgencyId, Amount, ClientId, PaymentId, ReminderId, ReminderStatus, ReminderTitle,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::reminders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Reminder {
    pub id: i32,
    pub agency_id: i32,
    pub client_id: Option<i32>,
    pub payment_id: Option<i32>,
    pub title: String,
    pub amount: Option<i64>,
    pub send_date: NaiveDate,
    pub sent_at: Option<NaiveDateTime>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reminders)]
pub struct NewReminder<'a> {
    pub agency_id: i32,
    pub client_id: Option<i32>,
    pub payment_id: Option<i32>,
    pub title: &'a str,
    pub amount: Option<i64>,
    pub send_date: NaiveDate,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::reminders)]
pub struct UpdateReminderStatus<'a> {
    pub status: &'a str,
    /// `None` keeps the previous send timestamp.
    pub sent_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Reminder> for DomainReminder {
    type Error = TypeConstraintError;

    fn try_from(reminder: Reminder) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReminderId::new(reminder.id)?,
            agency_id: AgencyId::new(reminder.agency_id)?,
            client_id: reminder.client_id.map(ClientId::new).transpose()?,
            payment_id: reminder.payment_id.map(PaymentId::new).transpose()?,
            title: ReminderTitle::new(reminder.title)?,
            amount: reminder.amount.map(Amount::from_minor).transpose()?,
            send_date: reminder.send_date,
            sent_at: reminder.sent_at,
            status: ReminderStatus::try_from(reminder.status)?,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewReminder> for NewReminder<'a> {
    fn from(reminder: &'a DomainNewReminder) -> Self {
        Self {
            agency_id: reminder.agency_id.get(),
            client_id: reminder.client_id.map(ClientId::get),
            payment_id: reminder.payment_id.map(PaymentId::get),
            title: reminder.title.as_str(),
            amount: reminder.amount.map(Amount::minor),
            send_date: reminder.send_date,
        }
    }
}
