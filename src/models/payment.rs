use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::payment::{NewPayment as DomainNewPayment, Payment as DomainPayment};
use crate::domain::types::{
    AgencyId, Amount, ClientId, Currency, PaymentId, PaymentStatus, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Payment {
    pub id: i32,
    pub agency_id: i32,
    pub client_id: i32,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::payments)]
pub struct NewPayment<'a> {
    pub agency_id: i32,
    pub client_id: i32,
    pub amount: i64,
    pub currency: &'a str,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::payments)]
pub struct CompletePayment<'a> {
    pub status: &'a str,
    pub paid_date: NaiveDate,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Payment> for DomainPayment {
    type Error = TypeConstraintError;

    fn try_from(payment: Payment) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::new(payment.id)?,
            agency_id: AgencyId::new(payment.agency_id)?,
            client_id: ClientId::new(payment.client_id)?,
            amount: Amount::from_minor(payment.amount)?,
            currency: Currency::new(payment.currency)?,
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            status: PaymentStatus::try_from(payment.status)?,
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewPayment> for NewPayment<'a> {
    fn from(payment: &'a DomainNewPayment) -> Self {
        Self {
            agency_id: payment.agency_id.get(),
            client_id: payment.client_id.get(),
            amount: payment.amount.minor(),
            currency: payment.currency.as_str(),
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            status: payment.status.as_str(),
        }
    }
}

impl CompletePayment<'static> {
    pub fn on(paid_date: NaiveDate) -> Self {
        Self {
            status: PaymentStatus::Completed.as_str(),
            paid_date,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}
