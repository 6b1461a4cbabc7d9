use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{Amount, ClientId, Currency, PaymentStatus};
use crate::forms::{FormError, non_empty, parse_date};

#[derive(Deserialize, Validate)]
pub struct AddPaymentForm {
    pub client_id: i32,
    #[validate(length(min = 1))]
    pub amount: String,
    #[validate(length(min = 1))]
    pub due_date: String,
    #[serde(default)]
    pub status: String,
    /// Falls back to the configured currency when empty.
    #[serde(default)]
    pub currency: String,
}

pub struct AddPaymentPayload {
    pub client_id: ClientId,
    pub amount: Amount,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub currency: Option<Currency>,
}

impl TryFrom<AddPaymentForm> for AddPaymentPayload {
    type Error = FormError;

    fn try_from(form: AddPaymentForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let amount: Amount = form.amount.parse()?;
        if amount.minor() == 0 {
            return Err(FormError::InvalidAmount);
        }

        let status = match non_empty(&form.status) {
            Some(status) => PaymentStatus::try_from(status)?,
            None => PaymentStatus::Pending,
        };

        Ok(Self {
            client_id: ClientId::new(form.client_id)?,
            amount,
            due_date: parse_date(&form.due_date)?,
            status,
            currency: non_empty(&form.currency).map(Currency::new).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: &str) -> AddPaymentForm {
        AddPaymentForm {
            client_id: 3,
            amount: amount.to_string(),
            due_date: "2024-05-01".to_string(),
            status: String::new(),
            currency: String::new(),
        }
    }

    #[test]
    fn defaults_to_pending_without_currency() {
        let payload = AddPaymentPayload::try_from(form("500,50")).unwrap();
        assert_eq!(payload.amount.minor(), 50_050);
        assert_eq!(payload.status, PaymentStatus::Pending);
        assert!(payload.currency.is_none());
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert!(matches!(
            AddPaymentPayload::try_from(form("0")),
            Err(FormError::InvalidAmount)
        ));
        assert!(matches!(
            AddPaymentPayload::try_from(form("-10")),
            Err(FormError::InvalidAmount)
        ));
    }

    #[test]
    fn accepts_completed_status_and_currency() {
        let mut completed = form("100");
        completed.status = "completed".to_string();
        completed.currency = "sar".to_string();
        let payload = AddPaymentPayload::try_from(completed).unwrap();
        assert_eq!(payload.status, PaymentStatus::Completed);
        assert_eq!(payload.currency.unwrap().as_str(), "SAR");
    }

    #[test]
    fn rejects_bad_due_date() {
        let mut bad = form("100");
        bad.due_date = "tomorrow".to_string();
        assert!(matches!(
            AddPaymentPayload::try_from(bad),
            Err(FormError::InvalidDate)
        ));
    }
}
