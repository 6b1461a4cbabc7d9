use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{Amount, ClientId, PaymentId, ReminderTitle};
use crate::forms::{FormError, non_empty, parse_date, parse_optional_id};

#[derive(Deserialize, Validate)]
pub struct AddReminderForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub send_date: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub amount: String,
}

pub struct AddReminderPayload {
    pub title: ReminderTitle,
    pub send_date: NaiveDate,
    pub client_id: Option<ClientId>,
    pub payment_id: Option<PaymentId>,
    pub amount: Option<Amount>,
}

impl TryFrom<AddReminderForm> for AddReminderPayload {
    type Error = FormError;

    fn try_from(form: AddReminderForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            title: ReminderTitle::new(form.title)?,
            send_date: parse_date(&form.send_date)?,
            client_id: parse_optional_id(&form.client_id)?
                .map(ClientId::new)
                .transpose()?,
            payment_id: parse_optional_id(&form.payment_id)?
                .map(PaymentId::new)
                .transpose()?,
            amount: non_empty(&form.amount)
                .map(str::parse::<Amount>)
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_links_may_be_blank() {
        let payload = AddReminderPayload::try_from(AddReminderForm {
            title: "تجديد الترخيص".to_string(),
            send_date: "2024-06-10".to_string(),
            client_id: String::new(),
            payment_id: String::new(),
            amount: " ".to_string(),
        })
        .unwrap();

        assert!(payload.client_id.is_none());
        assert!(payload.payment_id.is_none());
        assert!(payload.amount.is_none());
    }

    #[test]
    fn links_and_amount_are_parsed() {
        let payload = AddReminderPayload::try_from(AddReminderForm {
            title: "قسط مايو".to_string(),
            send_date: "2024-05-01".to_string(),
            client_id: "4".to_string(),
            payment_id: "9".to_string(),
            amount: "250.5".to_string(),
        })
        .unwrap();

        assert_eq!(payload.client_id.unwrap().get(), 4);
        assert_eq!(payload.payment_id.unwrap().get(), 9);
        assert_eq!(payload.amount.unwrap().minor(), 25_050);
    }

    #[test]
    fn title_is_required() {
        let result = AddReminderPayload::try_from(AddReminderForm {
            title: String::new(),
            send_date: "2024-05-01".to_string(),
            client_id: String::new(),
            payment_id: String::new(),
            amount: String::new(),
        });
        assert!(matches!(result, Err(FormError::Validation(_))));
    }
}
