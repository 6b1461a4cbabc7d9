//! Payment reminders and their WhatsApp hand-off.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::reminder::NewReminder;
use crate::domain::types::{PaymentStatus, ReminderId, ReminderStatus};
use crate::dto::reminders::{ReminderItem, RemindersPageData};
use crate::forms::FormError;
use crate::forms::reminders::{AddReminderForm, AddReminderPayload};
use crate::repository::{
    ClientListQuery, ClientReader, PaymentListQuery, PaymentReader, ReminderReader, ReminderWriter,
    SettingsReader,
};
use crate::services::{ServiceError, ServiceResult, agency_scope};
use crate::whatsapp::{DEFAULT_TEMPLATE, reminder_link};

pub const UNKNOWN_CLIENT: &str = "العميل غير موجود";
pub const UNKNOWN_PAYMENT: &str = "الدفعة غير موجودة";
pub const PAYMENT_OF_OTHER_CLIENT: &str = "الدفعة المختارة لا تخص هذا العميل";
pub const REMINDER_WITHOUT_CLIENT: &str = "لا يمكن إرسال تذكير غير مرتبط بعميل";

pub fn list_reminders<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<RemindersPageData>
where
    R: ClientReader + PaymentReader + ReminderReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let reminders = repo
        .list_reminders(agency_id)
        .map_err(|err| {
            log::error!("Failed to list reminders: {err}");
            err
        })?
        .into_iter()
        .map(ReminderItem::from)
        .collect();

    let (_, clients) = repo.list_clients(ClientListQuery::new(agency_id))?;
    let (_, pending) =
        repo.list_payments(PaymentListQuery::new(agency_id).status(PaymentStatus::Pending))?;

    Ok(RemindersPageData {
        reminders,
        clients,
        pending_payments: pending.into_iter().map(|(payment, _)| payment).collect(),
    })
}

/// Creates a reminder; a linked payment must belong to the linked client and
/// supplies the client when none was chosen.
pub fn add_reminder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddReminderForm,
) -> ServiceResult<()>
where
    R: ClientReader + PaymentReader + ReminderWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let payload = AddReminderPayload::try_from(form)?;

    let mut client_id = payload.client_id;

    if let Some(id) = client_id {
        if repo.get_client_by_id(id, agency_id)?.is_none() {
            return Err(ServiceError::Form(UNKNOWN_CLIENT.to_string()));
        }
    }

    if let Some(payment_id) = payload.payment_id {
        let payment = repo
            .get_payment_by_id(payment_id, agency_id)?
            .ok_or_else(|| ServiceError::Form(UNKNOWN_PAYMENT.to_string()))?;

        match client_id {
            Some(id) if id != payment.client_id => {
                return Err(ServiceError::Form(PAYMENT_OF_OTHER_CLIENT.to_string()));
            }
            Some(_) => {}
            None => client_id = Some(payment.client_id),
        }
    }

    let reminder = NewReminder::new(
        agency_id,
        payload.title,
        payload.send_date,
        client_id,
        payload.payment_id,
        payload.amount,
    );

    repo.create_reminder(&reminder).map_err(|err| {
        log::error!("Failed to add a reminder: {err}");
        err
    })?;

    Ok(())
}

/// Flips the reminder between completed and pending.
pub fn toggle_reminder<R>(repo: &R, user: &AuthenticatedUser, reminder_id: i32) -> ServiceResult<()>
where
    R: ReminderReader + ReminderWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let reminder_id = ReminderId::new(reminder_id).map_err(|_| ServiceError::NotFound)?;

    let view = repo
        .get_reminder(reminder_id, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    let status = view.reminder.toggled_status();
    repo.set_reminder_status(reminder_id, agency_id, status, None)
        .map_err(|err| {
            log::error!("Failed to toggle reminder {reminder_id}: {err}");
            err
        })?;

    Ok(())
}

pub fn delete_reminder<R>(repo: &R, user: &AuthenticatedUser, reminder_id: i32) -> ServiceResult<()>
where
    R: ReminderWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let reminder_id = ReminderId::new(reminder_id).map_err(|_| ServiceError::NotFound)?;

    repo.delete_reminder(reminder_id, agency_id)
        .map_err(|err| {
            log::error!("Failed to delete reminder {reminder_id}: {err}");
            err
        })?;

    Ok(())
}

/// Builds the `wa.me` link for the reminder and marks it sent.
pub fn send_whatsapp<R>(
    repo: &R,
    user: &AuthenticatedUser,
    reminder_id: i32,
    default_country_code: &str,
) -> ServiceResult<String>
where
    R: ReminderReader + ReminderWriter + SettingsReader + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let reminder_id = ReminderId::new(reminder_id).map_err(|_| ServiceError::NotFound)?;

    let view = repo
        .get_reminder(reminder_id, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    let Some(client) = &view.client else {
        return Err(ServiceError::Conflict(REMINDER_WITHOUT_CLIENT.to_string()));
    };

    let settings = repo.get_settings(agency_id)?;
    let template = settings
        .as_ref()
        .map_or(DEFAULT_TEMPLATE, |settings| settings.template());

    let link = reminder_link(
        template,
        client.phone.as_str(),
        default_country_code,
        client.name.as_str(),
        &view.amount_due().to_string(),
    )
    .map_err(|err| {
        log::warn!("Cannot build WhatsApp link for reminder {reminder_id}: {err}");
        ServiceError::Form(FormError::InvalidPhone.to_string())
    })?;

    repo.set_reminder_status(
        reminder_id,
        agency_id,
        ReminderStatus::Sent,
        Some(Utc::now().naive_utc()),
    )
    .map_err(|err| {
        log::error!("Failed to mark reminder {reminder_id} as sent: {err}");
        err
    })?;

    Ok(link)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::client::Client;
    use crate::domain::payment::Payment;
    use crate::domain::reminder::{Reminder, ReminderView};
    use crate::domain::settings::AgencySettings;
    use crate::domain::types::{
        AgencyId, Amount, ClientId, ClientName, ClientPhone, ClientStatus, Currency, PaymentId,
        ReminderTitle,
    };
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::agency_user;

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn client(id: i32) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            agency_id: AgencyId::new(42).unwrap(),
            name: ClientName::new("محمد علي").unwrap(),
            phone: ClientPhone::new("0551234567").unwrap(),
            email: None,
            status: ClientStatus::Active,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn payment(client_id: i32) -> Payment {
        Payment {
            id: PaymentId::new(9).unwrap(),
            agency_id: AgencyId::new(42).unwrap(),
            client_id: ClientId::new(client_id).unwrap(),
            amount: Amount::from_minor(75_000).unwrap(),
            currency: Currency::new("MAD").unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            paid_date: None,
            status: PaymentStatus::Pending,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn reminder(status: ReminderStatus, client_id: Option<i32>) -> Reminder {
        Reminder {
            id: ReminderId::new(3).unwrap(),
            agency_id: AgencyId::new(42).unwrap(),
            client_id: client_id.map(|id| ClientId::new(id).unwrap()),
            payment_id: None,
            title: ReminderTitle::new("قسط أبريل").unwrap(),
            amount: Some(Amount::from_minor(20_000).unwrap()),
            send_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            sent_at: None,
            status,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn form(client_id: &str, payment_id: &str) -> AddReminderForm {
        AddReminderForm {
            title: "قسط أبريل".to_string(),
            send_date: "2024-04-01".to_string(),
            client_id: client_id.to_string(),
            payment_id: payment_id.to_string(),
            amount: String::new(),
        }
    }

    #[test]
    fn payment_of_another_client_is_refused() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id()
            .returning(|id, _| Ok(Some(client(id.get()))));
        repo.expect_get_payment_by_id()
            .returning(|_, _| Ok(Some(payment(8))));
        repo.expect_create_reminder().times(0);

        let result = add_reminder(&repo, &agency_user(), form("4", "9"));

        let Err(ServiceError::Form(message)) = result else {
            panic!("expected a form error");
        };
        assert_eq!(message, PAYMENT_OF_OTHER_CLIENT);
    }

    #[test]
    fn payment_supplies_missing_client() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().times(0);
        repo.expect_get_payment_by_id()
            .returning(|_, _| Ok(Some(payment(8))));
        repo.expect_create_reminder()
            .withf(|reminder| {
                reminder.client_id == Some(ClientId::new(8).unwrap())
                    && reminder.payment_id == Some(PaymentId::new(9).unwrap())
            })
            .times(1)
            .returning(|_| Ok(reminder(ReminderStatus::Pending, Some(8))));

        add_reminder(&repo, &agency_user(), form("", "9")).unwrap();
    }

    #[test]
    fn reminder_without_links_is_allowed() {
        let mut repo = MockRepository::new();
        repo.expect_create_reminder()
            .withf(|reminder| reminder.client_id.is_none() && reminder.payment_id.is_none())
            .times(1)
            .returning(|_| Ok(reminder(ReminderStatus::Pending, None)));

        add_reminder(&repo, &agency_user(), form("", "")).unwrap();
    }

    #[test]
    fn toggle_completes_a_sent_reminder() {
        let mut repo = MockRepository::new();
        repo.expect_get_reminder().returning(|_, _| {
            Ok(Some(ReminderView {
                reminder: reminder(ReminderStatus::Sent, Some(4)),
                client: Some(client(4)),
                payment: None,
            }))
        });
        repo.expect_set_reminder_status()
            .withf(|_, _, status, sent_at| {
                *status == ReminderStatus::Completed && sent_at.is_none()
            })
            .times(1)
            .returning(|_, _, _, _| Ok(reminder(ReminderStatus::Completed, Some(4))));

        toggle_reminder(&repo, &agency_user(), 3).unwrap();
    }

    #[test]
    fn send_builds_link_from_agency_template() {
        let mut repo = MockRepository::new();
        repo.expect_get_reminder().returning(|_, _| {
            Ok(Some(ReminderView {
                reminder: reminder(ReminderStatus::Pending, Some(4)),
                client: Some(client(4)),
                payment: Some(payment(4)),
            }))
        });
        repo.expect_get_settings().returning(|_| {
            Ok(Some(AgencySettings {
                agency_id: AgencyId::new(42).unwrap(),
                whatsapp_template: Some("{{clientName}}: {{amountDue}}".to_string()),
                updated_at: timestamp(),
            }))
        });
        repo.expect_set_reminder_status()
            .withf(|_, _, status, sent_at| *status == ReminderStatus::Sent && sent_at.is_some())
            .times(1)
            .returning(|_, _, _, _| Ok(reminder(ReminderStatus::Sent, Some(4))));

        let link = send_whatsapp(&repo, &agency_user(), 3, "966").unwrap();

        assert_eq!(
            link,
            "https://wa.me/966551234567?text=%D9%85%D8%AD%D9%85%D8%AF%20%D8%B9%D9%84%D9%8A%3A%20750"
        );
    }

    #[test]
    fn send_without_client_is_refused() {
        let mut repo = MockRepository::new();
        repo.expect_get_reminder().returning(|_, _| {
            Ok(Some(ReminderView {
                reminder: reminder(ReminderStatus::Pending, None),
                client: None,
                payment: None,
            }))
        });
        repo.expect_get_settings().times(0);
        repo.expect_set_reminder_status().times(0);

        let result = send_whatsapp(&repo, &agency_user(), 3, "966");

        let Err(ServiceError::Conflict(message)) = result else {
            panic!("expected a conflict");
        };
        assert_eq!(message, REMINDER_WITHOUT_CLIENT);
    }
}
