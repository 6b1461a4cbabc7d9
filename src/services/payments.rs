//! Payment tracking of an agency.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::payment::{NewPayment, PaymentRow};
use crate::domain::types::{Currency, PaymentId, PaymentStatus};
use crate::dto::payments::{PaymentsPageData, PaymentsQuery};
use crate::forms::payments::{AddPaymentForm, AddPaymentPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    ClientListQuery, ClientReader, PaymentListQuery, PaymentReader, PaymentWriter,
};
use crate::services::{ServiceError, ServiceResult, agency_scope, search_term, today};

pub const PAYMENT_ALREADY_COMPLETED: &str = "تم تأكيد هذه الدفعة مسبقاً";
pub const UNKNOWN_CLIENT: &str = "العميل غير موجود";

pub fn list_payments<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PaymentsQuery,
) -> ServiceResult<PaymentsPageData>
where
    R: ClientReader + PaymentReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let page = query.page.unwrap_or(1);
    let status = query.status();
    let search_query = search_term(query.search);

    let mut list_query = PaymentListQuery::new(agency_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(status) = status {
        list_query = list_query.status(status);
    }
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, payments) = repo.list_payments(list_query).map_err(|err| {
        log::error!("Failed to list payments: {err}");
        err
    })?;

    let today = today();
    let rows = payments
        .into_iter()
        .map(|(payment, client)| PaymentRow {
            is_overdue: payment.is_overdue(today),
            payment,
            client,
        })
        .collect();

    let (_, clients) = repo.list_clients(ClientListQuery::new(agency_id))?;

    Ok(PaymentsPageData {
        payments: Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE),
        totals: repo.payment_totals(agency_id)?,
        tab: status.map_or("all", PaymentStatus::as_str),
        search_query,
        clients,
    })
}

/// Records a payment for one of the agency's clients.
pub fn add_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPaymentForm,
    default_currency: &str,
) -> ServiceResult<()>
where
    R: ClientReader + PaymentWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let payload = AddPaymentPayload::try_from(form)?;

    if repo
        .get_client_by_id(payload.client_id, agency_id)?
        .is_none()
    {
        return Err(ServiceError::Form(UNKNOWN_CLIENT.to_string()));
    }

    let currency = match payload.currency {
        Some(currency) => currency,
        None => Currency::new(default_currency).map_err(|err| {
            log::error!("Configured currency {default_currency} is invalid: {err}");
            ServiceError::Internal(err.to_string())
        })?,
    };

    let new_payment = NewPayment::new(
        agency_id,
        payload.client_id,
        payload.amount,
        currency,
        payload.due_date,
        payload.status,
    );

    repo.create_payment(&new_payment).map_err(|err| {
        log::error!("Failed to add a payment: {err}");
        err
    })?;

    Ok(())
}

/// Marks a pending payment as paid today.
pub fn approve_payment<R>(repo: &R, user: &AuthenticatedUser, payment_id: i32) -> ServiceResult<()>
where
    R: PaymentReader + PaymentWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let payment_id = PaymentId::new(payment_id).map_err(|_| ServiceError::NotFound)?;

    let payment = repo
        .get_payment_by_id(payment_id, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    if payment.status == PaymentStatus::Completed {
        return Err(ServiceError::Conflict(
            PAYMENT_ALREADY_COMPLETED.to_string(),
        ));
    }

    repo.complete_payment(payment.id, agency_id, today())
        .map_err(|err| {
            log::error!("Failed to approve payment {payment_id}: {err}");
            err
        })?;

    Ok(())
}

/// Deletes the payment; reminders pointing at it are kept without the link.
pub fn reject_payment<R>(repo: &R, user: &AuthenticatedUser, payment_id: i32) -> ServiceResult<()>
where
    R: PaymentWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let payment_id = PaymentId::new(payment_id).map_err(|_| ServiceError::NotFound)?;

    repo.delete_payment(payment_id, agency_id).map_err(|err| {
        log::error!("Failed to reject payment {payment_id}: {err}");
        err
    })?;

    Ok(())
}
