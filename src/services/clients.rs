//! Client management of an agency.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::client::{Client, ClientRow};
use crate::domain::payment::PaymentRow;
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::types::{AgencyId, ClientId};
use crate::dto::clients::{ClientPageData, ClientsPageData, ClientsQuery};
use crate::forms::clients::{ClientForm, ClientPayload, UploadClientsForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{
    AgencyReader, ClientListQuery, ClientReader, ClientWriter, PaymentListQuery, PaymentReader,
    PlanReader,
};
use crate::services::{ServiceError, ServiceResult, agency_scope, search_term, today};

pub const CLIENT_LIMIT_REACHED: &str = "لقد وصلت إلى الحد الأقصى لعدد العملاء في باقتك";

/// Plan currently attached to the agency, if any.
fn current_plan<R>(repo: &R, agency_id: AgencyId) -> ServiceResult<Option<SubscriptionPlan>>
where
    R: AgencyReader + PlanReader + ?Sized,
{
    let agency = repo
        .get_agency_by_id(agency_id)?
        .ok_or(ServiceError::NotFound)?;

    match agency.plan_id {
        Some(plan_id) => Ok(repo.get_plan_by_id(plan_id)?),
        None => Ok(None),
    }
}

/// Refuses to grow the client list past the plan limit.
fn ensure_capacity<R>(repo: &R, agency_id: AgencyId, additional: usize) -> ServiceResult<()>
where
    R: AgencyReader + ClientReader + PlanReader + ?Sized,
{
    let Some(plan) = current_plan(repo, agency_id)? else {
        return Ok(());
    };

    let current = repo.count_clients(agency_id)?;
    if plan.allows_clients(current, additional) {
        Ok(())
    } else {
        Err(ServiceError::Conflict(CLIENT_LIMIT_REACHED.to_string()))
    }
}

pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ClientsQuery,
) -> ServiceResult<ClientsPageData>
where
    R: AgencyReader + ClientReader + PlanReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let page = query.page.unwrap_or(1);
    let search_query = search_term(query.search);

    let mut list_query = ClientListQuery::new(agency_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, clients) = repo.list_clients(list_query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        err
    })?;

    let ids: Vec<ClientId> = clients.iter().map(|client| client.id).collect();
    let mut next_payments = repo.next_payment_dates(agency_id, &ids)?;

    let today = today();
    let rows = clients
        .into_iter()
        .map(|client| {
            let next_payment = next_payments.remove(&client.id);
            ClientRow::new(client, next_payment, today)
        })
        .collect();

    let remaining_slots = match current_plan(repo, agency_id)?.and_then(|plan| plan.max_clients) {
        Some(max) => {
            let current = repo.count_clients(agency_id)?;
            Some((max as usize).saturating_sub(current))
        }
        None => None,
    };

    Ok(ClientsPageData {
        clients: Paginated::new(rows, page, total, DEFAULT_ITEMS_PER_PAGE),
        search_query,
        remaining_slots,
    })
}

pub fn add_client<R>(repo: &R, user: &AuthenticatedUser, form: ClientForm) -> ServiceResult<()>
where
    R: AgencyReader + ClientReader + ClientWriter + PlanReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let payload = ClientPayload::try_from(form)?;

    ensure_capacity(repo, agency_id, 1)?;

    repo.create_clients(&[payload.into_new_client(agency_id)])
        .map_err(|err| {
            log::error!("Failed to add a client: {err}");
            err
        })?;

    Ok(())
}

/// Imports every row of the CSV file or none of them.
pub fn upload_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &UploadClientsForm,
) -> ServiceResult<usize>
where
    R: AgencyReader + ClientReader + ClientWriter + PlanReader + ?Sized,
{
    let agency_id = agency_scope(user)?;

    let clients = form.parse(agency_id).map_err(|err| {
        log::error!("Failed to parse clients: {err}");
        ServiceError::from(err)
    })?;

    ensure_capacity(repo, agency_id, clients.len())?;

    let created = repo.create_clients(&clients).map_err(|err| {
        log::error!("Failed to add clients: {err}");
        err
    })?;

    Ok(created)
}

/// Client with its payment history.
pub fn load_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<ClientPageData>
where
    R: ClientReader + PaymentReader + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;

    let client = repo
        .get_client_by_id(client_id, agency_id)?
        .ok_or(ServiceError::NotFound)?;

    let (_, payments) = repo.list_payments(PaymentListQuery::new(agency_id).client(client.id))?;

    let today = today();
    let payments = payments
        .into_iter()
        .map(|(payment, client)| PaymentRow {
            is_overdue: payment.is_overdue(today),
            payment,
            client,
        })
        .collect();

    Ok(ClientPageData { client, payments })
}

pub fn update_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    form: ClientForm,
) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;

    let updates = ClientPayload::try_from(form)?.into_update();

    let client = repo
        .update_client(client_id, agency_id, &updates)
        .map_err(|err| {
            log::error!("Failed to update client {client_id}: {err}");
            err
        })?;

    Ok(client)
}

/// Removes the client together with its payments and reminders.
pub fn delete_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<()>
where
    R: ClientWriter + ?Sized,
{
    let agency_id = agency_scope(user)?;
    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;

    repo.delete_client(client_id, agency_id).map_err(|err| {
        log::error!("Failed to delete client {client_id}: {err}");
        err
    })?;

    Ok(())
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::agency::Agency;
    use crate::domain::types::{
        AgencyName, AgencyStatus, Amount, ClientName, ClientPhone, ClientStatus, PlanId, PlanName,
    };
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{agency_user, super_admin};

    fn timestamp() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn agency(plan_id: Option<i32>) -> Agency {
        Agency {
            id: AgencyId::new(42).unwrap(),
            name: AgencyName::new("وكالة السرعة").unwrap(),
            status: AgencyStatus::Active,
            subscription_ends: None,
            plan_id: plan_id.map(|id| PlanId::new(id).unwrap()),
            phone: None,
            address: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn plan(max_clients: Option<u32>) -> SubscriptionPlan {
        SubscriptionPlan {
            id: PlanId::new(1).unwrap(),
            name: PlanName::new("أساسية").unwrap(),
            price: Amount::from_minor(9_900).unwrap(),
            duration_days: 30,
            max_clients,
            is_active: true,
            created_at: timestamp(),
        }
    }

    fn client(id: i32) -> Client {
        Client {
            id: ClientId::new(id).unwrap(),
            agency_id: AgencyId::new(42).unwrap(),
            name: ClientName::new("فهد").unwrap(),
            phone: ClientPhone::new("0512345678").unwrap(),
            email: None,
            status: ClientStatus::Active,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn form() -> ClientForm {
        ClientForm {
            name: "فهد".to_string(),
            phone: "0512345678".to_string(),
            email: String::new(),
            status: String::new(),
        }
    }

    #[test]
    fn super_admin_cannot_manage_clients() {
        let mut repo = MockRepository::new();
        repo.expect_create_clients().times(0);

        let result = add_client(&repo, &super_admin(), form());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_client_without_plan_has_no_limit() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(None))));
        repo.expect_count_clients().times(0);
        repo.expect_create_clients()
            .withf(|clients| clients.len() == 1 && clients[0].agency_id.get() == 42)
            .times(1)
            .returning(|clients| Ok(clients.len()));

        add_client(&repo, &agency_user(), form()).unwrap();
    }

    #[test]
    fn add_client_respects_plan_limit() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(Some(1)))));
        repo.expect_get_plan_by_id()
            .returning(|_| Ok(Some(plan(Some(10)))));
        repo.expect_count_clients().returning(|_| Ok(10));
        repo.expect_create_clients().times(0);

        let result = add_client(&repo, &agency_user(), form());

        let Err(ServiceError::Conflict(message)) = result else {
            panic!("expected a conflict");
        };
        assert_eq!(message, CLIENT_LIMIT_REACHED);
    }

    #[test]
    fn batch_import_must_fit_in_the_plan() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(Some(1)))));
        repo.expect_get_plan_by_id()
            .returning(|_| Ok(Some(plan(Some(10)))));
        repo.expect_count_clients().returning(|_| Ok(7));
        let agency_id = AgencyId::new(42).unwrap();

        assert!(ensure_capacity(&repo, agency_id, 3).is_ok());
        assert!(matches!(
            ensure_capacity(&repo, agency_id, 4),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn invalid_form_is_reported_before_touching_the_database() {
        let mut repo = MockRepository::new();
        repo.expect_get_agency_by_id().times(0);
        repo.expect_create_clients().times(0);
        let mut invalid = form();
        invalid.phone = "not a phone".to_string();

        let result = add_client(&repo, &agency_user(), invalid);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn list_marks_late_clients_and_remaining_slots() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| query.search.as_deref() == Some("فهد"))
            .returning(|_| Ok((2, vec![client(1), client(2)])));
        repo.expect_next_payment_dates().returning(|_, _| {
            let mut dates = HashMap::new();
            dates.insert(
                ClientId::new(1).unwrap(),
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            );
            Ok(dates)
        });
        repo.expect_get_agency_by_id()
            .returning(|_| Ok(Some(agency(Some(1)))));
        repo.expect_get_plan_by_id()
            .returning(|_| Ok(Some(plan(Some(10)))));
        repo.expect_count_clients().returning(|_| Ok(7));

        let data = list_clients(
            &repo,
            &agency_user(),
            ClientsQuery {
                search: Some("  فهد ".to_string()),
                page: None,
            },
        )
        .unwrap();

        assert_eq!(data.search_query.as_deref(), Some("فهد"));
        assert_eq!(data.remaining_slots, Some(3));
        assert!(data.clients.items[0].is_late);
        assert!(data.clients.items[1].next_payment.is_none());
    }

    #[test]
    fn delete_client_is_scoped_to_agency() {
        let mut repo = MockRepository::new();
        repo.expect_delete_client()
            .withf(|id, agency_id| id.get() == 5 && agency_id.get() == 42)
            .times(1)
            .returning(|_, _| Ok(()));

        delete_client(&repo, &agency_user(), 5).unwrap();
    }

    #[test]
    fn load_client_of_other_agency_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_id().returning(|_, _| Ok(None));
        repo.expect_list_payments().times(0);

        assert!(matches!(
            load_client(&repo, &agency_user(), 9),
            Err(ServiceError::NotFound)
        ));
    }
}
