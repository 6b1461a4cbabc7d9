use chrono::{NaiveDate, Utc};
use motopay::domain::agency::{Agency, AgencyStatusChange, NewAgency, UpdateAgencyInfo};
use motopay::domain::client::{NewClient, UpdateClient};
use motopay::domain::payment::NewPayment;
use motopay::domain::reminder::NewReminder;
use motopay::domain::subscription::NewSubscriptionRequest;
use motopay::domain::types::{
    AgencyId, AgencyName, AgencyStatus, Amount, ClientName, ClientPhone, ClientStatus, Currency,
    Email, PaymentStatus, PersonName, ReminderStatus, ReminderTitle, RequestStatus, Role,
};
use motopay::domain::user::{NewUser, User};
use motopay::repository::errors::RepositoryError;
use motopay::repository::{
    AgencyListQuery, AgencyReader, AgencyWriter, ClientListQuery, ClientReader, ClientWriter,
    DieselRepository, PaymentListQuery, PaymentReader, PaymentWriter, PlanReader, PlanWriter,
    ReminderReader, ReminderWriter, SettingsReader, SettingsWriter, StatisticsReader,
    SubscriptionRequestQuery, SubscriptionRequestReader, SubscriptionRequestWriter, UserReader,
    UserWriter,
};

mod common;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn register(repo: &DieselRepository, name: &str, email: &str) -> (Agency, User) {
    let agency = NewAgency::new(
        AgencyName::new(name).unwrap(),
        AgencyStatus::Pending,
        date(2024, 4, 1),
    );
    let owner = NewUser::new(
        None,
        Email::new(email).unwrap(),
        "hash".to_string(),
        PersonName::new("المالك").unwrap(),
        Role::Agency,
    );
    repo.register_agency(&agency, &owner).unwrap()
}

fn new_client(agency: &Agency, name: &str, phone: &str) -> NewClient {
    NewClient::new(
        agency.id,
        ClientName::new(name).unwrap(),
        ClientPhone::new(phone).unwrap(),
        None,
    )
}

#[test]
fn test_register_agency_creates_owner_and_settings() {
    let test_db = common::TestDb::new("test_register_agency.db");
    let repo = DieselRepository::new(test_db.pool());

    let (agency, owner) = register(&repo, "وكالة الشرق", "owner@east.com");

    assert_eq!(agency.status, AgencyStatus::Pending);
    assert_eq!(owner.agency_id, Some(agency.id));
    assert_eq!(owner.role, Role::Agency);

    let settings = repo.get_settings(agency.id).unwrap().unwrap();
    assert!(settings.whatsapp_template.is_none());

    let found = repo
        .get_user_by_email(&Email::new("OWNER@east.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(found.id, owner.id);
}

#[test]
fn test_register_agency_rejects_duplicate_email() {
    let test_db = common::TestDb::new("test_register_duplicate.db");
    let repo = DieselRepository::new(test_db.pool());

    register(&repo, "وكالة الشرق", "owner@east.com");

    let agency = NewAgency::new(
        AgencyName::new("وكالة أخرى").unwrap(),
        AgencyStatus::Pending,
        date(2024, 4, 1),
    );
    let owner = NewUser::new(
        None,
        Email::new("owner@east.com").unwrap(),
        "hash".to_string(),
        PersonName::new("مالك آخر").unwrap(),
        Role::Agency,
    );
    let err = repo.register_agency(&agency, &owner).unwrap_err();
    assert!(err.is_unique_violation());

    // The failed registration leaves no orphaned agency behind.
    let agencies = repo.list_agencies(AgencyListQuery::default()).unwrap();
    assert_eq!(agencies.len(), 1);
}

#[test]
fn test_client_repository_crud_is_scoped_to_agency() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");
    let (other, _) = register(&repo, "وكالة الغرب", "owner@west.com");

    let created = repo
        .create_clients(&[
            new_client(&agency, "أحمد", "0501234567"),
            new_client(&agency, "خالد", "0507654321"),
            new_client(&other, "سالم", "0509999999"),
        ])
        .unwrap();
    assert_eq!(created, 3);

    let (total, items) = repo.list_clients(ClientListQuery::new(agency.id)).unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|client| client.agency_id == agency.id));
    assert_eq!(repo.count_clients(other.id).unwrap(), 1);

    let (found, matches) = repo
        .list_clients(ClientListQuery::new(agency.id).search("خالد"))
        .unwrap();
    assert_eq!(found, 1);
    let khaled = matches[0].clone();

    let (found_by_phone, _) = repo
        .list_clients(ClientListQuery::new(agency.id).search("0501"))
        .unwrap();
    assert_eq!(found_by_phone, 1);

    let foreign = repo.get_client_by_id(khaled.id, other.id).unwrap();
    assert!(foreign.is_none());

    let updated = repo
        .update_client(
            khaled.id,
            agency.id,
            &UpdateClient::new(
                ClientName::new("خالد العتيبي").unwrap(),
                khaled.phone.clone(),
                Some(Email::new("khaled@example.com").unwrap()),
                ClientStatus::Inactive,
            ),
        )
        .unwrap();
    assert_eq!(updated.name.as_str(), "خالد العتيبي");
    assert_eq!(updated.status, ClientStatus::Inactive);

    assert!(matches!(
        repo.delete_client(khaled.id, other.id),
        Err(RepositoryError::NotFound)
    ));
    repo.delete_client(khaled.id, agency.id).unwrap();
    let deleted = repo.get_client_by_id(khaled.id, agency.id).unwrap();
    assert!(deleted.is_none());
}

#[test]
fn test_payment_repository_flow() {
    let test_db = common::TestDb::new("test_payment_repository_flow.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");
    repo.create_clients(&[new_client(&agency, "أحمد", "0501234567")])
        .unwrap();
    let (_, clients) = repo.list_clients(ClientListQuery::new(agency.id)).unwrap();
    let client = &clients[0];
    let currency = Currency::new("MAD").unwrap();

    let first = repo
        .create_payment(&NewPayment::new(
            agency.id,
            client.id,
            Amount::from_minor(150_000).unwrap(),
            currency.clone(),
            date(2024, 5, 1),
            PaymentStatus::Pending,
        ))
        .unwrap();
    repo.create_payment(&NewPayment::new(
        agency.id,
        client.id,
        Amount::from_minor(50_000).unwrap(),
        currency,
        date(2024, 3, 1),
        PaymentStatus::Completed,
    ))
    .unwrap();

    let next = repo.next_payment_dates(agency.id, &[client.id]).unwrap();
    assert_eq!(next.get(&client.id), Some(&date(2024, 5, 1)));

    let (pending, _) = repo
        .list_payments(PaymentListQuery::new(agency.id).status(PaymentStatus::Pending))
        .unwrap();
    assert_eq!(pending, 1);

    let (by_name, rows) = repo
        .list_payments(PaymentListQuery::new(agency.id).search("أحمد"))
        .unwrap();
    assert_eq!(by_name, 2);
    assert_eq!(rows[0].1.id, client.id);

    let paid = repo
        .complete_payment(first.id, agency.id, date(2024, 5, 2))
        .unwrap();
    assert_eq!(paid.status, PaymentStatus::Completed);
    assert_eq!(paid.paid_date, Some(date(2024, 5, 2)));

    let totals = repo.payment_totals(agency.id).unwrap();
    assert_eq!(totals.pending_count, 0);
    assert_eq!(totals.completed_count, 2);
    assert_eq!(
        totals.completed_amount,
        Amount::from_minor(200_000).unwrap()
    );

    repo.delete_payment(first.id, agency.id).unwrap();
    let deleted = repo.get_payment_by_id(first.id, agency.id).unwrap();
    assert!(deleted.is_none());
}

#[test]
fn test_reminder_repository_flow() {
    let test_db = common::TestDb::new("test_reminder_repository_flow.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");
    repo.create_clients(&[new_client(&agency, "أحمد", "0501234567")])
        .unwrap();
    let (_, clients) = repo.list_clients(ClientListQuery::new(agency.id)).unwrap();

    let reminder = repo
        .create_reminder(&NewReminder::new(
            agency.id,
            ReminderTitle::new("قسط مايو").unwrap(),
            date(2024, 5, 1),
            Some(clients[0].id),
            None,
            Some(Amount::from_minor(10_000).unwrap()),
        ))
        .unwrap();
    assert_eq!(reminder.status, ReminderStatus::Pending);
    assert_eq!(repo.count_active_reminders(agency.id).unwrap(), 1);

    let view = repo.get_reminder(reminder.id, agency.id).unwrap().unwrap();
    assert_eq!(view.client.unwrap().id, clients[0].id);
    assert!(view.payment.is_none());

    let sent_at = Utc::now().naive_utc();
    let sent = repo
        .set_reminder_status(reminder.id, agency.id, ReminderStatus::Sent, Some(sent_at))
        .unwrap();
    assert_eq!(sent.status, ReminderStatus::Sent);
    assert!(sent.sent_at.is_some());

    repo.set_reminder_status(reminder.id, agency.id, ReminderStatus::Completed, None)
        .unwrap();
    assert_eq!(repo.count_active_reminders(agency.id).unwrap(), 0);

    repo.delete_reminder(reminder.id, agency.id).unwrap();
    assert!(repo.list_reminders(agency.id).unwrap().is_empty());
}

#[test]
fn test_settings_template_can_be_reset() {
    let test_db = common::TestDb::new("test_settings_template.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");

    let saved = repo
        .save_whatsapp_template(agency.id, Some("مرحباً {{clientName}}".to_string()))
        .unwrap();
    assert_eq!(
        saved.whatsapp_template.as_deref(),
        Some("مرحباً {{clientName}}")
    );

    let reset = repo.save_whatsapp_template(agency.id, None).unwrap();
    assert!(reset.whatsapp_template.is_none());
}

#[test]
fn test_subscription_request_approval_activates_agency() {
    let test_db = common::TestDb::new("test_subscription_approval.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");

    let plans = repo.list_plans(true).unwrap();
    assert_eq!(plans.len(), 3);
    let plan = plans[0].clone();

    let request = repo
        .create_subscription_request(&NewSubscriptionRequest {
            agency_id: agency.id,
            plan_id: plan.id,
        })
        .unwrap();
    assert!(repo.has_pending_request(agency.id).unwrap());

    let pending = repo
        .list_subscription_requests(SubscriptionRequestQuery {
            status: Some(RequestStatus::Pending),
            search: Some("الشرق".to_string()),
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].plan.id, plan.id);

    let ends = date(2024, 5, 1);
    let activated = repo.approve_subscription_request(&request, ends).unwrap();
    assert_eq!(activated.status, AgencyStatus::Active);
    assert_eq!(activated.plan_id, Some(plan.id));
    assert_eq!(activated.subscription_ends, Some(ends));
    assert!(!repo.has_pending_request(agency.id).unwrap());

    // A handled request cannot be approved again.
    assert!(matches!(
        repo.approve_subscription_request(&request, ends),
        Err(RepositoryError::NotFound)
    ));

    let stats = repo.platform_stats().unwrap();
    assert_eq!(stats.active_agencies, 1);
    assert_eq!(stats.pending_requests, 0);
    assert_eq!(stats.revenue, plan.price);

    let subscriptions = repo.list_active_subscriptions().unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert_eq!(subscriptions[0].plan.as_ref().unwrap().id, plan.id);
}

#[test]
fn test_reject_subscription_request_keeps_agency_pending() {
    let test_db = common::TestDb::new("test_subscription_rejection.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");
    let plan = repo.list_plans(true).unwrap().remove(0);

    let request = repo
        .create_subscription_request(&NewSubscriptionRequest {
            agency_id: agency.id,
            plan_id: plan.id,
        })
        .unwrap();

    let rejected = repo.reject_subscription_request(request.id).unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let agency = repo.get_agency_by_id(agency.id).unwrap().unwrap();
    assert_eq!(agency.status, AgencyStatus::Pending);
    assert_eq!(repo.platform_stats().unwrap().pending_agencies, 1);
}

#[test]
fn test_plan_toggle_hides_plan_from_active_list() {
    let test_db = common::TestDb::new("test_plan_toggle.db");
    let repo = DieselRepository::new(test_db.pool());
    let plan = repo.list_plans(true).unwrap().remove(0);

    let disabled = repo.set_plan_active(plan.id, false).unwrap();
    assert!(!disabled.is_active);
    assert_eq!(repo.list_plans(true).unwrap().len(), 2);
    assert_eq!(repo.list_plans(false).unwrap().len(), 3);
}

#[test]
fn test_agency_admin_operations() {
    let test_db = common::TestDb::new("test_agency_admin_operations.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");
    register(&repo, "وكالة الغرب", "boss@west.com");

    let by_owner = repo
        .list_agencies(AgencyListQuery {
            search: Some("boss@".to_string()),
        })
        .unwrap();
    assert_eq!(by_owner.len(), 1);
    assert_eq!(by_owner[0].agency.name.as_str(), "وكالة الغرب");
    assert_eq!(by_owner[0].client_count, 0);
    assert!(by_owner[0].owner.is_some());

    let change = AgencyStatusChange::toggle(&agency, date(2024, 4, 1));
    let toggled = repo.update_agency_status(agency.id, &change).unwrap();
    assert_eq!(toggled.status, AgencyStatus::Active);
    assert!(toggled.subscription_ends.is_some());

    let info = UpdateAgencyInfo::new(
        AgencyName::new("وكالة الشرق الجديدة").unwrap(),
        Some("0112345678".to_string()),
        None,
    );
    let renamed = repo.update_agency_info(agency.id, &info).unwrap();
    assert_eq!(renamed.name.as_str(), "وكالة الشرق الجديدة");
    assert_eq!(renamed.phone.as_deref(), Some("0112345678"));

    assert_eq!(repo.list_recent_agencies(1).unwrap().len(), 1);
}

#[test]
fn test_upsert_super_admin_is_idempotent() {
    let test_db = common::TestDb::new("test_upsert_super_admin.db");
    let repo = DieselRepository::new(test_db.pool());

    let admin = |name: &str| {
        NewUser::new(
            None,
            Email::new("admin@motopay.app").unwrap(),
            "hash".to_string(),
            PersonName::new(name).unwrap(),
            Role::SuperAdmin,
        )
    };

    let first = repo.upsert_super_admin(&admin("المدير")).unwrap();
    let second = repo.upsert_super_admin(&admin("المدير العام")).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.role, Role::SuperAdmin);
    assert_eq!(second.name.as_str(), "المدير العام");

    repo.update_user_password(second.id, "new-hash").unwrap();
    let reloaded = repo.get_user_by_id(second.id).unwrap().unwrap();
    assert_eq!(reloaded.password_hash, "new-hash");
}

#[test]
fn test_large_client_import_is_inserted_in_one_go() {
    let test_db = common::TestDb::new("test_large_client_import.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");

    let rows: Vec<NewClient> = (0..2_500)
        .map(|i| new_client(&agency, &format!("عميل {i}"), &format!("05{i:08}")))
        .collect();

    assert_eq!(repo.create_clients(&rows).unwrap(), 2_500);
    assert_eq!(repo.count_clients(agency.id).unwrap(), 2_500);
}

#[test]
fn test_failed_client_import_leaves_no_rows() {
    let test_db = common::TestDb::new("test_failed_client_import.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة الشرق", "owner@east.com");

    let mut rows: Vec<NewClient> = (0..450)
        .map(|i| new_client(&agency, &format!("عميل {i}"), &format!("05{i:08}")))
        .collect();
    // Unknown agency in the last chunk violates the foreign key.
    let mut orphan = new_client(&agency, "يتيم", "0500000001");
    orphan.agency_id = AgencyId::new(9_999).unwrap();
    rows.push(orphan);

    assert!(repo.create_clients(&rows).is_err());
    assert_eq!(repo.count_clients(agency.id).unwrap(), 0);
}

#[test]
fn test_search_treats_wildcards_literally() {
    let test_db = common::TestDb::new("test_search_wildcards.db");
    let repo = DieselRepository::new(test_db.pool());
    let (agency, _) = register(&repo, "وكالة_الشرق", "owner@east.com");
    register(&repo, "وكالة الغرب", "owner@west.com");

    repo.create_clients(&[
        new_client(&agency, "أحمد", "0501234567"),
        new_client(&agency, "خالد", "0507654321"),
    ])
    .unwrap();

    let (underscore, _) = repo
        .list_clients(ClientListQuery::new(agency.id).search("_"))
        .unwrap();
    assert_eq!(underscore, 0);

    let (percent, _) = repo
        .list_clients(ClientListQuery::new(agency.id).search("%"))
        .unwrap();
    assert_eq!(percent, 0);

    let agencies = repo
        .list_agencies(AgencyListQuery {
            search: Some("_".to_string()),
        })
        .unwrap();
    assert_eq!(agencies.len(), 1);
    assert_eq!(agencies[0].agency.name.as_str(), "وكالة_الشرق");
}
