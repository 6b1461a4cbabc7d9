use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::payments::PaymentsQuery;
use crate::forms::payments::AddPaymentForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, redirect, redirect_with_error, render_template};
use crate::services::payments as payments_service;

#[derive(Deserialize)]
struct PaymentsQueryParams {
    search: Option<String>,
    tab: Option<String>,
    page: Option<usize>,
}

#[get("/payments")]
pub async fn show_payments(
    params: web::Query<PaymentsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let web::Query(PaymentsQueryParams { search, tab, page }) = params;
    let query = PaymentsQuery { search, tab, page };

    match payments_service::list_payments(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "payments");
            context.insert("payments", &data.payments);
            context.insert("totals", &data.totals);
            context.insert("tab", data.tab);
            context.insert("search_query", &data.search_query);
            context.insert("clients", &data.clients);
            context.insert("default_currency", &server_config.default_currency);
            render_template(&tera, "payments/index.html", &context)
        }
        Err(err) => page_error(err, "payments"),
    }
}

#[post("/payments/add")]
pub async fn add_payment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AddPaymentForm>,
) -> impl Responder {
    match payments_service::add_payment(
        repo.get_ref(),
        &user,
        form,
        &server_config.default_currency,
    ) {
        Ok(()) => {
            FlashMessage::success("تمت إضافة الدفعة بنجاح").send();
            redirect("/payments")
        }
        Err(err) => redirect_with_error(err, "/payments", "add payment"),
    }
}

#[post("/payments/{payment_id}/approve")]
pub async fn approve_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments_service::approve_payment(repo.get_ref(), &user, payment_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("تم تأكيد الدفعة").send();
            redirect("/payments")
        }
        Err(err) => redirect_with_error(err, "/payments", "approve payment"),
    }
}

#[post("/payments/{payment_id}/reject")]
pub async fn reject_payment(
    payment_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match payments_service::reject_payment(repo.get_ref(), &user, payment_id.into_inner()) {
        Ok(()) => {
            FlashMessage::warning("تم رفض الدفعة وحذفها").send();
            redirect("/payments")
        }
        Err(err) => redirect_with_error(err, "/payments", "reject payment"),
    }
}
