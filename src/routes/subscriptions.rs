use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::subscriptions::SubscriptionsQuery;
use crate::forms::subscriptions::AddPlanForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, redirect, redirect_with_error, render_template};
use crate::services::subscriptions as subscriptions_service;

const SUBSCRIPTIONS_PATH: &str = "/subscriptions";

#[derive(Deserialize)]
struct SubscriptionsQueryParams {
    search: Option<String>,
}

#[get("/subscriptions")]
pub async fn show_subscriptions(
    params: web::Query<SubscriptionsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = SubscriptionsQuery {
        search: params.into_inner().search,
    };

    match subscriptions_service::load_subscriptions(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "subscriptions");
            context.insert("plans", &data.plans);
            context.insert("requests", &data.requests);
            context.insert("active_subscriptions", &data.active_subscriptions);
            context.insert("search_query", &data.search_query);
            render_template(&tera, "subscriptions/index.html", &context)
        }
        Err(err) => page_error(err, "subscriptions"),
    }
}

#[post("/subscriptions/plans/add")]
pub async fn add_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddPlanForm>,
) -> impl Responder {
    match subscriptions_service::add_plan(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("تمت إضافة الباقة").send();
            redirect(SUBSCRIPTIONS_PATH)
        }
        Err(err) => redirect_with_error(err, SUBSCRIPTIONS_PATH, "add plan"),
    }
}

#[post("/subscriptions/plans/{plan_id}/toggle")]
pub async fn toggle_plan(
    plan_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscriptions_service::toggle_plan(repo.get_ref(), &user, plan_id.into_inner()) {
        Ok(plan) => {
            let message = if plan.is_active {
                "تم تفعيل الباقة"
            } else {
                "تم إيقاف الباقة"
            };
            FlashMessage::success(message).send();
            redirect(SUBSCRIPTIONS_PATH)
        }
        Err(err) => redirect_with_error(err, SUBSCRIPTIONS_PATH, "toggle plan"),
    }
}

#[post("/subscriptions/requests/{request_id}/approve")]
pub async fn approve_request(
    request_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscriptions_service::approve_request(repo.get_ref(), &user, request_id.into_inner()) {
        Ok(agency) => {
            log::info!("Subscription of agency {} approved", agency.id);
            FlashMessage::success(format!("تم تفعيل اشتراك {}", agency.name)).send();
            redirect(SUBSCRIPTIONS_PATH)
        }
        Err(err) => redirect_with_error(err, SUBSCRIPTIONS_PATH, "approve subscription request"),
    }
}

#[post("/subscriptions/requests/{request_id}/reject")]
pub async fn reject_request(
    request_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscriptions_service::reject_request(repo.get_ref(), &user, request_id.into_inner()) {
        Ok(()) => {
            FlashMessage::warning("تم رفض طلب الاشتراك").send();
            redirect(SUBSCRIPTIONS_PATH)
        }
        Err(err) => redirect_with_error(err, SUBSCRIPTIONS_PATH, "reject subscription request"),
    }
}
