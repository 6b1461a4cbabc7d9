use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::agencies::AgenciesQuery;
use crate::forms::agencies::AddAgencyForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, redirect, redirect_with_error, render_template};
use crate::services::agencies as agencies_service;

#[derive(Deserialize)]
struct AgenciesQueryParams {
    search: Option<String>,
}

#[get("/agencies")]
pub async fn show_agencies(
    params: web::Query<AgenciesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = AgenciesQuery {
        search: params.into_inner().search,
    };

    match agencies_service::list_agencies(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "agencies");
            context.insert("agencies", &data.agencies);
            context.insert("active_count", &data.active_count);
            context.insert("pending_count", &data.pending_count);
            context.insert("search_query", &data.search_query);
            render_template(&tera, "agencies/index.html", &context)
        }
        Err(err) => page_error(err, "agencies"),
    }
}

#[post("/agencies/add")]
pub async fn add_agency(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddAgencyForm>,
) -> impl Responder {
    match agencies_service::add_agency(repo.get_ref(), &user, form) {
        Ok(agency) => {
            log::info!("Agency {} created by {}", agency.id, user.email);
            FlashMessage::success("تمت إضافة الوكالة بنجاح").send();
            redirect("/agencies")
        }
        Err(err) => redirect_with_error(err, "/agencies", "add agency"),
    }
}

#[post("/agencies/{agency_id}/toggle")]
pub async fn toggle_agency_status(
    agency_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match agencies_service::toggle_agency_status(repo.get_ref(), &user, agency_id.into_inner()) {
        Ok(agency) => {
            FlashMessage::success(format!("حالة الوكالة الآن: {}", agency.status.label())).send();
            redirect("/agencies")
        }
        Err(err) => redirect_with_error(err, "/agencies", "change agency status"),
    }
}
