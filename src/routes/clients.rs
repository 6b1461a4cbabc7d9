use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::clients::ClientsQuery;
use crate::forms::clients::{ClientForm, UploadClientsForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, redirect, redirect_with_error, render_template};
use crate::services::clients as clients_service;

#[derive(Deserialize)]
struct ClientsQueryParams {
    search: Option<String>,
    page: Option<usize>,
}

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let web::Query(ClientsQueryParams { search, page }) = params;
    let query = ClientsQuery { search, page };

    match clients_service::list_clients(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "clients");
            context.insert("clients", &data.clients);
            context.insert("search_query", &data.search_query);
            context.insert("remaining_slots", &data.remaining_slots);
            render_template(&tera, "clients/index.html", &context)
        }
        Err(err) => page_error(err, "clients"),
    }
}

#[post("/clients/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    match clients_service::add_client(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("تمت إضافة العميل بنجاح").send();
            redirect("/clients")
        }
        Err(err) => redirect_with_error(err, "/clients", "add client"),
    }
}

#[post("/clients/upload")]
pub async fn upload_clients(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadClientsForm>,
) -> impl Responder {
    match clients_service::upload_clients(repo.get_ref(), &user, &form) {
        Ok(count) => {
            FlashMessage::success(format!("تم استيراد {count} عميل")).send();
            redirect("/clients")
        }
        Err(err) => redirect_with_error(err, "/clients", "import clients"),
    }
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients_service::load_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "clients");
            context.insert("client", &data.client);
            context.insert("payments", &data.payments);
            render_template(&tera, "clients/client.html", &context)
        }
        Err(err) => page_error(err, "client"),
    }
}

#[post("/clients/{client_id}/update")]
pub async fn update_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    let back = format!("/clients/{client_id}");

    match clients_service::update_client(repo.get_ref(), &user, client_id, form) {
        Ok(_) => {
            FlashMessage::success("تم تحديث بيانات العميل").send();
            redirect(&back)
        }
        Err(err) => redirect_with_error(err, &back, "update client"),
    }
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::delete_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("تم حذف العميل").send();
            redirect("/clients")
        }
        Err(err) => redirect_with_error(err, "/clients", "delete client"),
    }
}
