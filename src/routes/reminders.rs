use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::reminders::AddReminderForm;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, redirect, redirect_with_error, render_template};
use crate::services::reminders as reminders_service;

#[get("/reminders")]
pub async fn show_reminders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match reminders_service::list_reminders(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "reminders");
            context.insert("reminders", &data.reminders);
            context.insert("clients", &data.clients);
            context.insert("pending_payments", &data.pending_payments);
            render_template(&tera, "reminders/index.html", &context)
        }
        Err(err) => page_error(err, "reminders"),
    }
}

#[post("/reminders/add")]
pub async fn add_reminder(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReminderForm>,
) -> impl Responder {
    match reminders_service::add_reminder(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("تمت إضافة التذكير بنجاح").send();
            redirect("/reminders")
        }
        Err(err) => redirect_with_error(err, "/reminders", "add reminder"),
    }
}

#[post("/reminders/{reminder_id}/toggle")]
pub async fn toggle_reminder(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reminders_service::toggle_reminder(repo.get_ref(), &user, reminder_id.into_inner()) {
        Ok(()) => redirect("/reminders"),
        Err(err) => redirect_with_error(err, "/reminders", "toggle reminder"),
    }
}

#[post("/reminders/{reminder_id}/delete")]
pub async fn delete_reminder(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match reminders_service::delete_reminder(repo.get_ref(), &user, reminder_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("تم حذف التذكير").send();
            redirect("/reminders")
        }
        Err(err) => redirect_with_error(err, "/reminders", "delete reminder"),
    }
}

/// Marks the reminder sent and hands the browser over to WhatsApp.
#[post("/reminders/{reminder_id}/whatsapp")]
pub async fn send_whatsapp(
    reminder_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    match reminders_service::send_whatsapp(
        repo.get_ref(),
        &user,
        reminder_id.into_inner(),
        &server_config.default_country_code,
    ) {
        Ok(link) => redirect(&link),
        Err(err) => redirect_with_error(err, "/reminders", "send reminder"),
    }
}
