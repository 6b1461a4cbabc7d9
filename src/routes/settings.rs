use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde_json::json;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::settings::{
    AgencyInfoForm, PasswordForm, ProfileForm, SubscriptionRequestForm, TemplateForm,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, page_error, redirect, redirect_with_error, render_template, start_session,
};
use crate::services::ServiceError;
use crate::services::auth as auth_service;
use crate::services::settings as settings_service;

const SETTINGS_PATH: &str = "/settings";

/// Re-signs the session so the navigation shows the new names.
fn refresh_session(
    req: &HttpRequest,
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    server_config: &ServerConfig,
) {
    let signed_in = match auth_service::refresh_session(repo, user) {
        Ok(signed_in) => signed_in,
        Err(err) => {
            log::error!("Failed to reload profile for the session: {err}");
            return;
        }
    };

    if let Err(err) = start_session(req, &signed_in, server_config) {
        log::error!("Failed to refresh session: {err}");
    }
}

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match settings_service::load_settings(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "settings");
            context.insert("profile", &data.profile);
            if let Some(agency) = &data.agency {
                context.insert("agency", &agency.agency);
                context.insert("template", &agency.template);
                context.insert("is_default_template", &agency.is_default_template);
                context.insert("preview", &agency.preview);
                context.insert("plans", &agency.plans);
                context.insert("current_plan", &agency.current_plan);
                context.insert("has_pending_request", &agency.has_pending_request);
            }
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => page_error(err, "settings"),
    }
}

#[post("/settings/profile")]
pub async fn update_profile(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    match settings_service::update_profile(repo.get_ref(), &user, form) {
        Ok(_) => {
            refresh_session(&req, repo.get_ref(), &user, &server_config);
            FlashMessage::success("تم تحديث الملف الشخصي").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "update profile"),
    }
}

#[post("/settings/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<PasswordForm>,
) -> impl Responder {
    match settings_service::change_password(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("تم تغيير كلمة المرور").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "change password"),
    }
}

#[post("/settings/agency")]
pub async fn update_agency_info(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<AgencyInfoForm>,
) -> impl Responder {
    match settings_service::update_agency_info(repo.get_ref(), &user, form) {
        Ok(_) => {
            refresh_session(&req, repo.get_ref(), &user, &server_config);
            FlashMessage::success("تم تحديث بيانات الوكالة").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "update agency"),
    }
}

#[post("/settings/template")]
pub async fn save_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<TemplateForm>,
) -> impl Responder {
    match settings_service::save_template(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("تم حفظ قالب الرسالة").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "save template"),
    }
}

#[post("/settings/template/reset")]
pub async fn reset_template(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match settings_service::reset_template(repo.get_ref(), &user) {
        Ok(()) => {
            FlashMessage::info("تمت استعادة القالب الافتراضي").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "reset template"),
    }
}

/// Live preview used by the template editor.
#[post("/settings/template/preview")]
pub async fn preview_template(
    user: AuthenticatedUser,
    web::Form(form): web::Form<TemplateForm>,
) -> impl Responder {
    match settings_service::preview_template(&user, form) {
        Ok(preview) => HttpResponse::Ok().json(json!({ "preview": preview })),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    }
}

#[post("/settings/subscription")]
pub async fn request_subscription(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SubscriptionRequestForm>,
) -> impl Responder {
    match settings_service::request_subscription(repo.get_ref(), &user, form) {
        Ok(()) => {
            FlashMessage::success("تم إرسال طلب الاشتراك وسيتم مراجعته قريباً").send();
            redirect(SETTINGS_PATH)
        }
        Err(err) => redirect_with_error(err, SETTINGS_PATH, "request subscription"),
    }
}
