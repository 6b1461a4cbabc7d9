//! HTTP handlers and the helpers they share.

use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::{AuthError, login, session_expiry};
use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::ServiceError;
use crate::services::auth::SignedIn;

pub mod agencies;
pub mod api;
pub mod auth;
pub mod clients;
pub mod main;
pub mod payments;
pub mod reminders;
pub mod settings;
pub mod statistics;
pub mod subscriptions;

pub const NO_ACCESS: &str = "لا يمكنك الوصول إلى هذه الصفحة";
pub const NOT_FOUND: &str = "العنصر غير موجود";
pub const UNEXPECTED_ERROR: &str = "حدث خطأ غير متوقع، حاول مرة أخرى";

pub const DASHBOARD_PATH: &str = "/dashboard";

/// Maps flash levels to Bootstrap alert classes.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context of pages rendered without a session.
pub fn public_context(flash_messages: &IncomingFlashMessages) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
) -> Context {
    let mut context = public_context(flash_messages);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Flashes the error of a form submission and sends the browser to `back`.
///
/// Missing permissions always lead to the dashboard.
pub fn redirect_with_error(err: ServiceError, back: &str, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error(NO_ACCESS).send();
            redirect(DASHBOARD_PATH)
        }
        ServiceError::NotFound => {
            FlashMessage::error(NOT_FOUND).send();
            redirect(back)
        }
        ServiceError::Form(message) | ServiceError::Conflict(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(UNEXPECTED_ERROR).send();
            redirect(back)
        }
    }
}

/// Response of a page that could not be loaded.
pub fn page_error(err: ServiceError, page: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error(NO_ACCESS).send();
            redirect(DASHBOARD_PATH)
        }
        ServiceError::NotFound => {
            FlashMessage::error(NOT_FOUND).send();
            redirect(DASHBOARD_PATH)
        }
        err => {
            log::error!("Failed to load {page}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Signs fresh claims for the profile and stores them in the session.
pub fn start_session(
    req: &HttpRequest,
    signed_in: &SignedIn,
    server_config: &ServerConfig,
) -> Result<AuthenticatedUser, AuthError> {
    let claims = AuthenticatedUser::new(
        &signed_in.user,
        signed_in.agency.as_ref(),
        session_expiry(server_config.session_ttl_hours),
    );
    login(req, &claims, &server_config.secret)?;
    Ok(claims)
}
