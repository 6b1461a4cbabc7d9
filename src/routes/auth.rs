use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{
    DASHBOARD_PATH, UNEXPECTED_ERROR, public_context, redirect, redirect_with_error,
    render_template, start_session,
};
use crate::services::auth as auth_service;
use crate::services::auth::SignedIn;

fn sign_in(
    req: &HttpRequest,
    signed_in: &SignedIn,
    server_config: &ServerConfig,
    back: &str,
) -> HttpResponse {
    match start_session(req, signed_in, server_config) {
        Ok(_) => redirect(DASHBOARD_PATH),
        Err(err) => {
            let email = &signed_in.user.email;
            log::error!("Failed to start session for {email}: {err}");
            FlashMessage::error(UNEXPECTED_ERROR).send();
            redirect(back)
        }
    }
}

#[get("/login")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(DASHBOARD_PATH);
    }
    render_template(&tera, "auth/login.html", &public_context(&flash_messages))
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth_service::login(repo.get_ref(), form) {
        Ok(signed_in) => {
            log::info!("User {} logged in", signed_in.user.email);
            sign_in(&req, &signed_in, &server_config, "/login")
        }
        Err(err) => redirect_with_error(err, "/login", "log in"),
    }
}

#[get("/register")]
pub async fn show_register(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if user.is_some() {
        return redirect(DASHBOARD_PATH);
    }
    render_template(
        &tera,
        "auth/register.html",
        &public_context(&flash_messages),
    )
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), form) {
        Ok(signed_in) => {
            log::info!("Agency registered by {}", signed_in.user.email);
            FlashMessage::success("تم إنشاء الحساب بنجاح، حسابك بانتظار التفعيل").send();
            sign_in(&req, &signed_in, &server_config, "/register")
        }
        Err(err) => redirect_with_error(err, "/register", "register agency"),
    }
}

#[post("/logout")]
pub async fn logout(user: Option<Identity>) -> impl Responder {
    if let Some(user) = user {
        user.logout();
    }
    redirect("/")
}
