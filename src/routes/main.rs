use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::dashboard::DashboardPageData;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, public_context, render_template};
use crate::services::dashboard as dashboard_service;

#[get("/")]
pub async fn landing(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = public_context(&flash_messages);
    context.insert("logged_in", &user.is_some());
    render_template(&tera, "main/landing.html", &context)
}

#[get("/dashboard")]
pub async fn dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dashboard_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "dashboard");
            match data {
                DashboardPageData::Admin(admin) => {
                    context.insert("stats", &admin.stats);
                    context.insert("activity_rate", &admin.stats.activity_rate());
                    context.insert("recent_agencies", &admin.recent_agencies);
                    render_template(&tera, "main/admin_dashboard.html", &context)
                }
                DashboardPageData::Agency(agency) => {
                    context.insert("dashboard", &agency);
                    render_template(&tera, "main/dashboard.html", &context)
                }
            }
        }
        Err(err) => page_error(err, "dashboard"),
    }
}
