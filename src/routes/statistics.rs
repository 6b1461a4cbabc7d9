use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, page_error, render_template};
use crate::services::statistics as statistics_service;

#[get("/statistics")]
pub async fn show_statistics(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match statistics_service::load_statistics(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, &user, "statistics");
            context.insert("stats", &data.stats);
            context.insert("activity_rate", &data.activity_rate);
            context.insert("performance", &data.performance);
            render_template(&tera, "statistics/index.html", &context)
        }
        Err(err) => page_error(err, "statistics"),
    }
}
