#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "data")]
pub mod whatsapp;

/// Shortest secret accepted for signing cookies.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    use crate::routes::agencies::{add_agency, show_agencies, toggle_agency_status};
    use crate::routes::api::api_v1_clients;
    use crate::routes::auth::{login, logout, register, show_login, show_register};
    use crate::routes::clients::{
        add_client, delete_client, show_client, show_clients, update_client, upload_clients,
    };
    use crate::routes::main::{dashboard, landing};
    use crate::routes::payments::{add_payment, approve_payment, reject_payment, show_payments};
    use crate::routes::reminders::{
        add_reminder, delete_reminder, send_whatsapp, show_reminders, toggle_reminder,
    };
    use crate::routes::settings::{
        change_password, preview_template, request_subscription, reset_template, save_template,
        show_settings, update_agency_info, update_profile,
    };
    use crate::routes::statistics::show_statistics;
    use crate::routes::subscriptions::{
        add_plan, approve_request, reject_request, show_subscriptions, toggle_plan,
    };

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    if server_config.secret.len() < MIN_SECRET_LENGTH {
        return Err(std::io::Error::other(format!(
            "The secret must be at least {MIN_SECRET_LENGTH} bytes long"
        )));
    }
    let secret_key = Key::derive_from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!(
        "Starting MotoPay on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(
                        (!server_config.domain.is_empty()).then(|| server_config.domain.clone()),
                    )
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(landing)
            .service(show_login)
            .service(login)
            .service(show_register)
            .service(register)
            .service(logout)
            .service(web::scope("/api").service(api_v1_clients))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(dashboard)
                    .service(show_clients)
                    .service(add_client)
                    .service(upload_clients)
                    .service(show_client)
                    .service(update_client)
                    .service(delete_client)
                    .service(show_payments)
                    .service(add_payment)
                    .service(approve_payment)
                    .service(reject_payment)
                    .service(show_reminders)
                    .service(add_reminder)
                    .service(toggle_reminder)
                    .service(delete_reminder)
                    .service(send_whatsapp)
                    .service(show_settings)
                    .service(update_profile)
                    .service(change_password)
                    .service(update_agency_info)
                    .service(save_template)
                    .service(reset_template)
                    .service(preview_template)
                    .service(request_subscription)
                    .service(show_agencies)
                    .service(add_agency)
                    .service(toggle_agency_status)
                    .service(show_subscriptions)
                    .service(add_plan)
                    .service(toggle_plan)
                    .service(approve_request)
                    .service(reject_request)
                    .service(show_statistics),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
