//! Creates the platform super-admin or resets its password.
//!
//! Usage: `create_super_admin <email> <password> [name]`

use std::env;

use config::Config;
use dotenvy::dotenv;

use motopay::auth::hash_password;
use motopay::db::establish_connection_pool;
use motopay::domain::types::{Email, PersonName, Role};
use motopay::domain::user::NewUser;
use motopay::forms::MIN_PASSWORD_LENGTH;
use motopay::models::config::ServerConfig;
use motopay::repository::{DieselRepository, UserWriter};

const DEFAULT_NAME: &str = "مدير النظام";

fn fail(message: impl std::fmt::Display) -> ! {
    log::error!("{message}");
    std::process::exit(1);
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let mut args = env::args().skip(1);
    let (Some(email), Some(password)) = (args.next(), args.next()) else {
        fail("Usage: create_super_admin <email> <password> [name]");
    };
    let name = args.next().unwrap_or_else(|| DEFAULT_NAME.to_string());

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        fail(format!(
            "The password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }

    let email = Email::new(email).unwrap_or_else(|err| fail(format!("Invalid email: {err}")));
    let name = PersonName::new(name).unwrap_or_else(|err| fail(format!("Invalid name: {err}")));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(config::Environment::with_prefix("APP"))
        .build()
        .unwrap_or_else(|err| fail(format!("Error loading settings: {err}")));

    let server_config = settings
        .try_deserialize::<ServerConfig>()
        .unwrap_or_else(|err| fail(format!("Error loading server config: {err}")));

    let pool = establish_connection_pool(&server_config.database_url)
        .unwrap_or_else(|err| fail(format!("Failed to establish database connection: {err}")));
    let repo = DieselRepository::new(pool);

    let password_hash = hash_password(&password)
        .unwrap_or_else(|err| fail(format!("Failed to hash password: {err}")));

    let new_user = NewUser::new(None, email, password_hash, name, Role::SuperAdmin);

    match repo.upsert_super_admin(&new_user) {
        Ok(user) => log::info!("Super-admin {} is ready", user.email),
        Err(err) => fail(format!("Failed to save super-admin: {err}")),
    }
}
