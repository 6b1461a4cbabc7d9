//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    pub templates_dir: String,
    /// Signs the session cookies and the identity token.
    pub secret: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
    /// Prepended to local phone numbers in WhatsApp links.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_session_ttl_hours() -> u64 {
    24 * 7
}

fn default_country_code() -> String {
    "966".to_string()
}

fn default_currency() -> String {
    "MAD".to_string()
}
