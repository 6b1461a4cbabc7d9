//! Password hashing and the signed session token.

use std::future::{Ready, ready};

use actix_identity::{Identity, IdentityExt};
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("session error: {0}")]
    Session(String),
}

/// Hashes a password into a PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Malformed hashes never verify.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            log::error!("Stored password hash is malformed: {err}");
            false
        }
    }
}

/// Expiry of a session started now; oversized lifetimes fall back to a week.
pub fn session_expiry(ttl_hours: u64) -> DateTime<Utc> {
    let now = Utc::now();
    i64::try_from(ttl_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or_else(|| now + Duration::days(7))
}

pub fn issue_token(claims: &AuthenticatedUser, secret: &str) -> Result<String, AuthError> {
    Ok(encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validates the signature and expiry of a session token.
pub fn decode_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AuthError> {
    let data = decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(data.claims)
}

/// Stores the signed claims as the identity of the current session.
pub fn login(req: &HttpRequest, claims: &AuthenticatedUser, secret: &str) -> Result<(), AuthError> {
    let token = issue_token(claims, secret)?;
    Identity::login(&req.extensions(), token).map_err(|err| AuthError::Session(err.to_string()))?;
    Ok(())
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("server configuration is missing"))?;

    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not logged in"))?;
    let token = identity
        .id()
        .map_err(|_| ErrorUnauthorized("not logged in"))?;

    decode_token(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected session token: {err}");
        ErrorUnauthorized("invalid session")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Role;

    const SECRET: &str = "test-secret-with-enough-length-for-hs256";

    fn claims(exp: DateTime<Utc>) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "5".to_string(),
            email: "owner@agency.com".to_string(),
            name: "ليلى".to_string(),
            role: Role::Agency,
            agency_id: Some(2),
            agency_name: Some("وكالة الأمل".to_string()),
            exp: usize::try_from(exp.timestamp()).unwrap(),
        }
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plain-text"));
    }

    #[test]
    fn huge_session_lifetime_falls_back_to_a_week() {
        let expiry = session_expiry(u64::MAX);
        assert!(expiry <= Utc::now() + Duration::days(7));
        assert!(expiry > Utc::now() + Duration::days(6));
    }

    #[test]
    fn token_carries_claims() {
        let original = claims(session_expiry(1));
        let token = issue_token(&original, SECRET).unwrap();
        assert_eq!(decode_token(&token, SECRET).unwrap(), original);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&claims(session_expiry(1)), SECRET).unwrap();
        assert!(decode_token(&token, "another-secret-of-sufficient-size").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(&claims(Utc::now() - Duration::hours(3)), SECRET).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }
}
