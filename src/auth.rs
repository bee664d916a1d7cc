//! Access tokens, password hashing and the request extractor that turns a
//! token into an [`AuthenticatedUser`].

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{auth::AuthenticatedUser, user::User};
use crate::repository::{DieselRepository, UserReader};
use crate::services::{ServiceError, ServiceResult};

/// Cookie carrying the access token for browser clients.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Claims stored in every access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signing material and lifetime for access tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now.checked_add_signed(self.ttl).unwrap_or(now);
        let claims = Claims {
            sub: user.id,
            role: user.role.as_str().to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Check `password` against a stored argon2 hash. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Resolve the acting user from a raw token. The user is reloaded so that
/// deactivation and role changes apply immediately.
pub fn authenticate<R>(repo: &R, keys: &TokenKeys, token: &str) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    let claims = keys.decode(token).map_err(|err| {
        log::debug!("Rejected access token: {err}");
        ServiceError::Unauthorized
    })?;

    match repo.get_user_by_id(claims.sub)? {
        Some(user) if user.active => Ok(user.into()),
        Some(_) | None => Err(ServiceError::Unauthorized),
    }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| req.cookie(TOKEN_COOKIE).map(|cookie| cookie.value().to_string()))
}

impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> ServiceResult<AuthenticatedUser> {
    let token = token_from_request(req).ok_or(ServiceError::Unauthorized)?;

    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| ServiceError::internal("repository is not configured"))?;
    let keys = req
        .app_data::<web::Data<TokenKeys>>()
        .ok_or_else(|| ServiceError::internal("token keys are not configured"))?;

    authenticate(repo.get_ref(), keys.get_ref(), &token)
}
