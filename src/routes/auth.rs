use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::auth::{TOKEN_COOKIE, TokenKeys};
use crate::config::ServerConfig;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::users::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::Message;
use crate::services::{ServiceError, users};

#[post("/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    keys: web::Data<TokenKeys>,
    config: web::Data<ServerConfig>,
    form: web::Json<LoginForm>,
) -> Result<HttpResponse, ServiceError> {
    let outcome = users::login(repo.get_ref(), keys.get_ref(), form.into_inner())?;

    let cookie = Cookie::build(TOKEN_COOKIE, outcome.token.clone())
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(keys.ttl().num_seconds()))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Login successful",
        "token": outcome.token,
        "user": outcome.user,
    })))
}

#[post("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(TOKEN_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(Message {
        message: "Logged out",
    })
}

#[get("/me")]
pub async fn me(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let user = users::current_user(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
