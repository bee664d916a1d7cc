use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::users::{CreateUserForm, RoleQuery, SetPasswordForm, UpdateUserForm};
use crate::repository::DieselRepository;
use crate::routes::message;
use crate::services::{ServiceError, users};

#[get("/users")]
pub async fn list_directory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let users = users::list_directory(repo.get_ref(), &user, RoleQuery::default())?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// Directory filtered by `?role=`, returned as a bare array.
#[get("/users/roles")]
pub async fn list_by_role(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<RoleQuery>,
) -> Result<HttpResponse, ServiceError> {
    let users = users::list_directory(repo.get_ref(), &user, query.into_inner())?;
    Ok(HttpResponse::Ok().json(users))
}

#[get("/admin/users")]
pub async fn list_accounts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let users = users::list_accounts(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[post("/admin/users")]
pub async fn create_account(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateUserForm>,
) -> Result<HttpResponse, ServiceError> {
    let created = users::create_account(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "user": created })))
}

#[patch("/admin/users/{id}/password")]
pub async fn set_password(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<SetPasswordForm>,
) -> Result<HttpResponse, ServiceError> {
    users::set_password(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(message("Password updated"))
}

#[patch("/admin/users/{id}/activate")]
pub async fn activate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let updated = users::set_active(repo.get_ref(), &user, path.into_inner(), true)?;
    Ok(HttpResponse::Ok().json(json!({ "user": updated })))
}

#[patch("/admin/users/{id}/deactivate")]
pub async fn deactivate(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let updated = users::set_active(repo.get_ref(), &user, path.into_inner(), false)?;
    Ok(HttpResponse::Ok().json(json!({ "user": updated })))
}

#[patch("/admin/users/{id}")]
pub async fn update_account(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<UpdateUserForm>,
) -> Result<HttpResponse, ServiceError> {
    let updated = users::update_account(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "user": updated })))
}

#[delete("/admin/users/{id}")]
pub async fn delete_account(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    users::delete_account(repo.get_ref(), &user, path.into_inner())?;
    Ok(message("User deleted"))
}
