use actix_web::{HttpResponse, delete, get, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::customers::{
    AssignForm, CustomerForm, InteractionForm, PipelineForm, SearchQuery, UnassignForm,
};
use crate::repository::DieselRepository;
use crate::routes::message;
use crate::services::{ServiceError, customers, pipeline};

#[get("/crm")]
pub async fn list_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let customers = customers::list_customers(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "customers": customers })))
}

#[post("/crm")]
pub async fn create_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CustomerForm>,
) -> Result<HttpResponse, ServiceError> {
    let customer = customers::create_customer(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "customer": customer })))
}

#[get("/crm/search")]
pub async fn search_customers(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ServiceError> {
    let matches = customers::search_customers(repo.get_ref(), &user, query.into_inner())?;
    Ok(HttpResponse::Ok().json(matches))
}

#[get("/crm/customers/{id}")]
pub async fn get_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let customer = customers::get_customer(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "customer": customer })))
}

#[delete("/crm/customers/{id}")]
pub async fn delete_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    customers::delete_customer(repo.get_ref(), &user, path.into_inner())?;
    Ok(message("Customer and all related data deleted"))
}

#[put("/crm/{id}")]
pub async fn update_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<CustomerForm>,
) -> Result<HttpResponse, ServiceError> {
    let customer =
        customers::update_customer(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "customer": customer })))
}

#[post("/crm/{id}/assign")]
pub async fn assign_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<AssignForm>,
) -> Result<HttpResponse, ServiceError> {
    let assignees =
        customers::assign_customer(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Assignments updated",
        "assignees": assignees,
    })))
}

#[post("/crm/{id}/unassign")]
pub async fn unassign_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<UnassignForm>,
) -> Result<HttpResponse, ServiceError> {
    customers::unassign_customer(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(message("User unassigned"))
}

/// System audit trail, super_admin only.
#[get("/crm/{id}/logs")]
pub async fn audit_log(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let logs = customers::list_audit_log(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "logs": logs })))
}

#[get("/crm/{id}/interactions")]
pub async fn list_interactions(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let logs = customers::list_interactions(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "logs": logs })))
}

#[post("/crm/{id}/interactions")]
pub async fn add_interaction(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<InteractionForm>,
) -> Result<HttpResponse, ServiceError> {
    let log =
        customers::add_interaction(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "message": "Log added", "log": log })))
}

#[get("/crm/{id}/pipeline")]
pub async fn pipeline_history(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let entries = pipeline::list_pipeline(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "pipeline": entries })))
}

#[post("/crm/{id}/pipeline")]
pub async fn add_pipeline_stage(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<PipelineForm>,
) -> Result<HttpResponse, ServiceError> {
    let entry = pipeline::add_stage(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "entry": entry })))
}
