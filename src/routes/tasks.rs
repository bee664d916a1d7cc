use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::tasks::{CompletedTasksQuery, NewTaskForm};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, tasks};

#[get("/crm/tasks")]
pub async fn list_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let tasks = tasks::list_open_tasks(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

#[post("/crm/tasks")]
pub async fn create_task(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<NewTaskForm>,
) -> Result<HttpResponse, ServiceError> {
    let task = tasks::create_task(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "task": task })))
}

#[get("/crm/tasks/grouped")]
pub async fn grouped_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let grouped = tasks::grouped_open_tasks(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "groupedTasks": grouped })))
}

#[get("/crm/tasks/completed")]
pub async fn completed_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    query: web::Query<CompletedTasksQuery>,
) -> Result<HttpResponse, ServiceError> {
    let grouped = tasks::completed_tasks(repo.get_ref(), &user, query.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "grouped": grouped })))
}

#[post("/crm/tasks/{id}/complete")]
pub async fn complete_task(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let task = tasks::complete_task(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task completed", "task": task })))
}

#[post("/crm/tasks/{id}/undo")]
pub async fn undo_task(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let task = tasks::reopen_task(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task reopened", "task": task })))
}

#[get("/crm/tasks/customer/{id}/open")]
pub async fn customer_open_tasks(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let tasks = tasks::list_customer_open_tasks(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}
