use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, get, post, put, web};
use serde_json::json;

use crate::domain::attachment::AttachmentTarget;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::attachments::UploadAttachmentForm;
use crate::forms::orders::UpdateOrderForm;
use crate::forms::quotes::{CreateQuoteForm, UpdateQuoteForm};
use crate::mailer::{QuoteEmailRenderer, SharedMailer};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, attachments, orders, quotes};
use crate::storage::FsAttachmentStore;

#[get("/sales/quotes")]
pub async fn list_quotes(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let quotes = quotes::list_quotes(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "quotes": quotes })))
}

#[post("/sales/quotes")]
pub async fn create_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateQuoteForm>,
) -> Result<HttpResponse, ServiceError> {
    let quote = quotes::create_quote(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "quote": quote })))
}

#[get("/sales/quotes/{id}")]
pub async fn get_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let quote = quotes::get_quote(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "quote": quote })))
}

#[put("/sales/quotes/{id}")]
pub async fn update_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<UpdateQuoteForm>,
) -> Result<HttpResponse, ServiceError> {
    let quote = quotes::update_quote(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "quote": quote })))
}

#[post("/sales/quotes/{id}/convert")]
pub async fn convert_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let order = quotes::convert_quote(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "order": order })))
}

#[post("/sales/quotes/{id}/email")]
pub async fn email_quote(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    renderer: web::Data<QuoteEmailRenderer>,
    mailer: web::Data<SharedMailer>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let receipt = quotes::email_quote(
        repo.get_ref(),
        renderer.get_ref(),
        mailer.get_ref(),
        &user,
        path.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Quote emailed", "email": receipt })))
}

#[post("/sales/quotes/{id}/attachment")]
pub async fn upload_quote_attachment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<FsAttachmentStore>,
    path: web::Path<i32>,
    MultipartForm(form): MultipartForm<UploadAttachmentForm>,
) -> Result<HttpResponse, ServiceError> {
    upload(&user, &repo, &store, AttachmentTarget::Quote, path.into_inner(), form)
}

#[get("/sales/orders")]
pub async fn list_orders(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let orders = orders::list_orders(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[get("/sales/orders/{id}")]
pub async fn get_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let order = orders::get_order(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[put("/sales/orders/{id}")]
pub async fn update_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<UpdateOrderForm>,
) -> Result<HttpResponse, ServiceError> {
    let order = orders::update_order(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "order": order })))
}

#[post("/sales/orders/{id}/attachment")]
pub async fn upload_order_attachment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<FsAttachmentStore>,
    path: web::Path<i32>,
    MultipartForm(form): MultipartForm<UploadAttachmentForm>,
) -> Result<HttpResponse, ServiceError> {
    upload(&user, &repo, &store, AttachmentTarget::Order, path.into_inner(), form)
}

fn upload(
    user: &AuthenticatedUser,
    repo: &DieselRepository,
    store: &FsAttachmentStore,
    target: AttachmentTarget,
    related_id: i32,
    form: UploadAttachmentForm,
) -> Result<HttpResponse, ServiceError> {
    let filename = form.filename();
    let attachment = attachments::upload_attachment(
        repo,
        store,
        user,
        target,
        related_id,
        form.file.file.path(),
        &filename,
    )?;
    Ok(HttpResponse::Created().json(json!({ "attachment": attachment })))
}
