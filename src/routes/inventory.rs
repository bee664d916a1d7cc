use actix_multipart::form::MultipartForm;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, put, web};
use serde_json::json;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::inventory::{
    AddProductForm, AdjustInventoryForm, EditProductForm, ImportLogFilter, UploadInventoryForm,
};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, inventory};

#[get("/inventory")]
pub async fn list_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let products = inventory::list_products(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[post("/inventory")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddProductForm>,
) -> Result<HttpResponse, ServiceError> {
    let product = inventory::create_product(repo.get_ref(), &user, form.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[get("/inventory/reorder-alerts")]
pub async fn reorder_alerts(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let alerts = inventory::reorder_alerts(repo.get_ref(), &user)?;
    Ok(HttpResponse::Ok().json(json!({ "alerts": alerts })))
}

#[get("/inventory/export")]
pub async fn export_inventory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> Result<HttpResponse, ServiceError> {
    let body = inventory::export_inventory(repo.get_ref(), &user)?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename("inventory.csv".to_string())],
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(disposition)
        .body(body))
}

#[post("/inventory/import")]
pub async fn import_inventory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadInventoryForm>,
) -> Result<HttpResponse, ServiceError> {
    let summary = inventory::import_inventory(repo.get_ref(), &user, form)?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/inventory/imports")]
pub async fn list_imports(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    filter: web::Query<ImportLogFilter>,
) -> Result<HttpResponse, ServiceError> {
    let imports = inventory::list_imports(repo.get_ref(), &user, filter.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "imports": imports })))
}

#[put("/inventory/{id}")]
pub async fn update_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<EditProductForm>,
) -> Result<HttpResponse, ServiceError> {
    let product =
        inventory::update_product(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[post("/inventory/{id}/adjust")]
pub async fn adjust_inventory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
    form: web::Json<AdjustInventoryForm>,
) -> Result<HttpResponse, ServiceError> {
    let outcome =
        inventory::adjust_inventory(repo.get_ref(), &user, path.into_inner(), form.into_inner())?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/inventory/{id}/history")]
pub async fn product_history(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let history = inventory::product_history(repo.get_ref(), &user, path.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({ "history": history })))
}
