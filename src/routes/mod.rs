//! JSON REST handlers mounted under `/api`.

use actix_web::{HttpResponse, web};
use serde::Serialize;

pub mod auth;
pub mod crm;
pub mod inventory;
pub mod sales;
pub mod tasks;
pub mod users;

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// `200 OK` with a `{"message": ...}` body.
pub(crate) fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(Message { message: text })
}

/// Register every API route. Literal paths are registered before the
/// `{id}` patterns they would otherwise collide with.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(users::list_directory)
        .service(users::list_by_role)
        .service(users::list_accounts)
        .service(users::create_account)
        .service(users::set_password)
        .service(users::activate)
        .service(users::deactivate)
        .service(users::update_account)
        .service(users::delete_account)
        .service(tasks::list_tasks)
        .service(tasks::create_task)
        .service(tasks::grouped_tasks)
        .service(tasks::completed_tasks)
        .service(tasks::complete_task)
        .service(tasks::undo_task)
        .service(tasks::customer_open_tasks)
        .service(crm::list_customers)
        .service(crm::create_customer)
        .service(crm::search_customers)
        .service(crm::get_customer)
        .service(crm::delete_customer)
        .service(crm::update_customer)
        .service(crm::assign_customer)
        .service(crm::unassign_customer)
        .service(crm::audit_log)
        .service(crm::list_interactions)
        .service(crm::add_interaction)
        .service(crm::pipeline_history)
        .service(crm::add_pipeline_stage)
        .service(inventory::list_products)
        .service(inventory::create_product)
        .service(inventory::reorder_alerts)
        .service(inventory::export_inventory)
        .service(inventory::import_inventory)
        .service(inventory::list_imports)
        .service(inventory::update_product)
        .service(inventory::adjust_inventory)
        .service(inventory::product_history)
        .service(sales::list_quotes)
        .service(sales::create_quote)
        .service(sales::get_quote)
        .service(sales::update_quote)
        .service(sales::convert_quote)
        .service(sales::email_quote)
        .service(sales::upload_quote_attachment)
        .service(sales::list_orders)
        .service(sales::get_order)
        .service(sales::update_order)
        .service(sales::upload_order_attachment);
}
