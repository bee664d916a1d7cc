//! Product catalogue and stock movements.

use serde::Serialize;

use crate::access::{Action, require};
use crate::domain::{
    auth::AuthenticatedUser,
    inventory::{ImportSummary, InventoryAdjustment, InventoryImport, NewInventoryImport},
    product::Product,
};
use crate::forms::inventory::{
    AddProductForm, AdjustInventoryForm, EditProductForm, ImportLogFilter, ImportRow,
    UploadInventoryForm, write_inventory_csv,
};
use crate::repository::{InventoryReader, InventoryWriter, ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Result of a manual stock adjustment.
#[derive(Debug, Serialize)]
pub struct AdjustmentOutcome {
    pub adjustment: InventoryAdjustment,
    pub new_stock: i32,
}

/// Every product, sorted by name.
pub fn list_products<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    require(user, Action::ListProducts)?;
    Ok(repo.list_products()?)
}

pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    require(user, Action::ManageProducts)?;

    let new_product = form.into_new_product().map_err(ServiceError::invalid)?;
    let created = repo.create_product(&new_product)?;
    log::info!("User {} created product {} ({})", user.id, created.id, created.sku);
    Ok(created)
}

pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: EditProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    require(user, Action::ManageProducts)?;

    let updates = form.into_update_product().map_err(ServiceError::invalid)?;
    repo.update_product(product_id, &updates)
        .map_err(ServiceError::missing("product"))
}

/// Apply a signed stock change. Stock may go negative.
pub fn adjust_inventory<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: AdjustInventoryForm,
) -> ServiceResult<AdjustmentOutcome>
where
    R: InventoryWriter + ?Sized,
{
    require(user, Action::AdjustInventory)?;

    let adjustment = form.into_adjustment(product_id, user.id);
    let adjustment = repo
        .adjust_stock(&adjustment)
        .map_err(ServiceError::missing("product"))?;

    log::info!(
        "User {} adjusted product {product_id} by {} ({}), stock now {}",
        user.id,
        adjustment.change,
        adjustment.reason,
        adjustment.resulting_stock
    );

    Ok(AdjustmentOutcome {
        new_stock: adjustment.resulting_stock,
        adjustment,
    })
}

pub fn product_history<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Vec<InventoryAdjustment>>
where
    R: ProductReader + InventoryReader + ?Sized,
{
    require(user, Action::ViewInventoryHistory)?;

    if repo.get_product_by_id(product_id)?.is_none() {
        return Err(ServiceError::not_found("product"));
    }
    Ok(repo.list_adjustments(product_id)?)
}

pub fn reorder_alerts<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Product>>
where
    R: ProductReader + ?Sized,
{
    require(user, Action::ViewReorderAlerts)?;
    Ok(repo.list_reorder_alerts()?)
}

/// CSV rendering of the whole catalogue in the import column layout.
pub fn export_inventory<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<u8>>
where
    R: ProductReader + ?Sized,
{
    require(user, Action::ExportInventory)?;

    let products = repo.list_products()?;
    let mut buffer = Vec::new();
    write_inventory_csv(&products, &mut buffer).map_err(ServiceError::internal)?;
    Ok(buffer)
}

/// Import an uploaded CSV. A malformed header rejects the upload; every other
/// problem only fails its own row.
pub fn import_inventory<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mut form: UploadInventoryForm,
) -> ServiceResult<ImportSummary>
where
    R: InventoryWriter + ?Sized,
{
    require(user, Action::ImportInventory)?;

    let rows = form.parse_rows().map_err(ServiceError::invalid)?;
    import_rows(repo, user, form.filename(), form.note(), rows)
}

/// Upsert the valid rows one by one and log a single summary for the batch.
pub fn import_rows<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filename: String,
    note: Option<String>,
    rows: Vec<ImportRow>,
) -> ServiceResult<ImportSummary>
where
    R: InventoryWriter + ?Sized,
{
    require(user, Action::ImportInventory)?;

    let mut summary = ImportSummary::default();
    for row in rows {
        let outcome = match row {
            Ok(product) => repo
                .upsert_imported_product(&product, user.id)
                .map(|_| ())
                .map_err(|err| format!("sku {}: {err}", product.sku)),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(()) => summary.success_count += 1,
            Err(reason) => {
                log::warn!("Inventory import {filename}: {reason}");
                summary.failure_count += 1;
            }
        }
    }

    repo.record_import(&NewInventoryImport {
        uploaded_by: user.id,
        filename: filename.clone(),
        success_count: count_as_i32(summary.success_count),
        failure_count: count_as_i32(summary.failure_count),
        note,
    })?;

    log::info!(
        "User {} imported {filename}: {} ok, {} failed",
        user.id,
        summary.success_count,
        summary.failure_count
    );
    Ok(summary)
}

fn count_as_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

pub fn list_imports<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter: ImportLogFilter,
) -> ServiceResult<Vec<InventoryImport>>
where
    R: InventoryReader + ?Sized,
{
    require(user, Action::ViewImportLogs)?;
    Ok(repo.list_imports(filter.into_query())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NewProduct;
    use crate::domain::user::Role;
    use crate::forms::inventory::{RowError, parse_inventory_csv};
    use crate::repository::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::customers::tests::actor;
    use chrono::NaiveDateTime;

    fn product(id: i32, name: &str, sku: &str, stock: i32) -> Product {
        Product {
            id,
            name: name.into(),
            sku: sku.into(),
            vendor: None,
            stock,
            reorder_threshold: 5,
            unit_price_cents: Some(1250),
            category: None,
            notes: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn adjusted(product_id: i32, change: i32, resulting_stock: i32) -> InventoryAdjustment {
        InventoryAdjustment {
            id: 1,
            product_id,
            change,
            reason: "damaged".into(),
            note: None,
            adjusted_by: 2,
            resulting_stock,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn adjustment_reports_new_stock() {
        let mut repo = MockRepository::new();
        repo.expect_adjust_stock()
            .withf(|adjustment| adjustment.change == -3 && adjustment.reason == "damaged")
            .returning(|adjustment| Ok(adjusted(adjustment.product_id, adjustment.change, 7)));

        let form = AdjustInventoryForm {
            change: -3,
            reason: Some("damaged".into()),
            note: None,
        };
        let outcome = adjust_inventory(&repo, &actor(2, Role::InventoryManager), 4, form)
            .expect("adjusted");
        assert_eq!(outcome.new_stock, 7);
        assert_eq!(outcome.adjustment.resulting_stock, 7);
    }

    #[test]
    fn adjusting_a_missing_product_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_adjust_stock()
            .returning(|_| Err(RepositoryError::NotFound));

        let form = AdjustInventoryForm {
            change: 1,
            reason: None,
            note: None,
        };
        let result = adjust_inventory(&repo, &actor(1, Role::SuperAdmin), 99, form);
        assert!(matches!(result, Err(ServiceError::NotFound(what)) if what == "product"));
    }

    #[test]
    fn sales_roles_cannot_adjust_stock() {
        let mut repo = MockRepository::new();
        repo.expect_adjust_stock().never();

        for role in [Role::SalesRep, Role::Csr, Role::Accountant] {
            let form = AdjustInventoryForm {
                change: 1,
                reason: None,
                note: None,
            };
            let result = adjust_inventory(&repo, &actor(3, role), 4, form);
            assert!(matches!(result, Err(ServiceError::Forbidden(_))));
        }
    }

    #[test]
    fn import_counts_bad_rows_without_aborting() {
        let csv = "name,sku,stock\nA,S1,1\nB,S2,2\nC,S3,three\nD,S4,4\nE,S5,5\n";
        let rows = parse_inventory_csv(csv.as_bytes()).expect("headers ok");

        let mut repo = MockRepository::new();
        repo.expect_upsert_imported_product()
            .times(4)
            .returning(|new_product, _| {
                Ok(product(1, &new_product.name, &new_product.sku, new_product.stock))
            });
        repo.expect_record_import()
            .withf(|import| {
                import.success_count == 4 && import.failure_count == 1 && import.filename == "stock.csv"
            })
            .times(1)
            .returning(|_| Ok(()));

        let summary = import_rows(
            &repo,
            &actor(2, Role::InventoryManager),
            "stock.csv".into(),
            None,
            rows,
        )
        .expect("imported");

        assert_eq!(summary.success_count, 4);
        assert_eq!(summary.failure_count, 1);
    }

    #[test]
    fn failed_upsert_counts_as_failure() {
        let rows: Vec<ImportRow> = vec![
            Ok(NewProduct::new("A", "S1")),
            Err(RowError {
                row: 3,
                reason: "missing sku".into(),
            }),
            Ok(NewProduct::new("B", "S2")),
        ];

        let mut repo = MockRepository::new();
        repo.expect_upsert_imported_product()
            .withf(|new_product, _| new_product.sku == "S1")
            .returning(|_, _| Err(RepositoryError::Conflict("locked".into())));
        repo.expect_upsert_imported_product()
            .withf(|new_product, _| new_product.sku == "S2")
            .returning(|new_product, _| Ok(product(2, &new_product.name, &new_product.sku, 0)));
        repo.expect_record_import().returning(|_| Ok(()));

        let summary = import_rows(&repo, &actor(1, Role::SuperAdmin), "x.csv".into(), None, rows)
            .expect("imported");
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 2);
    }

    #[test]
    fn accountants_export_but_cannot_import() {
        let mut repo = MockRepository::new();
        repo.expect_list_products()
            .returning(|| Ok(vec![product(1, "Bolt", "B-1", 3)]));
        repo.expect_record_import().never();

        let accountant = actor(5, Role::Accountant);
        let csv = export_inventory(&repo, &accountant).expect("export");
        let text = String::from_utf8(csv).expect("utf8");
        assert!(text.starts_with("name,sku,vendor,stock,reorder_threshold,unit_price,category,notes\n"));
        assert!(text.contains("Bolt,B-1,,3,5,12.50,,"));

        let result = import_rows(&repo, &accountant, "x.csv".into(), None, Vec::new());
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn history_of_unknown_product_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_product_by_id().returning(|_| Ok(None));
        repo.expect_list_adjustments().never();

        let result = product_history(&repo, &actor(1, Role::SuperAdmin), 42);
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
