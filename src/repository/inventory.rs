use diesel::prelude::*;

use crate::{
    domain::{
        inventory::{
            IMPORT_ADJUSTMENT_REASON, ImportLogQuery,
            InventoryAdjustment as DomainInventoryAdjustment,
            InventoryImport as DomainInventoryImport,
            NewInventoryAdjustment as DomainNewInventoryAdjustment,
            NewInventoryImport as DomainNewInventoryImport,
        },
        product::{NewProduct as DomainNewProduct, Product as DomainProduct},
    },
    models::{
        inventory::{
            InventoryAdjustment as DbInventoryAdjustment, InventoryImport as DbInventoryImport,
            NewInventoryAdjustment as DbNewInventoryAdjustment,
            NewInventoryImport as DbNewInventoryImport,
        },
        product::{ImportProduct, NewProduct as DbNewProduct, Product as DbProduct},
    },
    repository::{DieselRepository, InventoryReader, InventoryWriter, RepositoryResult},
};

impl InventoryReader for DieselRepository {
    fn list_adjustments(
        &self,
        product_id: i32,
    ) -> RepositoryResult<Vec<DomainInventoryAdjustment>> {
        use crate::schema::inventory_adjustments;

        let mut conn = self.conn()?;
        let rows = inventory_adjustments::table
            .filter(inventory_adjustments::product_id.eq(product_id))
            .order((
                inventory_adjustments::created_at.desc(),
                inventory_adjustments::id.desc(),
            ))
            .load::<DbInventoryAdjustment>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_imports(&self, query: ImportLogQuery) -> RepositoryResult<Vec<DomainInventoryImport>> {
        use crate::schema::{inventory_imports, users};

        let mut conn = self.conn()?;

        let mut items = inventory_imports::table
            .inner_join(users::table.on(users::id.eq(inventory_imports::uploaded_by)))
            .select((DbInventoryImport::as_select(), users::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(uploaded_by) = query.uploaded_by {
            items = items.filter(inventory_imports::uploaded_by.eq(uploaded_by));
        }
        if let Some(start) = query.start {
            items = items.filter(inventory_imports::created_at.ge(start));
        }
        if let Some(end) = query.end {
            items = items.filter(inventory_imports::created_at.le(end));
        }

        let rows = items
            .order((inventory_imports::created_at.desc(), inventory_imports::id.desc()))
            .load::<(DbInventoryImport, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(row, user_name)| row.into_domain(user_name))
            .collect())
    }
}

impl InventoryWriter for DieselRepository {
    fn adjust_stock(
        &self,
        adjustment: &DomainNewInventoryAdjustment,
    ) -> RepositoryResult<DomainInventoryAdjustment> {
        use crate::schema::{inventory_adjustments, products};

        self.write_transaction(|conn| {
            // Single read-modify-write statement; a missing product yields NotFound.
            let resulting_stock = diesel::update(
                products::table.filter(products::id.eq(adjustment.product_id)),
            )
            .set((
                products::stock.eq(products::stock + adjustment.change),
                products::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .returning(products::stock)
            .get_result::<i32>(conn)?;

            let created = diesel::insert_into(inventory_adjustments::table)
                .values(&DbNewInventoryAdjustment {
                    product_id: adjustment.product_id,
                    change: adjustment.change,
                    reason: adjustment.reason.as_str(),
                    note: adjustment.note.as_deref(),
                    adjusted_by: adjustment.adjusted_by,
                    resulting_stock,
                })
                .get_result::<DbInventoryAdjustment>(conn)?;

            Ok(created.into())
        })
    }

    fn upsert_imported_product(
        &self,
        product: &DomainNewProduct,
        imported_by: i32,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::{inventory_adjustments, products};

        self.write_transaction(|conn| {
            let existing = products::table
                .filter(products::sku.eq(&product.sku))
                .first::<DbProduct>(conn)
                .optional()?;

            let Some(existing) = existing else {
                let created = diesel::insert_into(products::table)
                    .values(&DbNewProduct::from(product))
                    .get_result::<DbProduct>(conn)?;
                return Ok(created.into());
            };

            let updated = diesel::update(products::table.filter(products::id.eq(existing.id)))
                .set(&ImportProduct::from_domain(
                    product,
                    chrono::Local::now().naive_utc(),
                ))
                .get_result::<DbProduct>(conn)?;

            let change = updated.stock - existing.stock;
            if change != 0 {
                diesel::insert_into(inventory_adjustments::table)
                    .values(&DbNewInventoryAdjustment {
                        product_id: updated.id,
                        change,
                        reason: IMPORT_ADJUSTMENT_REASON,
                        note: None,
                        adjusted_by: imported_by,
                        resulting_stock: updated.stock,
                    })
                    .execute(conn)?;
            }

            Ok(updated.into())
        })
    }

    fn record_import(&self, import: &DomainNewInventoryImport) -> RepositoryResult<()> {
        use crate::schema::inventory_imports;

        let mut conn = self.conn()?;
        diesel::insert_into(inventory_imports::table)
            .values(&DbNewInventoryImport::from(import))
            .execute(&mut conn)?;

        Ok(())
    }
}
