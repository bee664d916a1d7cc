use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::inventory::{
    InventoryAdjustment as DomainInventoryAdjustment, InventoryImport as DomainInventoryImport,
    NewInventoryImport as DomainNewInventoryImport,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::inventory_adjustments)]
pub struct InventoryAdjustment {
    pub id: i32,
    pub product_id: i32,
    pub change: i32,
    pub reason: String,
    pub note: Option<String>,
    pub adjusted_by: i32,
    pub resulting_stock: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::inventory_adjustments)]
pub struct NewInventoryAdjustment<'a> {
    pub product_id: i32,
    pub change: i32,
    pub reason: &'a str,
    pub note: Option<&'a str>,
    pub adjusted_by: i32,
    pub resulting_stock: i32,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::inventory_imports)]
pub struct InventoryImport {
    pub id: i32,
    pub uploaded_by: i32,
    pub filename: String,
    pub success_count: i32,
    pub failure_count: i32,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::inventory_imports)]
pub struct NewInventoryImport<'a> {
    pub uploaded_by: i32,
    pub filename: &'a str,
    pub success_count: i32,
    pub failure_count: i32,
    pub note: Option<&'a str>,
}

impl From<InventoryAdjustment> for DomainInventoryAdjustment {
    fn from(value: InventoryAdjustment) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            change: value.change,
            reason: value.reason,
            note: value.note,
            adjusted_by: value.adjusted_by,
            resulting_stock: value.resulting_stock,
            created_at: value.created_at,
        }
    }
}

impl InventoryImport {
    pub fn into_domain(self, user_name: String) -> DomainInventoryImport {
        DomainInventoryImport {
            id: self.id,
            uploaded_by: self.uploaded_by,
            user_name,
            filename: self.filename,
            success_count: self.success_count,
            failure_count: self.failure_count,
            note: self.note,
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewInventoryImport> for NewInventoryImport<'a> {
    fn from(value: &'a DomainNewInventoryImport) -> Self {
        Self {
            uploaded_by: value.uploaded_by,
            filename: value.filename.as_str(),
            success_count: value.success_count,
            failure_count: value.failure_count,
            note: value.note.as_deref(),
        }
    }
}
