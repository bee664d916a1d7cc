use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub sku: String,
    pub vendor: Option<String>,
    pub stock: i32,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub sku: &'a str,
    pub vendor: Option<&'a str>,
    pub stock: i32,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub name: &'a str,
    pub sku: &'a str,
    pub vendor: Option<&'a str>,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Changeset applied when an import row matches an existing sku. Stock is
/// written here too; the caller records the difference as an adjustment.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ImportProduct<'a> {
    pub name: &'a str,
    pub vendor: Option<&'a str>,
    pub stock: i32,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            name: value.name,
            sku: value.sku,
            vendor: value.vendor,
            stock: value.stock,
            reorder_threshold: value.reorder_threshold,
            unit_price_cents: value.unit_price_cents,
            category: value.category,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            sku: value.sku.as_str(),
            vendor: value.vendor.as_deref(),
            stock: value.stock,
            reorder_threshold: value.reorder_threshold,
            unit_price_cents: value.unit_price_cents,
            category: value.category.as_deref(),
            notes: value.notes.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            name: value.name.as_str(),
            sku: value.sku.as_str(),
            vendor: value.vendor.as_deref(),
            reorder_threshold: value.reorder_threshold,
            unit_price_cents: value.unit_price_cents,
            category: value.category.as_deref(),
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> ImportProduct<'a> {
    pub fn from_domain(value: &'a DomainNewProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            name: value.name.as_str(),
            vendor: value.vendor.as_deref(),
            stock: value.stock,
            reorder_threshold: value.reorder_threshold,
            unit_price_cents: value.unit_price_cents,
            category: value.category.as_deref(),
            notes: value.notes.as_deref(),
            updated_at,
        }
    }
}
