use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of an inventory product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    /// Stock keeping unit, unique across all products.
    pub sku: String,
    pub vendor: Option<String>,
    /// Units on hand. May go negative, nothing enforces a floor.
    pub stock: i32,
    pub reorder_threshold: i32,
    /// Unit price in the smallest currency unit.
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Whether stock has fallen below the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.stock < self.reorder_threshold
    }
}

/// Payload used both for creating a product and for the sku upsert performed
/// by CSV imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub vendor: Option<String>,
    pub stock: i32,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl NewProduct {
    #[must_use]
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            vendor: None,
            stock: 0,
            reorder_threshold: 0,
            unit_price_cents: None,
            category: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn with_reorder_threshold(mut self, threshold: i32) -> Self {
        self.reorder_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_unit_price_cents(mut self, cents: i64) -> Self {
        self.unit_price_cents = Some(cents);
        self
    }

    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Replacement of the descriptive product fields. Stock only moves through
/// inventory adjustments and imports.
#[derive(Debug, Clone)]
pub struct UpdateProduct {
    pub name: String,
    pub sku: String,
    pub vendor: Option<String>,
    pub reorder_threshold: i32,
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}
