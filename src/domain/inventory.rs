use chrono::NaiveDateTime;
use serde::Serialize;

/// Reason recorded when the caller leaves it blank.
pub const DEFAULT_ADJUSTMENT_REASON: &str = "unspecified";
/// Reason recorded when a CSV import overwrites the stock of a known sku.
pub const IMPORT_ADJUSTMENT_REASON: &str = "import";

/// Audited, signed change to a product's stock.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InventoryAdjustment {
    pub id: i32,
    pub product_id: i32,
    pub change: i32,
    pub reason: String,
    pub note: Option<String>,
    pub adjusted_by: i32,
    /// Stock level right after this change was applied.
    pub resulting_stock: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryAdjustment {
    pub product_id: i32,
    pub change: i32,
    pub reason: String,
    pub note: Option<String>,
    pub adjusted_by: i32,
}

impl NewInventoryAdjustment {
    pub fn new(product_id: i32, change: i32, adjusted_by: i32) -> Self {
        Self {
            product_id,
            change,
            reason: DEFAULT_ADJUSTMENT_REASON.to_string(),
            note: None,
            adjusted_by,
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Summary row written once per CSV import batch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InventoryImport {
    pub id: i32,
    pub uploaded_by: i32,
    pub user_name: String,
    pub filename: String,
    pub success_count: i32,
    pub failure_count: i32,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryImport {
    pub uploaded_by: i32,
    pub filename: String,
    pub success_count: i32,
    pub failure_count: i32,
    pub note: Option<String>,
}

/// Outcome of an import batch returned to the caller.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub success_count: usize,
    pub failure_count: usize,
}

/// Filters for the import log listing.
#[derive(Debug, Clone, Default)]
pub struct ImportLogQuery {
    pub uploaded_by: Option<i32>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}
