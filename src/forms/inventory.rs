use std::io::{Read, Seek, Write};

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::NaiveDate;
use csv::{StringRecord, Trim};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::{
    inventory::{ImportLogQuery, NewInventoryAdjustment},
    money::{format_cents, parse_money_cents},
    product::{NewProduct, Product, UpdateProduct},
};
use crate::forms::{optional_text, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const SKU_MAX_LEN: u64 = 64;

/// Column order used by both the import and the export format.
pub const CSV_COLUMNS: [&str; 8] = [
    "name",
    "sku",
    "vendor",
    "stock",
    "reorder_threshold",
    "unit_price",
    "category",
    "notes",
];

pub type InventoryFormResult<T> = Result<T, InventoryFormError>;

#[derive(Debug, Error)]
pub enum InventoryFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("product sku cannot be empty")]
    EmptySku,
    #[error("upload is missing the required `sku` and `name` headers")]
    MissingRequiredHeaders,
    #[error("failed to read upload: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Payload for creating a product.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = SKU_MAX_LEN))]
    pub sku: String,
    pub vendor: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub reorder_threshold: i32,
    #[validate(range(min = 0))]
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl AddProductForm {
    pub fn into_new_product(self) -> InventoryFormResult<NewProduct> {
        self.validate()?;

        let (name, sku) = sanitize_identity(&self.name, &self.sku)?;

        Ok(NewProduct {
            name,
            sku,
            vendor: optional_text(self.vendor),
            stock: self.stock,
            reorder_threshold: self.reorder_threshold,
            unit_price_cents: self.unit_price_cents,
            category: optional_text(self.category),
            notes: optional_text(self.notes),
        })
    }
}

/// Payload replacing the descriptive fields of a product. Stock only moves
/// through adjustments and imports.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = SKU_MAX_LEN))]
    pub sku: String,
    pub vendor: Option<String>,
    #[serde(default)]
    pub reorder_threshold: i32,
    #[validate(range(min = 0))]
    pub unit_price_cents: Option<i64>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl EditProductForm {
    pub fn into_update_product(self) -> InventoryFormResult<UpdateProduct> {
        self.validate()?;

        let (name, sku) = sanitize_identity(&self.name, &self.sku)?;

        Ok(UpdateProduct {
            name,
            sku,
            vendor: optional_text(self.vendor),
            reorder_threshold: self.reorder_threshold,
            unit_price_cents: self.unit_price_cents,
            category: optional_text(self.category),
            notes: optional_text(self.notes),
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// A signed stock change requested by the user.
#[derive(Debug, Deserialize)]
pub struct AdjustInventoryForm {
    pub change: i32,
    pub reason: Option<String>,
    pub note: Option<String>,
}

impl AdjustInventoryForm {
    pub fn into_adjustment(self, product_id: i32, adjusted_by: i32) -> NewInventoryAdjustment {
        let mut adjustment = NewInventoryAdjustment::new(product_id, self.change, adjusted_by);
        if let Some(reason) = optional_text(self.reason) {
            adjustment = adjustment.reason(reason);
        }
        if let Some(note) = optional_text(self.note) {
            adjustment = adjustment.note(note);
        }
        adjustment
    }
}

/// Query string of the import log listing.
#[derive(Debug, Default, Deserialize)]
pub struct ImportLogFilter {
    pub uploaded_by: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ImportLogFilter {
    /// Dates are inclusive: the end date covers the whole day.
    pub fn into_query(self) -> ImportLogQuery {
        ImportLogQuery {
            uploaded_by: self.uploaded_by,
            start: self.start_date.and_then(|date| date.and_hms_opt(0, 0, 0)),
            end: self
                .end_date
                .and_then(|date| date.and_hms_opt(23, 59, 59)),
        }
    }
}

#[derive(MultipartForm)]
/// Multipart form carrying an inventory CSV.
pub struct UploadInventoryForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
    pub note: Option<Text<String>>,
}

impl UploadInventoryForm {
    pub fn filename(&self) -> String {
        self.csv
            .file_name
            .clone()
            .unwrap_or_else(|| "upload.csv".to_string())
    }

    pub fn note(&self) -> Option<String> {
        optional_text(self.note.as_ref().map(|note| note.0.clone()))
    }

    pub fn parse_rows(&mut self) -> InventoryFormResult<Vec<ImportRow>> {
        self.csv.file.rewind()?;
        parse_inventory_csv(Read::by_ref(&mut self.csv.file))
    }
}

/// Why a single import row was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}: {reason}")]
pub struct RowError {
    pub row: usize,
    pub reason: String,
}

pub type ImportRow = Result<NewProduct, RowError>;

struct HeaderIndexes {
    name: usize,
    sku: usize,
    vendor: Option<usize>,
    stock: Option<usize>,
    reorder_threshold: Option<usize>,
    unit_price: Option<usize>,
    category: Option<usize>,
    notes: Option<usize>,
}

/// Parse an inventory CSV into per-row results.
///
/// A missing `sku` or `name` header rejects the whole upload. Every other
/// problem is confined to its row.
pub fn parse_inventory_csv<R: Read>(reader: R) -> InventoryFormResult<Vec<ImportRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let indexes = locate_headers(&headers).ok_or(InventoryFormError::MissingRequiredHeaders)?;

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let row = index + 2; // header is row 1
        let parsed = match record {
            Ok(record) => parse_row(&record, &indexes, row),
            Err(err) => Err(RowError {
                row,
                reason: err.to_string(),
            }),
        };
        rows.push(parsed);
    }

    Ok(rows)
}

/// Write products in the import column layout, prices as decimals.
pub fn write_inventory_csv<W: Write>(products: &[Product], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_COLUMNS)?;

    for product in products {
        csv_writer.write_record([
            product.name.clone(),
            product.sku.clone(),
            product.vendor.clone().unwrap_or_default(),
            product.stock.to_string(),
            product.reorder_threshold.to_string(),
            product
                .unit_price_cents
                .map(format_cents)
                .unwrap_or_default(),
            product.category.clone().unwrap_or_default(),
            product.notes.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn locate_headers(headers: &StringRecord) -> Option<HeaderIndexes> {
    let locate = |expected: &str| {
        headers.iter().position(|header| {
            header
                .trim_start_matches('\u{feff}')
                .trim()
                .eq_ignore_ascii_case(expected)
        })
    };

    Some(HeaderIndexes {
        name: locate("name")?,
        sku: locate("sku")?,
        vendor: locate("vendor"),
        stock: locate("stock"),
        reorder_threshold: locate("reorder_threshold"),
        unit_price: locate("unit_price"),
        category: locate("category"),
        notes: locate("notes"),
    })
}

fn parse_row(record: &StringRecord, indexes: &HeaderIndexes, row: usize) -> ImportRow {
    let field = |index: Option<usize>| {
        index
            .and_then(|index| record.get(index))
            .map(str::trim)
            .unwrap_or("")
    };
    let reject = |reason: &str| RowError {
        row,
        reason: reason.to_string(),
    };

    let sku = field(Some(indexes.sku));
    if sku.is_empty() {
        return Err(reject("missing sku"));
    }
    let name = sanitize_inline_text(field(Some(indexes.name)));
    if name.is_empty() {
        return Err(reject("missing name"));
    }

    let stock = field(indexes.stock)
        .parse::<i32>()
        .map_err(|_| reject("stock is not an integer"))?;

    let reorder_threshold = match field(indexes.reorder_threshold) {
        "" => 0,
        value => value
            .parse::<i32>()
            .map_err(|_| reject("reorder_threshold is not an integer"))?,
    };

    let unit_price_cents = match field(indexes.unit_price) {
        "" => None,
        value => Some(parse_money_cents(value).ok_or_else(|| reject("unit_price is not a number"))?),
    };

    let text = |index: Option<usize>| Some(field(index).to_string()).filter(|value| !value.is_empty());

    Ok(NewProduct {
        name,
        sku: sku.to_string(),
        vendor: text(indexes.vendor),
        stock,
        reorder_threshold,
        unit_price_cents,
        category: text(indexes.category),
        notes: text(indexes.notes),
    })
}

fn sanitize_identity(name: &str, sku: &str) -> InventoryFormResult<(String, String)> {
    let name = sanitize_inline_text(name);
    if name.is_empty() {
        return Err(InventoryFormError::EmptyName);
    }
    let sku: String = sku.trim().chars().filter(|ch| !ch.is_control()).collect();
    if sku.is_empty() {
        return Err(InventoryFormError::EmptySku);
    }
    Ok((name, sku))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::io::Cursor;

    fn parse(input: &str) -> InventoryFormResult<Vec<ImportRow>> {
        parse_inventory_csv(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn bad_rows_are_isolated() {
        let rows = parse(
            "name,sku,stock,reorder_threshold,unit_price\n\
             Bolt,B-1,10,5,0.25\n\
             Nut,N-1,20,,\n\
             Washer,W-1,lots,1,1\n\
             Screw,S-1,-4,2,1.5\n\
             Rivet,R-1,0,0,3\n",
        )
        .expect("parsed");

        assert_eq!(rows.len(), 5);
        assert_eq!(rows.iter().filter(|row| row.is_ok()).count(), 4);
        assert_eq!(
            rows[2],
            Err(RowError {
                row: 4,
                reason: "stock is not an integer".into()
            })
        );

        let bolt = rows[0].as_ref().expect("bolt");
        assert_eq!(bolt.unit_price_cents, Some(25));
        assert_eq!(bolt.reorder_threshold, 5);

        let nut = rows[1].as_ref().expect("nut");
        assert_eq!(nut.reorder_threshold, 0);
        assert_eq!(nut.unit_price_cents, None);

        assert_eq!(rows[3].as_ref().expect("screw").stock, -4);
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_is_stripped() {
        let rows = parse("\u{feff}Name,SKU,Stock,Vendor\nBolt,B-1,3,Acme\n").expect("parsed");

        let bolt = rows[0].as_ref().expect("bolt");
        assert_eq!(bolt.name, "Bolt");
        assert_eq!(bolt.sku, "B-1");
        assert_eq!(bolt.vendor.as_deref(), Some("Acme"));
    }

    #[test]
    fn missing_required_header_rejects_the_upload() {
        assert!(matches!(
            parse("name,stock\nBolt,3\n"),
            Err(InventoryFormError::MissingRequiredHeaders)
        ));
        assert!(matches!(
            parse("sku,stock\nB-1,3\n"),
            Err(InventoryFormError::MissingRequiredHeaders)
        ));
    }

    #[test]
    fn rows_without_sku_name_or_valid_price_fail() {
        let rows = parse("name,sku,stock,unit_price\nBolt,,1,\n,N-1,1,\nNut,N-2,1,cheap\n")
            .expect("parsed");

        let reasons: Vec<String> = rows
            .into_iter()
            .map(|row| row.expect_err("rejected").reason)
            .collect();
        assert_eq!(
            reasons,
            vec!["missing sku", "missing name", "unit_price is not a number"]
        );
    }

    #[test]
    fn fractional_and_exponent_prices_round_to_cents() {
        let rows = parse("name,sku,stock,unit_price\nBolt,B-1,3,1.999\nNut,N-1,2,1e2\n")
            .expect("parsed");

        assert_eq!(rows[0].as_ref().expect("bolt").unit_price_cents, Some(200));
        assert_eq!(rows[1].as_ref().expect("nut").unit_price_cents, Some(10000));
    }

    #[test]
    fn uploaded_file_is_read_from_the_start() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"name,sku,stock\nBolt,B-1,3\n")
            .expect("write csv");

        let mut form = UploadInventoryForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("stock.csv".into()),
                size: 0,
            },
            note: Some(Text(" weekly count ".into())),
        };

        let rows = form.parse_rows().expect("parsed");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().expect("bolt").sku, "B-1");
        assert_eq!(form.filename(), "stock.csv");
        assert_eq!(form.note().as_deref(), Some("weekly count"));
    }

    #[test]
    fn export_uses_the_import_columns() {
        let product = Product {
            id: 1,
            name: "Bolt".into(),
            sku: "B-1".into(),
            vendor: None,
            stock: 7,
            reorder_threshold: 2,
            unit_price_cents: Some(1250),
            category: Some("Hardware".into()),
            notes: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        };

        let mut out = Vec::new();
        write_inventory_csv(&[product], &mut out).expect("written");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(
            text,
            "name,sku,vendor,stock,reorder_threshold,unit_price,category,notes\n\
             Bolt,B-1,,7,2,12.50,Hardware,\n"
        );

        let rows = parse(&text).expect("re-imported");
        assert_eq!(rows[0].as_ref().expect("row").unit_price_cents, Some(1250));
    }

    #[test]
    fn adjustment_defaults_reason_when_blank() {
        let form = AdjustInventoryForm {
            change: -3,
            reason: Some("  ".into()),
            note: None,
        };
        let adjustment = form.into_adjustment(5, 9);
        assert_eq!(adjustment.reason, "unspecified");
        assert_eq!(adjustment.change, -3);
    }
}
