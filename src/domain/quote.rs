use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lifecycle states of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    /// Terminal state reached only through conversion into an order.
    Converted,
}

impl QuoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Converted => "converted",
        }
    }

    /// Whether the quote may still be turned into an order.
    pub fn is_convertible(self) -> bool {
        !matches!(self, QuoteStatus::Converted | QuoteStatus::Rejected)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "accepted" => Ok(QuoteStatus::Accepted),
            "rejected" => Ok(QuoteStatus::Rejected),
            "converted" => Ok(QuoteStatus::Converted),
            other => Err(format!("unknown quote status `{other}`")),
        }
    }
}

/// A stored quote line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteItem {
    pub id: i32,
    pub quote_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub markup_percent: f64,
    pub discount_percent: f64,
    /// Line total as submitted by the caller; never recomputed.
    pub total_price_cents: i64,
}

/// A quote together with its complete item set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: i32,
    pub customer_id: i32,
    pub rep_id: i32,
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub internal_note: Option<String>,
    pub customer_note: Option<String>,
    pub currency: String,
    /// Sum of the item totals at the time the quote was last written.
    pub total_cents: i64,
    pub status: QuoteStatus,
    pub items: Vec<QuoteItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Quote row shown in listings, with display names resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuoteSummary {
    pub id: i32,
    pub customer_id: i32,
    pub customer_name: String,
    pub rep_id: i32,
    pub rep_name: String,
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub status: QuoteStatus,
    pub currency: String,
    pub total_cents: i64,
    pub created_at: NaiveDateTime,
}

/// A single quote with the customer and rep resolved to names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuoteDetails {
    #[serde(flatten)]
    pub quote: Quote,
    pub customer_name: String,
    pub rep_name: String,
}

/// A quote line as submitted by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuoteItem {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub markup_percent: f64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

/// Sum of the caller supplied line totals, `None` when it leaves the `i64` range.
pub fn checked_items_total(items: &[NewQuoteItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0i64, |total, item| total.checked_add(item.total_price_cents))
}

/// Sum of the caller supplied line totals, clamped at the `i64` bounds.
pub fn items_total(items: &[NewQuoteItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |total, item| total.saturating_add(item.total_price_cents))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub customer_id: i32,
    pub rep_id: i32,
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub internal_note: Option<String>,
    pub customer_note: Option<String>,
    pub currency: String,
    pub items: Vec<NewQuoteItem>,
}

impl NewQuote {
    pub fn total_cents(&self) -> i64 {
        items_total(&self.items)
    }
}

/// Header replacement plus the complete desired item set.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuote {
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub internal_note: Option<String>,
    pub customer_note: Option<String>,
    pub currency: String,
    /// New status; `None` keeps the current one.
    pub status: Option<QuoteStatus>,
    pub items: Vec<NewQuoteItem>,
    pub updated_at: NaiveDateTime,
}

impl UpdateQuote {
    pub fn total_cents(&self) -> i64 {
        items_total(&self.items)
    }
}

/// Filters applied when listing quotes.
#[derive(Debug, Clone, Default)]
pub struct QuoteListQuery {
    pub rep_id: Option<i32>,
}

impl QuoteListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rep_id(mut self, rep_id: i32) -> Self {
        self.rep_id = Some(rep_id);
        self
    }
}
