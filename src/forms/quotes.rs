use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::quote::{
    NewQuote, NewQuoteItem, QuoteStatus, UpdateQuote, checked_items_total,
};
use crate::forms::{optional_text, sanitize_inline_text};

const TITLE_MAX_LEN: u64 = 256;
const NOTE_MAX_LEN: u64 = 4096;
const DEFAULT_CURRENCY: &str = "USD";

pub type QuoteFormResult<T> = Result<T, QuoteFormError>;

#[derive(Debug, Error)]
pub enum QuoteFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("quote title cannot be empty")]
    EmptyTitle,
    #[error("currency must be a three letter code")]
    InvalidCurrency,
    #[error("quotes become `converted` only through conversion")]
    ConvertedStatus,
    #[error("quote total is out of range")]
    TotalOutOfRange,
}

/// A line of a submitted quote. The line total is taken as given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteItemForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0))]
    pub unit_price_cents: i64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub markup_percent: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount_percent: f64,
    #[validate(range(min = 0))]
    pub total_price_cents: i64,
}

impl From<QuoteItemForm> for NewQuoteItem {
    fn from(value: QuoteItemForm) -> Self {
        Self {
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price_cents: value.unit_price_cents,
            markup_percent: value.markup_percent,
            discount_percent: value.discount_percent,
            total_price_cents: value.total_price_cents,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteForm {
    #[validate(range(min = 1))]
    pub customer_id: i32,
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub internal_note: Option<String>,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub customer_note: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<QuoteItemForm>,
}

impl CreateQuoteForm {
    pub fn into_new_quote(self, rep_id: i32) -> QuoteFormResult<NewQuote> {
        self.validate()?;

        Ok(NewQuote {
            customer_id: self.customer_id,
            rep_id,
            title: sanitize_title(&self.title)?,
            valid_until: self.valid_until,
            delivery_date: self.delivery_date,
            internal_note: optional_text(self.internal_note),
            customer_note: optional_text(self.customer_note),
            currency: normalize_currency(self.currency)?,
            items: collect_items(self.items)?,
        })
    }
}

/// Full replacement of a quote: header fields plus the complete item set.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuoteForm {
    #[validate(length(min = 1, max = TITLE_MAX_LEN))]
    pub title: String,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub internal_note: Option<String>,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub customer_note: Option<String>,
    pub currency: Option<String>,
    pub status: Option<QuoteStatus>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<QuoteItemForm>,
}

impl UpdateQuoteForm {
    pub fn into_update_quote(self) -> QuoteFormResult<UpdateQuote> {
        self.validate()?;

        if self.status == Some(QuoteStatus::Converted) {
            return Err(QuoteFormError::ConvertedStatus);
        }

        Ok(UpdateQuote {
            title: sanitize_title(&self.title)?,
            valid_until: self.valid_until,
            delivery_date: self.delivery_date,
            internal_note: optional_text(self.internal_note),
            customer_note: optional_text(self.customer_note),
            currency: normalize_currency(self.currency)?,
            status: self.status,
            items: collect_items(self.items)?,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

fn collect_items(items: Vec<QuoteItemForm>) -> QuoteFormResult<Vec<NewQuoteItem>> {
    let items: Vec<NewQuoteItem> = items.into_iter().map(NewQuoteItem::from).collect();
    checked_items_total(&items).ok_or(QuoteFormError::TotalOutOfRange)?;
    Ok(items)
}

fn sanitize_title(title: &str) -> QuoteFormResult<String> {
    let title = sanitize_inline_text(title);
    if title.is_empty() {
        return Err(QuoteFormError::EmptyTitle);
    }
    Ok(title)
}

fn normalize_currency(currency: Option<String>) -> QuoteFormResult<String> {
    match optional_text(currency) {
        None => Ok(DEFAULT_CURRENCY.to_string()),
        Some(code) if code.len() == 3 && code.chars().all(|ch| ch.is_ascii_alphabetic()) => {
            Ok(code.to_ascii_uppercase())
        }
        Some(_) => Err(QuoteFormError::InvalidCurrency),
    }
}
