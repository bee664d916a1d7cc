use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::quote::{
    NewQuote as DomainNewQuote, NewQuoteItem as DomainNewQuoteItem, Quote as DomainQuote,
    QuoteItem as DomainQuoteItem, QuoteStatus, QuoteSummary, UpdateQuote as DomainUpdateQuote,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::quotes)]
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
    pub total_cents: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::quote_items)]
#[diesel(belongs_to(Quote, foreign_key = quote_id))]
pub struct QuoteItem {
    pub id: i32,
    pub quote_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub markup_percent: f64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quotes)]
pub struct NewQuote<'a> {
    pub customer_id: i32,
    pub rep_id: i32,
    pub title: &'a str,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub internal_note: Option<&'a str>,
    pub customer_note: Option<&'a str>,
    pub currency: &'a str,
    pub total_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::quote_items)]
pub struct NewQuoteItem {
    pub quote_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub markup_percent: f64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateQuoteHeader<'a> {
    pub title: &'a str,
    pub valid_until: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub internal_note: Option<&'a str>,
    pub customer_note: Option<&'a str>,
    pub currency: &'a str,
    pub total_cents: i64,
    pub updated_at: NaiveDateTime,
}

impl Quote {
    pub fn into_domain(self, items: Vec<QuoteItem>) -> Result<DomainQuote, RepositoryError> {
        let status = self
            .status
            .parse::<QuoteStatus>()
            .map_err(|err| RepositoryError::InvalidData(format!("quote {}: {err}", self.id)))?;

        Ok(DomainQuote {
            id: self.id,
            customer_id: self.customer_id,
            rep_id: self.rep_id,
            title: self.title,
            valid_until: self.valid_until,
            delivery_date: self.delivery_date,
            internal_note: self.internal_note,
            customer_note: self.customer_note,
            currency: self.currency,
            total_cents: self.total_cents,
            status,
            items: items.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    pub fn into_summary(
        self,
        customer_name: String,
        rep_name: String,
    ) -> Result<QuoteSummary, RepositoryError> {
        let status = self
            .status
            .parse::<QuoteStatus>()
            .map_err(|err| RepositoryError::InvalidData(format!("quote {}: {err}", self.id)))?;

        Ok(QuoteSummary {
            id: self.id,
            customer_id: self.customer_id,
            customer_name,
            rep_id: self.rep_id,
            rep_name,
            title: self.title,
            valid_until: self.valid_until,
            delivery_date: self.delivery_date,
            status,
            currency: self.currency,
            total_cents: self.total_cents,
            created_at: self.created_at,
        })
    }
}

impl From<QuoteItem> for DomainQuoteItem {
    fn from(value: QuoteItem) -> Self {
        Self {
            id: value.id,
            quote_id: value.quote_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price_cents: value.unit_price_cents,
            markup_percent: value.markup_percent,
            discount_percent: value.discount_percent,
            total_price_cents: value.total_price_cents,
        }
    }
}

impl<'a> From<&'a DomainNewQuote> for NewQuote<'a> {
    fn from(value: &'a DomainNewQuote) -> Self {
        Self {
            customer_id: value.customer_id,
            rep_id: value.rep_id,
            title: value.title.as_str(),
            valid_until: value.valid_until,
            delivery_date: value.delivery_date,
            internal_note: value.internal_note.as_deref(),
            customer_note: value.customer_note.as_deref(),
            currency: value.currency.as_str(),
            total_cents: value.total_cents(),
        }
    }
}

impl NewQuoteItem {
    pub fn from_domain(quote_id: i32, value: &DomainNewQuoteItem) -> Self {
        Self {
            quote_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price_cents: value.unit_price_cents,
            markup_percent: value.markup_percent,
            discount_percent: value.discount_percent,
            total_price_cents: value.total_price_cents,
        }
    }
}

impl<'a> From<&'a DomainUpdateQuote> for UpdateQuoteHeader<'a> {
    fn from(value: &'a DomainUpdateQuote) -> Self {
        Self {
            title: value.title.as_str(),
            valid_until: value.valid_until,
            delivery_date: value.delivery_date,
            internal_note: value.internal_note.as_deref(),
            customer_note: value.customer_note.as_deref(),
            currency: value.currency.as_str(),
            total_cents: value.total_cents(),
            updated_at: value.updated_at,
        }
    }
}
