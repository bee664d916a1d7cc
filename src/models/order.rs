use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderItem as DomainNewOrderItem, Order as DomainOrder,
    OrderItem as DomainOrderItem, OrderStatus, UpdateOrder as DomainUpdateOrder,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub quote_id: Option<i32>,
    pub customer_id: i32,
    pub rep_id: i32,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub status: String,
    pub shipping_method: Option<String>,
    pub shipping_cost_cents: Option<i64>,
    pub fulfillment_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_items)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub quote_id: Option<i32>,
    pub customer_id: i32,
    pub rep_id: i32,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub currency: &'a str,
    pub status: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_items)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateOrder<'a> {
    pub status: &'a str,
    pub shipping_method: Option<&'a str>,
    pub shipping_cost_cents: Option<i64>,
    pub fulfillment_date: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

impl Order {
    pub fn into_domain(self, items: Vec<OrderItem>) -> Result<DomainOrder, RepositoryError> {
        let status = self
            .status
            .parse::<OrderStatus>()
            .map_err(|err| RepositoryError::InvalidData(format!("order {}: {err}", self.id)))?;

        Ok(DomainOrder {
            id: self.id,
            quote_id: self.quote_id,
            customer_id: self.customer_id,
            rep_id: self.rep_id,
            subtotal_cents: self.subtotal_cents,
            total_cents: self.total_cents,
            currency: self.currency,
            status,
            shipping_method: self.shipping_method,
            shipping_cost_cents: self.shipping_cost_cents,
            fulfillment_date: self.fulfillment_date,
            items: items.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<OrderItem> for DomainOrderItem {
    fn from(value: OrderItem) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price_cents: value.unit_price_cents,
            discount_percent: value.discount_percent,
            total_price_cents: value.total_price_cents,
        }
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            quote_id: Some(value.quote_id),
            customer_id: value.customer_id,
            rep_id: value.rep_id,
            subtotal_cents: value.subtotal_cents,
            total_cents: value.total_cents,
            currency: value.currency.as_str(),
            status: value.status.as_str(),
        }
    }
}

impl NewOrderItem {
    pub fn from_domain(order_id: i32, value: &DomainNewOrderItem) -> Self {
        Self {
            order_id,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price_cents: value.unit_price_cents,
            discount_percent: value.discount_percent,
            total_price_cents: value.total_price_cents,
        }
    }
}

impl<'a> From<&'a DomainUpdateOrder> for UpdateOrder<'a> {
    fn from(value: &'a DomainUpdateOrder) -> Self {
        Self {
            status: value.status.as_str(),
            shipping_method: value.shipping_method.as_deref(),
            shipping_cost_cents: value.shipping_cost_cents,
            fulfillment_date: value.fulfillment_date,
            updated_at: value.updated_at,
        }
    }
}
