use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::quote::Quote;

/// Possible lifecycle states for an order.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been created from a quote and awaits processing.
    #[default]
    Pending,
    /// Order is currently being fulfilled.
    Processing,
    /// Goods have left the warehouse.
    Shipped,
    /// Order has been fulfilled and is considered complete.
    Completed,
    /// Order has been cancelled and should not be processed further.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

/// An order line, copied from the quote line it originates from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

/// Domain representation of an order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    pub id: i32,
    /// Quote the order was converted from.
    pub quote_id: Option<i32>,
    pub customer_id: i32,
    pub rep_id: i32,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    /// ISO 4217 currency code carried over from the quote.
    pub currency: String,
    pub status: OrderStatus,
    pub shipping_method: Option<String>,
    pub shipping_cost_cents: Option<i64>,
    pub fulfillment_date: Option<NaiveDate>,
    pub items: Vec<OrderItem>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub discount_percent: f64,
    pub total_price_cents: i64,
}

/// Payload for the order produced by converting a quote.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub quote_id: i32,
    pub customer_id: i32,
    pub rep_id: i32,
    pub subtotal_cents: i64,
    pub total_cents: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Build the order for `quote`.
    ///
    /// Totals are the sum of the stored line totals, and every quote line is
    /// copied as-is. Markup is not carried over: it is already folded into
    /// the line total.
    pub fn from_quote(quote: &Quote) -> Self {
        let total: i64 = quote.items.iter().map(|item| item.total_price_cents).sum();
        let items = quote
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                discount_percent: item.discount_percent,
                total_price_cents: item.total_price_cents,
            })
            .collect();

        Self {
            quote_id: quote.id,
            customer_id: quote.customer_id,
            rep_id: quote.rep_id,
            subtotal_cents: total,
            total_cents: total,
            currency: quote.currency.clone(),
            status: OrderStatus::default(),
            items,
        }
    }
}

/// Patch data applied when updating an existing order.
#[derive(Debug, Clone)]
pub struct UpdateOrder {
    pub status: OrderStatus,
    pub shipping_method: Option<String>,
    pub shipping_cost_cents: Option<i64>,
    pub fulfillment_date: Option<NaiveDate>,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list orders.
#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Optional owning rep filter.
    pub rep_id: Option<i32>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results to orders owned by `rep_id`.
    pub fn rep_id(mut self, rep_id: i32) -> Self {
        self.rep_id = Some(rep_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::{QuoteItem, QuoteStatus};

    fn quote_with_items(items: Vec<QuoteItem>) -> Quote {
        Quote {
            id: 7,
            customer_id: 3,
            rep_id: 4,
            title: "Fit-out".to_string(),
            valid_until: None,
            delivery_date: None,
            internal_note: None,
            customer_note: None,
            currency: "EUR".to_string(),
            total_cents: 0,
            status: QuoteStatus::Accepted,
            items,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn line(id: i32, quantity: i32, unit: i64, total: i64) -> QuoteItem {
        QuoteItem {
            id,
            quote_id: 7,
            product_id: id * 10,
            quantity,
            unit_price_cents: unit,
            markup_percent: 20.0,
            discount_percent: 2.5,
            total_price_cents: total,
        }
    }

    #[test]
    fn order_totals_trust_stored_line_totals() {
        // 3 x 10.00 with markup would be 36.00, but the stored line says 31.00.
        let quote = quote_with_items(vec![line(1, 3, 1000, 3100), line(2, 1, 500, 450)]);

        let order = NewOrder::from_quote(&quote);

        assert_eq!(order.subtotal_cents, 3550);
        assert_eq!(order.total_cents, 3550);
        assert_eq!(order.quote_id, 7);
        assert_eq!(order.customer_id, 3);
        assert_eq!(order.rep_id, 4);
        assert_eq!(order.currency, "EUR");
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn order_items_copy_quote_lines() {
        let quote = quote_with_items(vec![line(1, 3, 1000, 3100), line(2, 1, 500, 450)]);

        let order = NewOrder::from_quote(&quote);

        assert_eq!(order.items.len(), 2);
        for (order_item, quote_item) in order.items.iter().zip(&quote.items) {
            assert_eq!(order_item.product_id, quote_item.product_id);
            assert_eq!(order_item.quantity, quote_item.quantity);
            assert_eq!(order_item.unit_price_cents, quote_item.unit_price_cents);
            assert_eq!(order_item.discount_percent, quote_item.discount_percent);
            assert_eq!(order_item.total_price_cents, quote_item.total_price_cents);
        }
    }

    #[test]
    fn empty_quote_converts_to_zero_total_order() {
        let order = NewOrder::from_quote(&quote_with_items(Vec::new()));
        assert_eq!(order.total_cents, 0);
        assert!(order.items.is_empty());
    }
}
