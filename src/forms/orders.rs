use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::order::{OrderStatus, UpdateOrder};
use crate::forms::optional_text;

pub type OrderFormResult<T> = Result<T, OrderFormError>;

#[derive(Debug, Error)]
pub enum OrderFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Fulfilment fields editable on an order.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderForm {
    pub status: OrderStatus,
    #[validate(length(max = 128))]
    pub shipping_method: Option<String>,
    #[validate(range(min = 0))]
    pub shipping_cost_cents: Option<i64>,
    pub fulfillment_date: Option<NaiveDate>,
}

impl UpdateOrderForm {
    pub fn into_update_order(self) -> OrderFormResult<UpdateOrder> {
        self.validate()?;
        Ok(UpdateOrder {
            status: self.status,
            shipping_method: optional_text(self.shipping_method),
            shipping_cost_cents: self.shipping_cost_cents,
            fulfillment_date: self.fulfillment_date,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fulfilment_update() {
        let form: UpdateOrderForm = serde_json::from_str(
            r#"{"status":"shipped","shipping_method":" Courier ","shipping_cost_cents":1500,"fulfillment_date":"2024-07-01"}"#,
        )
        .expect("payload");
        let update = form.into_update_order().expect("valid");

        assert_eq!(update.status, OrderStatus::Shipped);
        assert_eq!(update.shipping_method.as_deref(), Some("Courier"));
        assert_eq!(update.shipping_cost_cents, Some(1500));
    }

    #[test]
    fn negative_shipping_cost_is_rejected() {
        let form = UpdateOrderForm {
            status: OrderStatus::Processing,
            shipping_method: None,
            shipping_cost_cents: Some(-1),
            fulfillment_date: None,
        };
        assert!(form.into_update_order().is_err());
    }

    #[test]
    fn unknown_status_fails_to_deserialize() {
        let result: Result<UpdateOrderForm, _> = serde_json::from_str(r#"{"status":"lost"}"#);
        assert!(result.is_err());
    }
}
