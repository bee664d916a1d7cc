//! Outbound email. Delivery sits behind [`Mailer`]; the shipped
//! implementation only logs the message.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::domain::{money::format_cents, quote::Quote};

const QUOTE_TEMPLATE: &str = "quote_email.txt";

const QUOTE_TEMPLATE_BODY: &str = "Hello {{ customer_name }},

Please find below your quote:

Quote ID: {{ quote.id }}
Title: {{ quote.title }}
Rep: {{ rep_name }}
Total: {{ total }} {{ quote.currency }}
{% if quote.valid_until %}Valid until: {{ quote.valid_until }}
{% endif %}
Items:
{% for item in items %}- {{ item.quantity }} x Product {{ item.product_id }}: {{ item.total }}
{% endfor %}{% if quote.customer_note %}
{{ quote.customer_note }}
{% endif %}
Thank you,
{{ rep_name }}
";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("failed to render email: {0}")]
    Template(#[from] tera::Error),
    #[error("failed to deliver email: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mailer handle shared across server workers.
pub type SharedMailer = dyn Mailer + Send + Sync;

/// Mailer that writes every message to the application log.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        log::info!(
            "Sending email from {} to {}: {}\n{}",
            email.from,
            email.to,
            email.subject,
            email.body
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct ItemLine {
    quantity: i32,
    product_id: i32,
    total: String,
}

/// Renders quote emails from the embedded template.
#[derive(Clone)]
pub struct QuoteEmailRenderer {
    tera: Tera,
    from: String,
}

impl QuoteEmailRenderer {
    pub fn new(from: impl Into<String>) -> Result<Self, MailError> {
        let mut tera = Tera::default();
        tera.add_raw_template(QUOTE_TEMPLATE, QUOTE_TEMPLATE_BODY)?;
        Ok(Self {
            tera,
            from: from.into(),
        })
    }

    pub fn render(
        &self,
        quote: &Quote,
        customer_name: &str,
        customer_email: &str,
        rep_name: &str,
    ) -> Result<OutgoingEmail, MailError> {
        let items: Vec<ItemLine> = quote
            .items
            .iter()
            .map(|item| ItemLine {
                quantity: item.quantity,
                product_id: item.product_id,
                total: format_cents(item.total_price_cents),
            })
            .collect();

        let mut context = Context::new();
        context.insert("quote", quote);
        context.insert("customer_name", customer_name);
        context.insert("rep_name", rep_name);
        context.insert("total", &format_cents(quote.total_cents));
        context.insert("items", &items);

        Ok(OutgoingEmail {
            from: self.from.clone(),
            to: customer_email.to_string(),
            subject: format!("Quote #{}: {}", quote.id, quote.title),
            body: self.tera.render(QUOTE_TEMPLATE, &context)?,
        })
    }
}
