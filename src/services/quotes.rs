//! Quotes and their conversion into orders.

use serde::Serialize;

use crate::access::{Action, Resource, authorize, require};
use crate::domain::{
    auth::AuthenticatedUser,
    order::Order,
    quote::{Quote, QuoteDetails, QuoteListQuery, QuoteStatus, QuoteSummary},
};
use crate::forms::quotes::{CreateQuoteForm, UpdateQuoteForm};
use crate::mailer::{Mailer, QuoteEmailRenderer};
use crate::repository::{CustomerReader, QuoteReader, QuoteWriter, UserReader};
use crate::services::customers::load_customer;
use crate::services::{ServiceError, ServiceResult};

/// Where a quote email was sent.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct EmailReceipt {
    pub to: String,
    pub subject: String,
}

pub(crate) fn load_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    action: Action,
    quote_id: i32,
) -> ServiceResult<Quote>
where
    R: QuoteReader + ?Sized,
{
    require(user, action)?;
    let quote = repo
        .get_quote_by_id(quote_id)?
        .ok_or_else(|| ServiceError::not_found("quote"))?;
    authorize(user, action, Resource::Quote(&quote))?;
    Ok(quote)
}

/// Quotes owned by the user, or every quote for super_admin. Newest first.
pub fn list_quotes<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<QuoteSummary>>
where
    R: QuoteReader + ?Sized,
{
    require(user, Action::ReadQuote)?;

    let query = if user.is_super_admin() {
        QuoteListQuery::new()
    } else {
        QuoteListQuery::new().rep_id(user.id)
    };
    Ok(repo.list_quotes(query)?)
}

/// A quote with its items plus the customer and rep names.
pub fn get_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<QuoteDetails>
where
    R: QuoteReader + CustomerReader + UserReader + ?Sized,
{
    let quote = load_quote(repo, user, Action::ReadQuote, quote_id)?;

    let customer_name = repo
        .get_customer_by_id(quote.customer_id)?
        .ok_or_else(|| ServiceError::not_found("customer"))?
        .customer
        .name;
    let rep_name = repo
        .get_user_by_id(quote.rep_id)?
        .ok_or_else(|| ServiceError::not_found("rep"))?
        .name;

    Ok(QuoteDetails {
        quote,
        customer_name,
        rep_name,
    })
}

/// Create a quote with its items in one transaction. The acting user becomes
/// the rep and must be assigned to the customer.
pub fn create_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateQuoteForm,
) -> ServiceResult<Quote>
where
    R: CustomerReader + QuoteWriter + ?Sized,
{
    let new_quote = form.into_new_quote(user.id).map_err(ServiceError::invalid)?;
    load_customer(repo, user, Action::CreateQuote, new_quote.customer_id)?;

    let quote = repo.create_quote(&new_quote)?;
    log::info!(
        "User {} created quote {} with {} items",
        user.id,
        quote.id,
        quote.items.len()
    );
    Ok(quote)
}

/// Replace the header and the full item set of a quote.
pub fn update_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
    form: UpdateQuoteForm,
) -> ServiceResult<Quote>
where
    R: QuoteReader + QuoteWriter + ?Sized,
{
    let existing = load_quote(repo, user, Action::UpdateQuote, quote_id)?;
    if existing.status == QuoteStatus::Converted {
        return Err(ServiceError::Conflict(format!(
            "quote {quote_id} has already been converted"
        )));
    }

    let updates = form.into_update_quote().map_err(ServiceError::invalid)?;
    Ok(repo.update_quote(quote_id, &updates)?)
}

/// Turn a quote into an order. A quote converts at most once; rejected
/// quotes never convert.
pub fn convert_quote<R>(repo: &R, user: &AuthenticatedUser, quote_id: i32) -> ServiceResult<Order>
where
    R: QuoteReader + QuoteWriter + ?Sized,
{
    let quote = load_quote(repo, user, Action::ConvertQuote, quote_id)?;
    if !quote.status.is_convertible() {
        return Err(ServiceError::Conflict(format!(
            "quote {quote_id} is {} and cannot be converted",
            quote.status
        )));
    }

    let order = repo.convert_quote(quote_id, user.id)?;
    log::info!(
        "User {} converted quote {quote_id} into order {}",
        user.id,
        order.id
    );
    Ok(order)
}

/// Send the quote summary to the customer's email address.
pub fn email_quote<R>(
    repo: &R,
    renderer: &QuoteEmailRenderer,
    mailer: &dyn Mailer,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<EmailReceipt>
where
    R: QuoteReader + CustomerReader + UserReader + ?Sized,
{
    let quote = load_quote(repo, user, Action::EmailQuote, quote_id)?;

    let customer = repo
        .get_customer_by_id(quote.customer_id)?
        .ok_or_else(|| ServiceError::not_found("customer"))?
        .customer;
    let Some(to) = customer.email.as_deref() else {
        return Err(ServiceError::invalid("customer has no email address"));
    };

    let rep_name = repo
        .get_user_by_id(quote.rep_id)?
        .map(|rep| rep.name)
        .unwrap_or_else(|| user.name.clone());

    let email = renderer
        .render(&quote, &customer.name, to, &rep_name)
        .map_err(ServiceError::internal)?;
    mailer.send(&email).map_err(ServiceError::internal)?;

    log::info!("User {} emailed quote {quote_id} to {}", user.id, email.to);
    Ok(EmailReceipt {
        to: email.to,
        subject: email.subject,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderItem, OrderStatus};
    use crate::domain::quote::QuoteItem;
    use crate::domain::user::{Role, User};
    use crate::mailer::{MailError, OutgoingEmail};
    use crate::repository::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::customers::tests::{actor, customer};
    use chrono::NaiveDateTime;
    use std::cell::RefCell;

    fn quote(id: i32, rep_id: i32, status: QuoteStatus) -> Quote {
        Quote {
            id,
            customer_id: 3,
            rep_id,
            title: "Spring restock".into(),
            valid_until: None,
            delivery_date: None,
            internal_note: None,
            customer_note: None,
            currency: "USD".into(),
            total_cents: 3000,
            status,
            items: vec![QuoteItem {
                id: 1,
                quote_id: id,
                product_id: 4,
                quantity: 3,
                unit_price_cents: 1000,
                markup_percent: 0.0,
                discount_percent: 0.0,
                total_price_cents: 3000,
            }],
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn order_for(quote: &Quote) -> Order {
        Order {
            id: 70,
            quote_id: Some(quote.id),
            customer_id: quote.customer_id,
            rep_id: quote.rep_id,
            subtotal_cents: 3000,
            total_cents: 3000,
            currency: quote.currency.clone(),
            status: OrderStatus::Pending,
            shipping_method: None,
            shipping_cost_cents: None,
            fulfillment_date: None,
            items: vec![OrderItem {
                id: 1,
                order_id: 70,
                product_id: 4,
                quantity: 3,
                unit_price_cents: 1000,
                discount_percent: 0.0,
                total_price_cents: 3000,
            }],
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn create_form(customer_id: i32) -> CreateQuoteForm {
        serde_json::from_value(serde_json::json!({
            "customer_id": customer_id,
            "title": "Spring restock",
            "items": [{"product_id": 4, "quantity": 3, "unit_price_cents": 1000, "total_price_cents": 3000}]
        }))
        .expect("payload")
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: RefCell<Vec<OutgoingEmail>>,
    }

    impl Mailer for RecordingMailer {
        fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
            self.sent.borrow_mut().push(email.clone());
            Ok(())
        }
    }

    #[test]
    fn reps_list_only_their_quotes() {
        let mut repo = MockRepository::new();
        repo.expect_list_quotes()
            .withf(|query| query.rep_id == Some(6))
            .returning(|_| Ok(Vec::new()));

        list_quotes(&repo, &actor(6, Role::SalesRep)).expect("list");
    }

    #[test]
    fn quotes_need_an_assigned_customer() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[2]))));
        repo.expect_create_quote().never();

        let result = create_quote(&repo, &actor(6, Role::SalesRep), create_form(3));
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn actor_becomes_the_rep() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[6]))));
        repo.expect_create_quote()
            .withf(|new_quote| new_quote.rep_id == 6 && new_quote.total_cents() == 3000)
            .returning(|_| Ok(quote(11, 6, QuoteStatus::Draft)));

        let created = create_quote(&repo, &actor(6, Role::SalesRep), create_form(3)).expect("quote");
        assert_eq!(created.rep_id, 6);
    }

    fn rep(id: i32, name: &str) -> User {
        User {
            id,
            name: name.into(),
            email: "ann@example.com".into(),
            role: Role::SalesRep,
            active: true,
            last_login: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn other_reps_cannot_read_a_quote() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Sent))));
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[6]))));
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(rep(id, "Ann"))));

        let result = get_quote(&repo, &actor(7, Role::SalesRep), 11);
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let found = get_quote(&repo, &actor(1, Role::SuperAdmin), 11).expect("admin");
        assert_eq!(found.quote.id, 11);
    }

    #[test]
    fn quote_detail_names_customer_and_rep() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Draft))));
        repo.expect_get_customer_by_id()
            .withf(|id| *id == 3)
            .returning(|id| Ok(Some(customer(id, &[6]))));
        repo.expect_get_user_by_id()
            .withf(|id| *id == 6)
            .returning(|id| Ok(Some(rep(id, "Ann"))));

        let details = get_quote(&repo, &actor(6, Role::SalesRep), 11).expect("quote");
        assert_eq!(details.customer_name, "Customer 3");
        assert_eq!(details.rep_name, "Ann");

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["id"], 11);
        assert_eq!(json["rep_name"], "Ann");
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn converted_quotes_cannot_be_updated() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Converted))));
        repo.expect_update_quote().never();

        let form: UpdateQuoteForm =
            serde_json::from_value(serde_json::json!({"title": "Changed"})).expect("payload");
        let result = update_quote(&repo, &actor(6, Role::SalesRep), 11, form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn conversion_returns_the_new_order() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Accepted))));
        repo.expect_convert_quote()
            .withf(|id, actor_id| *id == 11 && *actor_id == 6)
            .times(1)
            .returning(|id, _| Ok(order_for(&quote(id, 6, QuoteStatus::Accepted))));

        let order = convert_quote(&repo, &actor(6, Role::SalesRep), 11).expect("order");
        assert_eq!(order.quote_id, Some(11));
        assert_eq!(order.total_cents, 3000);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn converted_or_rejected_quotes_do_not_convert() {
        for status in [QuoteStatus::Converted, QuoteStatus::Rejected] {
            let mut repo = MockRepository::new();
            repo.expect_get_quote_by_id()
                .returning(move |id| Ok(Some(quote(id, 6, status))));
            repo.expect_convert_quote().never();

            let result = convert_quote(&repo, &actor(6, Role::SalesRep), 11);
            assert!(matches!(result, Err(ServiceError::Conflict(_))));
        }
    }

    #[test]
    fn lost_conversion_race_surfaces_as_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Sent))));
        repo.expect_convert_quote()
            .returning(|_, _| Err(RepositoryError::Conflict("already converted".into())));

        let result = convert_quote(&repo, &actor(6, Role::SalesRep), 11);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn email_goes_to_the_customer() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Sent))));
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(customer(id, &[6]))));
        repo.expect_get_user_by_id().returning(|id| {
            Ok(Some(User {
                id,
                name: "Ann".into(),
                email: "ann@example.com".into(),
                role: Role::SalesRep,
                active: true,
                last_login: None,
                created_at: NaiveDateTime::default(),
            }))
        });

        let renderer = QuoteEmailRenderer::new("sales@example.com").expect("renderer");
        let mailer = RecordingMailer::default();

        let receipt = email_quote(&repo, &renderer, &mailer, &actor(6, Role::SalesRep), 11)
            .expect("sent");

        assert_eq!(receipt.to, "buyer3@example.com");
        let sent = mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Rep: Ann"));
    }

    #[test]
    fn email_without_address_is_invalid() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id| Ok(Some(quote(id, 6, QuoteStatus::Sent))));
        repo.expect_get_customer_by_id().returning(|id| {
            let mut details = customer(id, &[6]);
            details.customer.email = None;
            Ok(Some(details))
        });

        let renderer = QuoteEmailRenderer::new("sales@example.com").expect("renderer");
        let mailer = RecordingMailer::default();

        let result = email_quote(&repo, &renderer, &mailer, &actor(6, Role::SalesRep), 11);
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
        assert!(mailer.sent.borrow().is_empty());
    }
}
