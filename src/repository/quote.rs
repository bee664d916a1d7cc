use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::{
    domain::{
        audit::{AuditAction, NewAuditEntry},
        order::{NewOrder as DomainNewOrder, Order as DomainOrder},
        quote::{
            NewQuote as DomainNewQuote, NewQuoteItem as DomainNewQuoteItem, Quote as DomainQuote,
            QuoteListQuery, QuoteStatus, QuoteSummary, UpdateQuote as DomainUpdateQuote,
        },
    },
    models::{
        crm::NewCrmLog,
        order::{
            NewOrder as DbNewOrder, NewOrderItem as DbNewOrderItem, Order as DbOrder,
            OrderItem as DbOrderItem,
        },
        quote::{
            NewQuote as DbNewQuote, NewQuoteItem as DbNewQuoteItem, Quote as DbQuote,
            QuoteItem as DbQuoteItem, UpdateQuoteHeader,
        },
    },
    repository::{DieselRepository, QuoteReader, QuoteWriter, RepositoryError, RepositoryResult},
};

impl QuoteReader for DieselRepository {
    fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<DomainQuote>> {
        let mut conn = self.conn()?;
        load_quote(&mut conn, id)
    }

    fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<Vec<QuoteSummary>> {
        use crate::schema::{customers, quotes, users};

        let mut conn = self.conn()?;

        let mut items = quotes::table
            .inner_join(customers::table)
            .inner_join(users::table.on(users::id.eq(quotes::rep_id)))
            .select((DbQuote::as_select(), customers::name, users::name))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(rep_id) = query.rep_id {
            items = items.filter(quotes::rep_id.eq(rep_id));
        }

        let rows = items
            .order((quotes::created_at.desc(), quotes::id.desc()))
            .load::<(DbQuote, String, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(quote, customer_name, rep_name)| quote.into_summary(customer_name, rep_name))
            .collect()
    }
}

impl QuoteWriter for DieselRepository {
    fn create_quote(&self, new_quote: &DomainNewQuote) -> RepositoryResult<DomainQuote> {
        use crate::schema::quotes;

        self.write_transaction(|conn| {
            let created = diesel::insert_into(quotes::table)
                .values(&DbNewQuote::from(new_quote))
                .get_result::<DbQuote>(conn)?;

            insert_items(conn, created.id, &new_quote.items)?;

            load_quote(conn, created.id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_quote(
        &self,
        quote_id: i32,
        updates: &DomainUpdateQuote,
    ) -> RepositoryResult<DomainQuote> {
        use crate::schema::{quote_items, quotes};

        self.write_transaction(|conn| {
            let status = quotes::table
                .filter(quotes::id.eq(quote_id))
                .select(quotes::status)
                .first::<String>(conn)?;
            if status == QuoteStatus::Converted.as_str() {
                return Err(RepositoryError::Conflict(format!(
                    "quote {quote_id} has already been converted"
                )));
            }

            diesel::update(quotes::table.filter(quotes::id.eq(quote_id)))
                .set(&UpdateQuoteHeader::from(updates))
                .execute(conn)?;

            if let Some(status) = updates.status {
                diesel::update(quotes::table.filter(quotes::id.eq(quote_id)))
                    .set(quotes::status.eq(status.as_str()))
                    .execute(conn)?;
            }

            diesel::delete(quote_items::table.filter(quote_items::quote_id.eq(quote_id)))
                .execute(conn)?;
            insert_items(conn, quote_id, &updates.items)?;

            load_quote(conn, quote_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn convert_quote(&self, quote_id: i32, actor_id: i32) -> RepositoryResult<DomainOrder> {
        use crate::schema::{crm_logs, order_items, orders, quotes};

        self.write_transaction(|conn| {
            let quote = load_quote(conn, quote_id)?.ok_or(RepositoryError::NotFound)?;

            // Only a convertible quote is claimed.
            let claimed = diesel::update(
                quotes::table
                    .filter(quotes::id.eq(quote_id))
                    .filter(quotes::status.ne_all([
                        QuoteStatus::Converted.as_str(),
                        QuoteStatus::Rejected.as_str(),
                    ])),
            )
            .set((
                quotes::status.eq(QuoteStatus::Converted.as_str()),
                quotes::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .execute(conn)?;
            if claimed == 0 {
                return Err(RepositoryError::Conflict(format!(
                    "quote {quote_id} is {} and cannot be converted",
                    quote.status
                )));
            }

            let new_order = DomainNewOrder::from_quote(&quote);
            let order = diesel::insert_into(orders::table)
                .values(&DbNewOrder::from(&new_order))
                .get_result::<DbOrder>(conn)?;

            let rows: Vec<DbNewOrderItem> = new_order
                .items
                .iter()
                .map(|item| DbNewOrderItem::from_domain(order.id, item))
                .collect();
            if !rows.is_empty() {
                diesel::insert_into(order_items::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            let entry = NewAuditEntry::new(quote.customer_id, actor_id, AuditAction::ConvertedQuote)
                .details(format!("Converted quote {} into order {}", quote.id, order.id));
            diesel::insert_into(crm_logs::table)
                .values(&NewCrmLog::from(&entry))
                .execute(conn)?;

            let items = DbOrderItem::belonging_to(&order)
                .order(order_items::id.asc())
                .load::<DbOrderItem>(conn)?;

            order.into_domain(items)
        })
    }
}

fn insert_items(
    conn: &mut SqliteConnection,
    quote_id: i32,
    items: &[DomainNewQuoteItem],
) -> RepositoryResult<()> {
    use crate::schema::quote_items;

    for item in items {
        diesel::insert_into(quote_items::table)
            .values(&DbNewQuoteItem::from_domain(quote_id, item))
            .execute(conn)?;
    }

    Ok(())
}

fn load_quote(
    conn: &mut SqliteConnection,
    quote_id: i32,
) -> RepositoryResult<Option<DomainQuote>> {
    use crate::schema::{quote_items, quotes};

    let quote = quotes::table
        .filter(quotes::id.eq(quote_id))
        .first::<DbQuote>(conn)
        .optional()?;

    let Some(quote) = quote else {
        return Ok(None);
    };

    let items = DbQuoteItem::belonging_to(&quote)
        .order(quote_items::id.asc())
        .load::<DbQuoteItem>(conn)?;

    quote.into_domain(items).map(Some)
}
