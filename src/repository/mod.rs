use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;

use crate::db::{DbConnection, DbPool};
use crate::domain::{
    attachment::{NewSalesAttachment, SalesAttachment},
    audit::{AuditEntry, NewAuditEntry},
    customer::{
        Assignee, Customer, CustomerDetails, CustomerListQuery, CustomerMatch, NewCustomer,
        UpdateCustomer,
    },
    interaction::{Interaction, NewInteraction},
    inventory::{
        ImportLogQuery, InventoryAdjustment, InventoryImport, NewInventoryAdjustment,
        NewInventoryImport,
    },
    order::{Order, OrderListQuery, UpdateOrder},
    pipeline::{NewPipelineEntry, PipelineEntry},
    product::{NewProduct, Product, UpdateProduct},
    quote::{NewQuote, Quote, QuoteListQuery, QuoteSummary, UpdateQuote},
    task::{NewTask, Task, TaskListQuery, TaskStatus, TaskView},
    user::{NewUser, Role, UpdateUser, User, UserCredentials},
};

pub use errors::{RepositoryError, RepositoryResult};

pub mod attachment;
pub mod crm;
pub mod customer;
pub mod errors;
pub mod inventory;
pub mod order;
pub mod product;
pub mod quote;
pub mod task;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Run `f` inside a write-locking transaction on a pooled connection.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back on `Err`
    /// or panic, so multi-statement writes never partially apply.
    fn write_transaction<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T>,
    {
        let mut conn = self.conn()?;
        conn.immediate_transaction(f)
    }
}

/// Read-only operations over user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_credentials(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
    fn list_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>>;
}

/// Write operations over user accounts.
pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
    fn set_password_hash(&self, user_id: i32, password_hash: &str) -> RepositoryResult<()>;
    fn set_user_active(&self, user_id: i32, active: bool) -> RepositoryResult<User>;
    fn record_login(&self, user_id: i32, at: NaiveDateTime) -> RepositoryResult<()>;
}

/// Read-only operations over customers and their assignments.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<CustomerDetails>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerDetails>>;
    fn search_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerMatch>>;
}

/// Write operations over customers. Each call records its own audit entry.
pub trait CustomerWriter {
    /// Insert the customer, assign it to its creator and audit the creation.
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<CustomerDetails>;
    fn update_customer(
        &self,
        customer_id: i32,
        updates: &UpdateCustomer,
        actor_id: i32,
    ) -> RepositoryResult<Customer>;
    /// Remove the customer together with everything it owns.
    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
    /// Replace the complete assignment set of a customer.
    fn assign_customer(
        &self,
        customer_id: i32,
        user_ids: &[i32],
        actor_id: i32,
    ) -> RepositoryResult<Vec<Assignee>>;
    fn unassign_customer(
        &self,
        customer_id: i32,
        user_id: i32,
        actor_id: i32,
    ) -> RepositoryResult<()>;
}

/// Access to the append-only CRM history tables.
pub trait CrmLogReader {
    fn list_audit_entries(&self, customer_id: i32) -> RepositoryResult<Vec<AuditEntry>>;
    fn list_interactions(&self, customer_id: i32) -> RepositoryResult<Vec<Interaction>>;
    fn list_pipeline(&self, customer_id: i32) -> RepositoryResult<Vec<PipelineEntry>>;
}

pub trait CrmLogWriter {
    fn append_audit_entry(&self, entry: &NewAuditEntry) -> RepositoryResult<()>;
    /// Record an interaction and stamp the customer's last contact time.
    fn add_interaction(&self, interaction: &NewInteraction) -> RepositoryResult<Interaction>;
    fn add_pipeline_entry(&self, entry: &NewPipelineEntry) -> RepositoryResult<PipelineEntry>;
}

/// Read-only operations over products.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    /// Products whose stock is below their reorder threshold, by name.
    fn list_reorder_alerts(&self) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product descriptions. Stock is not touched here.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct)
    -> RepositoryResult<Product>;
}

pub trait InventoryReader {
    fn list_adjustments(&self, product_id: i32) -> RepositoryResult<Vec<InventoryAdjustment>>;
    fn list_imports(&self, query: ImportLogQuery) -> RepositoryResult<Vec<InventoryImport>>;
}

/// Stock movements. Every change to `products.stock` goes through here.
pub trait InventoryWriter {
    /// Apply a signed delta atomically and record the resulting stock.
    fn adjust_stock(
        &self,
        adjustment: &NewInventoryAdjustment,
    ) -> RepositoryResult<InventoryAdjustment>;
    /// Insert or update a product by sku on behalf of an import.
    fn upsert_imported_product(
        &self,
        product: &NewProduct,
        imported_by: i32,
    ) -> RepositoryResult<Product>;
    fn record_import(&self, import: &NewInventoryImport) -> RepositoryResult<()>;
}

pub trait TaskReader {
    fn get_task_by_id(&self, id: i32) -> RepositoryResult<Option<Task>>;
    fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<Vec<TaskView>>;
}

pub trait TaskWriter {
    fn create_task(&self, new_task: &NewTask) -> RepositoryResult<Task>;
    fn set_task_status(
        &self,
        task_id: i32,
        status: TaskStatus,
        completed_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<Task>;
}

pub trait QuoteReader {
    fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<Quote>>;
    fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<Vec<QuoteSummary>>;
}

/// Transactional quote workflows.
pub trait QuoteWriter {
    fn create_quote(&self, new_quote: &NewQuote) -> RepositoryResult<Quote>;
    /// Replace the header and the complete item set of a quote.
    fn update_quote(&self, quote_id: i32, updates: &UpdateQuote) -> RepositoryResult<Quote>;
    /// Turn the quote into an order. A quote converts at most once.
    fn convert_quote(&self, quote_id: i32, actor_id: i32) -> RepositoryResult<Order>;
}

pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
}

pub trait OrderWriter {
    fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
}

pub trait AttachmentWriter {
    fn create_attachment(
        &self,
        attachment: &NewSalesAttachment,
    ) -> RepositoryResult<SalesAttachment>;
}
