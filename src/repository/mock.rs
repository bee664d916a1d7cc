use chrono::NaiveDateTime;
use mockall::mock;

use super::{
    AttachmentWriter, CrmLogReader, CrmLogWriter, CustomerReader, CustomerWriter,
    InventoryReader, InventoryWriter, OrderReader, OrderWriter, ProductReader, ProductWriter,
    QuoteReader, QuoteWriter, RepositoryResult, TaskReader, TaskWriter, UserReader, UserWriter,
};
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

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_credentials(&self, email: &str) -> RepositoryResult<Option<UserCredentials>>;
        fn list_users(&self, role: Option<Role>) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
        fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
        fn set_password_hash(&self, user_id: i32, password_hash: &str) -> RepositoryResult<()>;
        fn set_user_active(&self, user_id: i32, active: bool) -> RepositoryResult<User>;
        fn record_login(&self, user_id: i32, at: NaiveDateTime) -> RepositoryResult<()>;
    }

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<CustomerDetails>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerDetails>>;
        fn search_customers(&self, query: CustomerListQuery) -> RepositoryResult<Vec<CustomerMatch>>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<CustomerDetails>;
        fn update_customer(&self, customer_id: i32, updates: &UpdateCustomer, actor_id: i32) -> RepositoryResult<Customer>;
        fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
        fn assign_customer(&self, customer_id: i32, user_ids: &[i32], actor_id: i32) -> RepositoryResult<Vec<Assignee>>;
        fn unassign_customer(&self, customer_id: i32, user_id: i32, actor_id: i32) -> RepositoryResult<()>;
    }

    impl CrmLogReader for Repository {
        fn list_audit_entries(&self, customer_id: i32) -> RepositoryResult<Vec<AuditEntry>>;
        fn list_interactions(&self, customer_id: i32) -> RepositoryResult<Vec<Interaction>>;
        fn list_pipeline(&self, customer_id: i32) -> RepositoryResult<Vec<PipelineEntry>>;
    }

    impl CrmLogWriter for Repository {
        fn append_audit_entry(&self, entry: &NewAuditEntry) -> RepositoryResult<()>;
        fn add_interaction(&self, interaction: &NewInteraction) -> RepositoryResult<Interaction>;
        fn add_pipeline_entry(&self, entry: &NewPipelineEntry) -> RepositoryResult<PipelineEntry>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self) -> RepositoryResult<Vec<Product>>;
        fn list_reorder_alerts(&self) -> RepositoryResult<Vec<Product>>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
    }

    impl InventoryReader for Repository {
        fn list_adjustments(&self, product_id: i32) -> RepositoryResult<Vec<InventoryAdjustment>>;
        fn list_imports(&self, query: ImportLogQuery) -> RepositoryResult<Vec<InventoryImport>>;
    }

    impl InventoryWriter for Repository {
        fn adjust_stock(&self, adjustment: &NewInventoryAdjustment) -> RepositoryResult<InventoryAdjustment>;
        fn upsert_imported_product(&self, product: &NewProduct, imported_by: i32) -> RepositoryResult<Product>;
        fn record_import(&self, import: &NewInventoryImport) -> RepositoryResult<()>;
    }

    impl TaskReader for Repository {
        fn get_task_by_id(&self, id: i32) -> RepositoryResult<Option<Task>>;
        fn list_tasks(&self, query: TaskListQuery) -> RepositoryResult<Vec<TaskView>>;
    }

    impl TaskWriter for Repository {
        fn create_task(&self, new_task: &NewTask) -> RepositoryResult<Task>;
        fn set_task_status(&self, task_id: i32, status: TaskStatus, completed_at: Option<NaiveDateTime>) -> RepositoryResult<Task>;
    }

    impl QuoteReader for Repository {
        fn get_quote_by_id(&self, id: i32) -> RepositoryResult<Option<Quote>>;
        fn list_quotes(&self, query: QuoteListQuery) -> RepositoryResult<Vec<QuoteSummary>>;
    }

    impl QuoteWriter for Repository {
        fn create_quote(&self, new_quote: &NewQuote) -> RepositoryResult<Quote>;
        fn update_quote(&self, quote_id: i32, updates: &UpdateQuote) -> RepositoryResult<Quote>;
        fn convert_quote(&self, quote_id: i32, actor_id: i32) -> RepositoryResult<Order>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
    }

    impl OrderWriter for Repository {
        fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
    }

    impl AttachmentWriter for Repository {
        fn create_attachment(&self, attachment: &NewSalesAttachment) -> RepositoryResult<SalesAttachment>;
    }
}
