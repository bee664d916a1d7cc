//! Role and ownership checks applied before any service does work.
//!
//! Every gated operation names an [`Action`]. The policy table maps each
//! action to the roles allowed to perform it; when a concrete record is
//! involved, non super admins must additionally own it.

use crate::domain::{
    auth::AuthenticatedUser, customer::CustomerDetails, order::Order, quote::Quote, task::Task,
    user::Role,
};
use crate::services::{ServiceError, ServiceResult};

const EVERYONE: &[Role] = &Role::ALL;
const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];
const STOCK_KEEPERS: &[Role] = &[Role::SuperAdmin, Role::InventoryManager];
const EXPORTERS: &[Role] = &[Role::SuperAdmin, Role::InventoryManager, Role::Accountant];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ReadCustomer,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
    AssignCustomer,
    ReadAuditLog,
    ReadInteractions,
    AddInteraction,
    ReadPipeline,
    AddPipelineStage,
    ReadTasks,
    CreateTask,
    UpdateTaskStatus,
    ReadQuote,
    CreateQuote,
    UpdateQuote,
    ConvertQuote,
    EmailQuote,
    ReadOrder,
    UpdateOrder,
    UploadAttachment,
    ListProducts,
    ManageProducts,
    AdjustInventory,
    ImportInventory,
    ExportInventory,
    ViewInventoryHistory,
    ViewImportLogs,
    ViewReorderAlerts,
    ReadUserDirectory,
    ManageUsers,
}

impl Action {
    /// Roles allowed to attempt the action at all.
    pub fn allowed_roles(self) -> &'static [Role] {
        match self {
            Action::DeleteCustomer
            | Action::AssignCustomer
            | Action::ReadAuditLog
            | Action::ViewInventoryHistory
            | Action::ViewImportLogs
            | Action::ManageUsers => SUPER_ADMIN,
            Action::ManageProducts | Action::AdjustInventory | Action::ImportInventory => {
                STOCK_KEEPERS
            }
            Action::ExportInventory => EXPORTERS,
            Action::ReadCustomer
            | Action::CreateCustomer
            | Action::UpdateCustomer
            | Action::ReadInteractions
            | Action::AddInteraction
            | Action::ReadPipeline
            | Action::AddPipelineStage
            | Action::ReadTasks
            | Action::CreateTask
            | Action::UpdateTaskStatus
            | Action::ReadQuote
            | Action::CreateQuote
            | Action::UpdateQuote
            | Action::ConvertQuote
            | Action::EmailQuote
            | Action::ReadOrder
            | Action::UpdateOrder
            | Action::UploadAttachment
            | Action::ListProducts
            | Action::ViewReorderAlerts
            | Action::ReadUserDirectory => EVERYONE,
        }
    }
}

/// The record an action targets, used for the ownership gate.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Unscoped,
    Customer(&'a CustomerDetails),
    Task(&'a Task),
    Quote(&'a Quote),
    Order(&'a Order),
}

impl Resource<'_> {
    fn is_owned_by(&self, user_id: i32) -> bool {
        match self {
            Resource::Unscoped => true,
            Resource::Customer(customer) => customer.is_assigned_to(user_id),
            Resource::Task(task) => task.involves(user_id),
            Resource::Quote(quote) => quote.rep_id == user_id,
            Resource::Order(order) => order.rep_id == user_id,
        }
    }
}

/// Check `actor` may perform `action` on `resource`.
pub fn authorize(
    actor: &AuthenticatedUser,
    action: Action,
    resource: Resource<'_>,
) -> ServiceResult<()> {
    if !action.allowed_roles().contains(&actor.role) {
        log::warn!(
            "User {} ({}) denied {action:?}: role not allowed",
            actor.id,
            actor.role
        );
        return Err(ServiceError::forbidden());
    }

    if actor.is_super_admin() || resource.is_owned_by(actor.id) {
        return Ok(());
    }

    log::warn!("User {} denied {action:?}: not an owner", actor.id);
    Err(ServiceError::forbidden())
}

/// Role gate only, for actions that do not target a single record.
pub fn require(actor: &AuthenticatedUser, action: Action) -> ServiceResult<()> {
    authorize(actor, action, Resource::Unscoped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::{Assignee, Customer};
    use crate::domain::task::TaskStatus;
    use chrono::NaiveDateTime;

    fn user(id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            role,
        }
    }

    fn ts() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn customer_assigned_to(user_ids: &[i32]) -> CustomerDetails {
        CustomerDetails {
            customer: Customer {
                id: 7,
                name: "Acme".into(),
                company: None,
                email: None,
                phone: None,
                status: "lead".into(),
                notes: None,
                created_by: 1,
                last_contacted_at: None,
                created_at: ts(),
                updated_at: ts(),
            },
            current_stage: None,
            assignees: user_ids
                .iter()
                .map(|&user_id| Assignee {
                    user_id,
                    name: format!("user {user_id}"),
                })
                .collect(),
        }
    }

    fn task(assigned_to: i32, created_by: i32) -> Task {
        Task {
            id: 3,
            customer_id: 7,
            assigned_to,
            created_by,
            title: "Call back".into(),
            description: None,
            due_date: None,
            status: TaskStatus::Open,
            completed_at: None,
            created_at: ts(),
        }
    }

    #[test]
    fn unassigned_rep_is_forbidden_and_assigned_rep_is_allowed() {
        let customer = customer_assigned_to(&[2]);

        let outsider = user(5, Role::SalesRep);
        let result = authorize(&outsider, Action::UpdateCustomer, Resource::Customer(&customer));
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        let owner = user(2, Role::SalesRep);
        assert!(authorize(&owner, Action::UpdateCustomer, Resource::Customer(&customer)).is_ok());
    }

    #[test]
    fn super_admin_bypasses_ownership() {
        let customer = customer_assigned_to(&[]);
        let admin = user(1, Role::SuperAdmin);

        assert!(authorize(&admin, Action::UpdateCustomer, Resource::Customer(&customer)).is_ok());
        assert!(authorize(&admin, Action::DeleteCustomer, Resource::Customer(&customer)).is_ok());
    }

    #[test]
    fn role_gate_applies_before_ownership() {
        let customer = customer_assigned_to(&[2]);
        let owner = user(2, Role::SalesRep);

        let result = authorize(&owner, Action::DeleteCustomer, Resource::Customer(&customer));
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn inventory_actions_follow_the_policy_table() {
        let manager = user(4, Role::InventoryManager);
        let accountant = user(6, Role::Accountant);
        let csr = user(8, Role::Csr);

        assert!(require(&manager, Action::AdjustInventory).is_ok());
        assert!(require(&manager, Action::ViewImportLogs).is_err());
        assert!(require(&accountant, Action::AdjustInventory).is_err());
        assert!(require(&accountant, Action::ExportInventory).is_ok());
        assert!(require(&csr, Action::ExportInventory).is_err());
        assert!(require(&csr, Action::ViewReorderAlerts).is_ok());
    }

    #[test]
    fn task_ownership_covers_assignee_and_creator() {
        let task = task(2, 3);

        assert!(authorize(&user(2, Role::Csr), Action::UpdateTaskStatus, Resource::Task(&task)).is_ok());
        assert!(authorize(&user(3, Role::SalesRep), Action::UpdateTaskStatus, Resource::Task(&task)).is_ok());
        assert!(
            authorize(&user(4, Role::SalesRep), Action::UpdateTaskStatus, Resource::Task(&task))
                .is_err()
        );
    }
}
