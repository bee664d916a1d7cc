use chrono::NaiveDateTime;
use serde::Serialize;

/// Actions recorded in the CRM audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    CreatedCustomer,
    UpdatedCustomer,
    UpdatedAssignments,
    UnassignedCustomer,
    ConvertedQuote,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::CreatedCustomer => "created_customer",
            AuditAction::UpdatedCustomer => "updated_customer",
            AuditAction::UpdatedAssignments => "updated_assignments",
            AuditAction::UnassignedCustomer => "unassigned_customer",
            AuditAction::ConvertedQuote => "converted_quote",
        }
    }
}

/// An immutable audit record. The action is kept as stored text so older
/// rows with retired action names still load.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: i32,
    pub customer_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub action: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub customer_id: i32,
    pub user_id: i32,
    pub action: AuditAction,
    pub details: Option<String>,
}

impl NewAuditEntry {
    pub fn new(customer_id: i32, user_id: i32, action: AuditAction) -> Self {
        Self {
            customer_id,
            user_id,
            action,
            details: None,
        }
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
