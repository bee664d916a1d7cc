use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status given to customers created without an explicit one.
pub const DEFAULT_CUSTOMER_STATUS: &str = "lead";

/// Domain representation of a CRM customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Free-form lifecycle status such as `lead` or `active`.
    pub status: String,
    pub notes: Option<String>,
    /// User that created the record. Never changes afterwards.
    pub created_by: i32,
    pub last_contacted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A user linked to a customer through an assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignee {
    pub user_id: i32,
    pub name: String,
}

/// Customer enriched with its assignees and latest pipeline stage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    pub current_stage: Option<String>,
    pub assignees: Vec<Assignee>,
}

impl CustomerDetails {
    pub fn is_assigned_to(&self, user_id: i32) -> bool {
        self.assignees.iter().any(|assignee| assignee.user_id == user_id)
    }

    pub fn assignee_ids(&self) -> Vec<i32> {
        self.assignees.iter().map(|assignee| assignee.user_id).collect()
    }
}

/// Minimal projection returned by the customer search box.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerMatch {
    pub id: i32,
    pub name: String,
}

/// Payload required to insert a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i32,
}

impl NewCustomer {
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: i32) -> Self {
        Self {
            name: name.into(),
            company: None,
            email: None,
            phone: None,
            status: DEFAULT_CUSTOMER_STATUS.to_string(),
            notes: None,
            created_by,
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Attach an email address, normalised to lowercase.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Full replacement of the editable customer fields.
#[derive(Debug, Clone)]
pub struct UpdateCustomer {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Filters applied when listing customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    /// Restrict to customers assigned to this user.
    pub assigned_to: Option<i32>,
    /// Case-insensitive substring match on the customer name.
    pub search: Option<String>,
    pub limit: Option<i64>,
}

impl CustomerListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned_to(mut self, user_id: i32) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
