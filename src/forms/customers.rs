use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::{
    customer::{DEFAULT_CUSTOMER_STATUS, NewCustomer, UpdateCustomer},
    interaction::NewInteraction,
    pipeline::NewPipelineEntry,
};
use crate::forms::{optional_text, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const SEARCH_MAX_LEN: u64 = 128;
const NOTE_MAX_LEN: u64 = 4096;

pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("customer name cannot be empty")]
    EmptyName,
    #[error("pipeline stage is required")]
    EmptyStage,
    #[error("interaction type is required")]
    EmptyInteractionType,
}

/// Customer fields shared by the create and update calls.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub notes: Option<String>,
}

impl CustomerForm {
    pub fn into_new_customer(self, created_by: i32) -> CustomerFormResult<NewCustomer> {
        let fields = self.into_fields()?;

        let mut customer = NewCustomer::new(fields.name, created_by).with_status(fields.status);
        if let Some(company) = fields.company {
            customer = customer.with_company(company);
        }
        if let Some(email) = fields.email {
            customer = customer.with_email(email);
        }
        if let Some(phone) = fields.phone {
            customer = customer.with_phone(phone);
        }
        if let Some(notes) = fields.notes {
            customer = customer.with_notes(notes);
        }
        Ok(customer)
    }

    pub fn into_update_customer(self) -> CustomerFormResult<UpdateCustomer> {
        let fields = self.into_fields()?;

        Ok(UpdateCustomer {
            name: fields.name,
            company: fields.company,
            email: fields.email.map(|email| email.to_lowercase()),
            phone: fields.phone,
            status: fields.status,
            notes: fields.notes,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }

    fn into_fields(mut self) -> CustomerFormResult<CustomerFields> {
        self.email = optional_text(self.email.take());
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }

        Ok(CustomerFields {
            name,
            company: optional_text(self.company),
            email: self.email,
            phone: optional_text(self.phone),
            status: optional_text(self.status)
                .unwrap_or_else(|| DEFAULT_CUSTOMER_STATUS.to_string()),
            notes: optional_text(self.notes),
        })
    }
}

struct CustomerFields {
    name: String,
    company: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    status: String,
    notes: Option<String>,
}

/// Replacement assignee set. Null entries are accepted and skipped.
#[derive(Debug, Deserialize)]
pub struct AssignForm {
    pub user_ids: Vec<Option<i32>>,
}

impl AssignForm {
    /// Drop nulls and duplicates, keeping first-seen order.
    pub fn into_user_ids(self) -> Vec<i32> {
        let mut ids = Vec::with_capacity(self.user_ids.len());
        for id in self.user_ids.into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

#[derive(Debug, Deserialize)]
pub struct UnassignForm {
    pub user_id: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InteractionForm {
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub note: Option<String>,
}

impl InteractionForm {
    pub fn into_new_interaction(
        self,
        customer_id: i32,
        user_id: i32,
    ) -> CustomerFormResult<NewInteraction> {
        self.validate()?;
        let kind = sanitize_inline_text(&self.kind);
        if kind.is_empty() {
            return Err(CustomerFormError::EmptyInteractionType);
        }
        Ok(NewInteraction {
            customer_id,
            user_id,
            kind,
            note: optional_text(self.note),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PipelineForm {
    #[serde(default)]
    pub stage: String,
    #[validate(length(max = NOTE_MAX_LEN))]
    pub comment: Option<String>,
}

impl PipelineForm {
    pub fn into_new_entry(self, customer_id: i32, moved_by: i32) -> CustomerFormResult<NewPipelineEntry> {
        self.validate()?;
        let stage = sanitize_inline_text(&self.stage);
        if stage.is_empty() {
            return Err(CustomerFormError::EmptyStage);
        }
        Ok(NewPipelineEntry {
            customer_id,
            stage,
            moved_by,
            comment: optional_text(self.comment),
        })
    }
}

/// `?search=` query of the customer search box.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = SEARCH_MAX_LEN))]
    pub search: Option<String>,
}

impl SearchQuery {
    pub fn into_term(self) -> CustomerFormResult<String> {
        self.validate()?;
        Ok(self
            .search
            .map(|term| sanitize_inline_text(&term))
            .unwrap_or_default())
    }
}
