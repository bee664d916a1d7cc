//! Append-only CRM history tables: audit log, interaction log and pipeline.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::audit::{AuditEntry, NewAuditEntry as DomainNewAuditEntry};
use crate::domain::interaction::{Interaction, NewInteraction as DomainNewInteraction};
use crate::domain::pipeline::{NewPipelineEntry as DomainNewPipelineEntry, PipelineEntry};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::crm_logs)]
pub struct CrmLog {
    pub id: i32,
    pub customer_id: i32,
    pub user_id: i32,
    pub action: String,
    pub details: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::crm_logs)]
pub struct NewCrmLog<'a> {
    pub customer_id: i32,
    pub user_id: i32,
    pub action: &'a str,
    pub details: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customer_logs)]
pub struct CustomerLog {
    pub id: i32,
    pub customer_id: i32,
    pub user_id: i32,
    pub log_type: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customer_logs)]
pub struct NewCustomerLog<'a> {
    pub customer_id: i32,
    pub user_id: i32,
    pub log_type: &'a str,
    pub note: Option<&'a str>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sales_pipeline)]
pub struct PipelineRow {
    pub id: i32,
    pub customer_id: i32,
    pub stage: String,
    pub moved_by: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sales_pipeline)]
pub struct NewPipelineRow<'a> {
    pub customer_id: i32,
    pub stage: &'a str,
    pub moved_by: i32,
    pub comment: Option<&'a str>,
}

impl CrmLog {
    pub fn into_domain(self, user_name: String) -> AuditEntry {
        AuditEntry {
            id: self.id,
            customer_id: self.customer_id,
            user_id: self.user_id,
            user_name,
            action: self.action,
            details: self.details,
            created_at: self.created_at,
        }
    }
}

impl CustomerLog {
    pub fn into_domain(self, user_name: String) -> Interaction {
        Interaction {
            id: self.id,
            customer_id: self.customer_id,
            user_id: self.user_id,
            user_name,
            kind: self.log_type,
            note: self.note,
            created_at: self.created_at,
        }
    }
}

impl PipelineRow {
    pub fn into_domain(self, moved_by_name: String) -> PipelineEntry {
        PipelineEntry {
            id: self.id,
            customer_id: self.customer_id,
            stage: self.stage,
            moved_by: self.moved_by,
            moved_by_name,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewAuditEntry> for NewCrmLog<'a> {
    fn from(value: &'a DomainNewAuditEntry) -> Self {
        Self {
            customer_id: value.customer_id,
            user_id: value.user_id,
            action: value.action.as_str(),
            details: value.details.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainNewInteraction> for NewCustomerLog<'a> {
    fn from(value: &'a DomainNewInteraction) -> Self {
        Self {
            customer_id: value.customer_id,
            user_id: value.user_id,
            log_type: value.kind.as_str(),
            note: value.note.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainNewPipelineEntry> for NewPipelineRow<'a> {
    fn from(value: &'a DomainNewPipelineEntry) -> Self {
        Self {
            customer_id: value.customer_id,
            stage: value.stage.as_str(),
            moved_by: value.moved_by,
            comment: value.comment.as_deref(),
        }
    }
}
