use chrono::NaiveDateTime;
use serde::Serialize;

/// One step of a customer's sales pipeline history. The newest entry is the
/// customer's current stage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PipelineEntry {
    pub id: i32,
    pub customer_id: i32,
    pub stage: String,
    pub moved_by: i32,
    pub moved_by_name: String,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPipelineEntry {
    pub customer_id: i32,
    pub stage: String,
    pub moved_by: i32,
    pub comment: Option<String>,
}
