use chrono::NaiveDateTime;
use serde::Serialize;

/// A note about contact with a customer (call, meeting, email...).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Interaction {
    pub id: i32,
    pub customer_id: i32,
    pub user_id: i32,
    pub user_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInteraction {
    pub customer_id: i32,
    pub user_id: i32,
    pub kind: String,
    pub note: Option<String>,
}
