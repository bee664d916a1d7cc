use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Kind of sales document an attachment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentTarget {
    Quote,
    Order,
}

impl AttachmentTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            AttachmentTarget::Quote => "quote",
            AttachmentTarget::Order => "order",
        }
    }
}

impl fmt::Display for AttachmentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentTarget {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "quote" => Ok(AttachmentTarget::Quote),
            "order" => Ok(AttachmentTarget::Order),
            other => Err(format!("unknown attachment target `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SalesAttachment {
    pub id: i32,
    pub related_type: AttachmentTarget,
    pub related_id: i32,
    pub filename: String,
    pub file_url: String,
    pub uploaded_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSalesAttachment {
    pub related_type: AttachmentTarget,
    pub related_id: i32,
    pub filename: String,
    pub file_url: String,
    pub uploaded_by: i32,
}
