use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::attachment::{
    AttachmentTarget, NewSalesAttachment as DomainNewSalesAttachment,
    SalesAttachment as DomainSalesAttachment,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::sales_attachments)]
pub struct SalesAttachment {
    pub id: i32,
    pub related_type: String,
    pub related_id: i32,
    pub filename: String,
    pub file_url: String,
    pub uploaded_by: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sales_attachments)]
pub struct NewSalesAttachment<'a> {
    pub related_type: &'a str,
    pub related_id: i32,
    pub filename: &'a str,
    pub file_url: &'a str,
    pub uploaded_by: i32,
}

impl TryFrom<SalesAttachment> for DomainSalesAttachment {
    type Error = RepositoryError;

    fn try_from(value: SalesAttachment) -> Result<Self, Self::Error> {
        let related_type = value
            .related_type
            .parse::<AttachmentTarget>()
            .map_err(|err| RepositoryError::InvalidData(format!("attachment {}: {err}", value.id)))?;

        Ok(Self {
            id: value.id,
            related_type,
            related_id: value.related_id,
            filename: value.filename,
            file_url: value.file_url,
            uploaded_by: value.uploaded_by,
            created_at: value.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewSalesAttachment> for NewSalesAttachment<'a> {
    fn from(value: &'a DomainNewSalesAttachment) -> Self {
        Self {
            related_type: value.related_type.as_str(),
            related_id: value.related_id,
            filename: value.filename.as_str(),
            file_url: value.file_url.as_str(),
            uploaded_by: value.uploaded_by,
        }
    }
}
