use diesel::prelude::*;

use crate::{
    domain::attachment::{
        NewSalesAttachment as DomainNewSalesAttachment, SalesAttachment as DomainSalesAttachment,
    },
    models::attachment::{
        NewSalesAttachment as DbNewSalesAttachment, SalesAttachment as DbSalesAttachment,
    },
    repository::{AttachmentWriter, DieselRepository, RepositoryResult},
};

impl AttachmentWriter for DieselRepository {
    fn create_attachment(
        &self,
        attachment: &DomainNewSalesAttachment,
    ) -> RepositoryResult<DomainSalesAttachment> {
        use crate::schema::sales_attachments;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(sales_attachments::table)
            .values(&DbNewSalesAttachment::from(attachment))
            .get_result::<DbSalesAttachment>(&mut conn)?;

        created.try_into()
    }
}
