use std::path::Path;

use crate::access::Action;
use crate::domain::{
    attachment::{AttachmentTarget, NewSalesAttachment, SalesAttachment},
    auth::AuthenticatedUser,
};
use crate::repository::{AttachmentWriter, OrderReader, QuoteReader};
use crate::services::orders::load_order;
use crate::services::quotes::load_quote;
use crate::services::{ServiceError, ServiceResult};
use crate::storage::AttachmentStore;

/// Store an uploaded file and link it to a quote or an order the user owns.
///
/// The stored file is removed again when the database insert fails.
pub fn upload_attachment<R>(
    repo: &R,
    store: &dyn AttachmentStore,
    user: &AuthenticatedUser,
    target: AttachmentTarget,
    related_id: i32,
    source: &Path,
    filename: &str,
) -> ServiceResult<SalesAttachment>
where
    R: QuoteReader + OrderReader + AttachmentWriter + ?Sized,
{
    match target {
        AttachmentTarget::Quote => {
            load_quote(repo, user, Action::UploadAttachment, related_id)?;
        }
        AttachmentTarget::Order => {
            load_order(repo, user, Action::UploadAttachment, related_id)?;
        }
    }

    let stored = store
        .store(source, filename)
        .map_err(ServiceError::internal)?;

    let attachment = NewSalesAttachment {
        related_type: target,
        related_id,
        filename: filename.to_string(),
        file_url: stored.url.clone(),
        uploaded_by: user.id,
    };

    match repo.create_attachment(&attachment) {
        Ok(created) => {
            log::info!(
                "User {} attached {} to {target} {related_id}",
                user.id,
                created.file_url
            );
            Ok(created)
        }
        Err(err) => {
            if let Err(remove_err) = store.remove(&stored) {
                log::error!(
                    "Failed to remove orphaned upload {}: {remove_err}",
                    stored.stored_name
                );
            }
            Err(err.into())
        }
    }
}
