use actix_multipart::form::{MultipartForm, tempfile::TempFile};

/// Multipart upload of a single file attached to a quote or an order.
#[derive(MultipartForm)]
pub struct UploadAttachmentForm {
    #[multipart(limit = "25MB")]
    pub file: TempFile,
}

impl UploadAttachmentForm {
    /// Client supplied file name, or a generic one when absent.
    pub fn filename(&self) -> String {
        self.file
            .file_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "attachment".to_string())
    }
}
