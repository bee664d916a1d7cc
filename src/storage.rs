//! Disk storage for uploaded sales attachments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Public URL prefix under which stored files are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A file written by an [`AttachmentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub stored_name: String,
    pub url: String,
}

pub trait AttachmentStore {
    /// Persist the file found at `source` under a name derived from
    /// `original_name`.
    fn store(&self, source: &Path, original_name: &str) -> io::Result<StoredFile>;
    fn remove(&self, stored: &StoredFile) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FsAttachmentStore {
    root: PathBuf,
}

impl FsAttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AttachmentStore for FsAttachmentStore {
    fn store(&self, source: &Path, original_name: &str) -> io::Result<StoredFile> {
        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            sanitize_filename(original_name)
        );
        fs::copy(source, self.root.join(&stored_name))?;

        Ok(StoredFile {
            url: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
            stored_name,
        })
    }

    fn remove(&self, stored: &StoredFile) -> io::Result<()> {
        fs::remove_file(self.root.join(&stored.stored_name))
    }
}

/// Keep only characters that are safe inside a single path segment.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}
