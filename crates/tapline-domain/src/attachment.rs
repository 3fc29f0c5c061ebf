//! Attached file metadata

use serde::{Deserialize, Serialize};

/// Metadata for a file attached to a record (site photo or drawing).
///
/// The content travels inline as a data URL so attachments survive JSON
/// backups unchanged; tapline never interprets the payload beyond its
/// MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub data_url: String,
    pub mime_type: String,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}
