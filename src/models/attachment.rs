use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an attached file. The bytes themselves live in the
/// process-local blob table; `url` dangles after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub kind: AttachmentKind,
    pub url: Option<String>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, kind: AttachmentKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Pdf,
    Image,
    Note,
}

impl AttachmentKind {
    /// Everything that is not declared as an image is filed as a PDF.
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.starts_with("image/") {
            Self::Image
        } else {
            Self::Pdf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Note => "note",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Image => "Image",
            Self::Note => "Note",
        }
    }
}
