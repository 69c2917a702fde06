use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::attachment::{Attachment, AttachmentKind};

/// Raw file handle as the upload boundary delivers it. The registry never
/// opens, validates or transcodes the bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Process-local blob table. Attachment bytes live here for the lifetime of
/// the process only; the persisted attachment record keeps a URL that
/// dangles after a restart. That is a documented limitation, not a bug.
#[derive(Debug, Clone, Default)]
pub struct AttachmentRegistry {
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps each file as an attachment record and parks its bytes. The
    /// kind comes from the declared media type: `image/*` is an image,
    /// anything else is filed as a PDF.
    pub async fn register(&self, files: Vec<UploadedFile>) -> Vec<Attachment> {
        let mut blobs = self.blobs.write().await;
        files
            .into_iter()
            .map(|file| {
                let kind = AttachmentKind::from_media_type(&file.media_type);
                let mut attachment = Attachment::new(file.name, kind);
                blobs.insert(
                    attachment.id.clone(),
                    StoredBlob {
                        media_type: file.media_type,
                        bytes: file.bytes,
                    },
                );
                attachment.url = Some(format!("/blobs/{}", attachment.id));
                attachment
            })
            .collect()
    }

    /// Parks a single blob (used for trip cover images) and returns its URL.
    pub async fn store_blob(&self, media_type: String, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4().to_string();
        self.blobs
            .write()
            .await
            .insert(id.clone(), StoredBlob { media_type, bytes });
        format!("/blobs/{id}")
    }

    pub async fn fetch(&self, blob_id: &str) -> Option<StoredBlob> {
        self.blobs.read().await.get(blob_id).cloned()
    }
}
