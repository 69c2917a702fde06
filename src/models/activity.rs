use serde::{Deserialize, Serialize};

use super::{attachment::Attachment, next_id};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Activity {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            location: location.into(),
            date: date.into(),
            time: time.into(),
            notes: None,
            price: None,
            currency: None,
            attachments: Vec::new(),
        }
    }

    pub fn notes_display(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}
