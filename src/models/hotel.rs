use serde::{Deserialize, Serialize};

use super::{attachment::Attachment, next_id};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub address: String,
    pub check_in: String,
    pub check_out: String,
    pub confirmation_number: String,
    pub room_type: Option<String>,
    pub notes: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub pending_amount: Option<f64>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Hotel {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        check_in: impl Into<String>,
        check_out: impl Into<String>,
    ) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            address: address.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
            confirmation_number: String::new(),
            room_type: None,
            notes: None,
            website: None,
            phone: None,
            price: None,
            currency: None,
            payment_status: PaymentStatus::default(),
            pending_amount: None,
            attachments: Vec::new(),
        }
    }

    pub fn notes_display(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

/// Hotels are the only itinerary item with an independent payment state;
/// flights and activities count as settled as soon as they carry a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Partial,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Partial => "partial",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Partial => "Partially paid",
        }
    }
}
