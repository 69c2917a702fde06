use serde::{Deserialize, Serialize};

use super::{attachment::Attachment, next_id};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub airline: String,
    pub flight_number: String,
    pub departure: FlightLeg,
    pub arrival: FlightLeg,
    pub notes: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// One end of a flight. Date and time stay as entered; nothing validates
/// that the arrival instant follows the departure instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLeg {
    pub airport: String,
    pub date: String,
    pub time: String,
}

impl Flight {
    pub fn new(
        airline: impl Into<String>,
        flight_number: impl Into<String>,
        departure: FlightLeg,
        arrival: FlightLeg,
    ) -> Self {
        Self {
            id: next_id(),
            airline: airline.into(),
            flight_number: flight_number.into(),
            departure,
            arrival,
            notes: None,
            price: None,
            currency: None,
            attachments: Vec::new(),
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.airline, self.flight_number)
    }

    pub fn notes_display(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}
