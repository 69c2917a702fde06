use serde::{Deserialize, Serialize};

use super::{activity::Activity, flight::Flight, hotel::Hotel, next_id};

/// Root of ownership: a trip exclusively owns its flights, hotels and
/// activities, and they go with it when it is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub name: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub status: TripStatus,
    #[serde(default)]
    pub flights: Vec<Flight>,
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    pub cover_image: Option<String>,
}

impl Trip {
    pub fn new(
        name: impl Into<String>,
        destination: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        status: TripStatus,
    ) -> Self {
        Self {
            id: next_id(),
            name: name.into(),
            destination: destination.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            status,
            flights: Vec::new(),
            hotels: Vec::new(),
            activities: Vec::new(),
            cover_image: None,
        }
    }

    pub fn flight(&self, flight_id: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.id == flight_id)
    }

    pub fn hotel(&self, hotel_id: &str) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == hotel_id)
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl TripStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "upcoming" => Some(Self::Upcoming),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }
}
