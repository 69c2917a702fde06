use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::fs;
use tracing::warn;

use crate::{
    error::AppError,
    models::{
        activity::Activity,
        attachment::{Attachment, AttachmentKind},
        flight::{Flight, FlightLeg},
        hotel::Hotel,
        trip::{Trip, TripStatus},
    },
};

const TRIPS_FILE: &str = "trips.json";

/// Which child collection of a trip an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Flight,
    Hotel,
    Activity,
}

impl ItemKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "flights" | "flight" => Some(Self::Flight),
            "hotels" | "hotel" => Some(Self::Hotel),
            "activities" | "activity" => Some(Self::Activity),
            _ => None,
        }
    }
}

/// The whole trip collection lives under one key: a single JSON document on
/// disk. Every mutation is load, pure transform, write back; there is no
/// in-place update and no intermediate state to recover.
#[derive(Debug, Clone)]
pub struct TripStore {
    root: Arc<PathBuf>,
}

impl TripStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn trips_path(&self) -> PathBuf {
        self.root().join(TRIPS_FILE)
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    /// Loads the collection; an absent, empty or unreadable document falls
    /// back to the built-in seed list instead of failing.
    pub async fn load_trips(&self) -> Result<Vec<Trip>, AppError> {
        let path = self.trips_path();
        if !fs::try_exists(&path).await? {
            return Ok(seed_trips());
        }
        let raw = fs::read(&path).await?;
        if raw.is_empty() {
            return Ok(seed_trips());
        }
        match serde_json::from_slice(&raw) {
            Ok(trips) => Ok(trips),
            Err(err) => {
                warn!("stored trip collection is unreadable, starting over from seed data: {err}");
                Ok(seed_trips())
            }
        }
    }

    pub async fn save_trips(&self, trips: &[Trip]) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        let data = serde_json::to_vec_pretty(trips).map_err(|err| AppError::Other(err.into()))?;
        fs::write(self.trips_path(), data).await?;
        Ok(())
    }

    pub async fn get_trip(&self, trip_id: &str) -> Result<Trip, AppError> {
        self.load_trips()
            .await?
            .into_iter()
            .find(|trip| trip.id == trip_id)
            .ok_or(AppError::NotFound)
    }

    pub async fn create_trip(&self, trip: Trip) -> Result<Trip, AppError> {
        let mut trips = self.load_trips().await?;
        trips.push(trip.clone());
        self.save_trips(&trips).await?;
        Ok(trip)
    }

    pub async fn delete_trip(&self, trip_id: &str) -> Result<(), AppError> {
        let mut trips = self.load_trips().await?;
        trips.retain(|trip| trip.id != trip_id);
        self.save_trips(&trips).await
    }

    pub async fn set_status(&self, trip_id: &str, status: TripStatus) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.status = status;
            trip
        })
        .await
    }

    pub async fn set_cover_image(&self, trip_id: &str, url: String) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.cover_image = Some(url);
            trip
        })
        .await
    }

    pub async fn add_flight(&self, trip_id: &str, flight: Flight) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.flights.push(flight);
            trip
        })
        .await
    }

    /// Replaces a flight's fields while keeping its id and attachments.
    pub async fn update_flight(
        &self,
        trip_id: &str,
        flight_id: &str,
        updated: Flight,
    ) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.flights = trip
                .flights
                .into_iter()
                .map(|flight| {
                    if flight.id == flight_id {
                        Flight {
                            id: flight.id,
                            attachments: flight.attachments,
                            ..updated.clone()
                        }
                    } else {
                        flight
                    }
                })
                .collect();
            trip
        })
        .await
    }

    pub async fn delete_flight(&self, trip_id: &str, flight_id: &str) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.flights.retain(|flight| flight.id != flight_id);
            trip
        })
        .await
    }

    pub async fn add_hotel(&self, trip_id: &str, hotel: Hotel) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.hotels.push(hotel);
            trip
        })
        .await
    }

    pub async fn update_hotel(
        &self,
        trip_id: &str,
        hotel_id: &str,
        updated: Hotel,
    ) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.hotels = trip
                .hotels
                .into_iter()
                .map(|hotel| {
                    if hotel.id == hotel_id {
                        Hotel {
                            id: hotel.id,
                            attachments: hotel.attachments,
                            ..updated.clone()
                        }
                    } else {
                        hotel
                    }
                })
                .collect();
            trip
        })
        .await
    }

    pub async fn delete_hotel(&self, trip_id: &str, hotel_id: &str) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.hotels.retain(|hotel| hotel.id != hotel_id);
            trip
        })
        .await
    }

    pub async fn add_activity(&self, trip_id: &str, activity: Activity) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.activities.push(activity);
            trip
        })
        .await
    }

    pub async fn update_activity(
        &self,
        trip_id: &str,
        activity_id: &str,
        updated: Activity,
    ) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.activities = trip
                .activities
                .into_iter()
                .map(|activity| {
                    if activity.id == activity_id {
                        Activity {
                            id: activity.id,
                            attachments: activity.attachments,
                            ..updated.clone()
                        }
                    } else {
                        activity
                    }
                })
                .collect();
            trip
        })
        .await
    }

    pub async fn delete_activity(
        &self,
        trip_id: &str,
        activity_id: &str,
    ) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            trip.activities.retain(|activity| activity.id != activity_id);
            trip
        })
        .await
    }

    /// Appends a batch of attachment records to one flight, hotel or
    /// activity. An unknown item id leaves the trip unchanged.
    pub async fn add_attachments(
        &self,
        trip_id: &str,
        kind: ItemKind,
        item_id: &str,
        attachments: Vec<Attachment>,
    ) -> Result<Trip, AppError> {
        self.replace_trip(trip_id, |mut trip| {
            match kind {
                ItemKind::Flight => {
                    if let Some(flight) = trip.flights.iter_mut().find(|f| f.id == item_id) {
                        flight.attachments.extend(attachments);
                    }
                }
                ItemKind::Hotel => {
                    if let Some(hotel) = trip.hotels.iter_mut().find(|h| h.id == item_id) {
                        hotel.attachments.extend(attachments);
                    }
                }
                ItemKind::Activity => {
                    if let Some(activity) = trip.activities.iter_mut().find(|a| a.id == item_id) {
                        activity.attachments.extend(attachments);
                    }
                }
            }
            trip
        })
        .await
    }

    async fn replace_trip<F>(&self, trip_id: &str, apply: F) -> Result<Trip, AppError>
    where
        F: FnOnce(Trip) -> Trip,
    {
        let mut trips = self.load_trips().await?;
        let Some(slot) = trips.iter_mut().find(|trip| trip.id == trip_id) else {
            return Err(AppError::NotFound);
        };
        let updated = apply(slot.clone());
        *slot = updated.clone();
        self.save_trips(&trips).await?;
        Ok(updated)
    }
}

/// Starter collection shown the first time the app runs (or after the
/// stored document goes bad).
fn seed_trips() -> Vec<Trip> {
    let mut japan = Trip {
        id: "1".to_string(),
        name: "Japan Adventure".to_string(),
        destination: "Tokyo, Japan".to_string(),
        start_date: "2024-03-15".to_string(),
        end_date: "2024-03-25".to_string(),
        status: TripStatus::Upcoming,
        flights: Vec::new(),
        hotels: Vec::new(),
        activities: Vec::new(),
        cover_image: None,
    };

    japan.flights.push(Flight {
        id: "f1".to_string(),
        airline: "Japan Airlines".to_string(),
        flight_number: "JL414".to_string(),
        departure: FlightLeg {
            airport: "MAD - Madrid Barajas".to_string(),
            date: "2024-03-15".to_string(),
            time: "14:30".to_string(),
        },
        arrival: FlightLeg {
            airport: "NRT - Narita International".to_string(),
            date: "2024-03-16".to_string(),
            time: "09:45+1".to_string(),
        },
        notes: Some("Seat 12A, vegetarian meal requested".to_string()),
        price: None,
        currency: None,
        attachments: vec![Attachment {
            id: "a1".to_string(),
            name: "Boarding Pass.pdf".to_string(),
            kind: AttachmentKind::Pdf,
            url: None,
        }],
    });

    japan.hotels.push(Hotel {
        id: "h1".to_string(),
        name: "Hotel Gracery Shinjuku".to_string(),
        address: "1-19-1 Kabukicho, Shinjuku, Tokyo".to_string(),
        check_in: "2024-03-16".to_string(),
        check_out: "2024-03-20".to_string(),
        confirmation_number: "HGS123456".to_string(),
        room_type: Some("Double room with Godzilla view".to_string()),
        notes: Some("Breakfast included, late check-in confirmed".to_string()),
        website: None,
        phone: None,
        price: None,
        currency: None,
        payment_status: Default::default(),
        pending_amount: None,
        attachments: vec![
            Attachment {
                id: "a3".to_string(),
                name: "Confirmation.pdf".to_string(),
                kind: AttachmentKind::Pdf,
                url: None,
            },
            Attachment {
                id: "a4".to_string(),
                name: "Hotel photo".to_string(),
                kind: AttachmentKind::Image,
                url: None,
            },
        ],
    });

    let paris = Trip {
        id: "2".to_string(),
        name: "Paris Getaway".to_string(),
        destination: "Paris, France".to_string(),
        start_date: "2024-02-10".to_string(),
        end_date: "2024-02-15".to_string(),
        status: TripStatus::Completed,
        flights: Vec::new(),
        hotels: Vec::new(),
        activities: Vec::new(),
        cover_image: None,
    };

    vec![japan, paris]
}
