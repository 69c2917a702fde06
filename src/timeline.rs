//! Chronological itinerary view. Built fresh from a trip on every call;
//! nothing here is cached or persisted.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::models::trip::Trip;

/// House policy for hotel events; check-in and check-out rows always carry
/// these times no matter what the booking says.
pub const HOTEL_CHECKIN_TIME: &str = "15:00";
pub const HOTEL_CHECKOUT_TIME: &str = "11:00";

#[derive(Debug, Clone)]
pub struct TimelineEvent {
    pub kind: EventKind,
    pub date: String,
    pub time: String,
    pub title: String,
    pub subtitle: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    FlightDeparture,
    FlightArrival,
    HotelCheckin,
    HotelCheckout,
    Activity,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlightDeparture => "flight-departure",
            Self::FlightArrival => "flight-arrival",
            Self::HotelCheckin => "hotel-checkin",
            Self::HotelCheckout => "hotel-checkout",
            Self::Activity => "activity",
        }
    }
}

/// One date bucket, in first-occurrence order of the sorted event stream.
#[derive(Debug, Clone)]
pub struct TimelineDay {
    pub date: String,
    pub events: Vec<TimelineEvent>,
}

/// Flattened, sorted event stream for a trip: two events per flight, two
/// per hotel, one per activity.
pub fn trip_events(trip: &Trip) -> Vec<TimelineEvent> {
    let mut events = Vec::with_capacity(trip.flights.len() * 2 + trip.hotels.len() * 2 + trip.activities.len());

    for flight in &trip.flights {
        events.push(TimelineEvent {
            kind: EventKind::FlightDeparture,
            date: flight.departure.date.clone(),
            time: flight.departure.time.clone(),
            title: format!("Departure - {} {}", flight.airline, flight.flight_number),
            subtitle: flight.departure.airport.clone(),
            detail: flight.notes.clone(),
        });
        events.push(TimelineEvent {
            kind: EventKind::FlightArrival,
            date: flight.arrival.date.clone(),
            time: flight.arrival.time.clone(),
            title: format!("Arrival - {} {}", flight.airline, flight.flight_number),
            subtitle: flight.arrival.airport.clone(),
            detail: flight.notes.clone(),
        });
    }

    for hotel in &trip.hotels {
        events.push(TimelineEvent {
            kind: EventKind::HotelCheckin,
            date: hotel.check_in.clone(),
            time: HOTEL_CHECKIN_TIME.to_string(),
            title: format!("Check-in - {}", hotel.name),
            subtitle: hotel.address.clone(),
            detail: hotel.notes.clone(),
        });
        events.push(TimelineEvent {
            kind: EventKind::HotelCheckout,
            date: hotel.check_out.clone(),
            time: HOTEL_CHECKOUT_TIME.to_string(),
            title: format!("Check-out - {}", hotel.name),
            subtitle: hotel.address.clone(),
            detail: hotel.notes.clone(),
        });
    }

    for activity in &trip.activities {
        events.push(TimelineEvent {
            kind: EventKind::Activity,
            date: activity.date.clone(),
            time: activity.time.clone(),
            title: activity.name.clone(),
            subtitle: activity.location.clone(),
            detail: activity.notes.clone(),
        });
    }

    // Stable sort: same-instant events keep the append order above, and
    // unparseable date/time values compare as ties rather than erroring.
    events.sort_by(|a, b| match (parse_instant(a), parse_instant(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    });

    events
}

/// Events grouped into date buckets, preserving the sorted order inside
/// each bucket and the first-occurrence order of the dates themselves.
pub fn build_timeline(trip: &Trip) -> Vec<TimelineDay> {
    let mut days: Vec<TimelineDay> = Vec::new();
    for event in trip_events(trip) {
        match days.iter_mut().find(|day| day.date == event.date) {
            Some(day) => day.events.push(event),
            None => days.push(TimelineDay {
                date: event.date.clone(),
                events: vec![event],
            }),
        }
    }
    days
}

fn parse_instant(event: &TimelineEvent) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{}T{}", event.date, event.time), "%Y-%m-%dT%H:%M").ok()
}
