use std::collections::HashSet;

use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::AppError,
    expenses,
    models::trip::{Trip, TripStatus},
    state::AppState,
    timeline,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips_list))
        .route("/trips/new", get(trip_new_form).post(trip_new_submit))
        .route("/trips/:id", get(trip_detail))
        .route("/trips/:id/status", post(status_submit))
        .route("/trips/:id/delete", post(delete_submit))
        .route("/trips/:id/cover", post(cover_submit))
}

#[derive(Clone)]
struct TripCard {
    id: String,
    name: String,
    destination: String,
    dates: String,
    status_label: &'static str,
    status_value: &'static str,
    flight_count: usize,
    hotel_count: usize,
    has_cover: bool,
    cover_image: String,
}

#[derive(Template)]
#[template(path = "trips_list.html")]
struct TripsListTemplate {
    upcoming_count: usize,
    flight_count: usize,
    hotel_count: usize,
    destination_count: usize,
    trips: Vec<TripCard>,
}

async fn trips_list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let trips = state.store.load_trips().await?;

    let upcoming_count = trips
        .iter()
        .filter(|trip| trip.status == TripStatus::Upcoming)
        .count();
    let flight_count = trips.iter().map(|trip| trip.flights.len()).sum();
    let hotel_count = trips.iter().map(|trip| trip.hotels.len()).sum();
    let destination_count = trips
        .iter()
        .map(|trip| trip.destination.as_str())
        .collect::<HashSet<_>>()
        .len();

    let cards = trips
        .iter()
        .map(|trip| TripCard {
            id: trip.id.clone(),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            dates: format!(
                "{} to {}",
                format_date(&trip.start_date),
                format_date(&trip.end_date)
            ),
            status_label: trip.status.label(),
            status_value: trip.status.as_str(),
            flight_count: trip.flights.len(),
            hotel_count: trip.hotels.len(),
            has_cover: trip.cover_image.is_some(),
            cover_image: trip.cover_image.clone().unwrap_or_default(),
        })
        .collect();

    Ok(AskamaTemplateResponse::into_response(TripsListTemplate {
        upcoming_count,
        flight_count,
        hotel_count,
        destination_count,
        trips: cards,
    }))
}

#[derive(Template)]
#[template(path = "trip_new.html")]
struct TripNewTemplate;

async fn trip_new_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(TripNewTemplate)
}

#[derive(Deserialize)]
struct TripForm {
    name: String,
    destination: String,
    start_date: String,
    end_date: String,
    status: String,
}

async fn trip_new_submit(
    State(state): State<AppState>,
    Form(form): Form<TripForm>,
) -> Result<Redirect, AppError> {
    let status = TripStatus::parse(&form.status)
        .ok_or_else(|| AppError::BadRequest("unknown trip status".into()))?;
    let trip = Trip::new(
        form.name,
        form.destination,
        form.start_date,
        form.end_date,
        status,
    );
    let saved = state.store.create_trip(trip).await?;
    Ok(Redirect::to(&format!("/trips/{}", saved.id)))
}

#[derive(Deserialize)]
struct StatusForm {
    status: String,
}

async fn status_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AppError> {
    let status = TripStatus::parse(&form.status)
        .ok_or_else(|| AppError::BadRequest("unknown trip status".into()))?;
    state.store.set_status(&trip_id, status).await?;
    Ok(Redirect::to("/"))
}

async fn delete_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Redirect, AppError> {
    state.store.delete_trip(&trip_id).await?;
    Ok(Redirect::to("/"))
}

async fn cover_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("cover") {
            continue;
        }
        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.to_string()))?
            .to_vec();
        if bytes.is_empty() {
            continue;
        }
        let url = state.attachments.store_blob(media_type, bytes).await;
        state.store.set_cover_image(&trip_id, url).await?;
        break;
    }
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

#[derive(Clone)]
struct AttachmentView {
    name: String,
    kind_label: &'static str,
    has_url: bool,
    url: String,
}

#[derive(Clone)]
struct FlightView {
    id: String,
    title: String,
    departure: String,
    arrival: String,
    notes: String,
    has_notes: bool,
    price: String,
    has_price: bool,
    attachments: Vec<AttachmentView>,
}

#[derive(Clone)]
struct HotelView {
    id: String,
    name: String,
    address: String,
    stay: String,
    confirmation_number: String,
    has_confirmation: bool,
    room_type: String,
    has_room_type: bool,
    notes: String,
    has_notes: bool,
    website: String,
    has_website: bool,
    phone: String,
    has_phone: bool,
    price: String,
    has_price: bool,
    payment_label: &'static str,
    payment_value: &'static str,
    attachments: Vec<AttachmentView>,
}

#[derive(Clone)]
struct ActivityView {
    id: String,
    name: String,
    location: String,
    when: String,
    notes: String,
    has_notes: bool,
    price: String,
    has_price: bool,
    attachments: Vec<AttachmentView>,
}

#[derive(Clone)]
struct EventView {
    kind: &'static str,
    time: String,
    title: String,
    subtitle: String,
    detail: String,
    has_detail: bool,
}

#[derive(Clone)]
struct DayView {
    label: String,
    events: Vec<EventView>,
}

#[derive(Clone)]
struct ExpenseRow {
    name: String,
    kind_label: &'static str,
    amount: String,
    pending: String,
    has_pending: bool,
    status_label: &'static str,
    status_value: &'static str,
}

#[derive(Clone)]
struct TotalCard {
    currency: String,
    total: String,
    paid: String,
    pending: String,
    has_pending: bool,
    paid_percent: String,
}

#[derive(Template)]
#[template(path = "trip_detail.html")]
struct TripDetailTemplate {
    id: String,
    name: String,
    destination: String,
    dates: String,
    status_label: &'static str,
    has_cover: bool,
    cover_image: String,
    flights: Vec<FlightView>,
    hotels: Vec<HotelView>,
    activities: Vec<ActivityView>,
    days: Vec<DayView>,
    expense_rows: Vec<ExpenseRow>,
    currency_totals: Vec<TotalCard>,
    has_expenses: bool,
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get_trip(&trip_id).await?;

    let flights = trip
        .flights
        .iter()
        .map(|flight| FlightView {
            id: flight.id.clone(),
            title: flight.title(),
            departure: format!(
                "{} on {} at {}",
                flight.departure.airport,
                format_date(&flight.departure.date),
                flight.departure.time
            ),
            arrival: format!(
                "{} on {} at {}",
                flight.arrival.airport,
                format_date(&flight.arrival.date),
                flight.arrival.time
            ),
            notes: flight.notes_display().to_string(),
            has_notes: flight.notes.is_some(),
            price: format_money(flight.price, &flight.currency),
            has_price: flight.price.is_some(),
            attachments: attachment_views(&flight.attachments),
        })
        .collect();

    let hotels = trip
        .hotels
        .iter()
        .map(|hotel| HotelView {
            id: hotel.id.clone(),
            name: hotel.name.clone(),
            address: hotel.address.clone(),
            stay: format!(
                "{} to {}",
                format_date(&hotel.check_in),
                format_date(&hotel.check_out)
            ),
            confirmation_number: hotel.confirmation_number.clone(),
            has_confirmation: !hotel.confirmation_number.is_empty(),
            room_type: hotel.room_type.clone().unwrap_or_default(),
            has_room_type: hotel.room_type.is_some(),
            notes: hotel.notes_display().to_string(),
            has_notes: hotel.notes.is_some(),
            website: hotel.website.clone().unwrap_or_default(),
            has_website: hotel.website.is_some(),
            phone: hotel.phone.clone().unwrap_or_default(),
            has_phone: hotel.phone.is_some(),
            price: format_money(hotel.price, &hotel.currency),
            has_price: hotel.price.is_some(),
            payment_label: hotel.payment_status.label(),
            payment_value: hotel.payment_status.as_str(),
            attachments: attachment_views(&hotel.attachments),
        })
        .collect();

    let activities = trip
        .activities
        .iter()
        .map(|activity| ActivityView {
            id: activity.id.clone(),
            name: activity.name.clone(),
            location: activity.location.clone(),
            when: format!("{} at {}", format_date(&activity.date), activity.time),
            notes: activity.notes_display().to_string(),
            has_notes: activity.notes.is_some(),
            price: format_money(activity.price, &activity.currency),
            has_price: activity.price.is_some(),
            attachments: attachment_views(&activity.attachments),
        })
        .collect();

    let days = timeline::build_timeline(&trip)
        .into_iter()
        .map(|day| DayView {
            label: format_day_label(&day.date),
            events: day
                .events
                .into_iter()
                .map(|event| EventView {
                    kind: event.kind.as_str(),
                    time: event.time,
                    title: event.title,
                    subtitle: event.subtitle,
                    detail: event.detail.clone().unwrap_or_default(),
                    has_detail: event.detail.is_some(),
                })
                .collect(),
        })
        .collect();

    let report = expenses::summarize(&trip);
    let expense_rows = report
        .items
        .iter()
        .map(|item| ExpenseRow {
            name: item.name.clone(),
            kind_label: item.kind.label(),
            amount: format!("{:.2} {}", item.amount, item.currency),
            pending: format!("{:.2} {}", item.pending, item.currency),
            has_pending: item.pending > 0.0,
            status_label: item.status.label(),
            status_value: item.status.as_str(),
        })
        .collect();
    let currency_totals = report
        .totals
        .iter()
        .map(|total| TotalCard {
            currency: total.currency.clone(),
            total: format!("{:.2} {}", total.total, total.currency),
            paid: format!("{:.2} {}", total.paid, total.currency),
            pending: format!("{:.2} {}", total.pending, total.currency),
            has_pending: total.pending > 0.0,
            paid_percent: format!("{:.0}%", total.paid / total.total * 100.0),
        })
        .collect();

    Ok(AskamaTemplateResponse::into_response(TripDetailTemplate {
        id: trip.id.clone(),
        name: trip.name.clone(),
        destination: trip.destination.clone(),
        dates: format!(
            "{} to {}",
            format_date(&trip.start_date),
            format_date(&trip.end_date)
        ),
        status_label: trip.status.label(),
        has_cover: trip.cover_image.is_some(),
        cover_image: trip.cover_image.clone().unwrap_or_default(),
        flights,
        hotels,
        activities,
        days,
        expense_rows,
        currency_totals,
        has_expenses: !report.items.is_empty(),
    }))
}

fn attachment_views(attachments: &[crate::models::attachment::Attachment]) -> Vec<AttachmentView> {
    attachments
        .iter()
        .map(|attachment| AttachmentView {
            name: attachment.name.clone(),
            kind_label: attachment.kind.label(),
            has_url: attachment.url.is_some(),
            url: attachment.url.clone().unwrap_or_default(),
        })
        .collect()
}

fn format_money(price: Option<f64>, currency: &Option<String>) -> String {
    match price {
        Some(amount) => format!(
            "{amount:.2} {}",
            currency.as_deref().unwrap_or(expenses::DEFAULT_CURRENCY)
        ),
        None => String::new(),
    }
}

/// Dates are stored as entered; anything that does not parse is shown raw.
fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn format_day_label(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| date.format("%A, %d %B %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
