use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{
        activity::Activity,
        flight::{Flight, FlightLeg},
        hotel::{Hotel, PaymentStatus},
    },
    services::{flights as flight_lookup, places::PlaceResult},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/trips/:id/flights/new",
            get(flight_new_form).post(flight_new_submit),
        )
        .route(
            "/trips/:id/flights/:flight_id/edit",
            get(flight_edit_form).post(flight_edit_submit),
        )
        .route("/trips/:id/flights/:flight_id/delete", post(flight_delete))
        .route(
            "/trips/:id/hotels/new",
            get(hotel_new_form).post(hotel_new_submit),
        )
        .route(
            "/trips/:id/hotels/:hotel_id/edit",
            get(hotel_edit_form).post(hotel_edit_submit),
        )
        .route("/trips/:id/hotels/:hotel_id/delete", post(hotel_delete))
        .route(
            "/trips/:id/activities/new",
            get(activity_new_form).post(activity_new_submit),
        )
        .route(
            "/trips/:id/activities/:activity_id/edit",
            get(activity_edit_form).post(activity_edit_submit),
        )
        .route(
            "/trips/:id/activities/:activity_id/delete",
            post(activity_delete),
        )
}

// ---- flights ----

#[derive(Template)]
#[template(path = "flight_form.html")]
struct FlightFormTemplate {
    trip_id: String,
    action: String,
    heading: &'static str,
    lookup_hit: bool,
    airline: String,
    flight_number: String,
    departure_airport: String,
    departure_date: String,
    departure_time: String,
    arrival_airport: String,
    arrival_date: String,
    arrival_time: String,
    notes: String,
    price: String,
    currency: String,
}

impl FlightFormTemplate {
    fn empty(trip_id: String) -> Self {
        let action = format!("/trips/{trip_id}/flights/new");
        Self {
            trip_id,
            action,
            heading: "New flight",
            lookup_hit: false,
            airline: String::new(),
            flight_number: String::new(),
            departure_airport: String::new(),
            departure_date: String::new(),
            departure_time: String::new(),
            arrival_airport: String::new(),
            arrival_date: String::new(),
            arrival_time: String::new(),
            notes: String::new(),
            price: String::new(),
            currency: "EUR".to_string(),
        }
    }
}

#[derive(Deserialize)]
struct FlightLookupQuery {
    lookup: Option<String>,
}

async fn flight_new_form(
    Path(trip_id): Path<String>,
    Query(query): Query<FlightLookupQuery>,
) -> impl IntoResponse {
    let mut page = FlightFormTemplate::empty(trip_id);
    if let Some(number) = query.lookup.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        // Simulated provider latency, same as a real timetable call.
        tokio::time::sleep(flight_lookup::LOOKUP_DELAY).await;
        page.flight_number = number.to_uppercase();
        if let Some(info) = flight_lookup::find(number) {
            page.lookup_hit = true;
            page.airline = info.airline.to_string();
            page.departure_airport = info.departure_airport.to_string();
            page.departure_time = info.departure_time.to_string();
            page.arrival_airport = info.arrival_airport.to_string();
            page.arrival_time = info.arrival_time.to_string();
        }
    }
    AskamaTemplateResponse::into_response(page)
}

#[derive(Deserialize)]
struct FlightForm {
    airline: String,
    flight_number: String,
    departure_airport: String,
    departure_date: String,
    departure_time: String,
    arrival_airport: String,
    arrival_date: String,
    arrival_time: String,
    notes: Option<String>,
    price: Option<String>,
    currency: Option<String>,
}

impl FlightForm {
    fn into_flight(self) -> Flight {
        let mut flight = Flight::new(
            self.airline,
            self.flight_number.to_uppercase(),
            FlightLeg {
                airport: self.departure_airport,
                date: self.departure_date,
                time: self.departure_time,
            },
            FlightLeg {
                airport: self.arrival_airport,
                date: self.arrival_date,
                time: self.arrival_time,
            },
        );
        flight.notes = normalize_optional(self.notes);
        flight.price = parse_price(self.price);
        flight.currency = normalize_optional(self.currency);
        flight
    }
}

async fn flight_new_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<FlightForm>,
) -> Result<Redirect, AppError> {
    state.store.add_flight(&trip_id, form.into_flight()).await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn flight_edit_form(
    State(state): State<AppState>,
    Path((trip_id, flight_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get_trip(&trip_id).await?;
    let flight = trip.flight(&flight_id).ok_or(AppError::NotFound)?;
    let mut page = FlightFormTemplate::empty(trip_id.clone());
    page.action = format!("/trips/{trip_id}/flights/{flight_id}/edit");
    page.heading = "Edit flight";
    page.airline = flight.airline.clone();
    page.flight_number = flight.flight_number.clone();
    page.departure_airport = flight.departure.airport.clone();
    page.departure_date = flight.departure.date.clone();
    page.departure_time = flight.departure.time.clone();
    page.arrival_airport = flight.arrival.airport.clone();
    page.arrival_date = flight.arrival.date.clone();
    page.arrival_time = flight.arrival.time.clone();
    page.notes = flight.notes_display().to_string();
    page.price = flight.price.map(|p| p.to_string()).unwrap_or_default();
    page.currency = flight.currency.clone().unwrap_or_else(|| "EUR".to_string());
    Ok(AskamaTemplateResponse::into_response(page))
}

async fn flight_edit_submit(
    State(state): State<AppState>,
    Path((trip_id, flight_id)): Path<(String, String)>,
    Form(form): Form<FlightForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update_flight(&trip_id, &flight_id, form.into_flight())
        .await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn flight_delete(
    State(state): State<AppState>,
    Path((trip_id, flight_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    state.store.delete_flight(&trip_id, &flight_id).await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

// ---- hotels ----

#[derive(Clone)]
struct SuggestionView {
    name: String,
    address: String,
    kind: String,
    city: String,
    prefill_href: String,
}

#[derive(Template)]
#[template(path = "hotel_form.html")]
struct HotelFormTemplate {
    trip_id: String,
    action: String,
    heading: &'static str,
    search_query: String,
    message: String,
    has_message: bool,
    suggestions: Vec<SuggestionView>,
    name: String,
    address: String,
    check_in: String,
    check_out: String,
    confirmation_number: String,
    room_type: String,
    notes: String,
    price: String,
    currency: String,
    payment_value: &'static str,
    pending_amount: String,
    website: String,
    phone: String,
}

impl HotelFormTemplate {
    fn empty(trip_id: String) -> Self {
        let action = format!("/trips/{trip_id}/hotels/new");
        Self {
            trip_id,
            action,
            heading: "New accommodation",
            search_query: String::new(),
            message: String::new(),
            has_message: false,
            suggestions: Vec::new(),
            name: String::new(),
            address: String::new(),
            check_in: String::new(),
            check_out: String::new(),
            confirmation_number: String::new(),
            room_type: String::new(),
            notes: String::new(),
            price: String::new(),
            currency: "EUR".to_string(),
            payment_value: "pending",
            pending_amount: String::new(),
            website: String::new(),
            phone: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct HotelFormQuery {
    search: Option<String>,
    name: Option<String>,
    address: Option<String>,
    phone: Option<String>,
    website: Option<String>,
}

async fn hotel_new_form(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Query(query): Query<HotelFormQuery>,
) -> impl IntoResponse {
    let mut page = HotelFormTemplate::empty(trip_id.clone());

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let outcome = state.places.search(search).await;
        page.search_query = search.to_string();
        page.name = search.to_string();
        page.has_message = outcome.message.is_some();
        page.message = outcome.message.unwrap_or_default();
        page.suggestions = outcome
            .results
            .iter()
            .map(|place| suggestion_view(&trip_id, place))
            .collect();
    }

    // A picked suggestion comes back as plain query parameters.
    if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
        page.name = name.to_string();
        page.search_query = name.to_string();
    }
    if let Some(address) = query.address {
        page.address = address;
    }
    if let Some(phone) = query.phone {
        page.phone = phone;
    }
    if let Some(website) = query.website {
        page.website = website;
    }

    AskamaTemplateResponse::into_response(page)
}

fn suggestion_view(trip_id: &str, place: &PlaceResult) -> SuggestionView {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("name", &place.name);
    params.append_pair("address", &place.address);
    if let Some(phone) = place.phone.as_deref() {
        params.append_pair("phone", phone);
    }
    if let Some(website) = place.website.as_deref() {
        params.append_pair("website", website);
    }
    SuggestionView {
        name: place.name.clone(),
        address: place.address.clone(),
        kind: place.kind.clone(),
        city: place.city.clone(),
        prefill_href: format!("/trips/{trip_id}/hotels/new?{}", params.finish()),
    }
}

#[derive(Deserialize)]
struct HotelForm {
    name: String,
    address: String,
    check_in: String,
    check_out: String,
    confirmation_number: Option<String>,
    room_type: Option<String>,
    notes: Option<String>,
    price: Option<String>,
    currency: Option<String>,
    payment_status: Option<String>,
    pending_amount: Option<String>,
    website: Option<String>,
    phone: Option<String>,
}

impl HotelForm {
    fn into_hotel(self) -> Hotel {
        let mut hotel = Hotel::new(self.name, self.address, self.check_in, self.check_out);
        hotel.confirmation_number = self
            .confirmation_number
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        hotel.room_type = normalize_optional(self.room_type);
        hotel.notes = normalize_optional(self.notes);
        hotel.website = normalize_optional(self.website);
        hotel.phone = normalize_optional(self.phone);
        hotel.price = parse_price(self.price);
        hotel.currency = normalize_optional(self.currency);
        hotel.payment_status = self
            .payment_status
            .as_deref()
            .and_then(PaymentStatus::parse)
            .unwrap_or_default();
        hotel.pending_amount = parse_price(self.pending_amount);
        hotel
    }
}

async fn hotel_new_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<HotelForm>,
) -> Result<Redirect, AppError> {
    state.store.add_hotel(&trip_id, form.into_hotel()).await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn hotel_edit_form(
    State(state): State<AppState>,
    Path((trip_id, hotel_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get_trip(&trip_id).await?;
    let hotel = trip.hotel(&hotel_id).ok_or(AppError::NotFound)?;
    let mut page = HotelFormTemplate::empty(trip_id.clone());
    page.action = format!("/trips/{trip_id}/hotels/{hotel_id}/edit");
    page.heading = "Edit accommodation";
    page.search_query = hotel.name.clone();
    page.name = hotel.name.clone();
    page.address = hotel.address.clone();
    page.check_in = hotel.check_in.clone();
    page.check_out = hotel.check_out.clone();
    page.confirmation_number = hotel.confirmation_number.clone();
    page.room_type = hotel.room_type.clone().unwrap_or_default();
    page.notes = hotel.notes_display().to_string();
    page.price = hotel.price.map(|p| p.to_string()).unwrap_or_default();
    page.currency = hotel.currency.clone().unwrap_or_else(|| "EUR".to_string());
    page.payment_value = hotel.payment_status.as_str();
    page.pending_amount = hotel
        .pending_amount
        .map(|p| p.to_string())
        .unwrap_or_default();
    page.website = hotel.website.clone().unwrap_or_default();
    page.phone = hotel.phone.clone().unwrap_or_default();
    Ok(AskamaTemplateResponse::into_response(page))
}

async fn hotel_edit_submit(
    State(state): State<AppState>,
    Path((trip_id, hotel_id)): Path<(String, String)>,
    Form(form): Form<HotelForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update_hotel(&trip_id, &hotel_id, form.into_hotel())
        .await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn hotel_delete(
    State(state): State<AppState>,
    Path((trip_id, hotel_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    state.store.delete_hotel(&trip_id, &hotel_id).await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

// ---- activities ----

#[derive(Template)]
#[template(path = "activity_form.html")]
struct ActivityFormTemplate {
    trip_id: String,
    action: String,
    heading: &'static str,
    name: String,
    location: String,
    date: String,
    time: String,
    notes: String,
    price: String,
    currency: String,
}

impl ActivityFormTemplate {
    fn empty(trip_id: String) -> Self {
        let action = format!("/trips/{trip_id}/activities/new");
        Self {
            trip_id,
            action,
            heading: "New activity",
            name: String::new(),
            location: String::new(),
            date: String::new(),
            time: String::new(),
            notes: String::new(),
            price: String::new(),
            currency: "EUR".to_string(),
        }
    }
}

async fn activity_new_form(Path(trip_id): Path<String>) -> impl IntoResponse {
    AskamaTemplateResponse::into_response(ActivityFormTemplate::empty(trip_id))
}

#[derive(Deserialize)]
struct ActivityForm {
    name: String,
    location: String,
    date: String,
    time: String,
    notes: Option<String>,
    price: Option<String>,
    currency: Option<String>,
}

impl ActivityForm {
    fn into_activity(self) -> Activity {
        let mut activity = Activity::new(self.name, self.location, self.date, self.time);
        activity.notes = normalize_optional(self.notes);
        activity.price = parse_price(self.price);
        activity.currency = normalize_optional(self.currency);
        activity
    }
}

async fn activity_new_submit(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    Form(form): Form<ActivityForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .add_activity(&trip_id, form.into_activity())
        .await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn activity_edit_form(
    State(state): State<AppState>,
    Path((trip_id, activity_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state.store.get_trip(&trip_id).await?;
    let activity = trip.activity(&activity_id).ok_or(AppError::NotFound)?;
    let mut page = ActivityFormTemplate::empty(trip_id.clone());
    page.action = format!("/trips/{trip_id}/activities/{activity_id}/edit");
    page.heading = "Edit activity";
    page.name = activity.name.clone();
    page.location = activity.location.clone();
    page.date = activity.date.clone();
    page.time = activity.time.clone();
    page.notes = activity.notes_display().to_string();
    page.price = activity.price.map(|p| p.to_string()).unwrap_or_default();
    page.currency = activity
        .currency
        .clone()
        .unwrap_or_else(|| "EUR".to_string());
    Ok(AskamaTemplateResponse::into_response(page))
}

async fn activity_edit_submit(
    State(state): State<AppState>,
    Path((trip_id, activity_id)): Path<(String, String)>,
    Form(form): Form<ActivityForm>,
) -> Result<Redirect, AppError> {
    state
        .store
        .update_activity(&trip_id, &activity_id, form.into_activity())
        .await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

async fn activity_delete(
    State(state): State<AppState>,
    Path((trip_id, activity_id)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    state.store.delete_activity(&trip_id, &activity_id).await?;
    Ok(Redirect::to(&format!("/trips/{trip_id}")))
}

// ---- shared form helpers ----

fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Bad numeric input means "no price", never an error; unpriced items are
/// simply left out of the expense rollup.
fn parse_price(input: Option<String>) -> Option<f64> {
    input.and_then(|value| value.trim().parse::<f64>().ok())
}
