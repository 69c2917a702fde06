#![allow(dead_code)]

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use voyage::{
    expenses::{self, ExpenseReport},
    models::{
        activity::Activity,
        attachment::Attachment,
        flight::{Flight, FlightLeg},
        hotel::{Hotel, PaymentStatus},
        trip::{Trip, TripStatus},
    },
    services::{
        attachments::{AttachmentRegistry, UploadedFile},
        flights::{self, FlightInfo},
        places::{self, PlaceResult},
        store::{ItemKind, TripStore},
    },
    timeline::{self, TimelineDay},
};

#[derive(Debug, cucumber::World, Default)]
struct PlannerWorld {
    state: Option<TestState>,
    trip_id: Option<String>,
    flight_id: Option<String>,
    hotel_id: Option<String>,
    activity_id: Option<String>,
    last_trip: Option<Trip>,
    days: Vec<TimelineDay>,
    report: Option<ExpenseReport>,
    flight_hit: Option<FlightInfo>,
    places: Vec<PlaceResult>,
    uploaded: Vec<Attachment>,
}

#[derive(Debug)]
struct TestState {
    store: TripStore,
    registry: AttachmentRegistry,
    _root: TempDir,
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;
        let store = TripStore::new(root.path().join("data"));
        store.ensure_structure().await?;
        Ok(Self {
            store,
            registry: AttachmentRegistry::new(),
            _root: root,
        })
    }
}

impl PlannerWorld {
    fn store(&self) -> &TripStore {
        &self
            .state
            .as_ref()
            .expect("state must be initialised first")
            .store
    }

    fn registry(&self) -> &AttachmentRegistry {
        &self
            .state
            .as_ref()
            .expect("state must be initialised first")
            .registry
    }

    fn trip_id(&self) -> &str {
        self.trip_id.as_deref().expect("a trip must exist first")
    }

    async fn current_trip(&self) -> Trip {
        self.store()
            .get_trip(self.trip_id())
            .await
            .expect("load current trip")
    }

    fn report(&self) -> &ExpenseReport {
        self.report.as_ref().expect("expenses must be totalled first")
    }
}

// ---- store setup ----

#[given("an empty trip store")]
async fn given_empty_store(world: &mut PlannerWorld) {
    let state = TestState::new().await.expect("state");
    state
        .store
        .save_trips(&[])
        .await
        .expect("persist empty collection");
    world.state = Some(state);
    world.trip_id = None;
}

#[given("a trip store with no persisted document")]
async fn given_unseeded_store(world: &mut PlannerWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.trip_id = None;
}

#[given("a trip store with a corrupt persisted document")]
async fn given_corrupt_store(world: &mut PlannerWorld) {
    let state = TestState::new().await.expect("state");
    std::fs::write(state.store.root().join("trips.json"), b"{definitely not json")
        .expect("write corrupt document");
    world.state = Some(state);
    world.trip_id = None;
}

// ---- trips ----

#[given(regex = r#"^a trip "([^"]+)" to "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn given_trip(
    world: &mut PlannerWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
) {
    create_trip(world, name, destination, start, end).await;
}

#[when(regex = r#"^I create a trip "([^"]+)" to "([^"]+)" from "([^"]+)" to "([^"]+)"$"#)]
async fn when_create_trip(
    world: &mut PlannerWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
) {
    create_trip(world, name, destination, start, end).await;
}

async fn create_trip(
    world: &mut PlannerWorld,
    name: String,
    destination: String,
    start: String,
    end: String,
) {
    let trip = Trip::new(name, destination, start, end, TripStatus::Upcoming);
    let saved = world.store().create_trip(trip).await.expect("create trip");
    world.trip_id = Some(saved.id.clone());
    world.last_trip = Some(saved);
}

#[when(regex = r#"^I mark the trip as "([^"]+)"$"#)]
async fn when_mark_trip(world: &mut PlannerWorld, status: String) {
    let status = TripStatus::parse(&status).expect("known status");
    let updated = world
        .store()
        .set_status(world.trip_id(), status)
        .await
        .expect("set status");
    world.last_trip = Some(updated);
}

#[when("I delete the trip")]
async fn when_delete_trip(world: &mut PlannerWorld) {
    world
        .store()
        .delete_trip(world.trip_id())
        .await
        .expect("delete trip");
}

#[then(regex = r"^the store holds (\d+) trips?$")]
async fn then_store_holds(world: &mut PlannerWorld, expected: usize) {
    let trips = world.store().load_trips().await.expect("load trips");
    assert_eq!(trips.len(), expected);
}

#[then(regex = r#"^the trip "([^"]+)" has status "([^"]+)"$"#)]
async fn then_trip_status(world: &mut PlannerWorld, name: String, status: String) {
    let trips = world.store().load_trips().await.expect("load trips");
    let trip = trips
        .iter()
        .find(|t| t.name == name)
        .expect("trip exists by name");
    assert_eq!(trip.status.as_str(), status);
}

#[then(regex = r#"^the seeded trip "([^"]+)" has (\d+) flights? and (\d+) hotels?$"#)]
async fn then_seeded_trip(world: &mut PlannerWorld, name: String, flights: usize, hotels: usize) {
    let trips = world.store().load_trips().await.expect("load trips");
    let trip = trips
        .iter()
        .find(|t| t.name == name)
        .expect("seeded trip exists");
    assert_eq!(trip.flights.len(), flights);
    assert_eq!(trip.hotels.len(), hotels);
}

#[then("reloading the collection yields the same trip")]
async fn then_round_trip(world: &mut PlannerWorld) {
    let stored = world.current_trip().await;
    let expected = world.last_trip.as_ref().expect("a trip was written");
    assert_eq!(
        serde_json::to_value(&stored).expect("serialize stored trip"),
        serde_json::to_value(expected).expect("serialize written trip"),
    );
}

// ---- flights ----

fn base_flight(
    number: &str,
    dep_date: &str,
    dep_time: &str,
    arr_date: &str,
    arr_time: &str,
) -> Flight {
    Flight::new(
        "Royal Air Maroc",
        number,
        FlightLeg {
            airport: "MAD - Madrid Barajas".to_string(),
            date: dep_date.to_string(),
            time: dep_time.to_string(),
        },
        FlightLeg {
            airport: "CMN - Mohammed V Casablanca".to_string(),
            date: arr_date.to_string(),
            time: arr_time.to_string(),
        },
    )
}

async fn push_flight(world: &mut PlannerWorld, flight: Flight) {
    world.flight_id = Some(flight.id.clone());
    let trip_id = world.trip_id().to_string();
    let updated = world
        .store()
        .add_flight(&trip_id, flight)
        .await
        .expect("add flight");
    world.last_trip = Some(updated);
}

#[when(
    regex = r#"^I add a flight "([^"]+)" departing "([^"]+)" at "([^"]+)" arriving "([^"]+)" at "([^"]+)"$"#
)]
async fn when_add_flight(
    world: &mut PlannerWorld,
    number: String,
    dep_date: String,
    dep_time: String,
    arr_date: String,
    arr_time: String,
) {
    let flight = base_flight(&number, &dep_date, &dep_time, &arr_date, &arr_time);
    push_flight(world, flight).await;
}

#[when(regex = r#"^I add a flight "([^"]+)" priced ([0-9.]+) "([A-Z]+)"$"#)]
async fn when_add_priced_flight(
    world: &mut PlannerWorld,
    number: String,
    price: f64,
    currency: String,
) {
    let mut flight = base_flight(&number, "2026-01-01", "08:00", "2026-01-01", "12:00");
    flight.price = Some(price);
    flight.currency = Some(currency);
    push_flight(world, flight).await;
}

#[when(regex = r#"^I add a flight "([^"]+)" with no price$"#)]
async fn when_add_unpriced_flight(world: &mut PlannerWorld, number: String) {
    let flight = base_flight(&number, "2026-01-01", "08:00", "2026-01-01", "12:00");
    push_flight(world, flight).await;
}

#[when(regex = r#"^I change the flight airline to "([^"]+)"$"#)]
async fn when_change_airline(world: &mut PlannerWorld, airline: String) {
    let trip = world.current_trip().await;
    let flight_id = world.flight_id.clone().expect("a flight was added");
    let original = trip.flight(&flight_id).expect("flight exists").clone();
    // Rebuilt from scratch, the way a form submission arrives.
    let replacement = Flight::new(
        airline,
        original.flight_number.clone(),
        original.departure.clone(),
        original.arrival.clone(),
    );
    let updated = world
        .store()
        .update_flight(&trip.id, &flight_id, replacement)
        .await
        .expect("update flight");
    world.last_trip = Some(updated);
}

#[when("I delete the flight")]
async fn when_delete_flight(world: &mut PlannerWorld) {
    let trip_id = world.trip_id().to_string();
    let flight_id = world.flight_id.clone().expect("a flight was added");
    let updated = world
        .store()
        .delete_flight(&trip_id, &flight_id)
        .await
        .expect("delete flight");
    world.last_trip = Some(updated);
}

#[then(regex = r"^the trip has (\d+) flights?$")]
async fn then_trip_flight_count(world: &mut PlannerWorld, expected: usize) {
    assert_eq!(world.current_trip().await.flights.len(), expected);
}

#[then(regex = r#"^the flight is operated by "([^"]+)"$"#)]
async fn then_flight_airline(world: &mut PlannerWorld, airline: String) {
    let trip = world.current_trip().await;
    let flight_id = world.flight_id.clone().expect("a flight was added");
    let flight = trip.flight(&flight_id).expect("flight kept its id");
    assert_eq!(flight.airline, airline);
}

#[then(regex = r"^the flight carries (\d+) attachments?$")]
async fn then_flight_attachments(world: &mut PlannerWorld, expected: usize) {
    let trip = world.current_trip().await;
    let flight_id = world.flight_id.clone().expect("a flight was added");
    let flight = trip.flight(&flight_id).expect("flight kept its id");
    assert_eq!(flight.attachments.len(), expected);
}

// ---- hotels ----

async fn push_hotel(world: &mut PlannerWorld, hotel: Hotel) {
    world.hotel_id = Some(hotel.id.clone());
    let trip_id = world.trip_id().to_string();
    let updated = world
        .store()
        .add_hotel(&trip_id, hotel)
        .await
        .expect("add hotel");
    world.last_trip = Some(updated);
}

#[when(regex = r#"^I add a hotel "([^"]+)" checking in "([^"]+)" and out "([^"]+)"$"#)]
async fn when_add_hotel(world: &mut PlannerWorld, name: String, check_in: String, check_out: String) {
    let hotel = Hotel::new(name, "1 Main Street, Testville", check_in, check_out);
    push_hotel(world, hotel).await;
}

#[when(regex = r#"^I add a hotel "([^"]+)" priced ([0-9.]+) "([A-Z]+)" with payment "([a-z]+)"$"#)]
async fn when_add_priced_hotel(
    world: &mut PlannerWorld,
    name: String,
    price: f64,
    currency: String,
    payment: String,
) {
    add_priced_hotel(world, name, price, currency, payment, None).await;
}

#[when(
    regex = r#"^I add a hotel "([^"]+)" priced ([0-9.]+) "([A-Z]+)" with payment "([a-z]+)" and pending amount ([0-9.]+)$"#
)]
async fn when_add_partial_hotel(
    world: &mut PlannerWorld,
    name: String,
    price: f64,
    currency: String,
    payment: String,
    pending: f64,
) {
    add_priced_hotel(world, name, price, currency, payment, Some(pending)).await;
}

async fn add_priced_hotel(
    world: &mut PlannerWorld,
    name: String,
    price: f64,
    currency: String,
    payment: String,
    pending: Option<f64>,
) {
    let mut hotel = Hotel::new(name, "1 Main Street, Testville", "2026-01-01", "2026-01-05");
    hotel.price = Some(price);
    hotel.currency = Some(currency);
    hotel.payment_status = PaymentStatus::parse(&payment).expect("known payment status");
    hotel.pending_amount = pending;
    push_hotel(world, hotel).await;
}

#[then(regex = r"^the hotel carries (\d+) attachments?$")]
async fn then_hotel_attachments(world: &mut PlannerWorld, expected: usize) {
    let trip = world.current_trip().await;
    let hotel_id = world.hotel_id.clone().expect("a hotel was added");
    let hotel = trip.hotel(&hotel_id).expect("hotel exists");
    assert_eq!(hotel.attachments.len(), expected);
}

#[then(regex = r#"^the hotel attachment "([^"]+)" has kind "([^"]+)"$"#)]
async fn then_hotel_attachment_kind(world: &mut PlannerWorld, name: String, kind: String) {
    let trip = world.current_trip().await;
    let hotel_id = world.hotel_id.clone().expect("a hotel was added");
    let hotel = trip.hotel(&hotel_id).expect("hotel exists");
    let attachment = hotel
        .attachments
        .iter()
        .find(|a| a.name == name)
        .expect("attachment exists by name");
    assert_eq!(attachment.kind.as_str(), kind);
}

// ---- activities ----

async fn push_activity(world: &mut PlannerWorld, activity: Activity) {
    world.activity_id = Some(activity.id.clone());
    let trip_id = world.trip_id().to_string();
    let updated = world
        .store()
        .add_activity(&trip_id, activity)
        .await
        .expect("add activity");
    world.last_trip = Some(updated);
}

#[when(regex = r#"^I add an activity "([^"]+)" on "([^"]+)" at "([^"]+)"$"#)]
async fn when_add_activity(world: &mut PlannerWorld, name: String, date: String, time: String) {
    let activity = Activity::new(name, "Old Town", date, time);
    push_activity(world, activity).await;
}

#[when(regex = r#"^I add an activity "([^"]+)" priced ([0-9.]+) "([A-Z]+)"$"#)]
async fn when_add_priced_activity(
    world: &mut PlannerWorld,
    name: String,
    price: f64,
    currency: String,
) {
    let mut activity = Activity::new(name, "Old Town", "2026-01-02", "10:00");
    activity.price = Some(price);
    activity.currency = Some(currency);
    push_activity(world, activity).await;
}

#[when(regex = r#"^I add an activity "([^"]+)" priced at zero$"#)]
async fn when_add_zero_priced_activity(world: &mut PlannerWorld, name: String) {
    let mut activity = Activity::new(name, "Old Town", "2026-01-02", "10:00");
    activity.price = Some(0.0);
    activity.currency = Some("EUR".to_string());
    push_activity(world, activity).await;
}

// ---- timeline ----

#[when("I build the timeline")]
async fn when_build_timeline(world: &mut PlannerWorld) {
    let trip = world.current_trip().await;
    world.days = timeline::build_timeline(&trip);
}

#[then(regex = r"^the timeline holds (\d+) events across (\d+) days?$")]
async fn then_timeline_counts(world: &mut PlannerWorld, events: usize, days: usize) {
    let total: usize = world.days.iter().map(|day| day.events.len()).sum();
    assert_eq!(total, events);
    assert_eq!(world.days.len(), days);
}

#[then(regex = r#"^day (\d+) lists times "([^"]*)"$"#)]
async fn then_day_times(world: &mut PlannerWorld, day: usize, expected: String) {
    let day = &world.days[day - 1];
    let times: Vec<&str> = day.events.iter().map(|e| e.time.as_str()).collect();
    assert_eq!(times.join(", "), expected);
}

#[then(regex = r#"^day (\d+) is dated "([^"]+)"$"#)]
async fn then_day_date(world: &mut PlannerWorld, day: usize, expected: String) {
    assert_eq!(world.days[day - 1].date, expected);
}

#[then(regex = r#"^event (\d+) of day (\d+) is an? "([^"]+)"$"#)]
async fn then_event_kind(world: &mut PlannerWorld, event: usize, day: usize, kind: String) {
    let actual = &world.days[day - 1].events[event - 1];
    assert_eq!(actual.kind.as_str(), kind);
}

#[then(regex = r#"^every hotel check-in event carries time "([^"]+)"$"#)]
async fn then_checkin_times(world: &mut PlannerWorld, expected: String) {
    let checkins: Vec<_> = world
        .days
        .iter()
        .flat_map(|day| day.events.iter())
        .filter(|e| e.kind == timeline::EventKind::HotelCheckin)
        .collect();
    assert!(!checkins.is_empty(), "expected at least one check-in event");
    assert!(checkins.iter().all(|e| e.time == expected));
}

#[then(regex = r#"^every hotel check-out event carries time "([^"]+)"$"#)]
async fn then_checkout_times(world: &mut PlannerWorld, expected: String) {
    let checkouts: Vec<_> = world
        .days
        .iter()
        .flat_map(|day| day.events.iter())
        .filter(|e| e.kind == timeline::EventKind::HotelCheckout)
        .collect();
    assert!(!checkouts.is_empty(), "expected at least one check-out event");
    assert!(checkouts.iter().all(|e| e.time == expected));
}

// ---- expenses ----

#[when("I total the expenses")]
async fn when_total_expenses(world: &mut PlannerWorld) {
    let trip = world.current_trip().await;
    world.report = Some(expenses::summarize(&trip));
}

#[then(regex = r"^there are (\d+) expense items?$")]
async fn then_expense_count(world: &mut PlannerWorld, expected: usize) {
    assert_eq!(world.report().items.len(), expected);
}

#[then(regex = r"^there are (\d+) currency totals?$")]
async fn then_total_count(world: &mut PlannerWorld, expected: usize) {
    assert_eq!(world.report().totals.len(), expected);
}

#[then(
    regex = r#"^expense item (\d+) has amount ([0-9.]+) with paid ([0-9.]+) and pending ([0-9.]+)$"#
)]
async fn then_expense_item(
    world: &mut PlannerWorld,
    index: usize,
    amount: f64,
    paid: f64,
    pending: f64,
) {
    let item = &world.report().items[index - 1];
    assert_close(item.amount, amount);
    assert_close(item.paid, paid);
    assert_close(item.pending, pending);
}

#[then(regex = r#"^expense item (\d+) has status "([a-z]+)"$"#)]
async fn then_expense_status(world: &mut PlannerWorld, index: usize, status: String) {
    let item = &world.report().items[index - 1];
    assert_eq!(item.status.as_str(), status);
}

#[then(
    regex = r#"^currency total (\d+) is "([A-Z]+)" totalling ([0-9.]+) with paid ([0-9.]+) and pending ([0-9.]+)$"#
)]
async fn then_currency_total(
    world: &mut PlannerWorld,
    index: usize,
    currency: String,
    total: f64,
    paid: f64,
    pending: f64,
) {
    let entry = &world.report().totals[index - 1];
    assert_eq!(entry.currency, currency);
    assert_close(entry.total, total);
    assert_close(entry.paid, paid);
    assert_close(entry.pending, pending);
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ---- attachments ----

#[when(regex = r#"^I attach "([^"]+)" of type "([^"]+)" to the hotel$"#)]
async fn when_attach_to_hotel(world: &mut PlannerWorld, name: String, media_type: String) {
    let hotel_id = world.hotel_id.clone().expect("a hotel was added");
    attach(world, ItemKind::Hotel, hotel_id, name, media_type).await;
}

#[when(regex = r#"^I attach "([^"]+)" of type "([^"]+)" to the flight$"#)]
async fn when_attach_to_flight(world: &mut PlannerWorld, name: String, media_type: String) {
    let flight_id = world.flight_id.clone().expect("a flight was added");
    attach(world, ItemKind::Flight, flight_id, name, media_type).await;
}

async fn attach(
    world: &mut PlannerWorld,
    kind: ItemKind,
    item_id: String,
    name: String,
    media_type: String,
) {
    let file = UploadedFile {
        name,
        media_type,
        bytes: b"test bytes".to_vec(),
    };
    let attachments = world.registry().register(vec![file]).await;
    world.uploaded.extend(attachments.clone());
    let trip_id = world.trip_id().to_string();
    let updated = world
        .store()
        .add_attachments(&trip_id, kind, &item_id, attachments)
        .await
        .expect("append attachments");
    world.last_trip = Some(updated);
}

#[then("every uploaded blob can be fetched back")]
async fn then_blobs_fetchable(world: &mut PlannerWorld) {
    for attachment in &world.uploaded {
        assert!(
            world.registry().fetch(&attachment.id).await.is_some(),
            "blob {} should be resident",
            attachment.id
        );
    }
}

#[then("a fresh registry knows nothing about the uploaded blobs")]
async fn then_blobs_transient(world: &mut PlannerWorld) {
    let fresh = AttachmentRegistry::new();
    for attachment in &world.uploaded {
        assert!(fresh.fetch(&attachment.id).await.is_none());
    }
}

// ---- place lookup reduction ----

#[when("I reduce a lookup response containing a hotel, a railway station and a hostel")]
async fn when_reduce_places(world: &mut PlannerWorld) {
    let body = r#"[
        {
            "display_name": "Hotel Gracery Shinjuku, 1-19-1, Kabukicho, Shinjuku, Tokyo, Japan",
            "name": "Hotel Gracery Shinjuku",
            "type": "hotel",
            "class": "tourism",
            "extratags": { "phone": "+81 3 6833 1111", "website": "https://gracery.com" }
        },
        {
            "display_name": "Shinjuku Station, Shinjuku, Tokyo, Japan",
            "name": "Shinjuku Station",
            "type": "station",
            "class": "railway"
        },
        {
            "display_name": "Old Town Hostel, 5, Valnu iela, Centrs, Riga, Latvia",
            "type": "guest_house",
            "class": "tourism"
        }
    ]"#;
    world.places = places::reduce_places(body).expect("reduce response");
}

#[when("I reduce a lookup response where the place name runs long")]
async fn when_reduce_long_name(world: &mut PlannerWorld) {
    let body = format!(
        r#"[{{
            "display_name": "Short Segment, Bilbao, Spain",
            "name": "{}",
            "type": "hotel",
            "class": "tourism"
        }}]"#,
        "X".repeat(60)
    );
    world.places = places::reduce_places(&body).expect("reduce response");
}

#[then(regex = r"^(\d+) places? survives? the lodging filter$")]
async fn then_place_count(world: &mut PlannerWorld, expected: usize) {
    assert_eq!(world.places.len(), expected);
}

#[then(regex = r#"^place (\d+) is named "([^"]+)"$"#)]
async fn then_place_name(world: &mut PlannerWorld, index: usize, name: String) {
    assert_eq!(world.places[index - 1].name, name);
}

#[then(regex = r#"^place (\d+) has phone "([^"]+)"$"#)]
async fn then_place_phone(world: &mut PlannerWorld, index: usize, phone: String) {
    assert_eq!(world.places[index - 1].phone.as_deref(), Some(phone.as_str()));
}

#[then(regex = r#"^place (\d+) is a "([^"]+)"$"#)]
async fn then_place_kind(world: &mut PlannerWorld, index: usize, kind: String) {
    assert_eq!(world.places[index - 1].kind, kind);
}

#[then(regex = r#"^place (\d+) sits in city "([^"]+)"$"#)]
async fn then_place_city(world: &mut PlannerWorld, index: usize, city: String) {
    assert_eq!(world.places[index - 1].city, city);
}

// ---- flight lookup ----

#[when(regex = r#"^I look up flight "([^"]*)"$"#)]
async fn when_lookup_flight(world: &mut PlannerWorld, number: String) {
    world.flight_hit = flights::find(&number);
}

#[then(regex = r#"^the lookup finds airline "([^"]+)" departing from "([^"]+)"$"#)]
async fn then_lookup_hit(world: &mut PlannerWorld, airline: String, airport: String) {
    let info = world.flight_hit.as_ref().expect("lookup should match");
    assert_eq!(info.airline, airline);
    assert_eq!(info.departure_airport, airport);
}

#[then("the lookup comes back empty")]
async fn then_lookup_miss(world: &mut PlannerWorld) {
    assert!(world.flight_hit.is_none());
}

#[tokio::main]
async fn main() {
    PlannerWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
