//! Stand-in for a real airline timetable API: a fixed table of known
//! flights, looked up by number.

use std::time::Duration;

/// The lookup route sleeps this long before answering, mimicking a slow
/// upstream provider.
pub const LOOKUP_DELAY: Duration = Duration::from_millis(800);

const MIN_QUERY_LEN: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct FlightInfo {
    pub airline: &'static str,
    pub departure_airport: &'static str,
    pub departure_time: &'static str,
    pub arrival_airport: &'static str,
    pub arrival_time: &'static str,
}

const KNOWN_FLIGHTS: &[(&str, FlightInfo)] = &[
    (
        "IB6250",
        FlightInfo {
            airline: "Iberia",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "14:30",
            arrival_airport: "CDG - Charles de Gaulle",
            arrival_time: "16:45",
        },
    ),
    (
        "IB1626",
        FlightInfo {
            airline: "Iberia",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "08:15",
            arrival_airport: "CMN - Mohammed V Casablanca",
            arrival_time: "09:45",
        },
    ),
    (
        "AT970",
        FlightInfo {
            airline: "Royal Air Maroc",
            departure_airport: "CMN - Mohammed V Casablanca",
            departure_time: "11:30",
            arrival_airport: "MAD - Madrid Barajas",
            arrival_time: "15:15",
        },
    ),
    (
        "AT971",
        FlightInfo {
            airline: "Royal Air Maroc",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "16:45",
            arrival_airport: "CMN - Mohammed V Casablanca",
            arrival_time: "18:15",
        },
    ),
    (
        "VY7822",
        FlightInfo {
            airline: "Vueling",
            departure_airport: "BCN - Barcelona El Prat",
            departure_time: "07:20",
            arrival_airport: "RAK - Marrakech Menara",
            arrival_time: "08:50",
        },
    ),
    (
        "FR1902",
        FlightInfo {
            airline: "Ryanair",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "06:30",
            arrival_airport: "FEZ - Fez Saiss",
            arrival_time: "08:00",
        },
    ),
    (
        "JL414",
        FlightInfo {
            airline: "Japan Airlines",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "14:30",
            arrival_airport: "NRT - Narita International",
            arrival_time: "09:45+1",
        },
    ),
    (
        "BA456",
        FlightInfo {
            airline: "British Airways",
            departure_airport: "LHR - London Heathrow",
            departure_time: "10:15",
            arrival_airport: "JFK - John F. Kennedy",
            arrival_time: "13:30",
        },
    ),
    (
        "LH441",
        FlightInfo {
            airline: "Lufthansa",
            departure_airport: "FRA - Frankfurt",
            departure_time: "08:20",
            arrival_airport: "LAX - Los Angeles",
            arrival_time: "11:45",
        },
    ),
    (
        "AF1234",
        FlightInfo {
            airline: "Air France",
            departure_airport: "CDG - Charles de Gaulle",
            departure_time: "19:30",
            arrival_airport: "NRT - Narita International",
            arrival_time: "14:20+1",
        },
    ),
    (
        "EK142",
        FlightInfo {
            airline: "Emirates",
            departure_airport: "DXB - Dubai International",
            departure_time: "03:35",
            arrival_airport: "MAD - Madrid Barajas",
            arrival_time: "08:55",
        },
    ),
    (
        "QR150",
        FlightInfo {
            airline: "Qatar Airways",
            departure_airport: "DOH - Hamad International",
            departure_time: "02:10",
            arrival_airport: "BCN - Barcelona El Prat",
            arrival_time: "07:25",
        },
    ),
    (
        "TK1856",
        FlightInfo {
            airline: "Turkish Airlines",
            departure_airport: "IST - Istanbul Airport",
            departure_time: "13:45",
            arrival_airport: "CMN - Mohammed V Casablanca",
            arrival_time: "17:30",
        },
    ),
    (
        "UX045",
        FlightInfo {
            airline: "Air Europa",
            departure_airport: "MAD - Madrid Barajas",
            departure_time: "23:55",
            arrival_airport: "CUN - Cancun",
            arrival_time: "05:30+1",
        },
    ),
];

/// Case-insensitive lookup by flight number. Queries shorter than four
/// characters never match; the form keeps typing.
pub fn find(flight_number: &str) -> Option<FlightInfo> {
    let number = flight_number.trim().to_uppercase();
    if number.chars().count() < MIN_QUERY_LEN {
        return None;
    }
    KNOWN_FLIGHTS
        .iter()
        .find(|(known, _)| *known == number)
        .map(|(_, info)| *info)
}
