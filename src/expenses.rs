//! Expense rollup over a trip. A pure projection: safe to call on every
//! render, never mutates or caches anything.

use std::cmp::Ordering;

use crate::models::{
    activity::Activity,
    flight::Flight,
    hotel::{Hotel, PaymentStatus},
    trip::Trip,
};

/// Items without an explicit currency land in this bucket.
pub const DEFAULT_CURRENCY: &str = "EUR";

#[derive(Debug, Clone)]
pub struct ExpenseItem {
    pub id: String,
    pub name: String,
    pub kind: ExpenseKind,
    pub amount: f64,
    pub currency: String,
    pub paid: f64,
    pub pending: f64,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseKind {
    Flight,
    Hotel,
    Activity,
}

impl ExpenseKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Hotel => "Hotel",
            Self::Activity => "Activity",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CurrencyTotal {
    pub currency: String,
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseReport {
    pub items: Vec<ExpenseItem>,
    pub totals: Vec<CurrencyTotal>,
}

/// Collects every priced flight, hotel and activity and sums them per
/// currency. Items whose price is absent, zero or negative are skipped.
pub fn summarize(trip: &Trip) -> ExpenseReport {
    let mut items = Vec::new();
    items.extend(trip.flights.iter().filter_map(ExpenseItem::from_flight));
    items.extend(trip.hotels.iter().filter_map(ExpenseItem::from_hotel));
    items.extend(trip.activities.iter().filter_map(ExpenseItem::from_activity));

    let mut totals: Vec<CurrencyTotal> = Vec::new();
    for item in &items {
        // Exact string match on the currency code; discovery order is kept
        // for ties in the sort below.
        match totals.iter_mut().find(|t| t.currency == item.currency) {
            Some(total) => {
                total.total += item.amount;
                total.paid += item.paid;
                total.pending += item.pending;
            }
            None => totals.push(CurrencyTotal {
                currency: item.currency.clone(),
                total: item.amount,
                paid: item.paid,
                pending: item.pending,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    ExpenseReport { items, totals }
}

impl ExpenseItem {
    /// A priced flight counts as settled in full; flights carry no payment
    /// state of their own.
    fn from_flight(flight: &Flight) -> Option<Self> {
        let amount = priced(flight.price)?;
        Some(Self {
            id: flight.id.clone(),
            name: flight.title(),
            kind: ExpenseKind::Flight,
            amount,
            currency: currency_or_default(&flight.currency),
            paid: amount,
            pending: 0.0,
            status: PaymentStatus::Paid,
        })
    }

    fn from_hotel(hotel: &Hotel) -> Option<Self> {
        let amount = priced(hotel.price)?;
        let (paid, pending) = match hotel.payment_status {
            PaymentStatus::Paid => (amount, 0.0),
            PaymentStatus::Partial => {
                let outstanding = hotel.pending_amount.unwrap_or(0.0);
                (amount - outstanding, outstanding)
            }
            PaymentStatus::Pending => (0.0, amount),
        };
        Some(Self {
            id: hotel.id.clone(),
            name: hotel.name.clone(),
            kind: ExpenseKind::Hotel,
            amount,
            currency: currency_or_default(&hotel.currency),
            paid,
            pending,
            status: hotel.payment_status,
        })
    }

    /// Same rule as flights: a price on an activity means it was paid.
    fn from_activity(activity: &Activity) -> Option<Self> {
        let amount = priced(activity.price)?;
        Some(Self {
            id: activity.id.clone(),
            name: activity.name.clone(),
            kind: ExpenseKind::Activity,
            amount,
            currency: currency_or_default(&activity.currency),
            paid: amount,
            pending: 0.0,
            status: PaymentStatus::Paid,
        })
    }
}

fn priced(price: Option<f64>) -> Option<f64> {
    price.filter(|value| *value > 0.0)
}

fn currency_or_default(currency: &Option<String>) -> String {
    currency
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_string()
}
