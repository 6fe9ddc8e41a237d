//! Test fixtures for building flight datasets

use chrono::NaiveDate;

use crate::models::{Dataset, FlightRecord, NewFlightRecord};

/// Parse a YYYY-MM-DD date, panicking on bad input
pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A valid flight on a weekday in March 2025
pub fn flight(origin: &str, destination: &str, airline: &str, price: f64, demand: f64) -> FlightRecord {
    flight_on(origin, destination, airline, price, demand, "2025-03-04")
}

/// A valid flight on the given date
pub fn flight_on(
    origin: &str,
    destination: &str,
    airline: &str,
    price: f64,
    demand: f64,
    date: &str,
) -> FlightRecord {
    FlightRecord::new(origin, destination, airline, price, day(date), demand).unwrap()
}

/// A valid flight with seat availability
pub fn flight_with_seats(
    origin: &str,
    destination: &str,
    airline: &str,
    price: f64,
    demand: f64,
    seats: u32,
) -> FlightRecord {
    NewFlightRecord::new(origin, destination, airline, price, day("2025-03-04"), demand)
        .with_availability(seats)
        .validate()
        .unwrap()
}

/// `count` identical flights on one route
pub fn repeated(count: usize, price: f64, demand: f64) -> Dataset {
    Dataset::new(
        (0..count)
            .map(|_| flight("Sydney", "Melbourne", "Qantas", price, demand))
            .collect(),
    )
}
