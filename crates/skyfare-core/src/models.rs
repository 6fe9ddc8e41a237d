//! Data models for flight pricing records and datasets
//!
//! A [`FlightRecord`] can only be built through [`NewFlightRecord::validate`],
//! so every record in a [`Dataset`] satisfies the price and demand invariants.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Separator between origin and destination in a route string
pub const ROUTE_SEPARATOR: &str = " - ";

/// Booking class used when none is supplied
pub const DEFAULT_BOOKING_CLASS: &str = "Economy";

/// Named columns of the flight dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Route,
    Origin,
    Destination,
    Airline,
    Price,
    Date,
    DemandScore,
    Availability,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Route => "route",
            Column::Origin => "origin",
            Column::Destination => "destination",
            Column::Airline => "airline",
            Column::Price => "price",
            Column::Date => "date",
            Column::DemandScore => "demand_score",
            Column::Availability => "availability",
        }
    }

    /// Columns every flight record carries
    pub fn mandatory() -> &'static [Column] {
        &[
            Column::Route,
            Column::Origin,
            Column::Destination,
            Column::Airline,
            Column::Price,
            Column::Date,
            Column::DemandScore,
        ]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "route" => Ok(Column::Route),
            "origin" => Ok(Column::Origin),
            "destination" => Ok(Column::Destination),
            "airline" => Ok(Column::Airline),
            "price" => Ok(Column::Price),
            "date" => Ok(Column::Date),
            "demand_score" => Ok(Column::DemandScore),
            "availability" => Ok(Column::Availability),
            _ => Err(format!("Unknown column: {}", s)),
        }
    }
}

/// Unvalidated flight record as supplied by an importer or collector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFlightRecord {
    /// "Origin - Destination"; derived from origin/destination when absent
    pub route: Option<String>,
    pub origin: String,
    pub destination: String,
    pub airline: String,
    pub price: f64,
    pub date: NaiveDate,
    pub demand_score: f64,
    pub availability: Option<u32>,
    pub flight_number: Option<String>,
    pub aircraft_type: Option<String>,
    /// Flight duration in minutes
    pub duration: Option<u32>,
    /// Great-circle distance in kilometers
    pub distance: Option<f64>,
    pub booking_class: Option<String>,
}

impl NewFlightRecord {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        airline: impl Into<String>,
        price: f64,
        date: NaiveDate,
        demand_score: f64,
    ) -> Self {
        Self {
            route: None,
            origin: origin.into(),
            destination: destination.into(),
            airline: airline.into(),
            price,
            date,
            demand_score,
            availability: None,
            flight_number: None,
            aircraft_type: None,
            duration: None,
            distance: None,
            booking_class: None,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_availability(mut self, seats: u32) -> Self {
        self.availability = Some(seats);
        self
    }

    pub fn with_flight_number(mut self, flight_number: impl Into<String>) -> Self {
        self.flight_number = Some(flight_number.into());
        self
    }

    pub fn with_aircraft_type(mut self, aircraft_type: impl Into<String>) -> Self {
        self.aircraft_type = Some(aircraft_type.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_distance(mut self, km: f64) -> Self {
        self.distance = Some(km);
        self
    }

    pub fn with_booking_class(mut self, class: impl Into<String>) -> Self {
        self.booking_class = Some(class.into());
        self
    }

    /// Check invariants and produce an immutable record
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(self) -> Result<FlightRecord> {
        let origin = non_empty("origin", self.origin)?;
        let destination = non_empty("destination", self.destination)?;
        let airline = non_empty("airline", self.airline)?;

        let route = match self.route {
            Some(route) => {
                let route = non_empty("route", route)?;
                match route.split_once(ROUTE_SEPARATOR) {
                    Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => route,
                    _ => {
                        return Err(Error::Validation(format!(
                            "route '{}' is not in 'Origin{}Destination' form",
                            route, ROUTE_SEPARATOR
                        )))
                    }
                }
            }
            None => FlightRecord::route_key(&origin, &destination),
        };

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::Validation(format!(
                "price cannot be negative (got {})",
                self.price
            )));
        }

        if !(0.0..=1.0).contains(&self.demand_score) {
            return Err(Error::Validation(format!(
                "demand score must be between 0 and 1 (got {})",
                self.demand_score
            )));
        }

        if let Some(distance) = self.distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err(Error::Validation(format!(
                    "distance cannot be negative (got {})",
                    distance
                )));
            }
        }

        Ok(FlightRecord {
            route,
            origin,
            destination,
            airline,
            price: self.price,
            date: self.date,
            demand_score: self.demand_score,
            availability: self.availability,
            flight_number: self.flight_number.filter(|s| !s.trim().is_empty()),
            aircraft_type: self.aircraft_type.filter(|s| !s.trim().is_empty()),
            duration: self.duration,
            distance: self.distance,
            booking_class: self
                .booking_class
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BOOKING_CLASS.to_string()),
        })
    }
}

fn non_empty(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// A validated flight pricing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewFlightRecord")]
pub struct FlightRecord {
    route: String,
    origin: String,
    destination: String,
    airline: String,
    price: f64,
    date: NaiveDate,
    demand_score: f64,
    availability: Option<u32>,
    flight_number: Option<String>,
    aircraft_type: Option<String>,
    duration: Option<u32>,
    distance: Option<f64>,
    booking_class: String,
}

impl TryFrom<NewFlightRecord> for FlightRecord {
    type Error = Error;

    fn try_from(new: NewFlightRecord) -> Result<Self> {
        new.validate()
    }
}

impl FlightRecord {
    /// Build and validate a record with the mandatory fields only
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        airline: impl Into<String>,
        price: f64,
        date: NaiveDate,
        demand_score: f64,
    ) -> Result<Self> {
        NewFlightRecord::new(origin, destination, airline, price, date, demand_score).validate()
    }

    /// Format the route string for an origin/destination pair
    pub fn route_key(origin: &str, destination: &str) -> String {
        format!("{}{}{}", origin, ROUTE_SEPARATOR, destination)
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn demand_score(&self) -> f64 {
        self.demand_score
    }

    pub fn availability(&self) -> Option<u32> {
        self.availability
    }

    pub fn flight_number(&self) -> Option<&str> {
        self.flight_number.as_deref()
    }

    pub fn aircraft_type(&self) -> Option<&str> {
        self.aircraft_type.as_deref()
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn booking_class(&self) -> &str {
        &self.booking_class
    }

    fn hash_into(&self, hasher: &mut Sha256) {
        for text in [
            self.route.as_str(),
            self.origin.as_str(),
            self.destination.as_str(),
            self.airline.as_str(),
            self.booking_class.as_str(),
        ] {
            hasher.update(text.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(self.price.to_be_bytes());
        hasher.update(self.date.to_string().as_bytes());
        hasher.update(self.demand_score.to_be_bytes());
        match self.availability {
            Some(seats) => {
                hasher.update([1u8]);
                hasher.update(seats.to_be_bytes());
            }
            None => hasher.update([0u8]),
        }
        if let Some(number) = &self.flight_number {
            hasher.update(number.as_bytes());
        }
        hasher.update([0u8]);
    }
}

/// Criteria for narrowing a dataset
#[derive(Debug, Clone, Default)]
pub struct FlightFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub airline: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Inclusive
    pub date_from: Option<NaiveDate>,
    /// Inclusive
    pub date_to: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl FlightFilter {
    pub fn matches(&self, record: &FlightRecord) -> bool {
        if let Some(origin) = &self.origin {
            if record.origin() != origin {
                return false;
            }
        }
        if let Some(destination) = &self.destination {
            if record.destination() != destination {
                return false;
            }
        }
        if let Some(airline) = &self.airline {
            if record.airline() != airline {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if record.price() < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if record.price() > max {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if record.date() < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if record.date() > to {
                return false;
            }
        }
        true
    }
}

/// An ordered, read-only table of flight records with an explicit schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<FlightRecord>,
    columns: BTreeSet<Column>,
}

impl Dataset {
    /// Build a dataset; `availability` is part of the schema only if some
    /// record carries a value for it
    pub fn new(records: Vec<FlightRecord>) -> Self {
        let mut columns: BTreeSet<Column> = Column::mandatory().iter().copied().collect();
        if records.iter().any(|r| r.availability.is_some()) {
            columns.insert(Column::Availability);
        }
        Self { records, columns }
    }

    /// Projection of this dataset without the given column
    pub fn without_column(mut self, column: Column) -> Self {
        self.columns.remove(&column);
        self
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Fail with [`Error::MissingColumn`] unless the column is present
    pub fn require(&self, column: Column) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(Error::MissingColumn(column))
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    pub fn records(&self) -> &[FlightRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn prices(&self) -> Result<Vec<f64>> {
        self.require(Column::Price)?;
        Ok(self.records.iter().map(|r| r.price).collect())
    }

    pub fn demand_scores(&self) -> Result<Vec<f64>> {
        self.require(Column::DemandScore)?;
        Ok(self.records.iter().map(|r| r.demand_score).collect())
    }

    /// Seat availability per record (`None` where a record has no value)
    pub fn availability(&self) -> Result<Vec<Option<u32>>> {
        self.require(Column::Availability)?;
        Ok(self.records.iter().map(|r| r.availability).collect())
    }

    /// Records matching the filter, keeping this dataset's schema
    pub fn filter(&self, filter: &FlightFilter) -> Dataset {
        let matching = self.records.iter().filter(|r| filter.matches(r)).cloned();
        let records = match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        };
        Dataset {
            records,
            columns: self.columns.clone(),
        }
    }

    /// SHA-256 over schema and records, sensitive to record order
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for column in &self.columns {
            hasher.update(column.as_str().as_bytes());
            hasher.update([0u8]);
        }
        hasher.update((self.records.len() as u64).to_be_bytes());
        for record in &self.records {
            record.hash_into(&mut hasher);
        }
        hex::encode(hasher.finalize())
    }
}

impl FromIterator<FlightRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = FlightRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
