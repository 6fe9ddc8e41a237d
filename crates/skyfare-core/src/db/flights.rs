//! Flight record database operations

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

use super::{days_ago, Database};
use crate::error::{Error, Result};
use crate::models::{Dataset, FlightFilter, FlightRecord, NewFlightRecord};

const FLIGHT_COLUMNS: &str = "route, origin, destination, airline, price, date, demand_score, \
     flight_number, aircraft_type, duration, distance, booking_class, availability";

/// A flight row as stored, before validation
struct FlightRow {
    route: String,
    origin: String,
    destination: String,
    airline: String,
    price: f64,
    date: String,
    demand_score: f64,
    flight_number: String,
    aircraft_type: Option<String>,
    duration: Option<i64>,
    distance: Option<f64>,
    booking_class: Option<String>,
    availability: Option<i64>,
}

impl FlightRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            route: row.get(0)?,
            origin: row.get(1)?,
            destination: row.get(2)?,
            airline: row.get(3)?,
            price: row.get(4)?,
            date: row.get(5)?,
            demand_score: row.get(6)?,
            flight_number: row.get(7)?,
            aircraft_type: row.get(8)?,
            duration: row.get(9)?,
            distance: row.get(10)?,
            booking_class: row.get(11)?,
            availability: row.get(12)?,
        })
    }

    fn into_record(self) -> Result<FlightRecord> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|_| Error::Validation(format!("invalid date '{}'", self.date)))?;

        let mut flight = NewFlightRecord::new(
            self.origin,
            self.destination,
            self.airline,
            self.price,
            date,
            self.demand_score,
        )
        .with_route(self.route);

        if !self.flight_number.is_empty() {
            flight = flight.with_flight_number(self.flight_number);
        }
        if let Some(aircraft) = self.aircraft_type {
            flight = flight.with_aircraft_type(aircraft);
        }
        if let Some(minutes) = self.duration {
            flight = flight.with_duration(to_u32("duration", minutes)?);
        }
        if let Some(km) = self.distance {
            flight = flight.with_distance(km);
        }
        if let Some(class) = self.booking_class {
            flight = flight.with_booking_class(class);
        }
        if let Some(seats) = self.availability {
            flight = flight.with_availability(to_u32("availability", seats)?);
        }

        flight.validate()
    }
}

fn to_u32(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::Validation(format!("{} out of range ({})", field, value)))
}

impl Database {
    /// Store flight records
    ///
    /// A record with the same (route, airline, date, flight_number) as an
    /// existing row replaces it. Returns the number of records written.
    pub fn save_flight_records(&self, flights: &[FlightRecord]) -> Result<usize> {
        if flights.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut saved = 0;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO flight_data ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                FLIGHT_COLUMNS
            ))?;

            for flight in flights {
                stmt.execute(params![
                    flight.route(),
                    flight.origin(),
                    flight.destination(),
                    flight.airline(),
                    flight.price(),
                    flight.date().format("%Y-%m-%d").to_string(),
                    flight.demand_score(),
                    flight.flight_number().unwrap_or_default(),
                    flight.aircraft_type(),
                    flight.duration(),
                    flight.distance(),
                    flight.booking_class(),
                    flight.availability(),
                ])?;
                saved += 1;
            }
        }

        tx.commit()?;
        tracing::info!(count = saved, "Saved flight records");
        Ok(saved)
    }

    /// Flights collected within the last `days` days, newest first
    ///
    /// Rows that no longer pass validation are skipped with a warning.
    pub fn get_flight_data(&self, days: u32, limit: Option<usize>) -> Result<Dataset> {
        let mut sql = format!(
            "SELECT {} FROM flight_data WHERE created_at >= datetime('now', ?) \
             ORDER BY created_at DESC, id DESC",
            FLIGHT_COLUMNS
        );
        let mut values: Vec<Value> = vec![Value::Text(days_ago(days))];

        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(limit as i64));
        }

        let records = self.query_flights(&sql, values)?;
        tracing::debug!(days, count = records.len(), "Loaded flight data");
        Ok(Dataset::new(records))
    }

    /// Flights matching a filter, newest first
    pub fn search_flights(&self, filter: &FlightFilter) -> Result<Dataset> {
        let mut sql = format!("SELECT {} FROM flight_data WHERE 1=1", FLIGHT_COLUMNS);
        let mut values: Vec<Value> = Vec::new();

        if let Some(origin) = &filter.origin {
            sql.push_str(" AND origin = ?");
            values.push(Value::Text(origin.clone()));
        }
        if let Some(destination) = &filter.destination {
            sql.push_str(" AND destination = ?");
            values.push(Value::Text(destination.clone()));
        }
        if let Some(airline) = &filter.airline {
            sql.push_str(" AND airline = ?");
            values.push(Value::Text(airline.clone()));
        }
        if let Some(min) = filter.min_price {
            sql.push_str(" AND price >= ?");
            values.push(Value::Real(min));
        }
        if let Some(max) = filter.max_price {
            sql.push_str(" AND price <= ?");
            values.push(Value::Real(max));
        }
        if let Some(from) = filter.date_from {
            sql.push_str(" AND date >= ?");
            values.push(Value::Text(from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = filter.date_to {
            sql.push_str(" AND date <= ?");
            values.push(Value::Text(to.format("%Y-%m-%d").to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            values.push(Value::Integer(limit as i64));
        }

        Ok(Dataset::new(self.query_flights(&sql, values)?))
    }

    fn query_flights(&self, sql: &str, values: Vec<Value>) -> Result<Vec<FlightRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), FlightRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let route = row.route.clone();
            match row.into_record() {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(route = %route, error = %e, "Skipping invalid flight row"),
            }
        }
        Ok(records)
    }
}
