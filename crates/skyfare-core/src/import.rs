//! CSV import and export of flight records
//!
//! Header names are matched case-insensitively; column order is free.
//! Required: origin, destination, airline, price, date (YYYY-MM-DD),
//! demand_score. Everything else is optional.

use std::collections::HashMap;
use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{FlightRecord, NewFlightRecord};

const REQUIRED_COLUMNS: [&str; 6] = [
    "origin",
    "destination",
    "airline",
    "price",
    "date",
    "demand_score",
];

/// Full header written by [`write_flights_csv`]
pub const FLIGHT_CSV_HEADER: [&str; 13] = [
    "route",
    "origin",
    "destination",
    "airline",
    "price",
    "date",
    "demand_score",
    "availability",
    "flight_number",
    "aircraft_type",
    "duration",
    "distance",
    "booking_class",
];

/// Header name to column index
struct HeaderIndex(HashMap<String, usize>);

impl HeaderIndex {
    fn new(headers: &StringRecord) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !index.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Import(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self(index))
    }

    /// Trimmed cell value; empty cells read as absent
    fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.0
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    fn required<'r>(&self, record: &'r StringRecord, column: &str) -> Result<&'r str> {
        self.get(record, column)
            .ok_or_else(|| Error::Import(format!("missing {}", column)))
    }
}

fn parse_number<T: std::str::FromStr>(column: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Import(format!("invalid {}: '{}'", column, value)))
}

fn parse_row(index: &HeaderIndex, record: &StringRecord) -> Result<FlightRecord> {
    let date_str = index.required(record, "date")?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| Error::Import(format!("invalid date: '{}'", date_str)))?;

    let mut flight = NewFlightRecord::new(
        index.required(record, "origin")?,
        index.required(record, "destination")?,
        index.required(record, "airline")?,
        parse_number("price", index.required(record, "price")?)?,
        date,
        parse_number("demand_score", index.required(record, "demand_score")?)?,
    );

    if let Some(route) = index.get(record, "route") {
        flight = flight.with_route(route);
    }
    if let Some(seats) = index.get(record, "availability") {
        flight = flight.with_availability(parse_number("availability", seats)?);
    }
    if let Some(number) = index.get(record, "flight_number") {
        flight = flight.with_flight_number(number);
    }
    if let Some(aircraft) = index.get(record, "aircraft_type") {
        flight = flight.with_aircraft_type(aircraft);
    }
    if let Some(minutes) = index.get(record, "duration") {
        flight = flight.with_duration(parse_number("duration", minutes)?);
    }
    if let Some(km) = index.get(record, "distance") {
        flight = flight.with_distance(parse_number("distance", km)?);
    }
    if let Some(class) = index.get(record, "booking_class") {
        flight = flight.with_booking_class(class);
    }

    flight.validate()
}

/// Parse flight records from CSV
///
/// Any bad row fails the whole import with an error naming its line.
pub fn parse_flights_csv<R: Read>(reader: R) -> Result<Vec<FlightRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let index = HeaderIndex::new(rdr.headers()?)?;
    let mut flights = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let flight = parse_row(&index, &record).map_err(|e| match e {
            Error::Import(msg) => Error::Import(format!("line {}: {}", line, msg)),
            other => Error::Import(format!("line {}: {}", line, other)),
        })?;
        flights.push(flight);
    }

    debug!(count = flights.len(), "Parsed flight CSV");
    Ok(flights)
}

/// Write flight records as CSV with the full header
pub fn write_flights_csv(records: &[FlightRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(FLIGHT_CSV_HEADER)?;

    for r in records {
        wtr.write_record([
            r.route().to_string(),
            r.origin().to_string(),
            r.destination().to_string(),
            r.airline().to_string(),
            r.price().to_string(),
            r.date().format("%Y-%m-%d").to_string(),
            r.demand_score().to_string(),
            r.availability().map(|a| a.to_string()).unwrap_or_default(),
            r.flight_number().unwrap_or_default().to_string(),
            r.aircraft_type().unwrap_or_default().to_string(),
            r.duration().map(|d| d.to_string()).unwrap_or_default(),
            r.distance().map(|d| d.to_string()).unwrap_or_default(),
            r.booking_class().to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_columns() {
        let data = "\
origin,destination,airline,price,date,demand_score
Sydney,Melbourne,Qantas,199.50,2025-03-04,0.82
Perth,Darwin,Virgin Australia,310,2025-03-05,0.4
";
        let flights = parse_flights_csv(data.as_bytes()).unwrap();
        assert_eq!(flights.len(), 2);

        let first = &flights[0];
        assert_eq!(first.route(), "Sydney - Melbourne");
        assert_eq!(first.price(), 199.5);
        assert_eq!(first.demand_score(), 0.82);
        assert_eq!(first.availability(), None);
        assert_eq!(first.booking_class(), "Economy");
    }

    #[test]
    fn test_parse_optional_columns_any_order() {
        let data = "\
Booking_Class,date,airline,price,demand_score,origin,destination,availability,flight_number,duration,distance
Business,2025-04-01,Qantas,850,0.9,Sydney,Perth,12,QF641,300,3290.5
";
        let flights = parse_flights_csv(data.as_bytes()).unwrap();
        let flight = &flights[0];
        assert_eq!(flight.booking_class(), "Business");
        assert_eq!(flight.availability(), Some(12));
        assert_eq!(flight.flight_number(), Some("QF641"));
        assert_eq!(flight.duration(), Some(300));
        assert_eq!(flight.distance(), Some(3290.5));
    }

    #[test]
    fn test_missing_required_column() {
        let data = "origin,destination,airline,price,date\nSydney,Melbourne,Qantas,100,2025-03-04\n";
        let err = parse_flights_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("demand_score"));
    }

    #[test]
    fn test_invalid_row_names_line() {
        let data = "\
origin,destination,airline,price,date,demand_score
Sydney,Melbourne,Qantas,100,2025-03-04,0.5
Sydney,Melbourne,Qantas,-5,2025-03-04,0.5
";
        match parse_flights_csv(data.as_bytes()) {
            Err(Error::Import(msg)) => {
                assert!(msg.starts_with("line 3:"), "{}", msg);
                assert!(msg.contains("negative"));
            }
            other => panic!("expected import error, got {:?}", other),
        }
    }

    #[test]
    fn test_demand_out_of_range_rejected() {
        let data = "\
origin,destination,airline,price,date,demand_score
Sydney,Melbourne,Qantas,100,2025-03-04,1.5
";
        assert!(matches!(
            parse_flights_csv(data.as_bytes()),
            Err(Error::Import(_))
        ));
    }

    #[test]
    fn test_bad_date() {
        let data = "\
origin,destination,airline,price,date,demand_score
Sydney,Melbourne,Qantas,100,04/03/2025,0.5
";
        let err = parse_flights_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_write_then_parse_keeps_records() {
        let data = "\
origin,destination,airline,price,date,demand_score,availability,flight_number
Sydney,Melbourne,Qantas,199.5,2025-03-04,0.82,40,QF401
Perth,Darwin,Rex,120,2025-03-05,0.3,,
";
        let flights = parse_flights_csv(data.as_bytes()).unwrap();
        let written = write_flights_csv(&flights).unwrap();
        assert!(written.starts_with("route,origin,destination,airline,price,date"));

        let reparsed = parse_flights_csv(written.as_bytes()).unwrap();
        assert_eq!(reparsed, flights);
    }
}
