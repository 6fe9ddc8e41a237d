//! Integration tests for skyfare-core
//!
//! These tests exercise the full import → analyze → report → store workflow.

use chrono::NaiveDate;
use skyfare_core::{
    db::Database,
    export::export_insights,
    import::parse_flights_csv,
    insights::{
        generate_summary_report, get_high_priority_insights, InsightCategory, InsightEngine,
        InsightType, Severity, SummaryReport, Trend,
    },
    models::{Column, Dataset, FlightRecord, NewFlightRecord},
    Error, InsightCache,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A valid flight on Tuesday 2025-03-04
fn flight(origin: &str, destination: &str, airline: &str, price: f64, demand: f64) -> FlightRecord {
    FlightRecord::new(origin, destination, airline, price, date("2025-03-04"), demand)
        .expect("valid flight")
}

fn seats(
    origin: &str,
    destination: &str,
    airline: &str,
    price: f64,
    demand: f64,
    availability: u32,
) -> FlightRecord {
    NewFlightRecord::new(origin, destination, airline, price, date("2025-03-04"), demand)
        .with_availability(availability)
        .validate()
        .expect("valid flight")
}

/// A mixed market: one contested route, one single-carrier route, a
/// weekend spike and a tight-capacity flight
fn market() -> Dataset {
    Dataset::new(vec![
        seats("Sydney", "Melbourne", "Qantas", 120.0, 0.9, 150),
        seats("Sydney", "Melbourne", "Jetstar", 90.0, 0.8, 120),
        seats("Sydney", "Melbourne", "Virgin", 260.0, 0.75, 140),
        seats("Sydney", "Melbourne", "Qantas", 310.0, 0.6, 160),
        seats("Sydney", "Melbourne", "Jetstar", 80.0, 0.7, 130),
        seats("Perth", "Darwin", "Qantas", 450.0, 0.3, 10),
        NewFlightRecord::new("Brisbane", "Cairns", "Virgin", 180.0, date("2025-03-08"), 0.95)
            .with_availability(90)
            .validate()
            .expect("valid flight"),
    ])
}

fn find(insights: &[skyfare_core::Insight], kind: InsightType) -> Option<&skyfare_core::Insight> {
    insights.iter().find(|i| i.insight_type() == kind)
}

// =============================================================================
// Insight Engine Scenarios
// =============================================================================

#[test]
fn test_identical_prices_report_low_volatility() {
    let dataset: Dataset = (0..10)
        .map(|_| flight("Sydney", "Melbourne", "Qantas", 100.0, 0.5))
        .collect();

    let insights = InsightEngine::new().generate_insights(&dataset);
    let volatility = find(&insights, InsightType::PriceVolatility).expect("volatility insight");

    assert_eq!(volatility.value(), 0.0);
    assert!(volatility.description().contains("low price volatility"));
    assert_eq!(volatility.trend(), Trend::Stable);
}

#[test]
fn test_competitive_and_monopolistic_routes() {
    let dataset = Dataset::new(vec![
        flight("Sydney", "Melbourne", "Qantas", 200.0, 0.5),
        flight("Sydney", "Melbourne", "Jetstar", 150.0, 0.5),
        flight("Sydney", "Melbourne", "Virgin", 180.0, 0.5),
        flight("Perth", "Darwin", "Qantas", 400.0, 0.5),
    ]);

    let insights = InsightEngine::new().generate_insights(&dataset);

    let competitive = find(&insights, InsightType::CompetitiveRoutes).expect("competitive routes");
    assert_eq!(competitive.value(), 1.0);
    assert_eq!(competitive.category(), InsightCategory::Competition);

    let monopolistic =
        find(&insights, InsightType::MonopolisticRoutes).expect("monopolistic routes");
    assert_eq!(monopolistic.value(), 1.0);
    assert_eq!(monopolistic.severity(), Severity::High);
}

#[test]
fn test_very_high_demand_market() {
    let dataset = Dataset::new(vec![
        flight("Sydney", "Melbourne", "Qantas", 200.0, 0.8),
        flight("Sydney", "Melbourne", "Qantas", 210.0, 0.9),
    ]);

    let insights = InsightEngine::new().generate_insights(&dataset);
    let demand = find(&insights, InsightType::OverallDemand).expect("overall demand");

    assert!((demand.value() - 0.85).abs() < 1e-9);
    assert_eq!(demand.severity(), Severity::High);
    assert!(demand.description().contains("very_high"));
}

#[test]
fn test_unsupported_export_format() {
    let insights = InsightEngine::new().generate_insights(&market());

    match export_insights(&insights, "xml") {
        Err(Error::InvalidArgument(msg)) => assert!(msg.contains("xml")),
        other => panic!("expected InvalidArgument, got {:?}", other),
    }
}

#[test]
fn test_recommendations_for_volatile_single_carrier_market() {
    // Mean 300, sample std 200: volatility ~0.67 with only one carrier
    let dataset = Dataset::new(vec![
        flight("Perth", "Darwin", "Qantas", 100.0, 0.5),
        flight("Perth", "Darwin", "Qantas", 300.0, 0.5),
        flight("Perth", "Darwin", "Qantas", 500.0, 0.5),
    ]);

    let insights = InsightEngine::new().generate_insights(&dataset);
    let report = match generate_summary_report(&insights) {
        SummaryReport::Report(summary) => summary,
        SummaryReport::NoInsights { .. } => panic!("expected a report"),
    };

    assert_eq!(
        report.recommendations,
        vec![
            "Consider dynamic pricing strategies to capitalize on price volatility".to_string(),
            "Explore opportunities on monopolistic routes for potential market entry".to_string(),
        ]
    );
}

#[test]
fn test_recommendations_at_moderately_high_volatility() {
    // Mean 200, sample std 90: volatility 0.45
    let dataset = Dataset::new(vec![
        flight("Perth", "Darwin", "Qantas", 110.0, 0.5),
        flight("Perth", "Darwin", "Qantas", 200.0, 0.5),
        flight("Perth", "Darwin", "Qantas", 290.0, 0.5),
    ]);

    let insights = InsightEngine::new().generate_insights(&dataset);
    let volatility = insights
        .iter()
        .find(|i| i.insight_type() == InsightType::PriceVolatility)
        .expect("volatility insight");
    assert!((volatility.value() - 0.45).abs() < 1e-9);
    assert_eq!(volatility.trend(), Trend::Volatile);

    let report = match generate_summary_report(&insights) {
        SummaryReport::Report(summary) => summary,
        SummaryReport::NoInsights { .. } => panic!("expected a report"),
    };
    assert_eq!(
        report.recommendations,
        vec![
            "Consider dynamic pricing strategies to capitalize on price volatility".to_string(),
            "Explore opportunities on monopolistic routes for potential market entry".to_string(),
        ]
    );
}

// =============================================================================
// Engine Properties
// =============================================================================

#[test]
fn test_empty_dataset() {
    let insights = InsightEngine::new().generate_insights(&Dataset::default());
    assert!(insights.is_empty());
    assert!(generate_summary_report(&insights).is_empty());
}

#[test]
fn test_generation_is_idempotent() {
    let engine = InsightEngine::new();
    let dataset = market();

    let first = engine.generate_insights(&dataset);
    let second = engine.generate_insights(&dataset);

    assert_eq!(first, second);
    assert_eq!(
        export_insights(&first, "json").unwrap(),
        export_insights(&second, "json").unwrap()
    );
}

#[test]
fn test_cache_does_not_change_output() {
    let engine = InsightEngine::new();
    let dataset = market();
    let mut cache = InsightCache::new(2);

    let uncached = engine.generate_insights(&dataset);
    let miss = engine.generate_insights_cached(&dataset, &mut cache);
    let hit = engine.generate_insights_cached(&dataset, &mut cache);

    assert_eq!(uncached, miss);
    assert_eq!(uncached, hit);
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn test_missing_availability_only_drops_capacity_constraint() {
    let engine = InsightEngine::new();
    let full = engine.generate_insights(&market());
    let reduced = engine.generate_insights(&market().without_column(Column::Availability));

    assert!(find(&full, InsightType::CapacityConstraint).is_some());
    assert!(find(&reduced, InsightType::CapacityConstraint).is_none());

    let expected: Vec<_> = full
        .into_iter()
        .filter(|i| i.insight_type() != InsightType::CapacityConstraint)
        .collect();
    assert_eq!(reduced, expected);
}

#[test]
fn test_insights_stay_within_catalog() {
    let insights = InsightEngine::new().generate_insights(&market());
    assert!(!insights.is_empty());

    for insight in &insights {
        assert!(InsightType::all().contains(&insight.insight_type()));
        assert_eq!(insight.category(), insight.insight_type().category());
        assert!((0.0..=1.0).contains(&insight.confidence()));
    }
}

#[test]
fn test_evaluator_order_is_fixed() {
    let insights = InsightEngine::new().generate_insights(&market());
    let order: Vec<InsightCategory> = insights.iter().map(|i| i.category()).collect();

    // Price insights lead; the first demand insight follows them
    assert_eq!(order[0], InsightCategory::Price);
    assert_eq!(insights[0].insight_type(), InsightType::PriceVolatility);
    let first_demand = insights
        .iter()
        .position(|i| i.insight_type() == InsightType::OverallDemand)
        .unwrap();
    assert!(insights[..first_demand]
        .iter()
        .all(|i| i.category() == InsightCategory::Price));
}

#[test]
fn test_high_priority_filter() {
    let insights = InsightEngine::new().generate_insights(&market());
    for insight in get_high_priority_insights(&insights) {
        assert!(insight.confidence() > 0.8);
        assert!(insight.is_actionable());
        assert_eq!(insight.severity(), Severity::High);
    }
}

#[test]
fn test_invalid_records_rejected() {
    let negative = FlightRecord::new("Sydney", "Melbourne", "Qantas", -1.0, date("2025-03-04"), 0.5);
    assert!(matches!(negative, Err(Error::Validation(_))));

    let demand = FlightRecord::new("Sydney", "Melbourne", "Qantas", 100.0, date("2025-03-04"), 1.2);
    assert!(matches!(demand, Err(Error::Validation(_))));
}

// =============================================================================
// Import and Storage Workflow
// =============================================================================

const FLIGHTS_CSV: &str = "\
origin,destination,airline,price,date,demand_score,availability
Sydney,Melbourne,Qantas,189.50,2025-03-04,0.82,40
Sydney,Melbourne,Jetstar,99.00,2025-03-04,0.74,12
Sydney,Melbourne,Virgin,145.00,2025-03-05,0.66,
Perth,Darwin,Qantas,420.00,2025-03-08,0.35,80
";

#[test]
fn test_import_store_analyze_workflow() {
    let db = Database::in_memory().expect("Failed to create database");

    let records = parse_flights_csv(FLIGHTS_CSV.as_bytes()).expect("Failed to parse CSV");
    assert_eq!(records.len(), 4);

    assert_eq!(db.save_flight_records(&records).unwrap(), 4);
    // Re-importing the same file replaces rather than duplicates
    db.save_flight_records(&records).unwrap();
    assert_eq!(db.get_statistics().unwrap().total_flights, 4);

    let dataset = db.get_flight_data(30, None).unwrap();
    assert_eq!(dataset.len(), 4);
    assert!(dataset.has_column(Column::Availability));

    let insights = InsightEngine::new().generate_insights(&dataset);
    assert!(!insights.is_empty());

    let saved = db.save_market_insights(&insights).unwrap();
    assert_eq!(saved, insights.len());

    let stored = db.get_market_insights(7, None).unwrap();
    assert_eq!(stored.len(), insights.len());

    let competition = db
        .get_market_insights(7, Some(InsightCategory::Competition))
        .unwrap();
    assert!(competition
        .iter()
        .all(|s| s.insight.category() == InsightCategory::Competition));
    assert!(competition
        .iter()
        .any(|s| s.insight.insight_type() == InsightType::MonopolisticRoutes));
}

#[test]
fn test_export_round_trip_through_json() {
    let insights = InsightEngine::new().generate_insights(&market());
    let json = export_insights(&insights, "json").unwrap();

    let parsed: Vec<skyfare_core::Insight> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), insights.len());
    for (parsed, original) in parsed.iter().zip(&insights) {
        assert_eq!(parsed.insight_type(), original.insight_type());
        assert_eq!(parsed.description(), original.description());
        assert_eq!(parsed.severity(), original.severity());
    }

    let csv = export_insights(&insights, "csv").unwrap();
    assert_eq!(csv.lines().count(), insights.len() + 1);
}
