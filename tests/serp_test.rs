use serde_json::json;

use skyfare::model::Currency;
use skyfare::query::{CabinClass, SearchParams};
use skyfare::serp::{decode_payload, to_serp_params};

fn params(return_date: Option<&str>) -> SearchParams {
    SearchParams {
        origin: "JFK".into(),
        destination: "LHR".into(),
        depart_date: "2026-04-01".into(),
        return_date: return_date.map(String::from),
        passengers: 2,
        cabin_class: CabinClass::Business,
    }
}

fn segment(from: &str, to: &str, depart: &str, arrive: &str) -> serde_json::Value {
    json!({
        "departure_airport": { "id": from, "name": from, "time": depart },
        "arrival_airport": { "id": to, "name": to, "time": arrive },
        "airline": "British Airways",
        "flight_number": "BA 112",
        "duration": 435,
    })
}

#[test]
fn request_params_map_the_search() {
    let query = to_serp_params(&params(None), "secret", Currency::USD);

    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap()
    };

    assert_eq!(get("engine"), "google_flights");
    assert_eq!(get("api_key"), "secret");
    assert_eq!(get("departure_id"), "JFK");
    assert_eq!(get("arrival_id"), "LHR");
    assert_eq!(get("outbound_date"), "2026-04-01");
    assert_eq!(get("adults"), "2");
    assert_eq!(get("travel_class"), "3");
    assert_eq!(get("currency"), "USD");
    assert_eq!(get("type"), "2");
    assert!(!query.iter().any(|(k, _)| k == "return_date"));
}

#[test]
fn round_trip_sets_type_and_return_date() {
    let query = to_serp_params(&params(Some("2026-04-15")), "secret", Currency::EUR);

    assert!(query
        .iter()
        .any(|(k, v)| k == "type" && v == "1"));
    assert!(query
        .iter()
        .any(|(k, v)| k == "return_date" && v == "2026-04-15"));
}

#[test]
fn error_payload_becomes_api_error() {
    let payload = json!({ "error": "Invalid API key." });
    let result = decode_payload(&payload, Currency::USD);
    assert!(result.is_err());
}

#[test]
fn empty_payload_decodes_to_no_flights() {
    let payload = json!({ "search_metadata": { "status": "Success" } });
    let flights = decode_payload(&payload, Currency::USD).unwrap();
    assert!(flights.is_empty());
}

#[test]
fn decodes_a_nonstop_itinerary() {
    let payload = json!({
        "best_flights": [{
            "flights": [segment("JFK", "LHR", "2026-04-01 08:30", "2026-04-01 20:45")],
            "total_duration": 435,
            "price": 540,
        }]
    });

    let flights = decode_payload(&payload, Currency::USD).unwrap();
    assert_eq!(flights.len(), 1);

    let flight = &flights[0];
    assert_eq!(flight.id, "serp-1");
    assert_eq!(flight.airline, "British Airways");
    assert_eq!(flight.flight_number, "BA 112");
    assert_eq!(flight.origin, "JFK");
    assert_eq!(flight.destination, "LHR");
    assert_eq!(flight.depart_time, "08:30");
    assert_eq!(flight.arrival_time, "20:45");
    assert_eq!(flight.duration, "7h 15m");
    assert_eq!(flight.stops, 0);
    assert_eq!(flight.price, 540);
    assert_eq!(flight.currency, Currency::USD);
}

#[test]
fn multi_segment_itinerary_spans_endpoints() {
    let payload = json!({
        "best_flights": [{
            "flights": [
                segment("JFK", "CDG", "2026-04-01 08:30", "2026-04-01 15:00"),
                segment("CDG", "LHR", "2026-04-01 17:10", "2026-04-01 18:05"),
            ],
            "total_duration": 575,
            "price": 610,
        }]
    });

    let flights = decode_payload(&payload, Currency::USD).unwrap();
    let flight = &flights[0];
    assert_eq!(flight.origin, "JFK");
    assert_eq!(flight.destination, "LHR");
    assert_eq!(flight.depart_time, "08:30");
    assert_eq!(flight.arrival_time, "18:05");
    assert_eq!(flight.stops, 1);
}

#[test]
fn other_flights_follow_best_flights() {
    let payload = json!({
        "best_flights": [{
            "flights": [segment("JFK", "LHR", "2026-04-01 08:30", "2026-04-01 20:45")],
            "total_duration": 435,
            "price": 540,
        }],
        "other_flights": [{
            "flights": [segment("JFK", "LHR", "2026-04-01 11:00", "2026-04-01 23:10")],
            "total_duration": 430,
            "price": 480,
        }],
    });

    let flights = decode_payload(&payload, Currency::USD).unwrap();
    assert_eq!(flights.len(), 2);
    assert_eq!(flights[0].id, "serp-1");
    assert_eq!(flights[1].id, "serp-2");
    assert_eq!(flights[1].price, 480);
}

#[test]
fn entries_without_a_price_are_skipped() {
    let payload = json!({
        "best_flights": [
            {
                "flights": [segment("JFK", "LHR", "2026-04-01 08:30", "2026-04-01 20:45")],
                "total_duration": 435,
            },
            {
                "flights": [segment("JFK", "LHR", "2026-04-01 11:00", "2026-04-01 23:10")],
                "total_duration": 430,
                "price": 480,
            },
        ]
    });

    let flights = decode_payload(&payload, Currency::USD).unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].price, 480);
}

#[test]
fn malformed_entries_are_skipped() {
    let payload = json!({
        "best_flights": [
            { "price": 500 },
            { "flights": [], "price": 500 },
        ]
    });

    let flights = decode_payload(&payload, Currency::USD).unwrap();
    assert!(flights.is_empty());
}
