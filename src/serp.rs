use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use wreq::Client;

use crate::error::{self, SearchError};
use crate::model::{Currency, Flight};
use crate::provider::FlightProvider;
use crate::query::{CabinClass, SearchParams};

const BASE_URL: &str = "https://serpapi.com/search";

#[derive(Clone)]
pub struct FetchOptions {
    pub proxy: Option<String>,
    pub timeout: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: 30,
        }
    }
}

/// Live flight data through the SERP API's Google Flights engine.
pub struct SerpProvider {
    pub api_key: String,
    pub currency: Currency,
    pub options: FetchOptions,
}

fn travel_class(cabin: CabinClass) -> &'static str {
    match cabin {
        CabinClass::Economy => "1",
        CabinClass::PremiumEconomy => "2",
        CabinClass::Business => "3",
        CabinClass::First => "4",
    }
}

pub fn to_serp_params(
    params: &SearchParams,
    api_key: &str,
    currency: Currency,
) -> Vec<(String, String)> {
    let mut query = vec![
        ("engine".to_string(), "google_flights".to_string()),
        ("api_key".to_string(), api_key.to_string()),
        ("departure_id".to_string(), params.origin.clone()),
        ("arrival_id".to_string(), params.destination.clone()),
        ("outbound_date".to_string(), params.depart_date.clone()),
        ("adults".to_string(), params.passengers.to_string()),
        (
            "travel_class".to_string(),
            travel_class(params.cabin_class).to_string(),
        ),
        ("currency".to_string(), currency.as_str().to_string()),
        ("hl".to_string(), "en".to_string()),
    ];

    match params.return_date {
        Some(ref ret) => {
            query.push(("type".to_string(), "1".to_string()));
            query.push(("return_date".to_string(), ret.clone()));
        }
        None => query.push(("type".to_string(), "2".to_string())),
    }

    query
}

fn get_str(val: &Value, key: &str) -> Option<String> {
    val.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn get_u32(val: &Value, key: &str) -> Option<u32> {
    val.get(key).and_then(|v| v.as_u64()).map(|v| v as u32)
}

fn get_i64(val: &Value, key: &str) -> Option<i64> {
    val.get(key).and_then(|v| v.as_i64())
}

fn time_of_day(stamp: &str) -> String {
    // "2026-03-01 08:30" from the API; keep only the clock part.
    stamp
        .split_whitespace()
        .last()
        .unwrap_or(stamp)
        .to_string()
}

fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn decode_itinerary(entry: &Value, index: usize, currency: Currency) -> Option<Flight> {
    let segments = entry.get("flights")?.as_array()?;
    let first = segments.first()?;
    let last = segments.last()?;

    let origin = first
        .get("departure_airport")
        .and_then(|a| get_str(a, "id"))?;
    let destination = last.get("arrival_airport").and_then(|a| get_str(a, "id"))?;

    let depart_time = first
        .get("departure_airport")
        .and_then(|a| get_str(a, "time"))
        .map(|t| time_of_day(&t))?;
    let arrival_time = last
        .get("arrival_airport")
        .and_then(|a| get_str(a, "time"))
        .map(|t| time_of_day(&t))?;

    let total_minutes = get_u32(entry, "total_duration").unwrap_or(0);
    let price = get_i64(entry, "price")?;

    Some(Flight {
        id: format!("serp-{}", index + 1),
        airline: get_str(first, "airline").unwrap_or_default(),
        flight_number: get_str(first, "flight_number").unwrap_or_default(),
        origin,
        destination,
        depart_time,
        arrival_time,
        duration: format_duration(total_minutes),
        stops: (segments.len().saturating_sub(1)) as u32,
        price,
        currency,
    })
}

pub fn decode_payload(payload: &Value, currency: Currency) -> Result<Vec<Flight>, SearchError> {
    if let Some(message) = get_str(payload, "error") {
        return Err(SearchError::Api(message));
    }

    let mut flights = Vec::new();
    for key in ["best_flights", "other_flights"] {
        if let Some(entries) = payload.get(key).and_then(|v| v.as_array()) {
            for entry in entries {
                if let Some(flight) = decode_itinerary(entry, flights.len(), currency) {
                    flights.push(flight);
                }
            }
        }
    }

    Ok(flights)
}

pub async fn fetch_payload(
    query: &[(String, String)],
    options: &FetchOptions,
) -> Result<Value, SearchError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(options.timeout));

    if let Some(ref proxy) = options.proxy {
        builder = builder.proxy(wreq::Proxy::all(proxy).map_err(error::from_http_error)?);
    }

    let client = builder.build().map_err(error::from_http_error)?;

    let response = client
        .get(BASE_URL)
        .query(&query)
        .send()
        .await
        .map_err(error::from_http_error)?;

    let status = response.status().as_u16();
    if status == 429 {
        return Err(SearchError::RateLimited);
    }

    let body = response.text().await.map_err(error::from_http_error)?;

    match serde_json::from_str::<Value>(&body) {
        Ok(payload) => Ok(payload),
        Err(_) if status >= 400 => Err(SearchError::HttpStatus(status)),
        Err(e) => Err(SearchError::Api(e.to_string())),
    }
}

#[async_trait]
impl FlightProvider for SerpProvider {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Flight>, SearchError> {
        let query = to_serp_params(params, &self.api_key, self.currency);
        let payload = fetch_payload(&query, &self.options).await?;
        decode_payload(&payload, self.currency)
    }
}
