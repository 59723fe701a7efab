use crate::error::SearchError;
use crate::model::Flight;

pub const FALLBACK_MAX_PRICE: i64 = 2000;
pub const DEFAULT_MAX_STOPS: u32 = 2;

#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub max_price: i64,
    pub max_stops: u32,
    pub airlines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Duration,
    Departure,
}

impl SortKey {
    pub fn from_str_loose(s: &str) -> Result<Self, SearchError> {
        match s {
            "price" => Ok(Self::Price),
            "duration" => Ok(Self::Duration),
            "departure" => Ok(Self::Departure),
            _ => Err(SearchError::Validation(format!(
                "invalid sort key: {s} (expected price, duration or departure)"
            ))),
        }
    }
}

// "7h 23m" style durations; anything unparseable counts as 0 minutes and
// therefore sorts first. That is deliberate, not a parsing bug to paper over.
pub fn duration_minutes(duration: &str) -> u32 {
    let Some((hours, rest)) = duration.split_once('h') else {
        return 0;
    };
    let Some(minutes) = rest.trim().strip_suffix('m') else {
        return 0;
    };
    match (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>()) {
        (Ok(h), Ok(m)) => h * 60 + m,
        _ => 0,
    }
}

pub fn time_minutes(time: &str) -> u32 {
    let Some((hours, minutes)) = time.split_once(':') else {
        return 0;
    };
    match (hours.trim().parse::<u32>(), minutes.trim().parse::<u32>()) {
        (Ok(h), Ok(m)) => h * 60 + m,
        _ => 0,
    }
}

pub fn apply_filters(flights: &[Flight], criteria: &FilterCriteria) -> Vec<Flight> {
    flights
        .iter()
        .filter(|f| f.price <= criteria.max_price)
        .filter(|f| f.stops <= criteria.max_stops)
        .filter(|f| criteria.airlines.is_empty() || criteria.airlines.contains(&f.airline))
        .cloned()
        .collect()
}

pub fn sort_flights(mut flights: Vec<Flight>, key: SortKey) -> Vec<Flight> {
    match key {
        SortKey::Price => flights.sort_by_key(|f| f.price),
        SortKey::Duration => flights.sort_by_key(|f| duration_minutes(&f.duration)),
        SortKey::Departure => flights.sort_by_key(|f| time_minutes(&f.depart_time)),
    }
    flights
}

/// Filter, then sort. An over-constrained filter that matches nothing falls
/// back to the full unfiltered result list rather than an empty screen.
pub fn displayed(results: &[Flight], criteria: &FilterCriteria, key: SortKey) -> Vec<Flight> {
    let filtered = sort_flights(apply_filters(results, criteria), key);
    if filtered.is_empty() {
        results.to_vec()
    } else {
        filtered
    }
}

pub fn default_criteria(results: &[Flight]) -> FilterCriteria {
    FilterCriteria {
        max_price: price_ceiling(results),
        max_stops: DEFAULT_MAX_STOPS,
        airlines: Vec::new(),
    }
}

// Highest observed price rounded up to the next multiple of 100.
pub fn price_ceiling(results: &[Flight]) -> i64 {
    match results.iter().map(|f| f.price).max() {
        Some(max) => (max + 99) / 100 * 100,
        None => FALLBACK_MAX_PRICE,
    }
}

pub fn unique_airlines(results: &[Flight]) -> Vec<String> {
    let mut airlines: Vec<String> = Vec::new();
    for flight in results {
        if !airlines.contains(&flight.airline) {
            airlines.push(flight.airline.clone());
        }
    }
    airlines
}
