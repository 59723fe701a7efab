use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use crate::error::SearchError;
use crate::model::{Currency, Flight};
use crate::query::{CabinClass, SearchParams};

/// The single seam between the search state and flight data. Implementations
/// may be backed by anything from canned data to a live API; callers never
/// depend on which.
#[async_trait]
pub trait FlightProvider: Send + Sync {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Flight>, SearchError>;
}

const CARRIERS: [&str; 8] = [
    "Delta Air Lines",
    "American Airlines",
    "United Airlines",
    "Southwest Airlines",
    "JetBlue Airways",
    "British Airways",
    "Lufthansa",
    "Air France",
];

const MOCK_RESULT_COUNT: usize = 10;

#[derive(Debug, Clone)]
pub struct MockProvider {
    pub currency: Currency,
    pub latency: Duration,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            currency: Currency::USD,
            latency: Duration::from_millis(1500),
        }
    }
}

impl MockProvider {
    pub fn instant(currency: Currency) -> Self {
        Self {
            currency,
            latency: Duration::ZERO,
        }
    }

    pub fn generate(&self, params: &SearchParams) -> Vec<Flight> {
        let mut rng = rand::thread_rng();

        let mut flights: Vec<Flight> = (0..MOCK_RESULT_COUNT)
            .map(|i| {
                let airline = CARRIERS[rng.gen_range(0..CARRIERS.len())];
                let base_price = 200 + rng.gen_range(0..800);
                let price = match params.cabin_class {
                    CabinClass::Economy => base_price,
                    CabinClass::Business => base_price * 3,
                    _ => base_price * 5,
                };

                let prefix: String = airline
                    .chars()
                    .take(2)
                    .collect::<String>()
                    .to_uppercase();

                Flight {
                    id: format!("flight-{}", i + 1),
                    airline: airline.to_string(),
                    flight_number: format!("{prefix}{}", rng.gen_range(100..1100)),
                    origin: params.origin.clone(),
                    destination: params.destination.clone(),
                    depart_time: format!(
                        "{:02}:{:02}",
                        rng.gen_range(0..24),
                        rng.gen_range(0..60)
                    ),
                    arrival_time: format!(
                        "{:02}:{:02}",
                        rng.gen_range(0..24),
                        rng.gen_range(0..60)
                    ),
                    duration: format!("{}h {}m", 2 + rng.gen_range(0..10), rng.gen_range(0..60)),
                    stops: rng.gen_range(0..3),
                    price,
                    currency: self.currency,
                }
            })
            .collect();

        flights.sort_by_key(|f| f.price);
        flights
    }
}

#[async_trait]
impl FlightProvider for MockProvider {
    async fn search(&self, params: &SearchParams) -> Result<Vec<Flight>, SearchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.generate(params))
    }
}
