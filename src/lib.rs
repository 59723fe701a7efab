pub mod error;
pub mod filter;
pub mod history;
pub mod model;
pub mod provider;
pub mod query;
pub mod serp;
pub mod state;
pub mod table;

use error::SearchError;
use model::Flight;
use provider::FlightProvider;
use query::SearchParams;

const DEEP_LINK_BASE: &str = "https://skyfare.app/search";

pub async fn search(
    params: SearchParams,
    provider: &dyn FlightProvider,
) -> Result<Vec<Flight>, SearchError> {
    params.validate()?;
    provider.search(&params).await
}

pub fn deep_link_url(params: &SearchParams) -> String {
    format!("{DEEP_LINK_BASE}?{}", params.to_query_string())
}
