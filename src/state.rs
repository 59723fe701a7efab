use std::sync::Arc;

use crate::error::SearchError;
use crate::history::{self, HistoryStore};
use crate::model::Flight;
use crate::provider::FlightProvider;
use crate::query::SearchParams;

/// Issued by `begin_search`; a completion carrying a stale ticket is ignored.
#[derive(Debug)]
pub struct SearchTicket {
    seq: u64,
}

/// Single source of truth for the current query, its results and status.
///
/// There is no parallelism here: one logical thread drives user events and
/// provider completions. A newer search simply supersedes an older one, so
/// completions are tagged with a sequence number and late arrivals from a
/// superseded call are discarded instead of overwriting fresher results.
pub struct SearchState {
    provider: Arc<dyn FlightProvider>,
    store: Box<dyn HistoryStore>,
    pub params: Option<SearchParams>,
    pub results: Vec<Flight>,
    pub loading: bool,
    pub error: Option<String>,
    pub recent: Vec<SearchParams>,
    last_issued: u64,
}

impl SearchState {
    pub fn new(provider: Arc<dyn FlightProvider>, store: Box<dyn HistoryStore>) -> Self {
        // A broken store degrades to an empty history, never a startup failure.
        let recent = store.load().unwrap_or_default();
        Self {
            provider,
            store,
            params: None,
            results: Vec::new(),
            loading: false,
            error: None,
            recent,
            last_issued: 0,
        }
    }

    pub fn begin_search(&mut self, params: SearchParams) -> SearchTicket {
        self.loading = true;
        self.error = None;
        history::push_recent(&mut self.recent, &params);
        let _ = self.store.save(&self.recent);
        self.params = Some(params);
        self.last_issued += 1;
        SearchTicket {
            seq: self.last_issued,
        }
    }

    /// Returns the provider error when this completion was the latest issued
    /// search and it failed, so one-shot callers can surface it. The state
    /// itself only ever records the user-facing message.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Flight>, SearchError>,
    ) -> Option<SearchError> {
        if ticket.seq != self.last_issued {
            return None;
        }
        self.loading = false;
        match outcome {
            Ok(flights) => {
                self.results = flights;
                None
            }
            // Stale results stay on screen; a search that failed should not
            // blank out the last good list.
            Err(e) => {
                self.error = Some(e.to_string());
                Some(e)
            }
        }
    }

    pub async fn perform_search(&mut self, params: SearchParams) -> Option<SearchError> {
        let provider = Arc::clone(&self.provider);
        let ticket = self.begin_search(params.clone());
        let outcome = provider.search(&params).await;
        self.complete_search(ticket, outcome)
    }

    pub fn clear_history(&mut self) {
        self.recent.clear();
        let _ = self.store.clear();
    }
}
