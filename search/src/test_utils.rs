use std::{collections::HashMap, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::sync::{Notify, mpsc::UnboundedReceiver};

use tunescout_catalog::{Catalog, CatalogError, SearchRequest, SearchResponse, SearchResult};

use crate::state::SearchState;

const RECORDED: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../assets/search_result.json"
));

/// The response recorded from a real search for "raye".
pub fn recorded_response() -> SearchResponse {
    serde_json::from_str(RECORDED).unwrap()
}

pub fn result(id: i64, artist: &str, track: &str) -> SearchResult {
    SearchResult {
        track_id: Some(id),
        artist_name: artist.into(),
        track_name: Some(track.into()),
        kind: Some("song".into()),
        wrapper_type: "track".into(),
        ..SearchResult::default()
    }
}

pub fn response(results: Vec<SearchResult>) -> SearchResponse {
    SearchResponse {
        result_count: results.len() as i64,
        results,
    }
}

/// Wait for the next published state, panicking if none arrives within a minute of (test) time.
pub async fn next_state(rx: &mut UnboundedReceiver<SearchState>) -> SearchState {
    tokio::time::timeout(Duration::from_secs(60), rx.recv())
        .await
        .expect("timed out waiting for a state update")
        .expect("the state channel was closed")
}

#[derive(Debug)]
enum Scripted {
    Respond(SearchResponse),
    Fail,
}

/// A catalog with scripted responses.
///
/// Terms without a script get an empty response.
#[derive(Default)]
pub struct MockCatalog {
    scripts: HashMap<String, Scripted>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    requests: Mutex<Vec<SearchRequest>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, term: &str, response: SearchResponse) -> Self {
        self.scripts
            .insert(term.to_owned(), Scripted::Respond(response));
        self
    }

    pub fn fail(mut self, term: &str) -> Self {
        self.scripts.insert(term.to_owned(), Scripted::Fail);
        self
    }

    /// Hold searches for `term` until the returned gate is notified.
    pub fn gate(&self, term: &str) -> Arc<Notify> {
        self.gates
            .lock()
            .entry(term.to_owned())
            .or_default()
            .clone()
    }

    /// The terms searched for, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|request| request.term.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().clone()
    }
}

impl Catalog for MockCatalog {
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CatalogError> {
        let term = request.term.clone();
        self.requests.lock().push(request);

        let gate = self.gates.lock().get(&term).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.scripts.get(&term) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail) => Err(CatalogError::Decode(
                serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            )),
            None => Ok(SearchResponse::default()),
        }
    }
}
