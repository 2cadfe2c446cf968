//! The search session.
//!
//! A [`SearchStateProvider`] owns the state of one search screen: the query being typed, the
//! results of the last search, and whether a search is in flight. The UI sends it
//! [`SearchEvent`]s and renders the [`SearchState`] snapshots it publishes.

pub mod provider;
pub mod state;
#[cfg(test)]
mod test_utils;

pub use provider::{SEARCH_DEBOUNCE, SearchStateProvider, SessionSettings};
pub use state::{EventSink, SearchEvent, SearchState};
