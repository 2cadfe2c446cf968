//! The search session state provider.
//!
//! Every search runs as a tokio task. At most one task is active: scheduling a search, clearing
//! the query, or disposing the session supersedes whatever task came before it. A superseded task
//! is aborted, and because an abort only lands at the task's next suspension point, every task
//! also carries the generation it was spawned for and re-checks it under the session lock right
//! before each write. A superseded task never writes.

use std::{
    str::FromStr,
    sync::{Arc, Weak},
    time::Duration,
};

use log::{debug, error, trace, warn};
use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
};
use tracing::Instrument as _;

use tunescout_catalog::{Catalog, MediaKind, SearchRequest, SearchResult};
use tunescout_core::config::{DEFAULT_DEBOUNCE_MS, SearchSettings};

use crate::state::{EventHandler, EventSink, SearchEvent, SearchState};

/// How long the query has to stay unchanged before it is searched for.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// How a session searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub media: MediaKind,
    pub limit: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SearchSettings::default())
    }
}

impl From<&SearchSettings> for SessionSettings {
    fn from(settings: &SearchSettings) -> Self {
        let media = MediaKind::from_str(&settings.media).unwrap_or_else(|_| {
            warn!("unknown media kind {:?}, searching for music", settings.media);
            MediaKind::default()
        });

        Self {
            debounce: settings.debounce(),
            media,
            limit: settings.limit,
        }
    }
}

/// The mutable state of a session.
#[derive(Debug, Default)]
struct Session {
    query: String,
    results: Vec<SearchResult>,
    is_searching: bool,
    /// Bumped every time the active task is superseded.
    generation: u64,
    active_task: Option<JoinHandle<()>>,
    disposed: bool,
}

impl Session {
    fn new(query: String) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Cancel the active task (if any), returning the generation of whatever comes next.
    fn supersede(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.active_task.take() {
            task.abort();
        }
        // a superseded task never gets to reset this itself
        self.is_searching = false;
        self.generation
    }
}

struct Shared<C: Catalog> {
    session: Mutex<Session>,
    catalog: Arc<C>,
    settings: SessionSettings,
    runtime: Handle,
    state_tx: UnboundedSender<SearchState>,
    this: Weak<Self>,
}

impl<C: Catalog> Shared<C> {
    fn event_sink(&self) -> EventSink {
        let handler: Weak<dyn EventHandler> = self.this.clone();
        EventSink::new(handler)
    }

    /// Derive the state shown to the UI from the session.
    fn derive(&self, session: &Session) -> SearchState {
        let event_sink = self.event_sink();
        if session.is_blank() && session.results.is_empty() {
            SearchState::Empty {
                query: session.query.clone(),
                event_sink,
            }
        } else {
            SearchState::Loaded {
                query: session.query.clone(),
                results: session.results.clone(),
                is_searching: session.is_searching,
                event_sink,
            }
        }
    }

    /// Send a snapshot of the session to the UI.
    ///
    /// Called with the session locked, so snapshots go out in the order the changes were made.
    fn publish(&self, session: &Session) {
        if self.state_tx.send(self.derive(session)).is_err() {
            trace!("no one is listening for search state updates");
        }
    }

    /// Search for the query once the debounce period passes without another change.
    fn debounced_search(&self, session: &mut Session) {
        let generation = session.supersede();
        if session.is_blank() {
            session.results.clear();
            return;
        }
        self.spawn_search(session, generation, Some(self.settings.debounce));
    }

    /// Search for the query now.
    fn immediate_search(&self, session: &mut Session) {
        let generation = session.supersede();
        if session.is_blank() {
            session.results.clear();
            return;
        }
        self.spawn_search(session, generation, None);
    }

    fn spawn_search(&self, session: &mut Session, generation: u64, delay: Option<Duration>) {
        let Some(this) = self.this.upgrade() else {
            return;
        };
        let span = tracing::debug_span!("search_task", generation, query = %session.query);
        session.active_task = Some(
            self.runtime
                .spawn(run_search(this, generation, delay).instrument(span)),
        );
    }
}

impl<C: Catalog> EventHandler for Shared<C> {
    fn handle_event(&self, event: SearchEvent) {
        let mut session = self.session.lock();
        if session.disposed {
            debug!("search session was disposed, ignoring {event:?}");
            return;
        }

        match event {
            SearchEvent::UpdateQuery(query) => {
                session.query = query;
                self.debounced_search(&mut session);
            }
            SearchEvent::Search => self.immediate_search(&mut session),
            SearchEvent::ClearQuery => {
                session.supersede();
                session.query.clear();
                session.results.clear();
            }
            SearchEvent::ClickResult(result) => {
                trace!("selected {:?} ({:?})", result.title(), result.id());
                return;
            }
        }

        self.publish(&session);
    }
}

/// The body of a search task.
async fn run_search<C: Catalog>(
    shared: Arc<Shared<C>>,
    generation: u64,
    delay: Option<Duration>,
) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let request = {
        let mut session = shared.session.lock();
        if session.generation != generation {
            return;
        }
        session.is_searching = true;
        shared.publish(&session);

        SearchRequest::new(session.query.clone())
            .media(shared.settings.media)
            .limit(shared.settings.limit)
    };
    let term = request.term.clone();

    debug!("Searching for: {term}");
    let outcome = shared.catalog.search(request).await;

    let mut session = shared.session.lock();
    if session.generation != generation {
        trace!("discarding the results of a superseded search for {term:?}");
        return;
    }

    match outcome {
        Ok(response) => {
            debug!("Found {} results", response.result_count);
            session.results = response.results;
        }
        // stale results stay on screen
        Err(e) => error!("Search failed for {term:?}: {e}"),
    }
    session.is_searching = false;
    session.active_task = None;
    shared.publish(&session);
}

/// The state provider for one search session.
///
/// Dropping the provider disposes of the session.
pub struct SearchStateProvider<C: Catalog> {
    shared: Arc<Shared<C>>,
}

impl<C: Catalog> SearchStateProvider<C> {
    /// Start a search session, and return the receiver for listening to state updates.
    ///
    /// The initial state is sent once, followed by a snapshot for every change.
    /// If `initial_query` isn't blank, it is searched for right away.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn start(
        initial_query: impl Into<String>,
        catalog: Arc<C>,
        settings: SessionSettings,
    ) -> (Self, UnboundedReceiver<SearchState>) {
        let (state_tx, state_rx) = unbounded_channel::<SearchState>();

        let shared = Arc::new_cyclic(|this| Shared {
            session: Mutex::new(Session::new(initial_query.into())),
            catalog,
            settings,
            runtime: Handle::current(),
            state_tx,
            this: this.clone(),
        });

        {
            let mut session = shared.session.lock();
            // the initial state once
            shared.publish(&session);
            if !session.is_blank() {
                shared.immediate_search(&mut session);
            }
        }

        (Self { shared }, state_rx)
    }

    /// The current state of the session.
    #[must_use]
    pub fn state(&self) -> SearchState {
        let session = self.shared.session.lock();
        self.shared.derive(&session)
    }

    /// Apply an event to the session.
    pub fn handle_event(&self, event: SearchEvent) {
        self.shared.handle_event(event);
    }

    /// A handle for sending events to this session.
    #[must_use]
    pub fn event_sink(&self) -> EventSink {
        self.shared.event_sink()
    }

    /// Whether a search is scheduled or in flight.
    #[must_use]
    pub fn has_active_task(&self) -> bool {
        self.shared
            .session
            .lock()
            .active_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Tear the session down, cancelling any active search.
    pub fn dispose(self) {
        drop(self);
    }
}

impl<C: Catalog> Drop for SearchStateProvider<C> {
    fn drop(&mut self) {
        let mut session = self.shared.session.lock();
        session.supersede();
        session.disposed = true;
        debug!("search session disposed");
    }
}
