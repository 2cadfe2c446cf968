//! The events the search screen sends, and the state it renders.

use std::{fmt, sync::Weak};

use log::debug;
use tunescout_catalog::SearchResult;

/// Everything the search screen can ask of its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The query text changed, search once it settles.
    UpdateQuery(String),
    /// Search for the current query right away.
    Search,
    /// Clear the query and the results.
    ClearQuery,
    /// A result was selected.
    ClickResult(SearchResult),
}

/// A snapshot of the search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    /// Nothing has been typed and there is nothing to show.
    Empty { query: String, event_sink: EventSink },
    Loaded {
        query: String,
        results: Vec<SearchResult>,
        is_searching: bool,
        event_sink: EventSink,
    },
}

impl SearchState {
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Empty { query, .. } | Self::Loaded { query, .. } => query,
        }
    }

    /// The results on screen, empty for [`SearchState::Empty`].
    #[must_use]
    pub fn results(&self) -> &[SearchResult] {
        match self {
            Self::Empty { .. } => &[],
            Self::Loaded { results, .. } => results,
        }
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        match self {
            Self::Empty { .. } => false,
            Self::Loaded { is_searching, .. } => *is_searching,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// Where to send [`SearchEvent`]s for the session this snapshot came from.
    #[must_use]
    pub const fn event_sink(&self) -> &EventSink {
        match self {
            Self::Empty { event_sink, .. } | Self::Loaded { event_sink, .. } => event_sink,
        }
    }
}

pub(crate) trait EventHandler: Send + Sync {
    fn handle_event(&self, event: SearchEvent);
}

/// A handle for sending events to a search session.
///
/// Sending is synchronous: by the time [`EventSink::send`] returns, the session has applied the
/// event. A sink doesn't keep its session alive, events sent after the session is gone are dropped.
#[derive(Clone)]
pub struct EventSink {
    handler: Weak<dyn EventHandler>,
}

impl EventSink {
    pub(crate) fn new(handler: Weak<dyn EventHandler>) -> Self {
        Self { handler }
    }

    pub fn send(&self, event: SearchEvent) {
        match self.handler.upgrade() {
            Some(handler) => handler.handle_event(event),
            None => debug!("search session is gone, dropping {event:?}"),
        }
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("attached", &(self.handler.strong_count() > 0))
            .finish()
    }
}

/// Two sinks are equal if they send to the same session.
impl PartialEq for EventSink {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.handler, &other.handler)
    }
}

impl Eq for EventSink {}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<SearchEvent>>,
    }

    impl EventHandler for Recorder {
        fn handle_event(&self, event: SearchEvent) {
            self.events.lock().push(event);
        }
    }

    fn sink_for(recorder: &Arc<Recorder>) -> EventSink {
        let handler: Arc<dyn EventHandler> = recorder.clone();
        EventSink::new(Arc::downgrade(&handler))
    }

    #[test]
    fn test_sink_forwards_events() {
        let recorder = Arc::new(Recorder::default());
        let sink = sink_for(&recorder);

        sink.send(SearchEvent::UpdateQuery("raye".into()));
        sink.send(SearchEvent::Search);

        assert_eq!(
            *recorder.events.lock(),
            vec![SearchEvent::UpdateQuery("raye".into()), SearchEvent::Search]
        );
    }

    #[test]
    fn test_sink_drops_events_once_detached() {
        let recorder = Arc::new(Recorder::default());
        let sink = sink_for(&recorder);
        drop(recorder);

        // must not panic
        sink.send(SearchEvent::ClearQuery);
        assert_eq!(format!("{sink:?}"), "EventSink { attached: false }");
    }

    #[test]
    fn test_sink_equality() {
        let a = Arc::new(Recorder::default());
        let b = Arc::new(Recorder::default());

        assert_eq!(sink_for(&a), sink_for(&a));
        assert_ne!(sink_for(&a), sink_for(&b));
    }

    #[test]
    fn test_state_accessors() {
        let recorder = Arc::new(Recorder::default());
        let empty = SearchState::Empty {
            query: String::new(),
            event_sink: sink_for(&recorder),
        };
        assert!(empty.is_empty());
        assert_eq!(empty.query(), "");
        assert!(empty.results().is_empty());
        assert!(!empty.is_searching());

        let loaded = SearchState::Loaded {
            query: "raye".into(),
            results: vec![SearchResult::default()],
            is_searching: true,
            event_sink: sink_for(&recorder),
        };
        assert!(!loaded.is_empty());
        assert_eq!(loaded.query(), "raye");
        assert_eq!(loaded.results().len(), 1);
        assert!(loaded.is_searching());
        assert_eq!(loaded.event_sink(), empty.event_sink());
    }
}
