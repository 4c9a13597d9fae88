//! Debounced search-as-you-type with stale-response dropping
//!
//! Each fired search takes a ticket from a [`SearchSession`]. Responses whose
//! ticket is no longer current are dropped on arrival, so a slow answer to an
//! old query can never overwrite the suggestions for a newer one. In-flight
//! requests are not cancelled; they simply lose.

use crate::matcher::LocationMatcher;
use crate::provider::Geocoder;
use ridefare_search::Candidate;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Generation counter for one input field.
#[derive(Debug, Default)]
pub struct SearchSession {
    generation: AtomicU64,
}

/// Proof that a search was started at a particular generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    /// Generation this ticket was issued at
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

impl SearchSession {
    /// Create a session at generation zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, making every earlier ticket stale
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Make every outstanding ticket stale without starting a search
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// True while no newer search has begun
    #[must_use]
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Latest generation handed out
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

/// Suggestions published by a [`SuggestionFeed`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionUpdate {
    /// Generation of the search that produced this update
    pub generation: u64,
    /// Query as typed
    pub query: String,
    /// Ranked suggestions, empty when nothing matched or the search failed
    pub suggestions: Vec<Candidate>,
}

/// Handle to a running search-as-you-type task.
///
/// Dropping the handle (or calling [`SuggestionFeed::close`]) stops the
/// debounce loop; searches already in flight finish in the background.
pub struct SuggestionFeed {
    keystrokes: mpsc::UnboundedSender<String>,
    updates: watch::Receiver<SuggestionUpdate>,
    session: Arc<SearchSession>,
    task: JoinHandle<()>,
}

impl SuggestionFeed {
    /// Report the current text of the input field
    ///
    /// Returns false once the feed has stopped.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.keystrokes.send(text.into()).is_ok()
    }

    /// Receiver that sees every accepted update
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SuggestionUpdate> {
        self.updates.clone()
    }

    /// Most recent accepted update
    #[must_use]
    pub fn latest(&self) -> SuggestionUpdate {
        self.updates.borrow().clone()
    }

    /// Generation counter shared with the background task
    #[must_use]
    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Stop accepting keystrokes and wait for the debounce loop to exit
    pub async fn close(self) {
        drop(self.keystrokes);
        if let Err(e) = self.task.await {
            debug!(error = %e, "Suggestion feed task ended abnormally");
        }
    }
}

/// Spawn a debounced suggestion loop on the current tokio runtime.
///
/// A search fires once no keystroke has arrived for `debounce`; every
/// keystroke restarts the wait, so at most one search intent is pending at a
/// time. Fired searches run concurrently, and only the newest one may publish.
pub fn spawn_suggestion_feed<G>(matcher: Arc<LocationMatcher<G>>, debounce: Duration) -> SuggestionFeed
where
    G: Geocoder + 'static,
{
    let session = Arc::new(SearchSession::new());
    let (keystrokes, mut rx) = mpsc::unbounded_channel::<String>();
    let (updates_tx, updates) = watch::channel(SuggestionUpdate::default());
    let updates_tx = Arc::new(updates_tx);

    let task = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            let mut pending: Option<String> = None;

            loop {
                let received = if pending.is_some() {
                    tokio::select! {
                        received = rx.recv() => received,
                        () = tokio::time::sleep(debounce) => {
                            if let Some(query) = pending.take() {
                                fire(&matcher, &session, &updates_tx, query);
                            }
                            continue;
                        }
                    }
                } else {
                    rx.recv().await
                };

                match received {
                    Some(text) => pending = Some(text),
                    None => break,
                }
            }

            debug!("Suggestion feed closed");
        })
    };

    SuggestionFeed {
        keystrokes,
        updates,
        session,
        task,
    }
}

fn fire<G: Geocoder + 'static>(
    matcher: &Arc<LocationMatcher<G>>,
    session: &Arc<SearchSession>,
    updates: &Arc<watch::Sender<SuggestionUpdate>>,
    query: String,
) {
    let ticket = session.begin();
    let matcher = Arc::clone(matcher);
    let session = Arc::clone(session);
    let updates = Arc::clone(updates);

    debug!(generation = ticket.generation(), query = %query, "Debounce elapsed, searching");

    tokio::spawn(async move {
        let suggestions = matcher.suggest(&query).await;

        // Checked under the channel lock so two finishing searches cannot interleave
        let published = updates.send_if_modified(|current| {
            if session.is_current(ticket) && current.generation < ticket.generation() {
                *current = SuggestionUpdate {
                    generation: ticket.generation(),
                    query,
                    suggestions,
                };
                true
            } else {
                false
            }
        });

        if !published {
            debug!(
                generation = ticket.generation(),
                current = session.generation(),
                "Dropping stale suggestions"
            );
        }
    });
}
