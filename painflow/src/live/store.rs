//! The live delta store.

use super::scheduler::{CoalescingScheduler, ScheduledFlush};
use super::LiveSnapshot;
use crate::observe::{Publisher, Subscription};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

struct PendingFlush {
    ticket: u64,
    handle: Box<dyn ScheduledFlush>,
}

struct LiveState {
    published: Arc<LiveSnapshot>,
    buffer: String,
    pending: Option<PendingFlush>,
    next_ticket: u64,
    flushing: bool,
}

impl LiveState {
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.cancel();
        }
    }

    /// Installs `next` as the published snapshot if any field changed.
    fn replace(&mut self, next: LiveSnapshot) -> Option<Arc<LiveSnapshot>> {
        if *self.published == next {
            return None;
        }
        self.published = Arc::new(next);
        Some(Arc::clone(&self.published))
    }
}

struct Shared {
    state: Mutex<LiveState>,
    publisher: Publisher<LiveSnapshot>,
    scheduler: Arc<dyn CoalescingScheduler>,
}

/// Aggregates a fast stream of text fragments into render-safe snapshots.
///
/// One producer calls [`start`](Self::start), then
/// [`append_delta`](Self::append_delta) per fragment, then
/// [`commit`](Self::commit). Fragments collect in a private buffer and reach
/// observers through at most one flush per scheduler tick. A snapshot is
/// published only when one of its fields changed.
///
/// The handle is cheap to clone; clones share state.
#[derive(Clone)]
pub struct LiveDeltaStore {
    shared: Arc<Shared>,
}

impl LiveDeltaStore {
    /// Creates an idle store flushing on `scheduler`'s ticks.
    pub fn new(scheduler: impl CoalescingScheduler + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(LiveState {
                    published: Arc::new(LiveSnapshot::default()),
                    buffer: String::new(),
                    pending: None,
                    next_ticket: 0,
                    flushing: false,
                }),
                publisher: Publisher::new(),
                scheduler: Arc::new(scheduler),
            }),
        }
    }

    /// Begins a session for `assistant_id`.
    ///
    /// `session_id` defaults to `assistant_id`. Any unfinished session is
    /// dropped along with its buffered text. Returns true when that session
    /// was still streaming.
    pub fn start(&self, assistant_id: impl Into<String>, session_id: Option<&str>) -> bool {
        let assistant_id = assistant_id.into();
        let session_id = session_id
            .filter(|s| !s.is_empty())
            .map_or_else(|| assistant_id.clone(), str::to_string);

        let mut superseded = false;
        self.shared.publisher.publish_with(|| {
            let mut state = self.shared.state.lock();
            superseded = state.published.streaming;
            state.cancel_pending();
            state.buffer.clear();
            state.replace(LiveSnapshot {
                assistant_id: Some(assistant_id.clone()),
                assistant_text: String::new(),
                streaming: true,
                session_id: Some(session_id.clone()),
            })
        });

        if superseded {
            info!(assistant_id = %assistant_id, session_id = %session_id, "Superseded a streaming session");
        } else {
            debug!(assistant_id = %assistant_id, session_id = %session_id, "Session started");
        }
        superseded
    }

    /// Buffers `fragment` and schedules a flush if none is pending.
    ///
    /// No-op when not streaming or when `fragment` is empty.
    pub fn append_delta(&self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        let mut state = self.shared.state.lock();
        if !state.published.streaming {
            debug!(len = fragment.len(), "Dropping fragment outside a session");
            return;
        }
        state.buffer.push_str(fragment);
        if state.pending.is_none() {
            self.schedule_flush(&mut state);
        }
    }

    /// Moves buffered text into the published snapshot now.
    ///
    /// Returns whether a snapshot was published. A flush requested from an
    /// observer while a flush is notifying is skipped; its text goes out on
    /// the next tick.
    pub fn flush(&self) -> bool {
        let mut claimed = false;
        let published = self.shared.publisher.publish_with(|| {
            let mut state = self.shared.state.lock();
            if state.flushing || state.buffer.is_empty() {
                return None;
            }
            claimed = true;
            state.flushing = true;
            state.cancel_pending();

            let buffered = std::mem::take(&mut state.buffer);
            let mut next = LiveSnapshot::clone(&state.published);
            next.assistant_text.push_str(&buffered);
            debug!(flushed = buffered.len(), total = next.assistant_text.len(), "Flushing buffered text");
            state.replace(next)
        });

        if claimed {
            let mut state = self.shared.state.lock();
            state.flushing = false;
            if !state.buffer.is_empty() && state.pending.is_none() {
                self.schedule_flush(&mut state);
            }
        }
        published
    }

    /// Flushes buffered text, then ends the session. Idempotent.
    ///
    /// Called from an observer while a flush is notifying, the nested flush
    /// is skipped: `streaming` turns false first and text buffered during
    /// that notification is published by the next tick, after the session
    /// has ended. Producers should commit from outside observers.
    pub fn commit(&self) {
        let _order = self.shared.publisher.hold_order();
        self.flush();
        self.shared.publisher.publish_with(|| {
            let mut state = self.shared.state.lock();
            let mut next = LiveSnapshot::clone(&state.published);
            next.streaming = false;
            state.replace(next)
        });
    }

    /// Clears every field and drops buffered text.
    pub fn reset(&self) {
        self.shared.publisher.publish_with(|| {
            let mut state = self.shared.state.lock();
            state.cancel_pending();
            state.buffer.clear();
            state.replace(LiveSnapshot::default())
        });
    }

    /// Resets the store and drops every observer.
    pub fn dispose(&self) {
        self.reset();
        self.shared.publisher.clear();
        debug!("Live store disposed");
    }

    /// The current published snapshot.
    #[must_use]
    pub fn get_snapshot(&self) -> Arc<LiveSnapshot> {
        Arc::clone(&self.shared.state.lock().published)
    }

    /// Returns true between `start` and `commit`.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.shared.state.lock().published.streaming
    }

    /// Bytes buffered but not yet published.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.shared.state.lock().buffer.len()
    }

    /// Registers an observer called with every published snapshot.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<LiveSnapshot>) + Send + Sync + 'static,
    {
        self.shared.publisher.subscribe(observer)
    }

    fn schedule_flush(&self, state: &mut LiveState) {
        state.next_ticket += 1;
        let ticket = state.next_ticket;
        let shared = Arc::downgrade(&self.shared);
        let handle = self.shared.scheduler.schedule(Box::new(move || {
            if let Some(shared) = shared.upgrade() {
                LiveDeltaStore { shared }.run_scheduled(ticket);
            }
        }));
        state.pending = Some(PendingFlush { ticket, handle });
    }

    fn run_scheduled(&self, ticket: u64) {
        {
            let mut state = self.shared.state.lock();
            if state.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
                return;
            }
            state.pending = None;
        }
        self.flush();
    }
}

impl std::fmt::Debug for LiveDeltaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("LiveDeltaStore")
            .field("published", &state.published)
            .field("buffered", &state.buffer.len())
            .field("pending", &state.pending.is_some())
            .finish_non_exhaustive()
    }
}
