//! Feeds a byte stream into a [`LiveDeltaStore`].

use super::{LiveDeltaStore, StreamDecoder, StreamRecord};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tracing::{debug, warn};

/// What one pumped stream delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PumpSummary {
    /// Text fragments appended to the store.
    pub fragments: usize,
    /// Characters across those fragments.
    pub characters: usize,
    /// True if the stream ended with the sentinel rather than by closing.
    pub saw_end_marker: bool,
}

impl PumpSummary {
    /// Returns true if no text reached the store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.characters == 0
    }

    fn record(&mut self, store: &LiveDeltaStore, record: StreamRecord) -> bool {
        match record {
            StreamRecord::TextDelta(text) => {
                self.fragments += 1;
                self.characters += text.chars().count();
                store.append_delta(&text);
                false
            }
            StreamRecord::PassThrough(line) => {
                debug!(line = %line, "Ignoring pass-through record");
                false
            }
            StreamRecord::End => {
                self.saw_end_marker = true;
                true
            }
        }
    }
}

/// Decodes `stream` into the store's current session.
///
/// Stops at the end sentinel or when the stream closes. The session is
/// always committed, also when the stream fails; the stream's error is then
/// returned.
pub async fn pump_stream<S, B, E>(store: &LiveDeltaStore, stream: S) -> Result<PumpSummary, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut decoder = StreamDecoder::new();
    let mut summary = PumpSummary::default();
    futures::pin_mut!(stream);

    let outcome = 'read: loop {
        match stream.next().await {
            Some(Ok(chunk)) => {
                for record in decoder.push(chunk.as_ref()) {
                    if summary.record(store, record) {
                        break 'read Ok(());
                    }
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, fragments = summary.fragments, "Stream failed mid-session");
                break 'read Err(e);
            }
            None => {
                if let Some(record) = decoder.finish() {
                    summary.record(store, record);
                }
                break 'read Ok(());
            }
        }
    };

    store.commit();
    debug!(
        fragments = summary.fragments,
        characters = summary.characters,
        saw_end_marker = summary.saw_end_marker,
        "Stream pumped"
    );
    outcome.map(|()| summary)
}
