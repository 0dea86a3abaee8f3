//! Published state of the live delta store.

use serde::{Deserialize, Serialize};

/// One immutable view of the streamed assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    /// Message being assembled, `None` when idle.
    pub assistant_id: Option<String>,
    /// Text flushed so far. Buffered fragments are not included.
    pub assistant_text: String,
    /// True between `start` and `commit`.
    pub streaming: bool,
    /// Session the text belongs to.
    pub session_id: Option<String>,
}

impl LiveSnapshot {
    /// Returns true if no session has been started since the last reset.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.assistant_id.is_none() && !self.streaming
    }
}
