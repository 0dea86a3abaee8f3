//! Decoder for the line-delimited chat stream.
//!
//! Each line is one record. `0:` followed by a JSON object carries a text
//! fragment when the object's `type` is `text-delta`; `[DONE]` ends the
//! stream. Everything else is passed through untouched.

use serde::Deserialize;
use tracing::debug;

/// One decoded line of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRecord {
    /// A text fragment for the live store.
    TextDelta(String),
    /// A line that carries no text fragment.
    PassThrough(String),
    /// The end-of-stream sentinel.
    End,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum FramedRecord {
    TextDelta {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Other,
}

const FRAME_PREFIX: &str = "0:";
const END_MARKERS: [&str; 2] = ["[DONE]", "data: [DONE]"];

/// Splits raw byte chunks into [`StreamRecord`]s.
///
/// Chunks may end anywhere, including inside a line or a UTF-8 sequence;
/// incomplete lines wait for the next chunk.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    partial: Vec<u8>,
}

impl StreamDecoder {
    /// Creates an empty decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns every record it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamRecord> {
        self.partial.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(newline) = self.partial.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=newline).collect();
            if let Some(record) = decode_line(&line[..line.len() - 1]) {
                records.push(record);
            }
        }
        records
    }

    /// Decodes whatever is left after the last newline.
    pub fn finish(&mut self) -> Option<StreamRecord> {
        let rest = std::mem::take(&mut self.partial);
        decode_line(&rest)
    }

    /// Bytes waiting for a newline.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.partial.len()
    }
}

fn decode_line(raw: &[u8]) -> Option<StreamRecord> {
    let text = String::from_utf8_lossy(raw);
    let line = text.trim();
    if line.is_empty() {
        return None;
    }
    if END_MARKERS.contains(&line) {
        return Some(StreamRecord::End);
    }

    let Some(payload) = line.strip_prefix(FRAME_PREFIX) else {
        return Some(StreamRecord::PassThrough(line.to_string()));
    };
    match serde_json::from_str::<FramedRecord>(payload) {
        Ok(FramedRecord::TextDelta { text }) => Some(StreamRecord::TextDelta(text)),
        Ok(FramedRecord::Other) => Some(StreamRecord::PassThrough(line.to_string())),
        Err(e) => {
            debug!(error = %e, "Skipping malformed stream record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decodes_text_deltas() {
        let mut decoder = StreamDecoder::new();
        let records = decoder.push(
            b"0:{\"type\":\"text-delta\",\"text\":\"Hel\"}\n0:{\"type\":\"text-delta\",\"text\":\"lo\"}\n",
        );
        assert_eq!(
            records,
            vec![
                StreamRecord::TextDelta("Hel".to_string()),
                StreamRecord::TextDelta("lo".to_string())
            ]
        );
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = StreamDecoder::new();
        let head = b"0:{\"type\":\"text-de";
        assert!(decoder.push(head).is_empty());
        assert_eq!(decoder.pending_bytes(), head.len());

        let records = decoder.push(b"lta\",\"text\":\"ok\"}\n");
        assert_eq!(records, vec![StreamRecord::TextDelta("ok".to_string())]);
        assert_eq!(decoder.pending_bytes(), 0);
    }

    #[test]
    fn test_utf8_split_inside_character() {
        let line = "0:{\"type\":\"text-delta\",\"text\":\"こんにちは\"}\n".as_bytes();
        let (head, tail) = line.split_at(35);

        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(head).is_empty());
        assert_eq!(
            decoder.push(tail),
            vec![StreamRecord::TextDelta("こんにちは".to_string())]
        );
    }

    #[test]
    fn test_end_markers_and_pass_through() {
        let mut decoder = StreamDecoder::new();
        let records = decoder.push(
            b"2:[{\"step\":1}]\n0:{\"type\":\"finish\"}\r\n\n[DONE]\ndata: [DONE]\n",
        );
        assert_eq!(
            records,
            vec![
                StreamRecord::PassThrough("2:[{\"step\":1}]".to_string()),
                StreamRecord::PassThrough("0:{\"type\":\"finish\"}".to_string()),
                StreamRecord::End,
                StreamRecord::End,
            ]
        );
    }

    #[test]
    fn test_malformed_frames_are_skipped() {
        let mut decoder = StreamDecoder::new();
        let records = decoder.push(b"0:{not json\n0:\"bare string\"\n0:{\"type\":\"text-delta\",\"text\":\"x\"}\n");
        assert_eq!(records, vec![StreamRecord::TextDelta("x".to_string())]);
    }

    #[test]
    fn test_finish_flushes_trailing_line() {
        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(b"0:{\"type\":\"text-delta\",\"text\":\"tail\"}").is_empty());
        assert_eq!(decoder.finish(), Some(StreamRecord::TextDelta("tail".to_string())));
        assert_eq!(decoder.finish(), None);
    }
}
