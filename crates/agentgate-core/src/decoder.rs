//! Incremental decoder for the agent's NDJSON output.
//!
//! Output chunks are not aligned to line boundaries, so a carry-over buffer
//! holds the unterminated tail between chunks. Assistant events carry the
//! cumulative text so far; the decoder keeps the longest text seen and hands
//! back only the suffix that is new.
//!
//! Lengths are compared in characters, so a suffix never splits a code point.

use bytes::BytesMut;
use tracing::debug;

use crate::domain::AgentStreamEvent;

/// Result of decoding one complete output line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Decoded(AgentStreamEvent),
    /// Not JSON, or not a shape we recognise.
    Skipped,
}

/// Per-line counters for one decode session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub decoded: usize,
    pub skipped: usize,
}

/// Decode state owned by a single agent session.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    carry: BytesMut,
    /// Prefix of `carry` already known to hold no newline.
    scanned: usize,
    text: String,
    text_chars: usize,
    stats: DecodeStats,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a whole, already-complete output in one pass.
    ///
    /// Every line is processed, including a final line with no newline.
    pub fn decode_complete(output: &[u8]) -> Self {
        let mut decoder = Self::new();
        for line in output.split(|&b| b == b'\n') {
            decoder.process_line(line);
        }
        decoder
    }

    /// Feed one chunk of output and return the text increments it produced.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.carry.extend_from_slice(chunk);

        let mut increments = Vec::new();
        while let Some(line_end) = self.next_line_end() {
            let line = self.carry.split_to(line_end);
            if let Some(increment) = self.process_line(&line[..line.len() - 1]) {
                increments.push(increment);
            }
        }
        increments
    }

    /// Position just past the next newline, searching only unscanned bytes.
    fn next_line_end(&mut self) -> Option<usize> {
        match self.carry[self.scanned..].iter().position(|&b| b == b'\n') {
            Some(pos) => {
                let end = self.scanned + pos + 1;
                self.scanned = 0;
                Some(end)
            }
            None => {
                self.scanned = self.carry.len();
                None
            }
        }
    }

    /// End of stream. The unterminated tail, if any, is dropped unprocessed.
    pub fn finish(&mut self) {
        if !self.carry.iter().all(u8::is_ascii_whitespace) {
            debug!(
                bytes = self.carry.len(),
                "Discarding unterminated trailing agent output"
            );
        }
        self.carry.clear();
        self.scanned = 0;
    }

    /// Parse one line as an agent event.
    pub fn decode_line(line: &str) -> LineOutcome {
        serde_json::from_str::<AgentStreamEvent>(line)
            .map_or(LineOutcome::Skipped, LineOutcome::Decoded)
    }

    /// Longest assistant text seen so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub const fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn process_line(&mut self, raw: &[u8]) -> Option<String> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match Self::decode_line(line) {
            LineOutcome::Decoded(event) => {
                self.stats.decoded += 1;
                self.apply(&event)
            }
            LineOutcome::Skipped => {
                self.stats.skipped += 1;
                let preview: String = line.chars().take(200).collect();
                debug!(line = %preview, "Skipping unparseable agent output line");
                None
            }
        }
    }

    /// Record a cumulative text if it is longer than the current one.
    fn apply(&mut self, event: &AgentStreamEvent) -> Option<String> {
        let candidate = event.assistant_text()?;
        let candidate_chars = candidate.chars().count();
        if candidate_chars <= self.text_chars {
            return None;
        }

        let increment: String = candidate.chars().skip(self.text_chars).collect();
        self.text = candidate;
        self.text_chars = candidate_chars;
        Some(increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_line(text: &str) -> String {
        let event = serde_json::json!({
            "type": "assistant",
            "message": {"content": [{"type": "text", "text": text}]}
        });
        format!("{event}\n")
    }

    #[test]
    fn test_cumulative_events_yield_suffixes() {
        let mut decoder = StreamDecoder::new();
        let mut increments = decoder.push(assistant_line("Hel").as_bytes());
        increments.extend(decoder.push(assistant_line("Hello").as_bytes()));

        assert_eq!(increments, vec!["Hel", "lo"]);
        assert_eq!(decoder.text(), "Hello");
    }

    #[test]
    fn test_increments_concatenate_to_final_text() {
        let steps = ["T", "Th", "The q", "The quick", "The quick brown fox"];
        let mut decoder = StreamDecoder::new();
        let mut joined = String::new();
        for step in steps {
            for inc in decoder.push(assistant_line(step).as_bytes()) {
                joined.push_str(&inc);
            }
        }
        assert_eq!(joined, "The quick brown fox");
        assert_eq!(decoder.text(), joined);
    }

    #[test]
    fn test_shorter_or_equal_event_is_ignored() {
        let mut decoder = StreamDecoder::new();
        decoder.push(assistant_line("Hello").as_bytes());

        assert!(decoder.push(assistant_line("Hel").as_bytes()).is_empty());
        assert!(decoder.push(assistant_line("Jello").as_bytes()).is_empty());
        assert_eq!(decoder.text(), "Hello");
        assert_eq!(decoder.stats().decoded, 3);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let line = assistant_line("Hello, world");
        let bytes = line.as_bytes();
        let (a, rest) = bytes.split_at(7);
        let (b, c) = rest.split_at(rest.len() / 2);

        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(a).is_empty());
        assert!(decoder.push(b).is_empty());
        assert_eq!(decoder.push(c), vec!["Hello, world"]);
        assert_eq!(decoder.text(), "Hello, world");
    }

    #[test]
    fn test_large_line_in_small_chunks() {
        let big = "x".repeat(200_000);
        let mut input = assistant_line(&big);
        input.push_str(&assistant_line(&format!("{big}!")));

        let mut decoder = StreamDecoder::new();
        let mut increments = Vec::new();
        for chunk in input.as_bytes().chunks(1000) {
            increments.extend(decoder.push(chunk));
            // Pending bytes are never rescanned on the next push.
            assert_eq!(decoder.scanned, decoder.carry.len());
        }

        assert_eq!(increments.len(), 2);
        assert_eq!(increments[0], big);
        assert_eq!(increments[1], "!");
        assert!(decoder.carry.is_empty());
    }

    #[test]
    fn test_split_inside_multibyte_character() {
        let line = assistant_line("héllo ✓");
        let bytes = line.as_bytes();
        let split = line.find('✓').unwrap() + 1;

        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(&bytes[..split]).is_empty());
        assert_eq!(decoder.push(&bytes[split..]), vec!["héllo ✓"]);
    }

    #[test]
    fn test_multibyte_suffix_is_char_aligned() {
        let mut decoder = StreamDecoder::new();
        decoder.push(assistant_line("日本").as_bytes());
        assert_eq!(decoder.push(assistant_line("日本語").as_bytes()), vec!["語"]);
    }

    #[test]
    fn test_malformed_line_does_not_stop_decoding() {
        let mut input = String::from("not json at all\n");
        input.push_str("{\"type\":\"assistant\"\n");
        input.push_str(&assistant_line("ok"));

        let mut decoder = StreamDecoder::new();
        assert_eq!(decoder.push(input.as_bytes()), vec!["ok"]);
        assert_eq!(
            decoder.stats(),
            DecodeStats {
                decoded: 1,
                skipped: 2
            }
        );
    }

    #[test]
    fn test_other_events_and_blank_lines() {
        let input = "\n{\"type\":\"system\",\"subtype\":\"init\"}\n\r\n{\"type\":\"result\",\"result\":\"x\"}\n";
        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(input.as_bytes()).is_empty());
        assert_eq!(decoder.text(), "");
        assert_eq!(decoder.stats().decoded, 2);
        assert_eq!(decoder.stats().skipped, 0);
    }

    #[test]
    fn test_unterminated_tail_is_not_processed() {
        let line = assistant_line("tail");
        let mut decoder = StreamDecoder::new();
        assert!(decoder.push(line.trim_end().as_bytes()).is_empty());
        decoder.finish();
        assert_eq!(decoder.text(), "");
    }

    #[test]
    fn test_decode_complete_includes_final_line() {
        let mut output = assistant_line("Hel");
        output.push_str("garbage\n");
        output.push_str(assistant_line("Hello").trim_end());

        let decoder = StreamDecoder::decode_complete(output.as_bytes());
        assert_eq!(decoder.text(), "Hello");
        assert_eq!(decoder.stats().skipped, 1);
    }

    #[test]
    fn test_decode_line_outcomes() {
        assert_eq!(StreamDecoder::decode_line("{oops"), LineOutcome::Skipped);
        assert_eq!(
            StreamDecoder::decode_line(r#"{"type":"user","message":{}}"#),
            LineOutcome::Decoded(AgentStreamEvent::Other)
        );
    }
}
