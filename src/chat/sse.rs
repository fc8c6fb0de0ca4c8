//! Incremental decoder for the `text/event-stream` body of a chat reply.
//!
//! Bytes go in through [`EventStreamDecoder::feed`] in whatever chunks the
//! network delivers; completed tokens come out. [`EventStreamDecoder::finish`]
//! flushes whatever is left once the body ends.

use serde_json::Value;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Token(String),
    Done,
    Skip,
    /// Looked like a data line but the JSON did not parse.
    Incomplete,
}

fn classify(raw: &str) -> Line {
    let line = raw.strip_suffix('\r').unwrap_or(raw);
    if line.starts_with(':') || line.trim().is_empty() {
        return Line::Skip;
    }
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Line::Skip;
    };

    let payload = payload.trim();
    if payload == DONE_MARKER {
        return Line::Done;
    }

    match serde_json::from_str::<Value>(payload) {
        Ok(value) => match delta_content(&value) {
            Some(token) => Line::Token(token.to_string()),
            None => Line::Skip,
        },
        Err(_) => Line::Incomplete,
    }
}

/// `choices[0].delta.content`, when present and non-empty.
pub fn delta_content(value: &Value) -> Option<&str> {
    value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    /// Trailing bytes of a UTF-8 sequence split across chunks.
    pending: Vec<u8>,
    buffer: String,
    done: bool,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `data: [DONE]` has been seen. Later chunks are ignored; what
    /// was already buffered behind the marker is still read by `finish`.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        self.decode(chunk);

        let mut tokens = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            match classify(&self.buffer[..newline]) {
                Line::Token(token) => tokens.push(token),
                Line::Skip => {}
                Line::Done => {
                    self.done = true;
                    self.buffer.drain(..=newline);
                    break;
                }
                // leave the line in place and retry once more bytes arrive
                Line::Incomplete => break,
            }
            self.buffer.drain(..=newline);
        }
        tokens
    }

    /// Flushes the remaining buffer through the same line rules. Lines that
    /// still fail to parse are dropped, as are further `[DONE]` markers.
    pub fn finish(&mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            let tail = String::from_utf8_lossy(&self.pending).into_owned();
            self.buffer.push_str(&tail);
            self.pending.clear();
        }
        let buffer = std::mem::take(&mut self.buffer);

        buffer
            .split('\n')
            .filter_map(|raw| match classify(raw) {
                Line::Token(token) => Some(token),
                _ => None,
            })
            .collect()
    }

    fn decode(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // incomplete sequence at the end: wait for the next chunk
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }
    }
}

/// Decodes a complete body in one go.
pub fn decode_all(body: &[u8]) -> String {
    let mut decoder = EventStreamDecoder::new();
    let mut text: String = decoder.feed(body).concat();
    text.push_str(&decoder.finish().concat());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const HI: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";

    fn chunk(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    #[test]
    fn test_every_two_way_split_yields_same_text() {
        let bytes = HI.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = EventStreamDecoder::new();
            let mut text: String = decoder.feed(&bytes[..split]).concat();
            text.push_str(&decoder.feed(&bytes[split..]).concat());
            text.push_str(&decoder.finish().concat());
            assert_eq!(text, "Hi", "split at {}", split);
        }
    }

    #[test]
    fn test_multibyte_characters_split_across_chunks() {
        let body = format!("{}{}", chunk("₹10,000 😀"), "data: [DONE]\n");
        let bytes = body.as_bytes();
        for split in 0..=bytes.len() {
            let mut decoder = EventStreamDecoder::new();
            let mut text: String = decoder.feed(&bytes[..split]).concat();
            text.push_str(&decoder.feed(&bytes[split..]).concat());
            text.push_str(&decoder.finish().concat());
            assert_eq!(text, "₹10,000 😀", "split at {}", split);
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let body = format!("{}{}{}data: [DONE]\n", chunk("Save "), chunk("₹500"), chunk(" monthly"));
        let mut decoder = EventStreamDecoder::new();
        let mut text = String::new();
        for byte in body.as_bytes() {
            text.push_str(&decoder.feed(std::slice::from_ref(byte)).concat());
        }
        text.push_str(&decoder.finish().concat());
        assert_eq!(text, "Save ₹500 monthly");
    }

    #[test]
    fn test_skips_comments_blank_lines_and_other_fields() {
        let body = format!(
            ": keep-alive\r\n\r\nevent: message\nid: 7\n{}data:{{\"no\":\"space\"}}\n",
            chunk("ok").replace('\n', "\r\n")
        );
        let mut decoder = EventStreamDecoder::new();
        let mut tokens = decoder.feed(body.as_bytes());
        tokens.extend(decoder.finish());
        assert_eq!(tokens, vec!["ok".to_string()]);
    }

    #[test]
    fn test_done_stops_reading_but_flushes_what_was_buffered() {
        let body = format!(
            "{}data: [DONE]\n{}data: [DONE]\n",
            chunk("a"),
            chunk("b")
        );
        let mut decoder = EventStreamDecoder::new();
        assert_eq!(decoder.feed(body.as_bytes()), vec!["a".to_string()]);
        assert!(decoder.is_done());
        // chunks after the marker are never read
        assert!(decoder.feed(chunk("c").as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["b".to_string()]);
    }

    #[test]
    fn test_tokens_behind_done_in_same_chunk_are_kept() {
        let body = format!("{}data: [DONE]\n\n{}", chunk("a"), chunk("b"));
        assert_eq!(decode_all(body.as_bytes()), "ab");
    }

    #[test]
    fn test_payloads_without_content_are_ignored() {
        let body = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\
                    data: {\"choices\":[]}\n\
                    data: 42\n";
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.feed(body.as_bytes()).is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_malformed_json_is_requeued_then_dropped_at_finish() {
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.feed(b"data: {\"choices\":[{\n").is_empty());
        // held back, so later lines wait behind it
        assert!(decoder.feed(chunk("late").as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["late".to_string()]);
    }

    #[test]
    fn test_finish_flushes_line_without_trailing_newline() {
        let body = chunk("tail");
        let trimmed = body.trim_end();
        let mut decoder = EventStreamDecoder::new();
        assert!(decoder.feed(trimmed.as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["tail".to_string()]);
    }

    #[test]
    fn test_invalid_utf8_becomes_replacement_character() {
        let mut body = b"data: {\"choices\":[{\"delta\":{\"content\":\"a".to_vec();
        body.push(0xff);
        body.extend_from_slice(b"b\"}}]}\n");
        assert_eq!(decode_all(&body), "a\u{FFFD}b");
    }
}
