use crate::chat::session::ChatSession;
use crate::chat::sse::EventStreamDecoder;
use crate::chat::types::ErrorBody;
use crate::error::{FinanceBuddyError, Result};
use futures::{Stream, StreamExt};
use log::{debug, info};
use std::fmt::Display;

const FALLBACK_ERROR: &str = "Failed to get response";

/// Maps a non-2xx chat response to the error the user is told about.
pub fn status_error(status: u16, body: &str) -> FinanceBuddyError {
    match status {
        429 => FinanceBuddyError::RateLimited,
        402 => FinanceBuddyError::UsageLimitReached,
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            FinanceBuddyError::Upstream { status, message }
        }
    }
}

/// Streams a reply body into `session`, which must be waiting on a reply.
///
/// Each decoded token is passed to `on_token` and appended to the assistant
/// placeholder. Reading stops at `data: [DONE]` or the end of the body. A
/// read error abandons the reply and removes the placeholder.
pub async fn stream_reply<S, B, E, F>(
    session: &mut ChatSession,
    body: S,
    mut on_token: F,
) -> Result<String>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    F: FnMut(&str),
{
    session.start_streaming()?;
    let mut body = std::pin::pin!(body);
    let mut decoder = EventStreamDecoder::new();

    while let Some(chunk) = body.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = FinanceBuddyError::Stream(e.to_string());
                session.fail(&err);
                return Err(err);
            }
        };
        deliver(session, &decoder.feed(bytes.as_ref()), &mut on_token);
        if decoder.is_done() {
            debug!("Reply stream signalled completion");
            break;
        }
    }
    deliver(session, &decoder.finish(), &mut on_token);

    let reply = session
        .complete()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    info!("Received reply ({} chars)", reply.chars().count());
    Ok(reply)
}

fn deliver<F: FnMut(&str)>(session: &mut ChatSession, tokens: &[String], on_token: &mut F) {
    if tokens.is_empty() {
        return;
    }
    for token in tokens {
        on_token(token);
    }
    session.append_tokens(tokens);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::ChatState;
    use crate::chat::types::Role;
    use futures::executor::block_on;
    use futures::stream;

    fn chunk(content: &str) -> Vec<u8> {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
        .into_bytes()
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(status_error(429, ""), FinanceBuddyError::RateLimited));
        assert!(matches!(
            status_error(402, "{\"error\":\"ignored\"}"),
            FinanceBuddyError::UsageLimitReached
        ));

        let err = status_error(500, "{\"error\":\"AI gateway error\"}");
        assert_eq!(err.notice().description, "AI gateway error");

        let err = status_error(503, "<html>bad gateway</html>");
        assert!(matches!(
            err,
            FinanceBuddyError::Upstream { status: 503, ref message } if message == FALLBACK_ERROR
        ));
    }

    #[test]
    fn test_stream_reply_accumulates_tokens() {
        let mut session = ChatSession::new();
        session.begin("How can I save?").unwrap();

        let body = stream::iter(vec![
            Ok::<_, String>(chunk("Cut ")),
            Ok(chunk("dining out")),
            Ok(b"data: [DONE]\n\n".to_vec()),
            Ok(chunk(" ignored")),
        ]);
        let mut seen = Vec::new();
        let reply = block_on(stream_reply(&mut session, body, |t| seen.push(t.to_string()))).unwrap();

        assert_eq!(reply, "Cut dining out");
        assert_eq!(seen, vec!["Cut ", "dining out"]);
        assert_eq!(session.state(), ChatState::Idle);
        let last = session.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Cut dining out");
    }

    #[test]
    fn test_body_ending_without_done_is_flushed() {
        let mut session = ChatSession::new();
        session.begin("hi").unwrap();
        let mut tail = chunk("bye");
        tail.truncate(tail.len() - 2);

        let body = stream::iter(vec![Ok::<_, String>(chunk("good")), Ok(tail)]);
        let reply = block_on(stream_reply(&mut session, body, |_| {})).unwrap();
        assert_eq!(reply, "goodbye");
    }

    #[test]
    fn test_read_error_removes_placeholder() {
        let mut session = ChatSession::new();
        session.begin("hi").unwrap();
        let before = session.messages().len();

        let body = stream::iter(vec![
            Ok(chunk("partial")),
            Err("connection reset".to_string()),
        ]);
        let err = block_on(stream_reply(&mut session, body, |_| {})).unwrap_err();

        assert!(matches!(err, FinanceBuddyError::Stream(_)));
        assert_eq!(session.messages().len(), before);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_requires_a_request_in_flight() {
        let mut session = ChatSession::new();
        let body = stream::iter(vec![Ok::<_, String>(chunk("x"))]);
        let err = block_on(stream_reply(&mut session, body, |_| {})).unwrap_err();
        assert!(matches!(err, FinanceBuddyError::NotSending));
        assert_eq!(session.messages().len(), 1);
    }
}
