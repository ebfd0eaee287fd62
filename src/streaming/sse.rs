use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;
use serde_json::Value;

use crate::constants::{SSE_DATA_PREFIX, SSE_DONE_MESSAGE, SSE_MESSAGE_BOUNDARY};
use crate::error::RelayError;

/// Incremental parser for the upstream SSE wire format. Frames arrive as
/// `data: {json}\n\n` and the stream ends with `data: [DONE]`. Bytes are
/// accumulated until a full frame boundary is seen, so frames split across
/// network chunks (including inside a multi-byte character) parse intact.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    done: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feeds one network chunk, returning every completed text fragment.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        let mut fragments = Vec::new();
        if self.done {
            return fragments;
        }

        self.buffer.extend_from_slice(chunk);

        while let Some(boundary_pos) = find_message_boundary(&self.buffer) {
            let frame: Vec<u8> = self
                .buffer
                .drain(..boundary_pos + SSE_MESSAGE_BOUNDARY.len())
                .collect();
            let frame = &frame[..boundary_pos];

            let Ok(frame_text) = std::str::from_utf8(frame) else {
                log::warn!("skipping SSE frame with invalid UTF-8");
                continue;
            };

            for line in frame_text.lines() {
                let Some(data) = line.strip_prefix(SSE_DATA_PREFIX) else {
                    if !line.trim().is_empty() {
                        log::warn!("SSE format: non-standard line: {}", line);
                    }
                    continue;
                };

                if data.trim() == SSE_DONE_MESSAGE {
                    self.done = true;
                    return fragments;
                }

                match serde_json::from_str::<Value>(data) {
                    Ok(event) => {
                        if let Some(delta) = extract_delta_content(&event)
                            && !delta.is_empty()
                        {
                            fragments.push(Bytes::from(delta.to_owned()));
                        }
                    }
                    Err(err) => {
                        log::warn!("unparseable SSE data line: {}", err);
                    }
                }
            }
        }

        fragments
    }
}

fn find_message_boundary(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(SSE_MESSAGE_BOUNDARY.len())
        .position(|window| window == SSE_MESSAGE_BOUNDARY.as_bytes())
}

fn extract_delta_content(event: &Value) -> Option<&str> {
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
}

/// Adapts the upstream SSE byte stream into a stream of plain text fragments.
/// This is the upstream collaborator boundary: everything downstream of it
/// treats the fragments as opaque bytes.
pub struct TokenStream<S> {
    inner: S,
    parser: SseParser,
    queue: VecDeque<Bytes>,
}

impl<S> TokenStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            parser: SseParser::new(),
            queue: VecDeque::new(),
        }
    }
}

impl<S, E> Stream for TokenStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    type Item = Result<Bytes, RelayError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(fragment) = this.queue.pop_front() {
                return Poll::Ready(Some(Ok(fragment)));
            }
            if this.parser.is_done() {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    this.queue.extend(this.parser.feed(&chunk));
                }
                Poll::Ready(Some(Err(err))) => {
                    return Poll::Ready(Some(Err(RelayError::upstream_unavailable(&format!(
                        "upstream stream error: {}",
                        err
                    )))));
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
