use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::constants::{ERROR_TIMEOUT, LOG_PREFIX_CONN};
use crate::error::RelayError;
use crate::logging::log_timed;

static STREAM_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy)]
pub struct RelayLimits {
    /// Maximum wait between upstream fragments.
    pub idle_timeout: Duration,
    /// Wall-clock ceiling for the whole stream.
    pub max_duration: Duration,
}

/// Spawns the relay pump: a reader loop draining `upstream` into an unbounded
/// channel, one fragment at a time, in order and byte-for-byte. Nothing is
/// buffered beyond the fragment in flight. The loop ends on upstream
/// exhaustion, client disconnect, cancellation, error, or either timeout; an
/// error or timeout is surfaced through the channel as an `io::Error`, which
/// terminates the response body abnormally.
pub fn spawn_relay<S>(
    mut upstream: S,
    token: CancellationToken,
    limits: RelayLimits,
) -> mpsc::UnboundedReceiver<Result<Bytes, io::Error>>
where
    S: Stream<Item = Result<Bytes, RelayError>> + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<Result<Bytes, io::Error>>();
    let stream_id = STREAM_COUNTER.fetch_add(1, Ordering::Relaxed) % 1_000_000;

    tokio::spawn(async move {
        let started = std::time::Instant::now();
        let deadline = tokio::time::Instant::now() + limits.max_duration;
        let mut chunk_count = 0u64;
        let mut byte_count = 0u64;

        let outcome = loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => {
                    break "cancelled";
                }

                _ = tokio::time::sleep_until(deadline) => {
                    let _ = tx.send(Err(io::Error::new(io::ErrorKind::TimedOut, ERROR_TIMEOUT)));
                    break "deadline exceeded";
                }

                next = timeout(limits.idle_timeout, upstream.next()) => match next {
                    Ok(Some(Ok(chunk))) => {
                        if chunk.is_empty() {
                            continue;
                        }
                        chunk_count += 1;
                        byte_count += chunk.len() as u64;
                        if tx.send(Ok(chunk)).is_err() {
                            break "client disconnected";
                        }
                    }
                    Ok(Some(Err(err))) => {
                        log::error!("stream [{}] upstream error: {}", stream_id, err);
                        let _ = tx.send(Err(io::Error::other(err.message)));
                        break "upstream error";
                    }
                    Ok(None) => {
                        break "complete";
                    }
                    Err(_) => {
                        let _ = tx.send(Err(io::Error::new(io::ErrorKind::TimedOut, ERROR_TIMEOUT)));
                        break "idle timeout";
                    }
                }
            }
        };

        log_timed(
            LOG_PREFIX_CONN,
            &format!(
                "stream [{}] {} | {} chunks, {} bytes",
                stream_id, outcome, chunk_count, byte_count
            ),
            started,
        );
    });

    rx
}
