use std::time::Duration;

use bytes::Bytes;
use futures_util::{StreamExt, stream};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::error::RelayError;
use crate::streaming::{RelayLimits, spawn_relay};

const GENEROUS: RelayLimits = RelayLimits {
    idle_timeout: Duration::from_secs(30),
    max_duration: Duration::from_secs(60),
};

type Chunk = Result<Bytes, RelayError>;

#[tokio::test]
async fn forwards_chunks_in_order_byte_for_byte() {
    let chunks: Vec<Chunk> = vec![
        Ok(Bytes::from_static(b"Chao em, ")),
        Ok(Bytes::from_static(b"hom nay ")),
        Ok(Bytes::from_static(b"minh nau pho nhe.")),
    ];
    let mut rx = spawn_relay(stream::iter(chunks), CancellationToken::new(), GENEROUS);

    let mut forwarded = Vec::new();
    while let Some(item) = rx.recv().await {
        forwarded.extend_from_slice(&item.expect("forwarded chunk"));
    }
    assert_eq!(forwarded, b"Chao em, hom nay minh nau pho nhe.");
}

#[tokio::test]
async fn forwards_available_chunks_before_upstream_finishes() {
    // The chunk after the first two never arrives; both must still reach the
    // receiver, proving nothing waits for the full response.
    let chunks: Vec<Chunk> = vec![
        Ok(Bytes::from_static(b"first ")),
        Ok(Bytes::from_static(b"second")),
    ];
    let upstream = stream::iter(chunks).chain(stream::pending());

    let mut rx = spawn_relay(upstream, CancellationToken::new(), GENEROUS);

    let first = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("first chunk must arrive promptly")
        .expect("channel open")
        .expect("ok chunk");
    assert_eq!(first, Bytes::from_static(b"first "));

    let second = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("second chunk must arrive promptly")
        .expect("channel open")
        .expect("ok chunk");
    assert_eq!(second, Bytes::from_static(b"second"));

    // stream is stalled, not ended: no further item, channel still open
    assert!(
        timeout(Duration::from_millis(100), rx.recv()).await.is_err(),
        "no chunk may be fabricated while upstream stalls"
    );
}

#[tokio::test]
async fn skips_empty_chunks() {
    let chunks: Vec<Chunk> = vec![
        Ok(Bytes::new()),
        Ok(Bytes::from_static(b"payload")),
        Ok(Bytes::new()),
    ];
    let mut rx = spawn_relay(stream::iter(chunks), CancellationToken::new(), GENEROUS);

    assert_eq!(
        rx.recv().await.unwrap().unwrap(),
        Bytes::from_static(b"payload")
    );
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn surfaces_upstream_error_and_closes() {
    let chunks: Vec<Chunk> = vec![
        Ok(Bytes::from_static(b"partial ")),
        Err(RelayError::upstream_unavailable("connection reset")),
    ];
    let mut rx = spawn_relay(stream::iter(chunks), CancellationToken::new(), GENEROUS);

    assert_eq!(
        rx.recv().await.unwrap().unwrap(),
        Bytes::from_static(b"partial ")
    );
    let err = rx.recv().await.unwrap().expect_err("error must surface");
    assert_eq!(err.kind(), std::io::ErrorKind::Other);
    assert!(rx.recv().await.is_none(), "channel closes after the error");
}

#[tokio::test]
async fn aborts_on_idle_timeout() {
    let limits = RelayLimits {
        idle_timeout: Duration::from_millis(50),
        max_duration: Duration::from_secs(60),
    };
    let mut rx = spawn_relay(
        stream::pending::<Chunk>(),
        CancellationToken::new(),
        limits,
    );

    let err = rx.recv().await.unwrap().expect_err("idle timeout error");
    assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn aborts_when_wall_clock_ceiling_expires() {
    let limits = RelayLimits {
        idle_timeout: Duration::from_secs(60),
        max_duration: Duration::from_millis(50),
    };
    let mut rx = spawn_relay(
        stream::pending::<Chunk>(),
        CancellationToken::new(),
        limits,
    );

    let err = rx.recv().await.unwrap().expect_err("deadline error");
    assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
}

#[tokio::test]
async fn cancellation_stops_the_pump_without_error_artifacts() {
    let token = CancellationToken::new();
    token.cancel();

    let mut rx = spawn_relay(stream::pending::<Chunk>(), token, GENEROUS);
    assert!(
        rx.recv().await.is_none(),
        "cancelled stream closes cleanly with no trailing chunk"
    );
}
