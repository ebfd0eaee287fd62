use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::check_cancelled;
use crate::constants::{CHAT_COMPLETIONS_PATH, CONTENT_TYPE_JSON, ERROR_UPSTREAM_UNREACHABLE};
use crate::error::RelayError;
use crate::logging::sanitize_log_message;

/// Builds the shared upstream client. No total request timeout: streams are
/// bounded by the relay's own idle and wall-clock limits instead.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
}

/// Issues the streaming completion call. Returns the raw response with the
/// body unread; callers consume it incrementally. A non-success status is
/// mapped to a categorized rejection with the upstream body logged but never
/// forwarded.
pub async fn send_completion(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    body: &Value,
    token: CancellationToken,
) -> Result<reqwest::Response, RelayError> {
    check_cancelled!(token);

    let url = format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH);
    let request = client
        .post(&url)
        .bearer_auth(api_key)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .json(body);

    let response = tokio::select! {
        result = request.send() => match result {
            Ok(response) => response,
            Err(err) => {
                let message = if err.is_connect() || err.is_timeout() {
                    ERROR_UPSTREAM_UNREACHABLE
                } else {
                    "completion request failed"
                };
                log::error!("completion request failed: {}: {:?}", message, err);
                return Err(RelayError::upstream_unavailable(message));
            }
        },
        _ = token.cancelled() => {
            return Err(RelayError::request_cancelled());
        }
    };

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        log::error!(
            "upstream rejected completion request: {} {}",
            status,
            sanitize_log_message(&detail)
        );
        return Err(RelayError::upstream_rejected(status.as_u16()));
    }

    Ok(response)
}
