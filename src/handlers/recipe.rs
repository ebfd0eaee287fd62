use std::time::Instant;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::constants::{CONTENT_TYPE_TEXT, LOG_PREFIX_SUCCESS};
use crate::error::RelayError;
use crate::handlers::RequestContext;
use crate::logging::{LogConfig, log_timed};
use crate::prompt::{Ingredients, completion_request};
use crate::streaming::{TokenStream, spawn_relay, stream_response};
use crate::upstream::send_completion;

/// Inbound submission body. The client sends the ingredient list under
/// `items`, in the order the user entered them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRequest {
    pub items: Vec<String>,
}

/// The streaming relay: validate, build the completion payload, open the
/// upstream call, and pipe the generated token text back as a live chunked
/// body. The credential check short-circuits before anything touches the
/// network.
pub async fn handle_recipe(
    context: RequestContext<'_>,
    request: RecipeRequest,
    token: CancellationToken,
) -> Result<warp::reply::Response, RelayError> {
    let start_time = Instant::now();

    let Some(api_key) = context.api_key else {
        return Err(RelayError::missing_credential());
    };

    let ingredients = Ingredients::parse(request.items)?;
    log::info!("recipe request | {} ingredients", ingredients.len());

    let body = completion_request(&ingredients, context.model, context.temperature);
    if LogConfig::get().debug_enabled {
        log::debug!(
            "completion request: {}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    }

    let response = send_completion(
        context.client,
        context.upstream_url,
        api_key,
        &body,
        token.clone(),
    )
    .await?;

    let fragments = TokenStream::new(response.bytes_stream().boxed());
    let rx = spawn_relay(fragments, token, context.limits);

    let reply = stream_response(rx, CONTENT_TYPE_TEXT)?;
    log_timed(LOG_PREFIX_SUCCESS, "recipe stream opened", start_time);
    Ok(reply)
}
