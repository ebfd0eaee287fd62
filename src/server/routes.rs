use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use warp::Filter;

use crate::constants::{API_KEY_ENV, CONTENT_TYPE_JSON, MAX_JSON_BODY_SIZE_BYTES};
use crate::handlers::{self, RecipeRequest, RequestContext};
use crate::server::RelayServer;
use crate::streaming::RelayLimits;

pub fn create_routes(
    server: Arc<RelayServer>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_server_state = warp::any().map(move || server.clone());

    let health_route = warp::path!("health")
        .and(warp::get())
        .and(with_server_state.clone())
        .map(|s: Arc<RelayServer>| {
            json_response(&json!({
                "status": "ok",
                "version": crate::VERSION,
                "model": s.config.model,
                "started_at": s.started_at.to_rfc3339(),
            }))
        });

    let recipe_route = warp::path!("api" / "recipe")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_JSON_BODY_SIZE_BYTES))
        .and(warp::body::json())
        .and(with_server_state.clone())
        .and_then(|body: RecipeRequest, s: Arc<RelayServer>| async move {
            // credential is resolved per request, not at startup
            let api_key = std::env::var(API_KEY_ENV).ok();
            let context = RequestContext {
                client: &s.client,
                upstream_url: &s.config.upstream_url,
                api_key: api_key.as_deref(),
                model: &s.config.model,
                temperature: s.config.temperature,
                limits: RelayLimits {
                    idle_timeout: s.config.stream_idle_timeout,
                    max_duration: s.config.max_stream_duration,
                },
            };
            let token = CancellationToken::new();
            handlers::handle_recipe(context, body, token)
                .await
                .map_err(warp::reject::custom)
        });

    health_route.or(recipe_route)
}

fn json_response(value: &serde_json::Value) -> warp::reply::Response {
    let json_string = serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string());

    warp::http::Response::builder()
        .status(warp::http::StatusCode::OK)
        .header("Content-Type", CONTENT_TYPE_JSON)
        .body(json_string.into())
        .unwrap_or_else(|_| {
            warp::http::Response::builder()
                .status(warp::http::StatusCode::INTERNAL_SERVER_ERROR)
                .body("Internal Server Error".into())
                .unwrap()
        })
}
