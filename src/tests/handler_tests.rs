use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::handlers::{RecipeRequest, RequestContext, handle_recipe};
use crate::streaming::RelayLimits;

const TEST_LIMITS: RelayLimits = RelayLimits {
    idle_timeout: Duration::from_secs(5),
    max_duration: Duration::from_secs(10),
};

fn context<'a>(client: &'a reqwest::Client, api_key: Option<&'a str>) -> RequestContext<'a> {
    RequestContext {
        client,
        // unroutable on purpose: a handler that short-circuits correctly
        // never dials it
        upstream_url: "http://127.0.0.1:9",
        api_key,
        model: "gpt-3.5-turbo",
        temperature: 0.4,
        limits: TEST_LIMITS,
    }
}

fn request(items: &[&str]) -> RecipeRequest {
    RecipeRequest {
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

#[tokio::test]
async fn missing_credential_short_circuits_before_any_network_call() {
    let client = reqwest::Client::new();
    let err = handle_recipe(
        context(&client, None),
        request(&["kim chi", "mì gói"]),
        CancellationToken::new(),
    )
    .await
    .expect_err("must fail without a credential");

    // a configuration error, not a transport error: the unroutable upstream
    // was never contacted
    assert!(err.is_missing_credential());
    assert_eq!(err.status_code, 400);
}

#[tokio::test]
async fn empty_ingredient_list_is_rejected_before_the_upstream_call() {
    let client = reqwest::Client::new();
    let err = handle_recipe(
        context(&client, Some("test-key")),
        request(&[]),
        CancellationToken::new(),
    )
    .await
    .expect_err("empty list must fail");

    assert!(err.is_bad_request());
    assert_eq!(err.status_code, 400);
}

#[tokio::test]
async fn short_ingredient_is_rejected_before_the_upstream_call() {
    let client = reqwest::Client::new();
    let err = handle_recipe(
        context(&client, Some("test-key")),
        request(&["ab"]),
        CancellationToken::new(),
    )
    .await
    .expect_err("short entry must fail");

    assert!(err.is_bad_request());
}

#[tokio::test]
async fn unreachable_upstream_maps_to_transport_error() {
    let client = reqwest::Client::new();
    let err = handle_recipe(
        context(&client, Some("test-key")),
        request(&["3 củ cà rốt"]),
        CancellationToken::new(),
    )
    .await
    .expect_err("unroutable upstream must fail");

    assert!(err.is_upstream_unavailable());
    assert_eq!(err.status_code, 502);
}

#[tokio::test]
async fn cancelled_request_never_reaches_the_upstream() {
    let client = reqwest::Client::new();
    let token = CancellationToken::new();
    token.cancel();

    let err = handle_recipe(
        context(&client, Some("test-key")),
        request(&["hai quả trứng"]),
        token,
    )
    .await
    .expect_err("cancelled request must fail");

    assert!(err.is_cancelled());
    assert_eq!(err.status_code, 499);
}
