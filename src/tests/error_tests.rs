use crate::constants::{ERROR_MISSING_CREDENTIAL, ERROR_TIMEOUT};
use crate::error::RelayError;

#[test]
fn each_kind_maps_to_its_status_code() {
    assert_eq!(RelayError::missing_credential().status_code, 400);
    assert_eq!(RelayError::bad_request("x").status_code, 400);
    assert_eq!(RelayError::upstream_unavailable("x").status_code, 502);
    assert_eq!(RelayError::upstream_rejected(500).status_code, 502);
    assert_eq!(RelayError::stream_timeout().status_code, 504);
    assert_eq!(RelayError::request_cancelled().status_code, 499);
    assert_eq!(RelayError::internal("x").status_code, 500);
}

#[test]
fn missing_credential_message_describes_the_fix() {
    let err = RelayError::missing_credential();
    assert_eq!(err.message, ERROR_MISSING_CREDENTIAL);
    assert!(err.message.contains("OPENAI_KEY"));
}

#[test]
fn upstream_rejection_is_categorized_not_forwarded() {
    let auth = RelayError::upstream_rejected(401);
    assert!(auth.message.contains("authentication"));

    let forbidden = RelayError::upstream_rejected(403);
    assert!(forbidden.message.contains("authentication"));

    let limited = RelayError::upstream_rejected(429);
    assert!(limited.message.contains("rate limited"));

    let other = RelayError::upstream_rejected(503);
    assert!(other.message.contains("status 503"));
}

#[test]
fn upstream_rejection_never_carries_credential_material() {
    // whatever the upstream replied, the surfaced message is built from the
    // status code alone
    for status in [400, 401, 403, 429, 500, 503] {
        let err = RelayError::upstream_rejected(status);
        assert!(!err.message.contains("sk-"));
        assert!(!err.message.to_lowercase().contains("bearer"));
    }
}

#[test]
fn internal_errors_surface_a_fixed_message() {
    let err = RelayError::internal("sqlstate 08006 at relay.rs:42");
    assert_eq!(err.message, "internal server error");
    assert!(!err.message.contains("relay.rs"));
}

#[test]
fn timeout_uses_the_shared_message() {
    let err = RelayError::stream_timeout();
    assert_eq!(err.message, ERROR_TIMEOUT);
    assert!(err.is_timeout());
}

#[test]
fn display_includes_status_and_message() {
    let err = RelayError::bad_request("ingredient list must not be empty");
    assert_eq!(
        err.to_string(),
        "RelayError 400: ingredient list must not be empty"
    );
}
