use super::*;

#[test]
fn from_status_splits_auth_failures() {
    assert!(ApiError::from_status(401, String::new()).is_unauthorized());
    assert!(ApiError::from_status(403, String::new()).is_unauthorized());
    assert!(!ApiError::from_status(404, String::new()).is_unauthorized());
    assert_eq!(ApiError::from_status(500, String::new()).status(), Some(500));
    assert_eq!(ApiError::Network("refused".into()).status(), None);
}

#[test]
fn api_error_retryable_only_for_transient_failures() {
    assert!(ApiError::Network("timeout".into()).retryable());
    assert!(ApiError::from_status(503, String::new()).retryable());
    assert!(ApiError::from_status(429, String::new()).retryable());
    assert!(!ApiError::from_status(400, String::new()).retryable());
    assert!(!ApiError::from_status(401, String::new()).retryable());
    assert!(!ApiError::Decode("bad json".into()).retryable());
}

#[test]
fn unauthorized_maps_to_auth_expired_everywhere() {
    let card_id = Uuid::new_v4();
    let fetch = BoardError::fetch(ApiError::from_status(401, String::new()));
    let moved = BoardError::move_rejected(card_id, ApiError::from_status(403, String::new()));
    let mutation = BoardError::mutation("create card", ApiError::from_status(401, String::new()));

    assert!(matches!(fetch, BoardError::AuthExpired { status: 401 }));
    assert!(matches!(moved, BoardError::AuthExpired { status: 403 }));
    assert!(mutation.requires_reauth());
    assert_eq!(moved.error_code(), "E_AUTH_EXPIRED");
}

#[test]
fn move_rejected_keeps_card_and_source() {
    let card_id = Uuid::new_v4();
    let err = BoardError::move_rejected(card_id, ApiError::from_status(500, "boom".into()));
    assert_eq!(err.error_code(), "E_MOVE_REJECTED");
    assert!(err.retryable());
    assert!(!err.requires_reauth());
    assert!(err.to_string().contains(&card_id.to_string()));
}

#[test]
fn fetch_error_code_and_message() {
    let err = BoardError::fetch(ApiError::Network("connection refused".into()));
    assert_eq!(err.error_code(), "E_FETCH");
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn local_errors_are_not_retryable() {
    assert!(!BoardError::NotLoaded.retryable());
    assert!(!BoardError::Invalid("blank title".into()).retryable());
    assert_eq!(BoardError::Closed.error_code(), "E_CLOSED");
}
