//! Tests for suggestion error types

use super::*;

#[test]
fn test_cancelled_display() {
    assert_eq!(FetchError::Cancelled.to_string(), "Request cancelled");
    assert!(FetchError::Cancelled.is_cancelled());
}

#[test]
fn test_status_display() {
    let error = FetchError::Status {
        code: 503,
        message: "Service Unavailable".to_string(),
    };
    let msg = error.to_string();
    assert!(msg.contains("503"));
    assert!(msg.contains("Service Unavailable"));
    assert!(!error.is_cancelled());
}

#[test]
fn test_transport_errors_are_not_cancellation() {
    let errors = vec![
        FetchError::Network("connection refused".to_string()),
        FetchError::Status {
            code: 500,
            message: "boom".to_string(),
        },
        FetchError::Malformed("expected value".to_string()),
    ];

    for error in errors {
        assert!(!error.is_cancelled(), "{:?} classified as cancellation", error);
    }
}

#[test]
fn test_controller_error_display() {
    assert!(ControllerError::Disposed.to_string().contains("disposed"));
    assert!(ControllerError::NoRuntime.to_string().contains("tokio runtime"));
}
