/// Expected check outcomes: expiry states and classification
pub mod expected;

/// Unexpected check outcomes: all error types
pub mod unexpected;

/// Per-host check result
pub mod certificate_result;

/// At-risk hosts collected for notification
pub mod notification_batch;

/// Run report
pub mod report;
