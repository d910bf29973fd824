//! Mapping of driver failures onto the lexical error taxonomy.

use lexi_core::LexiError;
use tracing::warn;

const TIMEOUT_MARKERS: &[&str] = &[
    "transactiontimedout",
    "transaction timed out",
    "timed out",
    "timeout",
];

const UNAVAILABLE_MARKERS: &[&str] = &[
    "connection",
    "connect",
    "io error",
    "ioerror",
    "broken pipe",
    "refused",
    "pool",
    "serviceunavailable",
    "unavailable",
    "authentication",
];

/// Classify a driver error message.
///
/// Timeouts become [`LexiError::TraversalTimeout`] (the caller fills in the
/// requested depth), transport and pool failures [`LexiError::StoreUnavailable`],
/// everything else [`LexiError::Query`].
pub fn classify_driver_error(message: &str) -> LexiError {
    let lower = message.to_lowercase();
    let err = if TIMEOUT_MARKERS.iter().any(|m| lower.contains(m)) {
        LexiError::TraversalTimeout { depth: 1 }
    } else if UNAVAILABLE_MARKERS.iter().any(|m| lower.contains(m)) {
        LexiError::StoreUnavailable(message.to_string())
    } else {
        LexiError::Query(message.to_string())
    };
    warn!(error = %message, kind = ?err, "Neo4j query failed");
    err
}
