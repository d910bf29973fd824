//! HTTP mapping of lexical errors.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lexi_core::LexiError;
use serde_json::json;

/// Seconds a client should wait before retrying an unavailable store.
const RETRY_AFTER_SECS: &str = "5";

/// A [`LexiError`] rendered as a JSON error body with a matching status.
#[derive(Debug)]
pub struct ApiError(pub LexiError);

impl From<LexiError> for ApiError {
    fn from(err: LexiError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            LexiError::TraversalTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "traversal_timeout"),
            LexiError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
            LexiError::NodeNotFound(_) => (StatusCode::NOT_FOUND, "node_not_found"),
            LexiError::InvalidDepth(_) => (StatusCode::BAD_REQUEST, "invalid_depth"),
            LexiError::InvalidSearchField(_) => (StatusCode::BAD_REQUEST, "invalid_search_field"),
            LexiError::InvalidColorScheme(_) => (StatusCode::BAD_REQUEST, "invalid_color_scheme"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(code, error = %self.0, "Request failed");
        } else {
            tracing::debug!(code, error = %self.0, "Request rejected");
        }

        let body = Json(json!({
            "error": self.0.to_string(),
            "code": code,
            "hint": self.0.hint(),
            "retryable": self.0.is_retryable(),
        }));

        let mut response = (status, body).into_response();
        if matches!(self.0, LexiError::StoreUnavailable(_)) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}
