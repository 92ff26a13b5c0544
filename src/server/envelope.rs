//! Response envelope
//!
//! Every reply has the shape `{status, data}` or `{status, errors}`, where
//! `status` repeats the HTTP status so a client reading only the body can
//! tell success from failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind};

/// One reported failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub message: String,
    pub kind: ErrorKind,
}

/// Uniform response body
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorItem>>,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            data: Some(data),
            errors: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, data)
    }

    pub fn failure(status: StatusCode, errors: Vec<ErrorItem>) -> Self {
        Self {
            status: status.as_u16(),
            data: None,
            errors: Some(errors),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl ErrorKind {
    /// Transport status for the kind; only the upstream link maps outside 4xx
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<&Error> for Envelope<()> {
    fn from(err: &Error) -> Self {
        let kind = err.kind();
        let errors = err
            .messages()
            .into_iter()
            .map(|message| ErrorItem { message, kind })
            .collect();
        Envelope::failure(kind.status_code(), errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();
        if kind.is_client_error() {
            tracing::warn!("Rejected request ({:?}): {}", kind, self);
        } else {
            tracing::error!("Upstream failure: {}", self);
        }
        Envelope::<()>::from(&self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_errors() {
        let json = serde_json::to_value(Envelope::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"status": 200, "data": [1, 2]}));
    }

    #[test]
    fn test_empty_data_is_still_present() {
        let json = serde_json::to_value(Envelope::ok(Vec::<u8>::new())).unwrap();
        assert_eq!(json, serde_json::json!({"status": 200, "data": []}));
    }

    #[test]
    fn test_failure_from_error() {
        let envelope = Envelope::<()>::from(&Error::InvalidMode("foo".into()));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["status"], 400);
        assert_eq!(json["errors"][0]["kind"], "invalid_mode");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_upstream_unavailable_is_bad_gateway() {
        let envelope = Envelope::<()>::from(&Error::UpstreamUnavailable("connection refused".into()));
        assert_eq!(envelope.status, 502);
    }

    #[test]
    fn test_each_syntax_error_reported() {
        let envelope = Envelope::<()>::from(&Error::UpstreamParse(vec!["a".into(), "b".into()]));
        let errors = envelope.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind == ErrorKind::UpstreamParseError));
    }

    #[test]
    fn test_response_status_mirrors_body() {
        let response = Error::Decode("invalid base64".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
