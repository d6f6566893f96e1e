use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use sermo_types::api::ErrorResponse;

/// Every way a request can fail. The `Display` text is the `error` field of
/// the JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body was not decodable JSON of the expected shape.
    #[error("Invalid request payload")]
    InvalidPayload,

    /// Lookup matched no row. Carries the entity name, e.g. "User".
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing or invalid `Token` header.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid login.")]
    InvalidLogin,

    #[error("Database request timed out")]
    Timeout,

    /// Any other store or internal failure, message passed through verbatim.
    /// Constraint violations (duplicate email, unknown owner) land here too.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::InvalidLogin => StatusCode::UNAUTHORIZED,
            ApiError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "Rejected request body");
        ApiError::InvalidPayload
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(ApiError::NotFound("Channel").to_string(), "Channel not found");
        assert_eq!(ApiError::InvalidLogin.to_string(), "Invalid login.");
        assert_eq!(ApiError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(ApiError::InvalidPayload.to_string(), "Invalid request payload");
    }

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::InvalidPayload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("User").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidLogin.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Timeout.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_pass_through_verbatim() {
        let err: ApiError = anyhow::anyhow!("UNIQUE constraint failed: users.email").into();
        assert_eq!(err.to_string(), "UNIQUE constraint failed: users.email");
    }

    #[test]
    fn response_is_json() {
        let resp = ApiError::NotFound("Data").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
