use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RelayError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("missing `code` in authorization callback")]
    MissingAuthCode,

    #[error("no account stored for mailbox {alias}")]
    NoSuchAccount { alias: String },

    #[error("authorization code exchange failed: {detail}")]
    AuthExchangeFailed { detail: String },

    #[error("refresh token exchange failed: {detail}")]
    RefreshFailed { detail: String },

    #[error("identity fetch failed: {detail}")]
    IdentityFetchFailed { detail: String },

    #[error("mailbox profile fetch failed: {detail}")]
    ProfileFetchFailed { detail: String },

    #[error("no account row with id {id}")]
    RecordNotFound { id: i64 },

    #[error("account already exists for mailbox {alias}")]
    DuplicateAccount { alias: String },

    #[error("upstream mail API error with status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },
}

/// Boundary mapping: every core failure becomes a 5xx with a generic
/// body. Provider error bodies and token material stay in the error for
/// logging and never reach the response.
impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            RelayError::MissingAuthCode => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: "Missing `code` query parameter.".to_string(),
                },
            ),
            RelayError::NoSuchAccount { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "NO_SUCH_ACCOUNT".to_string(),
                    message: "No credentials stored for the requested mailbox.".to_string(),
                },
            ),
            RelayError::AuthExchangeFailed { .. }
            | RelayError::RefreshFailed { .. }
            | RelayError::IdentityFetchFailed { .. }
            | RelayError::ProfileFetchFailed { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "PROVIDER_AUTH_ERROR".to_string(),
                    message: "Provider authorization call failed.".to_string(),
                },
            ),
            RelayError::Http(_) | RelayError::UpstreamStatus { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "BAD_GATEWAY".to_string(),
                    message: "Upstream mail service is unavailable.".to_string(),
                },
            ),
            RelayError::UrlParse(_)
            | RelayError::Json(_)
            | RelayError::Database(_)
            | RelayError::Config(_)
            | RelayError::RecordNotFound { .. }
            | RelayError::DuplicateAccount { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
