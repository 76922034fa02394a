use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired - sign in again")]
    SessionExpired,

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error payload the backend sends with 4xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    /// Pull the human-readable `detail` message out of an error payload,
    /// falling back to the raw body. Business failures are shown to the user
    /// verbatim, so the message matters more than the status line.
    fn detail_message(body: &str) -> String {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.detail,
            Err(_) => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 | 409 | 422 => ApiError::Validation(Self::detail_message(body)),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(Self::detail_message(body)),
            404 => ApiError::NotFound(Self::detail_message(body)),
            500..=599 => ApiError::ServerError(Self::truncate_body(body)),
            _ => ApiError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }

    /// True when the failure means the session is dead and the caller should
    /// route the user back to the login screen.
    pub fn is_terminal_auth(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "{}"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail": "Group not found"}"#),
            ApiError::NotFound(msg) if msg == "Group not found"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(msg) if msg == "boom"
        ));
    }

    #[test]
    fn test_validation_surfaces_detail_verbatim() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Invalid email or password"}"#,
        );
        match err {
            ApiError::Validation(msg) => assert_eq!(msg, "Invalid email or password"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_falls_back_to_raw_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "not json");
        match err {
            ApiError::Validation(msg) => assert_eq!(msg, "not json"),
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_auth_classification() {
        assert!(ApiError::SessionExpired.is_terminal_auth());
        assert!(!ApiError::Unauthorized.is_terminal_auth());
        assert!(!ApiError::Validation("nope".to_string()).is_terminal_auth());
    }
}
