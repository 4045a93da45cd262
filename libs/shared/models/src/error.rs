use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps a failed API status to the matching variant.
    pub fn from_status(status: StatusCode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth(detail),
            StatusCode::NOT_FOUND => AppError::NotFound(detail),
            StatusCode::BAD_REQUEST => AppError::BadRequest(detail),
            StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(detail),
            _ => AppError::ExternalService(detail),
        }
    }

    /// Detail text without the variant prefix, for user-facing alerts.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::ExternalService(msg)
            | AppError::Network(msg)
            | AppError::Decode(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::from_status(StatusCode::FORBIDDEN, "nope"),
            AppError::Auth("nope".to_string())
        );
        assert_eq!(
            AppError::from_status(StatusCode::NOT_FOUND, "gone"),
            AppError::NotFound("gone".to_string())
        );
        assert_eq!(
            AppError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "date: invalid"),
            AppError::Validation("date: invalid".to_string())
        );
        assert_eq!(
            AppError::from_status(StatusCode::CONFLICT, "taken"),
            AppError::ExternalService("taken".to_string())
        );
        assert_eq!(
            AppError::from_status(StatusCode::BAD_GATEWAY, "upstream"),
            AppError::ExternalService("upstream".to_string())
        );
    }

    #[test]
    fn user_message_strips_prefix() {
        let err = AppError::BadRequest("doctor: This field is required.".to_string());
        assert_eq!(err.to_string(), "Bad Request: doctor: This field is required.");
        assert_eq!(err.user_message(), "doctor: This field is required.");
    }
}
