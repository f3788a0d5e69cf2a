use crate::api::error::ApiError;
use crate::hub::HubError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_api_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Critical: Auth
            ApiError::Http { status, .. } if *status == 401 || *status == 403 => LogLevel::Error,

            // Temporary server issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Request was wrong or the resource is gone
            ApiError::Http { .. } => LogLevel::Error,

            // Nothing was sent
            ApiError::MissingFile(_) | ApiError::Io(_) => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,
        }
    }

    pub fn classify_hub_error(&self, error: &HubError) -> LogLevel {
        match error {
            // The hub being unreachable is expected while it restarts
            HubError::Negotiate(_) | HubError::WebSocket(_) => LogLevel::Warn,
            HubError::NegotiateRejected { status, .. } if (500..=599).contains(status) => {
                LogLevel::Warn
            }

            // Misconfiguration or protocol mismatch
            HubError::NegotiateRejected { .. }
            | HubError::Url(_)
            | HubError::Handshake(_)
            | HubError::AttemptsExhausted(_) => LogLevel::Error,

            HubError::Decode(_) | HubError::Protocol(_) => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
