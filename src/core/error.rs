use thiserror::Error;

/// Coarse failure classes surfaced to screens.
///
/// An empty result is not an error and has no kind here; screens render it
/// as the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level failure (no connectivity, timeout, undecodable body)
    NetworkFailure,
    /// Missing or rejected credential
    AuthFailure,
    /// Well-formed response with `success=false` or a non-2xx status
    BackendRejection,
    /// Request never left the client
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Backend rejected request (HTTP {status}): {message}")]
    BackendRejection { status: u16, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Network(_) | AppError::Decode(_) => ErrorKind::NetworkFailure,
            AppError::Auth(_) => ErrorKind::AuthFailure,
            AppError::BackendRejection { .. } => ErrorKind::BackendRejection,
            AppError::Validation(_) | AppError::Config(_) => ErrorKind::InvalidInput,
        }
    }

    /// Short user-facing message for a transient notice (toast/snackbar).
    pub fn notice(&self) -> String {
        match self {
            AppError::Network(ref e) => {
                tracing::warn!("Network error: {}", e);
                "Unable to reach the server. Pull to refresh to try again.".to_string()
            }
            AppError::Decode(ref e) => {
                tracing::error!("Undecodable response: {}", e);
                "Received an unexpected response from the server.".to_string()
            }
            AppError::Auth(ref e) => {
                tracing::warn!("Auth error: {}", e);
                "Your session is not available. Please sign in again.".to_string()
            }
            AppError::BackendRejection { ref message, .. } => {
                if message.is_empty() {
                    "The server could not complete the request.".to_string()
                } else {
                    message.clone()
                }
            }
            AppError::Validation(ref msg) => msg.clone(),
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                "The app is not configured correctly.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::BackendRejection {
                status: status.as_u16(),
                message: String::new(),
            }
        } else {
            AppError::Network(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = e
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| match err.message {
                    Some(ref m) => m.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .collect();
        AppError::Validation(messages.join("; "))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            AppError::Network("timeout".into()).kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(
            AppError::Decode("eof".into()).kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(
            AppError::Auth("no token".into()).kind(),
            ErrorKind::AuthFailure
        );
        assert_eq!(
            AppError::BackendRejection {
                status: 500,
                message: String::new()
            }
            .kind(),
            ErrorKind::BackendRejection
        );
    }

    #[test]
    fn test_rejection_notice_prefers_backend_message() {
        let err = AppError::BackendRejection {
            status: 422,
            message: "Ticket already closed".to_string(),
        };
        assert_eq!(err.notice(), "Ticket already closed");

        let err = AppError::BackendRejection {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.notice(), "The server could not complete the request.");
    }
}
