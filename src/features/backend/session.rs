use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};

/// Caller identity attached to every backend request.
#[derive(Clone)]
pub struct Session {
    token: Option<String>,
    customer_email: String,
}

impl Session {
    pub fn new(token: impl Into<String>, customer_email: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            customer_email: customer_email.into(),
        }
    }

    /// A session whose token is not available (signed out, storage wiped).
    pub fn without_token(customer_email: impl Into<String>) -> Self {
        Self {
            token: None,
            customer_email: customer_email.into(),
        }
    }

    /// Bearer token, or an auth failure if none is stored.
    pub fn bearer(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Auth("No session token available".to_string()))
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("customer_email", &self.customer_email)
            .finish()
    }
}

impl From<&SessionConfig> for Session {
    fn from(config: &SessionConfig) -> Self {
        Self {
            token: config.token.clone(),
            customer_email: config.customer_email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[test]
    fn test_missing_token_is_auth_failure() {
        let session = Session::without_token("ana@example.com");
        let err = session.bearer().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthFailure);
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new("secret-token", "ana@example.com");
        let printed = format!("{:?}", session);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("ana@example.com"));
    }
}
