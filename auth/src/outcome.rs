//! Tagged results returned by the protocol surface.

use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, RegistrationError};

/// Result of [`crate::Authenticator::register`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    success: bool,
    message: String,
    error: Option<RegistrationError>,
}

impl RegistrationOutcome {
    pub(crate) fn succeeded() -> Self {
        Self {
            success: true,
            message: "Registration successful".to_string(),
            error: None,
        }
    }

    pub(crate) fn failed(error: RegistrationError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> Option<RegistrationError> {
        self.error
    }

    pub fn into_result(self) -> Result<(), RegistrationError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Result of [`crate::Authenticator::authenticate`]; carries the session
/// token on success.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    success: bool,
    message: String,
    session_token: Option<String>,
    error: Option<AuthError>,
}

impl AuthOutcome {
    pub(crate) fn succeeded(session_token: String) -> Self {
        Self {
            success: true,
            message: "Authentication successful".to_string(),
            session_token: Some(session_token),
            error: None,
        }
    }

    pub(crate) fn failed(error: AuthError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            session_token: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn error(&self) -> Option<AuthError> {
        self.error
    }

    pub fn into_result(self) -> Result<String, AuthError> {
        match (self.session_token, self.error) {
            (Some(token), None) => Ok(token),
            (_, Some(err)) => Err(err),
            (None, None) => Err(AuthError::InvalidChallenge),
        }
    }
}
