use domain::services::RegistrationError;
use thiserror::Error;

/// How the caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Network or server trouble. Shown as a dismissible alert; the action stays retryable.
    Transient,
    /// The request itself was rejected. Shown inline; retrying unchanged will not help.
    Validation,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not logged in")]
    MissingSession,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ClientError {
    /// Maps a non-success HTTP status and the server's message to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            429 => ClientError::RateLimited,
            400..=499 => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            ClientError::Http(_)
            | ClientError::Timeout
            | ClientError::RateLimited
            | ClientError::Server { .. }
            | ClientError::InvalidResponse(_)
            | ClientError::Registration(RegistrationError::Busy(_)) => FailureClass::Transient,
            ClientError::Unauthorized(_)
            | ClientError::Forbidden(_)
            | ClientError::NotFound(_)
            | ClientError::Validation(_)
            | ClientError::MissingSession
            | ClientError::Config(_)
            | ClientError::Registration(_) => FailureClass::Validation,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() == FailureClass::Transient
    }

    /// The session is missing or no longer accepted; the caller should log in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_) | ClientError::MissingSession)
    }

    /// Text to show the user: the server's message where there is one.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(msg)
            | ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Validation(msg) => msg.clone(),
            ClientError::Server { .. } | ClientError::InvalidResponse(_) => {
                "Something went wrong on the server. Please try again.".to_string()
            }
            ClientError::Http(_) | ClientError::Timeout => {
                "Could not reach the events service. Please try again.".to_string()
            }
            ClientError::RateLimited => "Too many requests. Please try again later.".to_string(),
            ClientError::MissingSession => "Please log in to continue.".to_string(),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Registration(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Http(err)
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        let message = if messages.len() == 1 {
            messages.remove(0)
        } else {
            format!("{} validation errors: {}", messages.len(), messages.join("; "))
        };

        ClientError::Validation(message)
    }
}
