//! Error types and the degraded-result wrapper used at every external boundary

use thiserror::Error;

/// Main error type for the `SmartTravel` application
#[derive(Error, Debug)]
pub enum SmartTravelError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Network or HTTP status failures talking to an external API
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Response arrived but did not have the expected shape
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// A lookup did not find what was asked for
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Query store failures
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Page rendering errors
    #[error("Template error: {message}")]
    Template { message: String },
}

impl SmartTravelError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new malformed response error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(message: S) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SmartTravelError::Config { .. } => {
                "A service is not configured. Please check the API keys.".to_string()
            }
            SmartTravelError::Transport { .. } => {
                "Unable to reach an external service. Results may be incomplete.".to_string()
            }
            SmartTravelError::MalformedResponse { .. } => {
                "An external service returned unexpected data.".to_string()
            }
            SmartTravelError::NotFound { message } => message.clone(),
            SmartTravelError::Storage { .. } => {
                "Your query could not be saved to the history.".to_string()
            }
            SmartTravelError::Template { .. } => "The page could not be rendered.".to_string(),
        }
    }
}

impl From<reqwest::Error> for SmartTravelError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry API keys in the query string
        let err = err.without_url();
        if err.is_decode() {
            Self::malformed(err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<fjall::Error> for SmartTravelError {
    fn from(err: fjall::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<postcard::Error> for SmartTravelError {
    fn from(err: postcard::Error) -> Self {
        Self::storage(format!("Failed to encode record: {err}"))
    }
}

impl From<tera::Error> for SmartTravelError {
    fn from(err: tera::Error) -> Self {
        Self::template(err.to_string())
    }
}

/// Result of a boundary call that never fails outright.
///
/// A degraded outcome still carries a usable fallback value, so callers can
/// render something and decide separately whether to surface the cause.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Degraded { fallback: T, cause: SmartTravelError },
}

impl<T> Outcome<T> {
    pub fn degraded(fallback: T, cause: SmartTravelError) -> Self {
        Self::Degraded { fallback, cause }
    }

    /// The data regardless of whether it is real or the fallback
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn cause(&self) -> Option<&SmartTravelError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Degraded { cause, .. } => Some(cause),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }

    pub fn into_parts(self) -> (T, Option<SmartTravelError>) {
        match self {
            Outcome::Success(value) => (value, None),
            Outcome::Degraded { fallback, cause } => (fallback, Some(cause)),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Degraded { fallback, cause } => Outcome::Degraded {
                fallback: f(fallback),
                cause,
            },
        }
    }
}
