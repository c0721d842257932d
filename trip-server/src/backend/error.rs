//! Transport backend error types.

use std::fmt;

/// Errors from the transport backend client.
#[derive(Debug)]
pub enum BackendError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Backend answered with a non-success HTTP status
    ApiError { status: u16, message: String },

    /// Envelope `status` field was not "success"
    Unsuccessful(String),

    /// Rate limited by the backend
    RateLimited,

    /// A record in the response failed validation
    InvalidRecord(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Http(e) => write!(f, "HTTP error: {e}"),
            BackendError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            BackendError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            BackendError::Unsuccessful(status) => {
                write!(f, "backend reported status {status:?}")
            }
            BackendError::RateLimited => write!(f, "rate limited by transport backend"),
            BackendError::InvalidRecord(msg) => write!(f, "invalid record: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BackendError::Unsuccessful("error".into());
        assert_eq!(err.to_string(), "backend reported status \"error\"");

        let err = BackendError::ApiError {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = BackendError::Json {
            message: "missing field `data`".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("missing field"));
        assert!(err.to_string().contains("(body: {})"));
    }
}
