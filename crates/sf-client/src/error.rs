//! Transport errors.
//!
//! Everything here is reported once; the transport never retries. The
//! connector core folds all of these into an aborted operation, so the
//! kinds only need to be precise enough for the host to decide whether to
//! re-authenticate, back off, or give up.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// The request never got an HTTP answer.
    pub fn is_network_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout | ErrorKind::Connection(_))
    }

    /// The access token was refused; the host has to obtain a new one.
    pub fn is_session_expired(&self) -> bool {
        matches!(self.kind, ErrorKind::SessionExpired(_))
    }

    /// HTTP status of the answer, when there was one and it is known.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Status { status, .. } => Some(*status),
            ErrorKind::SessionExpired(_) => Some(401),
            ErrorKind::RateLimited => Some(429),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Non-2xx answer without a Salesforce error body.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Session expired or invalid: {0}")]
    SessionExpired(String),

    /// `REQUEST_LIMIT_EXCEEDED` or a plain 429.
    #[error("API request limit exceeded")]
    RateLimited,

    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    /// The request could not be built or the body could not be read.
    #[error("Request failed: {0}")]
    Request(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Error body returned by the REST API.
    #[error("Salesforce API error: {error_code} - {message}")]
    SalesforceApi {
        error_code: String,
        message: String,
        fields: Vec<String>,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else {
            ErrorKind::Request(err.to_string())
        };
        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::Config(format!("Invalid URL: {}", err)), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors() {
        assert!(Error::new(ErrorKind::Timeout).is_network_error());
        assert!(Error::new(ErrorKind::Connection("refused".into())).is_network_error());
        assert!(!Error::new(ErrorKind::RateLimited).is_network_error());
    }

    #[test]
    fn test_status() {
        let err = Error::new(ErrorKind::Status {
            status: 503,
            message: "unavailable".into(),
        });
        assert_eq!(err.status(), Some(503));
        assert_eq!(Error::new(ErrorKind::RateLimited).status(), Some(429));
        assert_eq!(Error::new(ErrorKind::Timeout).status(), None);

        let expired = Error::new(ErrorKind::SessionExpired("INVALID_SESSION_ID".into()));
        assert!(expired.is_session_expired());
        assert_eq!(expired.status(), Some(401));
    }

    #[test]
    fn test_display() {
        let err = Error::new(ErrorKind::SalesforceApi {
            error_code: "INVALID_FIELD".to_string(),
            message: "No such column 'foo' on entity 'Account'".to_string(),
            fields: vec!["foo".to_string()],
        });
        assert_eq!(
            err.to_string(),
            "Salesforce API error: INVALID_FIELD - No such column 'foo' on entity 'Account'"
        );
        assert_eq!(
            ErrorKind::Status {
                status: 500,
                message: "boom".into()
            }
            .to_string(),
            "HTTP 500: boom"
        );
    }
}
