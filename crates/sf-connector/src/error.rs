//! Error types for the connector core.
//!
//! The kinds mirror how a failure affects the surrounding transaction:
//! [`ErrorKind::Aborted`] ends it, [`ErrorKind::Skipped`] ends only the
//! current operation, and [`ErrorKind::RecordNotFound`] asks the caller to
//! create instead of update. Per-record write failures inside a batch are
//! not errors at all; they come back as unsuccessful
//! [`OperationResult`](crate::OperationResult)s.

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for connector operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidQuery(message.into()))
    }

    pub(crate) fn aborted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Aborted(message.into()))
    }

    pub(crate) fn skipped(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Skipped(message.into()))
    }

    pub(crate) fn record_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecordNotFound(message.into()))
    }

    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOperation(message.into()))
    }

    /// Returns true if the whole transaction must stop.
    pub fn is_aborted(&self) -> bool {
        matches!(self.kind, ErrorKind::Aborted(_))
    }

    /// Returns true if only the current operation was dropped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.kind, ErrorKind::Skipped(_))
    }

    /// Returns true if the caller should create the record instead.
    pub fn is_record_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::RecordNotFound(_))
    }

    /// Returns true if query input was rejected before any request.
    pub fn is_invalid_query(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidQuery(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Malformed filter or select input; raised before any request.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Transport failure or a response the connector cannot interpret.
    #[error("Operation aborted: {0}")]
    Aborted(String),

    /// Dropped by a lookup policy; the transaction continues.
    #[error("Operation skipped: {0}")]
    Skipped(String),

    /// No match for an update; create the record instead.
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// The operation cannot be carried out as described.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl From<busbar_sf_rest::Error> for Error {
    fn from(err: busbar_sf_rest::Error) -> Self {
        Error::with_source(ErrorKind::Aborted(err.to_string()), err)
    }
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error::with_source(ErrorKind::Aborted(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Error::aborted("x").is_aborted());
        assert!(Error::skipped("x").is_skipped());
        assert!(Error::new(ErrorKind::RecordNotFound("x".into())).is_record_not_found());
        assert!(Error::invalid_query("x").is_invalid_query());
        assert!(!Error::invalid_operation("x").is_aborted());
    }

    #[test]
    fn test_transport_errors_abort() {
        let client_err = busbar_sf_client::Error::new(busbar_sf_client::ErrorKind::Timeout);
        let err: Error = busbar_sf_rest::Error::from(client_err).into();
        assert!(err.is_aborted());
        assert!(err.to_string().contains("Request timeout"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
