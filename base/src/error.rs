use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImmichSearchError {
    /// network or connection level failure (including timeouts)
    #[error("TransportError({0})")]
    TransportError(String),
    /// non-success status from upstream, or a field the upstream must provide is missing
    #[error("UpstreamError({0})")]
    UpstreamError(String),
    #[error("ParseError({0})")]
    ParseError(String),
    #[error("InvalidIdentifier({0})")]
    InvalidIdentifier(String),
    #[error("UnknownResource({0})")]
    UnknownResource(String),
    #[error("InvalidUriScheme({0})")]
    InvalidUriScheme(String),
    #[error("CancelledError({0})")]
    CancelledError(String),
    #[error("ConfigError({0})")]
    ConfigError(String),
}

impl ImmichSearchError {
    /// Returns true if the error was raised because work was cancelled
    /// (by the caller or by a failing sibling), not because the work itself failed.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ImmichSearchError::CancelledError(_))
    }

    /// Returns true if `err` wraps a cancellation.
    pub fn is_cancellation_error(err: &anyhow::Error) -> bool {
        err.downcast_ref::<ImmichSearchError>()
            .map(|e| e.is_cancellation())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ImmichSearchError::InvalidIdentifier("not-a-uuid".to_string());
        assert_eq!(e.to_string(), "InvalidIdentifier(not-a-uuid)");
    }

    #[test]
    fn test_is_cancellation_error() {
        let cancelled: anyhow::Error =
            ImmichSearchError::CancelledError("search".to_string()).into();
        assert!(ImmichSearchError::is_cancellation_error(&cancelled));

        let upstream: anyhow::Error =
            ImmichSearchError::UpstreamError("status 500".to_string()).into();
        assert!(!ImmichSearchError::is_cancellation_error(&upstream));

        let other = anyhow::anyhow!("plain error");
        assert!(!ImmichSearchError::is_cancellation_error(&other));
    }
}
