// Structured error handling for the reconciler.
//
// Fetch-side failures are recoverable by design: the reconciler degrades to
// an empty batch instead of propagating them to the caller (see reconciler.rs).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("query service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("failed to decode query response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid query: {0}")]
    Query(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether a retry against the same endpoint could plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            SyncError::Transport(_) => true,
            SyncError::Service { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_above_500_are_recoverable() {
        let err = SyncError::Service {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert!(err.is_recoverable());

        let err = SyncError::Service {
            status: 400,
            body: "bad predicate".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn config_errors_are_not_recoverable() {
        assert!(!SyncError::Config("missing api key".to_string()).is_recoverable());
    }
}
