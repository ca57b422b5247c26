//! Error types for the lookup pipeline

use thiserror::Error;

/// Result type for lookup operations
pub type LookupResult<T> = Result<T, LookupError>;

/// Position in the lookup pipeline.
///
/// Stages only ever advance: `Ip` → `Coordinates` → `Passes`. Every error
/// records the stage that was pending when it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Waiting on the IP echo service
    Ip,
    /// Waiting on the geolocation service
    Coordinates,
    /// Waiting on the pass prediction service
    Passes,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Ip => "ip",
            Stage::Coordinates => "coordinates",
            Stage::Passes => "passes",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while resolving one pipeline stage
#[derive(Error, Debug)]
pub enum LookupError {
    /// Request never produced a response: DNS, connect, TLS, timeout
    #[error("{stage} lookup failed: transport error: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success HTTP status
    #[error("{stage} lookup failed: HTTP {status}: {body}")]
    ServiceStatus {
        stage: Stage,
        status: u16,
        body: String,
    },

    /// HTTP success, but the payload reports a failure of its own
    #[error("{stage} lookup failed: service reported failure: {body}")]
    ServiceLogic { stage: Stage, body: String },

    /// Body is not the expected JSON shape
    #[error("{stage} lookup failed: unexpected response: {source}")]
    Parse {
        stage: Stage,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LookupError {
    pub fn stage(&self) -> Stage {
        match self {
            LookupError::Transport { stage, .. }
            | LookupError::ServiceStatus { stage, .. }
            | LookupError::ServiceLogic { stage, .. }
            | LookupError::Parse { stage, .. } => *stage,
        }
    }

    /// HTTP status, for `ServiceStatus` errors only
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LookupError::ServiceStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, when a response was received
    pub fn body(&self) -> Option<&str> {
        match self {
            LookupError::Transport { .. } => None,
            LookupError::ServiceStatus { body, .. }
            | LookupError::ServiceLogic { body, .. }
            | LookupError::Parse { body, .. } => Some(body),
        }
    }

    pub(crate) fn transport(stage: Stage, source: reqwest::Error) -> Self {
        LookupError::Transport { stage, source }
    }
}
