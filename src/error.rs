use thiserror::Error;

/// Failure of a club API request.
///
/// The variants only matter for logs. Users always see the same
/// "request failed" notice, whatever the cause.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{what}: could not reach the club API: {source}")]
    Transport {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{what}: club API answered {status}")]
    Status {
        what: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{what}: malformed response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{what}: rejected by the club API: {reason}")]
    Rejected { what: &'static str, reason: String },
}

impl ApiError {
    /// What the request was trying to do, e.g. "fetch players"
    pub fn what(&self) -> &'static str {
        match self {
            ApiError::Transport { what, .. }
            | ApiError::Status { what, .. }
            | ApiError::Decode { what, .. }
            | ApiError::Rejected { what, .. } => what,
        }
    }

    /// Text for the notification banner
    pub fn notice(&self) -> String {
        format!("Request failed: could not {}", self.what())
    }
}

/// Invalid environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}
