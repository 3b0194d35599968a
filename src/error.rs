use std::fmt;
use std::time::Duration;


// Failure of a single request. Pollers never retry: the next timer tick simply issues a new
// request, so callers are expected to log these and move on.
#[derive(Debug)]
pub enum PollError {
    // The request could not be delivered or the server replied with an error status.
    Transport(String),
    // No reply within the request timeout. A reply that arrives later is dropped.
    Timeout(Duration),
    // The reply was not the JSON we expected.
    Decode(serde_json::Error),
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidInterval(String),
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::Transport(message) => write!(f, "transport error: {message}"),
            PollError::Timeout(timeout) => write!(f, "no response within {timeout:?}"),
            PollError::Decode(err) => write!(f, "cannot decode response: {err}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(err) => write!(f, "cannot parse page config: {err}"),
            ConfigError::InvalidInterval(message) => write!(f, "invalid interval: {message}"),
        }
    }
}

impl std::error::Error for PollError {}
impl std::error::Error for ConfigError {}
