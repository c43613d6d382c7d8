use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single request against the timer server. Network errors,
/// non-2xx responses and undecodable bodies all land here and are handled the
/// same way by the controller.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}
