#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx from the proxy; `message` comes from its `{message}` body
    /// when there is one.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid proxy url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
