use std::io;

use reqwest::StatusCode;

pub type Result<T, E = ForumError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("could not build the http client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The response body could not be read
    #[error("invalid response: {0}")]
    Response(#[from] reqwest::Error),

    /// The response body was not the JSON that was asked for
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("{url} answered {status}")]
    Status { status: StatusCode, url: String },

    #[error("no active session (tips: log in first)")]
    MissingSession,

    #[error("Please select a user")]
    EmptySelection,

    #[error("unknown user `{0}`")]
    UnknownUser(String),

    #[error("`{0}` is required")]
    MissingField(&'static str),

    #[error("no post is open")]
    NoCurrentPost,

    #[error("session file: {0}")]
    Io(#[from] io::Error),

    #[error("session file: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForumError {
    /// Whether the error came from talking to the remote api
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Response(_) | Self::Decode { .. } | Self::Status { .. }
        )
    }
}
