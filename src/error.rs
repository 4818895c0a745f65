// Error types shared by the API client and the screen controllers.
//
// The user only ever sees one string per failure: the server's `message`
// when it sent one, otherwise a fallback picked by the screen.

use thiserror::Error;

use crate::route::LinkError;

/// Failure of a single call to the RSVP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout...).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("upstream error {status}{}", message_suffix(.message))]
    Upstream { status: u16, message: Option<String> },

    /// The server answered 2xx but the body was not what we expected.
    #[error("response decode error: {0}")]
    Decode(String),

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Message to surface to the user: the server's own message when present,
    /// otherwise `fallback`.
    pub fn user_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::Upstream {
                message: Some(message),
                ..
            } => message,
            _ => fallback,
        }
    }

    /// Whether the server was reached and rejected the request.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ApiError::Upstream { .. })
    }
}

/// Outcome of a screen action that did not go through.
#[derive(Error, Debug)]
pub enum FlowError {
    /// A form rule rejected the input; nothing was sent.
    #[error("{0}")]
    Validation(&'static str),

    /// The API call behind the action failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The guest was stored but its link could not be built.
    #[error(transparent)]
    Link(#[from] LinkError),

    /// Copying to the clipboard failed.
    #[error("clipboard error: {0}")]
    Clipboard(#[from] std::io::Error),

    /// The action is not offered in the current state of the screen.
    #[error("action not available in the current state")]
    Unavailable,
}
