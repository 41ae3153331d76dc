use laplace_core::ProtocolError;
use thiserror::Error;

/// Failures of the capture primitive. Fatal to a share attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Screen sharing was denied. Please allow access when prompted.")]
    PermissionDenied,

    #[error("Screen sharing is not supported or was cancelled.")]
    NotSupported,

    #[error("capture device failed: {0}")]
    Device(String),
}

/// Session-scoped failures. Any of these ends the whole session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("signaling transport failed: {0}")]
    Transport(String),

    #[error("room not found")]
    RoomNotFound,

    #[error("room closed by the sharer")]
    RoomClosed,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("session has already ended")]
    Ended,

    #[error("session task failed: {0}")]
    Task(String),
}

impl SessionError {
    /// Text shown to the user when the session ends with this error.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::RoomNotFound => "Room not found. Check the code and try again.".to_owned(),
            SessionError::RoomClosed => "The sharer has ended the session.".to_owned(),
            SessionError::Transport(_) => "Connection to the server was lost.".to_owned(),
            other => other.to_string(),
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
