use crate::error::SessionError;
use crate::signaling::{Endpoint, SignalingOutput};
use async_trait::async_trait;
use laplace_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Inbound traffic of an open signaling channel.
#[derive(Debug, Clone)]
pub enum SignalingEvent {
    /// A decoded message. Malformed frames and `beat` never get here.
    Message(SignalMessage),

    /// The channel is gone; carries the error text when it failed.
    Closed(Option<String>),
}

/// An open signaling channel.
pub struct SignalingLink {
    pub output: Arc<dyn SignalingOutput>,
    pub events: mpsc::Receiver<SignalingEvent>,
}

#[async_trait]
pub trait SignalingConnector: Send + Sync {
    async fn open(&self, endpoint: &Endpoint) -> Result<SignalingLink, SessionError>;
}
