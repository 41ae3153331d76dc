use crate::link::LinkEvent;
use crate::media::LocalStream;
use crate::transport::TransportConfig;
use anyhow::Result;
use async_trait::async_trait;
use laplace_core::{IceCandidate, SessionDescription, SessionId};
use tokio::sync::mpsc;

/// One peer connection plus its heartbeat data channel.
///
/// Implementations report asynchronous happenings (gathered candidates, ICE
/// state, channel traffic, remote tracks) as [`LinkEvent`]s on the queue
/// they were created with.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Creates the heartbeat data channel. Called on the offering side only;
    /// the answering side receives it.
    async fn open_heartbeat_channel(&self) -> Result<()>;

    async fn add_stream(&self, stream: &LocalStream) -> Result<()>;

    /// Creates an offer requesting audio and video, sets it locally.
    async fn create_offer(&self) -> Result<SessionDescription>;

    /// Creates an answer to the applied remote offer, sets it locally.
    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    /// Sends text on the heartbeat channel.
    async fn send_text(&self, text: String) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Factory for [`PeerTransport`]s.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        session_id: SessionId,
        config: &TransportConfig,
        events: mpsc::Sender<LinkEvent>,
    ) -> Result<Box<dyn PeerTransport>>;
}
