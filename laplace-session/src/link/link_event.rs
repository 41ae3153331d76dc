use crate::media::RemoteTrack;
use bytes::Bytes;
use laplace_core::{IceCandidate, SessionId};

/// ICE connection state as reported by the peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IceState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl IceState {
    pub fn is_connected(&self) -> bool {
        matches!(self, IceState::Connected | IceState::Completed)
    }

    /// States that end a link.
    pub fn is_down(&self) -> bool {
        matches!(
            self,
            IceState::Disconnected | IceState::Failed | IceState::Closed
        )
    }
}

/// Events a peer transport (and the link's heartbeat timer) reports to the
/// owning session manager.
#[derive(Debug, Clone)]
pub enum LinkEvent {
    /// A local ICE candidate was gathered and must be trickled to the remote.
    CandidateGenerated(SessionId, IceCandidate),

    IceStateChanged(SessionId, IceState),

    /// The heartbeat data channel is open in either direction.
    ChannelOpen(SessionId),

    ChannelMessage(SessionId, Bytes),

    ChannelClosed(SessionId),

    RemoteTrack(SessionId, RemoteTrack),

    /// The link's heartbeat interval elapsed.
    HeartbeatDue(SessionId),
}

impl LinkEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            LinkEvent::CandidateGenerated(id, _)
            | LinkEvent::IceStateChanged(id, _)
            | LinkEvent::ChannelOpen(id)
            | LinkEvent::ChannelMessage(id, _)
            | LinkEvent::ChannelClosed(id)
            | LinkEvent::RemoteTrack(id, _)
            | LinkEvent::HeartbeatDue(id) => id,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<webrtc::ice_transport::ice_connection_state::RTCIceConnectionState> for IceState {
    fn from(s: webrtc::ice_transport::ice_connection_state::RTCIceConnectionState) -> Self {
        use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState as Rtc;
        match s {
            Rtc::Checking => IceState::Checking,
            Rtc::Connected => IceState::Connected,
            Rtc::Completed => IceState::Completed,
            Rtc::Disconnected => IceState::Disconnected,
            Rtc::Failed => IceState::Failed,
            Rtc::Closed => IceState::Closed,
            _ => IceState::New,
        }
    }
}
