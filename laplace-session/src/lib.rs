pub mod config;
pub mod error;
pub mod link;
pub mod media;
pub mod session;
pub mod signaling;
pub mod transport;

pub use config::RelayConfig;
pub use error::{CaptureError, SessionError, SessionResult};
pub use link::{ChannelInput, Heartbeat, IceState, LatencyProbe, LinkEvent, LinkState, PeerLink};
pub use media::{
    CaptureSource, LocalStream, LocalTrack, RemoteStream, RemoteTrack, StaticCapture, TrackKind,
};
pub use session::{
    Clock, LinkInfo, NoopObserver, SessionCommand, SessionContext, SessionDeps, SessionHandle,
    SessionObserver, SharerSession, SystemClock, ViewerSession,
};
pub use signaling::{
    Endpoint, SignalingConnector, SignalingEvent, SignalingLink, SignalingOutput, WsSignaling,
};
pub use transport::{PeerConnector, PeerTransport, RtcConnector, RtcTransport, TransportConfig};
