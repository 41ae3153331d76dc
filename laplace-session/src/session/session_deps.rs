use crate::config::RelayConfig;
use crate::error::SessionError;
use crate::media::{CaptureSource, StaticCapture};
use crate::session::{Clock, NoopObserver, SessionObserver, SystemClock};
use crate::signaling::{SignalingConnector, WsSignaling};
use crate::transport::{PeerConnector, RtcConnector};
use std::sync::Arc;

/// Everything a session manager talks to, injected at construction.
#[derive(Clone)]
pub struct SessionDeps {
    pub signaling: Arc<dyn SignalingConnector>,
    pub peers: Arc<dyn PeerConnector>,
    pub capture: Arc<dyn CaptureSource>,
    pub observer: Arc<dyn SessionObserver>,
    pub clock: Arc<dyn Clock>,
}

impl SessionDeps {
    pub fn new(
        signaling: Arc<dyn SignalingConnector>,
        peers: Arc<dyn PeerConnector>,
        capture: Arc<dyn CaptureSource>,
    ) -> Self {
        Self {
            signaling,
            peers,
            capture,
            observer: Arc::new(NoopObserver),
            clock: Arc::new(SystemClock),
        }
    }

    /// Websocket signaling, `webrtc` peer connections, sample-fed capture.
    pub fn webrtc(config: &RelayConfig) -> Result<Self, SessionError> {
        Ok(Self::new(
            Arc::new(WsSignaling::new(config.signaling_base()?)),
            Arc::new(RtcConnector),
            Arc::new(StaticCapture::new()),
        ))
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
