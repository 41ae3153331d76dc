use async_trait::async_trait;
use laplace_core::{CaptureConstraints, CapturePreset, IceCandidate, RoomId, SessionId, SignalMessage};
use laplace_session::{
    CaptureError, CaptureSource, LocalStream, RelayConfig, SessionDeps, SessionError,
    SessionHandle, SharerSession, StaticCapture, ViewerSession,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::mock_observer::{ManualClock, TestObserver};
use super::mock_signaling::{MockServer, MockSignalingConnector};
use super::mock_transport::MockConnector;

/// Timeout for a session to react to an injected message (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 2000;

/// Capture that remembers the stream it handed out.
#[derive(Clone, Default)]
pub struct RecordingCapture {
    pub stream: Arc<Mutex<Option<Arc<LocalStream>>>>,
}

#[async_trait]
impl CaptureSource for RecordingCapture {
    async fn capture(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Arc<LocalStream>, CaptureError> {
        let stream = StaticCapture::new().capture(constraints).await?;
        *self.stream.lock().await = Some(stream.clone());
        Ok(stream)
    }
}

/// Capture the user refuses.
pub struct DeniedCapture;

#[async_trait]
impl CaptureSource for DeniedCapture {
    async fn capture(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<Arc<LocalStream>, CaptureError> {
        Err(CaptureError::PermissionDenied)
    }
}

/// Everything a test needs to drive one session.
pub struct TestSession {
    pub handle: SessionHandle,
    pub server: MockServer,
    pub signaling: MockSignalingConnector,
    pub peers: MockConnector,
    pub observer: TestObserver,
    pub capture: RecordingCapture,
    pub clock: ManualClock,
}

impl TestSession {
    pub async fn local_stream(&self) -> Option<Arc<LocalStream>> {
        self.capture.stream.lock().await.clone()
    }
}

fn test_deps() -> (
    SessionDeps,
    MockSignalingConnector,
    MockServer,
    MockConnector,
    TestObserver,
    RecordingCapture,
    ManualClock,
) {
    let (signaling, server) = MockSignalingConnector::new();
    let peers = MockConnector::new();
    let observer = TestObserver::new();
    let capture = RecordingCapture::default();
    let clock = ManualClock::at(1_000);

    let deps = SessionDeps::new(
        Arc::new(signaling.clone()),
        Arc::new(peers.clone()),
        Arc::new(capture.clone()),
    )
    .with_observer(Arc::new(observer.clone()))
    .with_clock(Arc::new(clock.clone()));

    (deps, signaling, server, peers, observer, capture, clock)
}

pub async fn start_test_sharer(claim: Option<&str>) -> Result<TestSession, SessionError> {
    let (deps, signaling, server, peers, observer, capture, clock) = test_deps();
    let handle = SharerSession::start(
        RelayConfig::default(),
        CapturePreset::Balanced,
        claim.map(str::to_owned),
        deps,
    )
    .await?;

    Ok(TestSession {
        handle,
        server,
        signaling,
        peers,
        observer,
        capture,
        clock,
    })
}

pub async fn start_test_viewer(room: &str) -> Result<TestSession, SessionError> {
    let (deps, signaling, server, peers, observer, capture, clock) = test_deps();
    let handle = ViewerSession::start(RelayConfig::default(), RoomId::from(room), deps).await?;

    Ok(TestSession {
        handle,
        server,
        signaling,
        peers,
        observer,
        capture,
        clock,
    })
}

pub fn candidate(n: u32) -> IceCandidate {
    IceCandidate {
        candidate: format!("candidate:{} 1 udp 2122260223 10.0.0.{} 5000{} typ host", n, n, n),
        sdp_mid: Some("0".to_owned()),
        sdp_m_line_index: Some(0),
        username_fragment: None,
    }
}

pub fn is_offer_for(session_id: &str) -> impl Fn(&SignalMessage) -> bool + '_ {
    move |m| matches!(m, SignalMessage::GotOffer { session_id: id, .. } if id.as_str() == session_id)
}

pub fn is_answer_for(session_id: &str) -> impl Fn(&SignalMessage) -> bool + '_ {
    move |m| matches!(m, SignalMessage::GotAnswer { session_id: id, .. } if id.as_str() == session_id)
}

pub fn is_caller_candidate_for(session_id: &str) -> impl Fn(&SignalMessage) -> bool + '_ {
    move |m| {
        matches!(m, SignalMessage::CallerIceCandidate { session_id: id, .. } if id.as_str() == session_id)
    }
}

pub fn is_callee_candidate_for(session_id: &str) -> impl Fn(&SignalMessage) -> bool + '_ {
    move |m| {
        matches!(m, SignalMessage::CalleeIceCandidate { session_id: id, .. } if id.as_str() == session_id)
    }
}

/// Drives a sharer-side link for `session_id` through join, offer and answer.
pub async fn join_viewer(session: &TestSession, session_id: &str) {
    session
        .server
        .deliver(SignalMessage::NewSession {
            session_id: SessionId::from(session_id),
        })
        .await;
    session
        .server
        .output
        .wait_for(is_offer_for(session_id), SIGNAL_TIMEOUT_MS)
        .await
        .expect("offer was not sent");

    session
        .server
        .deliver(SignalMessage::GotAnswer {
            session_id: SessionId::from(session_id),
            answer: laplace_core::SessionDescription::answer("v=0 viewer"),
        })
        .await;
}

/// Polls `check` until it holds or the timeout passes.
pub async fn wait_until<F>(check: F, timeout_ms: u64) -> bool
where
    F: Fn() -> bool,
{
    let start = tokio::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);

    loop {
        if check() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
