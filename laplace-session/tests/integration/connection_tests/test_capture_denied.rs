use laplace_core::CapturePreset;
use laplace_session::{CaptureError, RelayConfig, SessionDeps, SessionError, SharerSession};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{DeniedCapture, MockConnector, MockSignalingConnector, TestObserver};

#[tokio::test]
async fn test_capture_denied_opens_no_signaling() {
    init_tracing();

    let (signaling, _server) = MockSignalingConnector::new();
    let peers = MockConnector::new();
    let observer = TestObserver::new();
    let deps = SessionDeps::new(
        Arc::new(signaling.clone()),
        Arc::new(peers.clone()),
        Arc::new(DeniedCapture),
    )
    .with_observer(Arc::new(observer.clone()));

    let result = SharerSession::start(
        RelayConfig::default(),
        CapturePreset::Balanced,
        Some("ROOM1".to_owned()),
        deps,
    )
    .await;

    let Err(err) = result else {
        panic!("sharer started without a stream");
    };
    assert!(matches!(
        err,
        SessionError::Capture(CaptureError::PermissionDenied)
    ));
    assert_eq!(
        err.user_message(),
        "Screen sharing was denied. Please allow access when prompted."
    );
    assert!(signaling.endpoints().await.is_empty());
    assert_eq!(peers.count().await, 0);
    assert!(observer.get_events().await.is_empty());
}
