use laplace_session::SessionError;

use crate::integration::init_tracing;
use crate::utils::{join_viewer, start_test_sharer};

#[tokio::test]
async fn test_signaling_drop_ends_session() {
    init_tracing();

    let session = start_test_sharer(Some("ROOM3")).await.expect("start");
    join_viewer(&session, "ROOM3$x").await;
    let peer = session.peers.peer("ROOM3$x").await.expect("peer");

    session.server.close(Some("connection reset")).await;

    match session.handle.join().await {
        Err(SessionError::Transport(reason)) => assert_eq!(reason, "connection reset"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(peer.record().await.closed);
}

#[tokio::test]
async fn test_malformed_frames_are_skipped() {
    init_tracing();

    let session = start_test_sharer(Some("ROOM3")).await.expect("start");
    session.server.deliver_text("not json").await;
    session.server.deliver_text(r#"{"Type":"teleport"}"#).await;
    session.server.deliver_text(r#"{"Type":"beat"}"#).await;

    join_viewer(&session, "ROOM3$still-here").await;
    assert_eq!(session.peers.count().await, 1);
    assert!(!session.handle.is_finished());

    session.handle.leave().await;
    session.handle.join().await.expect("clean leave");
}
