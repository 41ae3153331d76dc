use laplace_core::SignalMessage;
use laplace_session::SessionError;

use crate::integration::init_tracing;
use crate::utils::{ObservedEvent, SIGNAL_TIMEOUT_MS, join_viewer, start_test_sharer, start_test_viewer};

#[tokio::test]
async fn test_room_closed_ends_sharer() {
    init_tracing();

    let session = start_test_sharer(Some("ROOM9")).await.expect("start");
    join_viewer(&session, "ROOM9$a").await;
    let peer = session.peers.peer("ROOM9$a").await.expect("peer");
    let stream = session.local_stream().await.expect("stream");
    assert!(stream.is_live());

    session.server.deliver(SignalMessage::RoomClosed).await;

    let observer = session.observer.clone();
    let output = session.server.output.clone();
    let result = session.handle.join().await;
    assert!(matches!(result, Err(SessionError::RoomClosed)));

    assert!(!stream.is_live());
    assert!(peer.record().await.closed);
    assert!(output.is_closed().await);
    assert!(
        observer
            .wait_for(|e| matches!(e, ObservedEvent::Ended(Some(_))), SIGNAL_TIMEOUT_MS)
            .await
    );
}

#[tokio::test]
async fn test_room_not_found_ends_viewer() {
    init_tracing();

    let session = start_test_viewer("NOPE").await.expect("start");
    session
        .server
        .deliver_text(r#"{"Type":"roomNotFound"}"#)
        .await;

    let output = session.server.output.clone();
    let result = session.handle.join().await;
    let err = result.expect_err("viewer should fail");
    assert!(matches!(err, SessionError::RoomNotFound));
    assert!(!err.user_message().is_empty());
    assert!(output.is_closed().await);
}
