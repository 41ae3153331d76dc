use laplace_core::{ChannelMessage, SessionId, Status};
use laplace_session::IceState;

use crate::integration::init_tracing;
use crate::utils::{ObservedEvent, SIGNAL_TIMEOUT_MS, join_viewer, start_test_sharer, wait_until};

#[tokio::test]
async fn test_multiple_viewers() {
    init_tracing();

    let session = start_test_sharer(Some("ROOM42")).await.expect("start");
    for label in ["otter", "heron", "badger"] {
        join_viewer(&session, &format!("ROOM42${}", label)).await;
    }

    let expected = Status {
        num_conn: 3,
        peers: vec!["badger".to_owned(), "heron".to_owned(), "otter".to_owned()],
    };
    let ctx = session.handle.context().clone();
    assert!(wait_until(|| ctx.status() == expected, SIGNAL_TIMEOUT_MS).await);
    assert_eq!(ctx.link_count(), 3);
    assert_eq!(session.peers.count().await, 3);

    // Open channels then drop one viewer: the rest see the new status
    let otter = session.peers.peer("ROOM42$otter").await.expect("otter");
    let heron = session.peers.peer("ROOM42$heron").await.expect("heron");
    let badger = session.peers.peer("ROOM42$badger").await.expect("badger");
    otter.open_channel().await;
    heron.open_channel().await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    badger.ice(IceState::Closed).await;
    assert!(
        session
            .observer
            .wait_for(
                |e| *e == ObservedEvent::LinkRemoved(SessionId::from("ROOM42$badger")),
                SIGNAL_TIMEOUT_MS
            )
            .await
    );

    let after = Status {
        num_conn: 2,
        peers: vec!["heron".to_owned(), "otter".to_owned()],
    };
    let wire = ChannelMessage::Status(after.clone()).to_string();
    for peer in [&otter, &heron] {
        assert_eq!(
            peer.wait_for_sent(|t| t == wire, SIGNAL_TIMEOUT_MS).await,
            Some(wire.clone())
        );
    }
    assert!(badger.record().await.closed);
    assert!(!otter.record().await.closed);
    assert_eq!(ctx.status(), after);
    assert_eq!(session.observer.last_status().await, Some(after));

    session.handle.leave().await;
}
