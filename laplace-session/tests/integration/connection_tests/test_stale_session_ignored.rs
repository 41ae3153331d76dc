use laplace_core::{SessionDescription, SessionId, SignalMessage};
use laplace_session::IceState;

use crate::integration::init_tracing;
use crate::utils::{
    ObservedEvent, SIGNAL_TIMEOUT_MS, candidate, is_answer_for, join_viewer, start_test_sharer,
    start_test_viewer,
};

#[tokio::test]
async fn test_viewer_ignores_foreign_and_retired_sessions() {
    init_tracing();

    let session = start_test_viewer("R").await.expect("start");
    let s1 = SessionId::from("R$first");
    let s2 = SessionId::from("R$second");

    session
        .server
        .deliver(SignalMessage::NewSession {
            session_id: s1.clone(),
        })
        .await;
    let peer = session
        .peers
        .wait_for_peer("R$first", SIGNAL_TIMEOUT_MS)
        .await
        .expect("no link for first session");

    // Offer and candidate for another session are dropped
    session
        .server
        .deliver(SignalMessage::GotOffer {
            session_id: s2.clone(),
            offer: SessionDescription::offer("v=0 foreign"),
        })
        .await;
    session
        .server
        .deliver(SignalMessage::CallerIceCandidate {
            session_id: s2.clone(),
            candidate: candidate(9),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(session.server.output.count(is_answer_for("R$second")).await, 0);
    assert_eq!(session.peers.count().await, 1);
    assert!(peer.record().await.remote_description.is_none());

    // Tear the tracked link down; its id is never picked up again
    peer.ice(IceState::Failed).await;
    assert!(
        session
            .observer
            .wait_for(
                |e| *e == ObservedEvent::LinkRemoved(s1.clone()),
                SIGNAL_TIMEOUT_MS
            )
            .await
    );
    assert!(peer.record().await.closed);
    assert_eq!(session.handle.context().own_session(), None);

    session
        .server
        .deliver(SignalMessage::GotOffer {
            session_id: s1.clone(),
            offer: SessionDescription::offer("v=0 stale"),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(session.server.output.count(is_answer_for("R$first")).await, 0);

    // A fresh offer rebinds the slot
    session
        .server
        .deliver(SignalMessage::GotOffer {
            session_id: s2.clone(),
            offer: SessionDescription::offer("v=0 retry"),
        })
        .await;
    session
        .server
        .output
        .wait_for(is_answer_for("R$second"), SIGNAL_TIMEOUT_MS)
        .await
        .expect("rebound link did not answer");
    assert_eq!(session.handle.context().own_session(), Some(s2));

    session.handle.leave().await;
}

#[tokio::test]
async fn test_sharer_never_recreates_removed_link() {
    init_tracing();

    let session = start_test_sharer(Some("R")).await.expect("start");
    join_viewer(&session, "R$gone").await;

    let peer = session.peers.peer("R$gone").await.expect("peer");
    peer.ice(IceState::Disconnected).await;
    assert!(
        session
            .observer
            .wait_for(
                |e| *e == ObservedEvent::LinkRemoved(SessionId::from("R$gone")),
                SIGNAL_TIMEOUT_MS
            )
            .await
    );

    // Late messages for the removed session
    session
        .server
        .deliver(SignalMessage::NewSession {
            session_id: SessionId::from("R$gone"),
        })
        .await;
    session
        .server
        .deliver(SignalMessage::CalleeIceCandidate {
            session_id: SessionId::from("R$gone"),
            candidate: candidate(4),
        })
        .await;
    peer.gather(candidate(5)).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(session.peers.count().await, 1);
    assert_eq!(session.handle.context().link_count(), 0);
    assert!(session.handle.context().status().is_empty());

    session.handle.leave().await;
}
