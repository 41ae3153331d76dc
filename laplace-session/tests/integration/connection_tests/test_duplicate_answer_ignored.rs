use laplace_core::{SessionDescription, SessionId, SignalMessage};
use laplace_session::{IceState, LinkState};

use crate::integration::init_tracing;
use crate::utils::{ObservedEvent, SIGNAL_TIMEOUT_MS, join_viewer, start_test_sharer, wait_until};

#[tokio::test]
async fn test_duplicate_answer_keeps_connected_link() {
    init_tracing();

    let session = start_test_sharer(Some("R")).await.expect("start");
    join_viewer(&session, "R$v").await;
    let peer = session.peers.peer("R$v").await.expect("peer");
    let sid = SessionId::from("R$v");
    let ctx = session.handle.context().clone();
    assert!(
        wait_until(
            || ctx.link(&sid).map(|l| l.state) == Some(LinkState::AnswerExchanged),
            SIGNAL_TIMEOUT_MS
        )
        .await
    );

    peer.ice(IceState::Connected).await;
    assert!(
        session
            .observer
            .wait_for(
                |e| *e == ObservedEvent::LinkConnected(sid.clone()),
                SIGNAL_TIMEOUT_MS
            )
            .await
    );

    // The relay replays the answer
    session
        .server
        .deliver(SignalMessage::GotAnswer {
            session_id: sid.clone(),
            answer: SessionDescription::answer("v=0 replayed"),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(ctx.link(&sid).map(|l| l.state), Some(LinkState::Connected));
    assert_eq!(ctx.link_count(), 1);
    assert!(!session.observer.has_removed("R$v").await);

    let record = peer.record().await;
    assert!(!record.closed);
    assert_eq!(
        record.remote_description,
        Some(SessionDescription::answer("v=0 viewer"))
    );

    session.handle.leave().await;
}

#[tokio::test]
async fn test_second_answer_after_exchange_is_ignored() {
    init_tracing();

    let session = start_test_sharer(Some("R")).await.expect("start");
    join_viewer(&session, "R$w").await;
    let sid = SessionId::from("R$w");
    let ctx = session.handle.context().clone();
    assert!(
        wait_until(
            || ctx.link(&sid).map(|l| l.state) == Some(LinkState::AnswerExchanged),
            SIGNAL_TIMEOUT_MS
        )
        .await
    );

    session
        .server
        .deliver(SignalMessage::GotAnswer {
            session_id: sid.clone(),
            answer: SessionDescription::answer("v=0 second"),
        })
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(
        ctx.link(&sid).map(|l| l.state),
        Some(LinkState::AnswerExchanged)
    );
    assert!(!session.observer.has_removed("R$w").await);
    assert!(!session.handle.is_finished());

    session.handle.leave().await;
}
